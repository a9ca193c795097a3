//! Fetch the certificate chain a TLS server presents
//!
//! Verification is disabled on purpose: the point is to see what the server
//! sends, including self-signed and expired chains.

use super::pem::encode_certificates;
use crate::error::{Result, ToolsError};
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{verify_tls12_signature, verify_tls13_signature, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Port used when the target names none
pub const DEFAULT_TLS_PORT: u16 = 443;

/// Accepts whatever chain the server presents, still checking handshake signatures
#[derive(Debug)]
struct AcceptAnyCertificate {
    provider: Arc<CryptoProvider>,
}

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls12_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, rustls::Error> {
        verify_tls13_signature(
            message,
            cert,
            dss,
            &self.provider.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.provider
            .signature_verification_algorithms
            .supported_schemes()
    }
}

/// Split `host`, `host:port`, `[v6]` or `[v6]:port`
pub fn split_target(target: &str) -> Result<(String, u16)> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ToolsError::BadRequest("Empty TLS target".to_string()));
    }

    let parse_port = |port: &str| {
        port.parse::<u16>()
            .map_err(|_| ToolsError::BadRequest(format!("Invalid port in {}", target)))
    };

    if let Some(rest) = target.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| ToolsError::BadRequest(format!("Unclosed bracket in {}", target)))?;
        let port = match after.strip_prefix(':') {
            Some(port) => parse_port(port)?,
            None if after.is_empty() => DEFAULT_TLS_PORT,
            None => return Err(ToolsError::BadRequest(format!("Invalid target {}", target))),
        };
        return Ok((host.to_string(), port));
    }

    match target.rsplit_once(':') {
        // More than one colon without brackets: a bare IPv6 address
        Some((host, _)) if host.contains(':') => Ok((target.to_string(), DEFAULT_TLS_PORT)),
        Some((host, port)) => Ok((host.to_string(), parse_port(port)?)),
        None => Ok((target.to_string(), DEFAULT_TLS_PORT)),
    }
}

fn client_config() -> Result<ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());

    let config = ClientConfig::builder_with_provider(provider.clone())
        .with_safe_default_protocol_versions()?
        .dangerous()
        .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate { provider }))
        .with_no_client_auth();

    Ok(config)
}

/// Handshake with `target` and collect every certificate it presents
pub async fn fetch_certificates(
    target: &str,
    timeout: Duration,
) -> Result<Vec<CertificateDer<'static>>> {
    let (host, port) = split_target(target)?;

    let server_name = ServerName::try_from(host.clone())
        .map_err(|e| ToolsError::BadRequest(format!("Invalid server name {}: {}", host, e)))?;

    let connector = TlsConnector::from(Arc::new(client_config()?));

    let stream = tokio::time::timeout(timeout, TcpStream::connect((host.as_str(), port)))
        .await
        .map_err(|_| ToolsError::Network(format!("Timed out connecting to {}:{}", host, port)))?
        .map_err(|e| ToolsError::Network(format!("Failed to connect to {}:{}: {}", host, port, e)))?;

    let tls = tokio::time::timeout(timeout, connector.connect(server_name, stream))
        .await
        .map_err(|_| ToolsError::Tls(format!("Timed out during handshake with {}", host)))?
        .map_err(|e| ToolsError::Tls(format!("Handshake with {} failed: {}", host, e)))?;

    let (_, connection) = tls.get_ref();
    let certificates: Vec<CertificateDer<'static>> = connection
        .peer_certificates()
        .map(|chain| chain.iter().map(|c| c.clone().into_owned()).collect())
        .unwrap_or_default();

    debug!(
        "Received {} certificates from {}:{}",
        certificates.len(),
        host,
        port
    );

    Ok(certificates)
}

/// Handshake with `target` and return its chain as concatenated PEM
pub async fn fetch_pem(target: &str, timeout: Duration) -> Result<String> {
    let certificates = fetch_certificates(target, timeout).await?;
    Ok(encode_certificates(&certificates))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_target() {
        assert_eq!(
            split_target("fleet.example.com").unwrap(),
            ("fleet.example.com".to_string(), 443)
        );
        assert_eq!(
            split_target("fleet.example.com:8443").unwrap(),
            ("fleet.example.com".to_string(), 8443)
        );
        assert_eq!(
            split_target("[::1]:8443").unwrap(),
            ("::1".to_string(), 8443)
        );
        assert_eq!(split_target("[::1]").unwrap(), ("::1".to_string(), 443));
        assert_eq!(split_target("::1").unwrap(), ("::1".to_string(), 443));
    }

    #[test]
    fn test_split_target_errors() {
        assert!(split_target("").is_err());
        assert!(split_target("host:notaport").is_err());
        assert!(split_target("host:70000").is_err());
        assert!(split_target("[::1").is_err());
        assert!(split_target("[::1]443").is_err());
    }

    #[test]
    fn test_client_config_builds() {
        assert!(client_config().is_ok());
    }
}
