//! X.509 certificate inspection

use super::pem::{parse_blocks, CERTIFICATE_LABEL};
use crate::error::{Result, ToolsError};
use serde::Serialize;
use sha2::{Digest, Sha256};
use x509_parser::extensions::GeneralName;
use x509_parser::prelude::{parse_x509_certificate, X509Certificate};

/// Parsed view of a certificate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateSummary {
    pub version: u32,
    /// Decimal serial number
    pub serial: String,
    /// Serial as colon-separated hex bytes
    pub serial_hex: String,
    pub subject: String,
    pub issuer: String,
    pub not_before: String,
    pub not_after: String,
    pub signature_algorithm: String,
    pub public_key_algorithm: String,
    pub is_ca: bool,
    pub subject_alt_names: Vec<String>,
    pub sha256_fingerprint: String,
}

/// Extract the DER of the single `CERTIFICATE` block in `input`
pub fn certificate_der_from_pem(input: &str) -> Result<Vec<u8>> {
    let mut blocks = parse_blocks(input)?;

    match blocks.len() {
        0 => Err(ToolsError::Certificate("No PEM block found".to_string())),
        1 => {
            let block = blocks.remove(0);
            if block.label != CERTIFICATE_LABEL {
                return Err(ToolsError::Certificate(format!(
                    "Expected a {} block, found {}",
                    CERTIFICATE_LABEL, block.label
                )));
            }
            Ok(block.contents)
        }
        n => Err(ToolsError::Certificate(format!(
            "Expected a single PEM block, found {}",
            n
        ))),
    }
}

/// Parse a PEM document holding exactly one certificate
pub fn inspect_pem(input: &str) -> Result<CertificateSummary> {
    let der = certificate_der_from_pem(input)?;
    inspect_der(&der)
}

/// Parse a DER-encoded certificate
pub fn inspect_der(der: &[u8]) -> Result<CertificateSummary> {
    let (rest, cert) = parse_x509_certificate(der)
        .map_err(|e| ToolsError::Certificate(format!("Failed to parse certificate: {}", e)))?;

    if !rest.is_empty() {
        return Err(ToolsError::Certificate(format!(
            "{} trailing bytes after certificate",
            rest.len()
        )));
    }

    Ok(summarize(&cert, der))
}

fn summarize(cert: &X509Certificate<'_>, der: &[u8]) -> CertificateSummary {
    let is_ca = cert
        .basic_constraints()
        .ok()
        .flatten()
        .map(|bc| bc.value.ca)
        .unwrap_or(false);

    let subject_alt_names = cert
        .subject_alternative_name()
        .ok()
        .flatten()
        .map(|san| san.value.general_names.iter().map(describe_name).collect())
        .unwrap_or_default();

    CertificateSummary {
        version: cert.version().0 + 1,
        serial: cert.serial.to_string(),
        serial_hex: cert.raw_serial_as_string(),
        subject: cert.subject().to_string(),
        issuer: cert.issuer().to_string(),
        not_before: cert.validity().not_before.to_string(),
        not_after: cert.validity().not_after.to_string(),
        signature_algorithm: cert.signature_algorithm.algorithm.to_id_string(),
        public_key_algorithm: cert.public_key().algorithm.algorithm.to_id_string(),
        is_ca,
        subject_alt_names,
        sha256_fingerprint: hex::encode(Sha256::digest(der)),
    }
}

fn describe_name(name: &GeneralName<'_>) -> String {
    match name {
        GeneralName::DNSName(dns) => format!("DNS:{}", dns),
        GeneralName::RFC822Name(email) => format!("email:{}", email),
        GeneralName::URI(uri) => format!("URI:{}", uri),
        GeneralName::IPAddress(bytes) => match bytes.len() {
            4 => {
                let octets: [u8; 4] = [bytes[0], bytes[1], bytes[2], bytes[3]];
                format!("IP:{}", std::net::Ipv4Addr::from(octets))
            }
            16 => {
                let mut octets = [0u8; 16];
                octets.copy_from_slice(bytes);
                format!("IP:{}", std::net::Ipv6Addr::from(octets))
            }
            _ => format!("IP:{}", hex::encode(bytes)),
        },
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pki::pem::encode;

    #[test]
    fn test_rejects_non_certificate_block() {
        let input = encode("PRIVATE KEY", b"not a cert");
        let err = inspect_pem(&input).unwrap_err();
        assert!(err.to_string().contains("Expected a CERTIFICATE block"));
    }

    #[test]
    fn test_rejects_missing_block() {
        assert!(inspect_pem("no armor here").is_err());
    }

    #[test]
    fn test_rejects_two_blocks() {
        let mut input = encode("CERTIFICATE", b"a");
        input.push_str(&encode("CERTIFICATE", b"b"));
        let err = certificate_der_from_pem(&input).unwrap_err();
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_rejects_garbage_der() {
        let input = encode("CERTIFICATE", b"\x30\x03\x02\x01");
        assert!(matches!(
            inspect_pem(&input),
            Err(ToolsError::Certificate(_))
        ));
    }
}
