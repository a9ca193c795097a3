//! Root CA certificate embedded at build time

use super::inspect::{inspect_der, CertificateSummary};
use super::pem::{encode, CERTIFICATE_LABEL};
use crate::error::Result;
use rustls::pki_types::CertificateDer;
use std::sync::OnceLock;

/// DER of the trusted root shipped with the tools
static EMBEDDED_ROOT_DER: &[u8] = include_bytes!("../../assets/root_ca.der");

/// A parsed root certificate
///
/// Consumers receive one of these explicitly; [`RootCertificate::embedded`]
/// is the lazily parsed copy of the build-time asset.
#[derive(Debug, Clone)]
pub struct RootCertificate {
    der: Vec<u8>,
    summary: CertificateSummary,
}

impl RootCertificate {
    /// Parse a DER-encoded certificate
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let summary = inspect_der(der)?;
        Ok(Self {
            der: der.to_vec(),
            summary,
        })
    }

    /// The embedded root, parsed on first use
    ///
    /// # Panics
    /// If the embedded asset is not a valid certificate. That is a build
    /// defect, so the first caller aborts instead of every caller handling it.
    pub fn embedded() -> &'static RootCertificate {
        static ROOT: OnceLock<RootCertificate> = OnceLock::new();
        ROOT.get_or_init(|| match Self::from_der(EMBEDDED_ROOT_DER) {
            Ok(root) => root,
            Err(e) => panic!("embedded root certificate does not parse: {}", e),
        })
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn summary(&self) -> &CertificateSummary {
        &self.summary
    }

    pub fn subject(&self) -> &str {
        &self.summary.subject
    }

    /// Certificate in the form rustls trust stores take
    pub fn certificate_der(&self) -> CertificateDer<'static> {
        CertificateDer::from(self.der.clone())
    }

    pub fn to_pem(&self) -> String {
        encode(CERTIFICATE_LABEL, &self.der)
    }
}
