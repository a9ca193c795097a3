//! CSR verification in front of a certificate signer

use crate::error::{Result, ToolsError};
use async_trait::async_trait;
use tracing::warn;

/// A certificate signing request as handed over by the enrollment protocol
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsrRequest {
    /// Decrypted DER of the CSR
    pub raw: Vec<u8>,
    /// Challenge password carried by the request, if any
    pub challenge_password: Option<String>,
}

impl CsrRequest {
    pub fn new(raw: Vec<u8>) -> Self {
        Self {
            raw,
            challenge_password: None,
        }
    }
}

/// Issues a certificate for a CSR, returning the DER of the certificate
#[async_trait]
pub trait CsrSigner: Send + Sync {
    async fn sign(&self, request: &CsrRequest) -> Result<Vec<u8>>;
}

/// Decides whether a raw CSR may be signed
#[async_trait]
pub trait CsrVerifier: Send + Sync {
    async fn verify(&self, raw_csr: &[u8]) -> Result<bool>;
}

/// Signer that runs a verifier over the raw CSR before delegating
///
/// A verifier error is returned as is; a verifier that answers `false`
/// fails the request with [`ToolsError::CsrVerifyFailed`].
pub struct VerifyingSigner<V, S> {
    verifier: V,
    next: S,
}

/// Wrap `next` so every request is verified first
pub fn with_verifier<V, S>(verifier: V, next: S) -> VerifyingSigner<V, S>
where
    V: CsrVerifier,
    S: CsrSigner,
{
    VerifyingSigner { verifier, next }
}

#[async_trait]
impl<V, S> CsrSigner for VerifyingSigner<V, S>
where
    V: CsrVerifier,
    S: CsrSigner,
{
    async fn sign(&self, request: &CsrRequest) -> Result<Vec<u8>> {
        if !self.verifier.verify(&request.raw).await? {
            warn!("Rejected CSR of {} bytes", request.raw.len());
            return Err(ToolsError::CsrVerifyFailed);
        }
        self.next.sign(request).await
    }
}

#[async_trait]
impl<T: CsrSigner + ?Sized> CsrSigner for std::sync::Arc<T> {
    async fn sign(&self, request: &CsrRequest) -> Result<Vec<u8>> {
        (**self).sign(request).await
    }
}

#[async_trait]
impl<T: CsrVerifier + ?Sized> CsrVerifier for std::sync::Arc<T> {
    async fn verify(&self, raw_csr: &[u8]) -> Result<bool> {
        (**self).verify(raw_csr).await
    }
}
