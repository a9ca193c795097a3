//! Certificate and key tooling

pub mod csr;
pub mod fetch;
pub mod inspect;
pub mod keys;
pub mod pem;
pub mod root;

pub use csr::{with_verifier, CsrRequest, CsrSigner, CsrVerifier, VerifyingSigner};
pub use fetch::{fetch_certificates, fetch_pem};
pub use inspect::{inspect_der, inspect_pem, CertificateSummary};
pub use keys::{Algorithm, KeyLookup, KeySpec};
pub use root::RootCertificate;
