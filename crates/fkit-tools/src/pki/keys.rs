//! In-memory key lookup for signature verification

use crate::error::{Result, ToolsError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Signature algorithms a key can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "rsa-pss-sha512")]
    RsaPssSha512,
    #[serde(rename = "rsa-v1_5-sha256")]
    RsaV15Sha256,
    #[serde(rename = "hmac-sha256")]
    HmacSha256,
    #[serde(rename = "ecdsa-p256-sha256")]
    EcdsaP256Sha256,
    #[serde(rename = "ecdsa-p384-sha384")]
    EcdsaP384Sha384,
    #[serde(rename = "ed25519")]
    Ed25519,
}

/// A verification key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySpec {
    pub key_id: String,
    pub algorithm: Algorithm,
    /// DER-encoded public key for asymmetric algorithms
    #[serde(default)]
    pub public_key: Vec<u8>,
    /// Shared secret for symmetric algorithms
    #[serde(default, skip_serializing)]
    pub secret: Option<Vec<u8>>,
}

/// Fixed table of keys addressed by key id
#[derive(Debug, Clone, Default)]
pub struct KeyLookup {
    keys: HashMap<String, KeySpec>,
}

impl KeyLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `spec` under its key id, replacing any previous entry
    pub fn insert(&mut self, spec: KeySpec) -> Option<KeySpec> {
        self.keys.insert(spec.key_id.clone(), spec)
    }

    /// Key registered under `key_id`
    pub fn fetch_by_id(&self, key_id: &str) -> Result<KeySpec> {
        self.keys
            .get(key_id)
            .cloned()
            .ok_or_else(|| ToolsError::NotFound(format!("Key {}", key_id)))
    }

    /// Lookup without a key id is not supported by a table keyed on ids
    pub fn fetch(&self) -> Result<KeySpec> {
        Err(ToolsError::BadRequest(
            "Key lookup requires a key id".to_string(),
        ))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl FromIterator<KeySpec> for KeyLookup {
    fn from_iter<I: IntoIterator<Item = KeySpec>>(iter: I) -> Self {
        Self {
            keys: iter
                .into_iter()
                .map(|spec| (spec.key_id.clone(), spec))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(id: &str) -> KeySpec {
        KeySpec {
            key_id: id.to_string(),
            algorithm: Algorithm::EcdsaP256Sha256,
            public_key: id.as_bytes().to_vec(),
            secret: None,
        }
    }

    #[test]
    fn test_fetch_by_id() {
        let lookup: KeyLookup = [spec("host-1"), spec("host-2")].into_iter().collect();

        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.fetch_by_id("host-2").unwrap(), spec("host-2"));

        let err = lookup.fetch_by_id("host-3").unwrap_err();
        assert!(matches!(err, ToolsError::NotFound(_)));
        assert_eq!(err.to_string(), "Key host-3 not found");
    }

    #[test]
    fn test_fetch_without_id_always_fails() {
        let mut lookup = KeyLookup::new();
        assert!(lookup.fetch().is_err());

        lookup.insert(spec("only"));
        assert!(lookup.fetch().is_err());
    }

    #[test]
    fn test_insert_replaces() {
        let mut lookup = KeyLookup::new();
        assert!(lookup.insert(spec("k")).is_none());

        let mut updated = spec("k");
        updated.algorithm = Algorithm::Ed25519;
        assert_eq!(lookup.insert(updated.clone()), Some(spec("k")));
        assert_eq!(lookup.fetch_by_id("k").unwrap(), updated);
    }

    #[test]
    fn test_algorithm_names() {
        let json = serde_json::to_string(&Algorithm::RsaV15Sha256).unwrap();
        assert_eq!(json, "\"rsa-v1_5-sha256\"");
        let parsed: Algorithm = serde_json::from_str("\"hmac-sha256\"").unwrap();
        assert_eq!(parsed, Algorithm::HmacSha256);
    }
}
