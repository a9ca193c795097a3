//! Kubernetes cluster identity
//!
//! The UID of the `kube-system` namespace is stable for the life of a
//! cluster, so it serves as the cluster UUID.

use crate::client::http_client_builder;
use crate::config::ToolsConfig;
use crate::error::{Result, ToolsError};
use serde::Deserialize;
use std::fs;
use tracing::debug;

/// Namespace whose UID identifies the cluster
pub const IDENTITY_NAMESPACE: &str = "kube-system";

#[derive(Debug, Deserialize)]
struct Namespace {
    metadata: ObjectMeta,
}

#[derive(Debug, Deserialize)]
struct ObjectMeta {
    #[serde(default)]
    uid: Option<String>,
}

/// Client for the Kubernetes core API authenticated with a bearer token
pub struct ClusterClient {
    client: reqwest::Client,
    api: String,
    token: String,
}

impl ClusterClient {
    /// `ca_pem` replaces the default trust roots when given
    pub fn new(
        config: &ToolsConfig,
        api: impl Into<String>,
        token: impl Into<String>,
        ca_pem: Option<&[u8]>,
    ) -> Result<Self> {
        let mut builder = http_client_builder(config);
        if let Some(pem) = ca_pem {
            let ca = reqwest::Certificate::from_pem(pem)
                .map_err(|e| ToolsError::Certificate(format!("Invalid cluster CA: {}", e)))?;
            builder = builder
                .tls_built_in_root_certs(false)
                .add_root_certificate(ca);
        }

        Ok(Self {
            client: builder.build()?,
            api: api.into().trim_end_matches('/').to_string(),
            token: token.into().trim().to_string(),
        })
    }

    /// Client using the pod's service account token and CA
    pub fn in_cluster(config: &ToolsConfig) -> Result<Self> {
        let token = fs::read_to_string(&config.kube_token_path).map_err(|e| {
            ToolsError::Storage(format!(
                "Failed to read service account token {}: {}",
                config.kube_token_path.display(),
                e
            ))
        })?;
        let ca = fs::read(&config.kube_ca_path).map_err(|e| {
            ToolsError::Storage(format!(
                "Failed to read cluster CA {}: {}",
                config.kube_ca_path.display(),
                e
            ))
        })?;

        Self::new(config, config.kube_api.clone(), token, Some(&ca))
    }

    /// UID of namespace `name`
    pub async fn namespace_uid(&self, name: &str) -> Result<String> {
        let url = format!("{}/api/v1/namespaces/{}", self.api, name);
        debug!("Looking up namespace at {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            return Err(ToolsError::Upstream {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        parse_namespace_uid(&body)
    }

    /// UID of the `kube-system` namespace
    pub async fn cluster_uuid(&self) -> Result<String> {
        self.namespace_uid(IDENTITY_NAMESPACE).await
    }
}

fn parse_namespace_uid(body: &[u8]) -> Result<String> {
    let namespace: Namespace = serde_json::from_slice(body)?;
    namespace
        .metadata
        .uid
        .filter(|uid| !uid.is_empty())
        .ok_or_else(|| ToolsError::NotFound("Namespace UID".to_string()))
}
