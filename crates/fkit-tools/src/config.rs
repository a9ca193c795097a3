//! Configuration for the fkit tools
//!
//! Every value comes from an `FKIT_*` environment variable with a default.
//! Positional command-line arguments override the relevant fields in the
//! individual binaries.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default port of the echo server
pub const DEFAULT_ECHO_PORT: u16 = 4648;

/// In-cluster Kubernetes API endpoint
pub const DEFAULT_KUBE_API: &str = "https://kubernetes.default.svc";

const SERVICE_ACCOUNT_DIR: &str = "/var/run/secrets/kubernetes.io/serviceaccount";

/// Get env var with FKIT_ prefix
fn env_fkit(name: &str) -> Option<String> {
    env::var(format!("FKIT_{}", name))
        .ok()
        .filter(|v| !v.is_empty())
}

/// Get env var with FKIT_ prefix, with default
fn env_fkit_default(name: &str, default: &str) -> String {
    env_fkit(name).unwrap_or_else(|| default.to_string())
}

/// Parse a size string like "20MB", "1GB", "512KB" or raw bytes
fn parse_size(s: &str) -> Option<usize> {
    let s = s.trim().to_uppercase();

    if let Ok(bytes) = s.parse::<usize>() {
        return Some(bytes);
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix("GB") {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024)
    } else if let Some(n) = s.strip_suffix('G') {
        (n, 1024 * 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('M') {
        (n, 1024 * 1024)
    } else if let Some(n) = s.strip_suffix('K') {
        (n, 1024)
    } else {
        return None;
    };

    num_str
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_mul(multiplier))
}

/// Main configuration for the tools
#[derive(Debug, Clone)]
pub struct ToolsConfig {
    // Listeners
    pub host: String,
    pub extension_addr: String,
    pub extension_root: PathBuf,
    pub echo_port: u16,

    // Request limits
    pub max_body_size: usize, // bytes

    // Outbound connections
    pub connect_timeout: Duration,
    pub http_timeout: Duration,

    // Kubernetes access for the cluster UUID printer
    pub kube_api: String,
    pub kube_token_path: PathBuf,
    pub kube_ca_path: PathBuf,
}

impl ToolsConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env_fkit_default("HOST", "0.0.0.0"),
            extension_addr: env_fkit_default("EXTENSION_ADDR", "127.0.0.1:8081"),
            extension_root: PathBuf::from(env_fkit_default("EXTENSION_ROOT", ".")),
            // PORT is honoured for hosts that inject it
            echo_port: env_fkit("ECHO_PORT")
                .or_else(|| env::var("PORT").ok())
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_ECHO_PORT),

            // Request limits - default 20MB
            max_body_size: env_fkit("MAX_BODY_SIZE")
                .and_then(|v| parse_size(&v))
                .unwrap_or(20 * 1024 * 1024),

            connect_timeout: Duration::from_secs(
                env_fkit("CONNECT_TIMEOUT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(10),
            ),
            http_timeout: Duration::from_secs(
                env_fkit("HTTP_TIMEOUT")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(30),
            ),

            kube_api: env_fkit_default("KUBE_API", DEFAULT_KUBE_API),
            kube_token_path: env_fkit("KUBE_TOKEN_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(SERVICE_ACCOUNT_DIR).join("token")),
            kube_ca_path: env_fkit("KUBE_CA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(SERVICE_ACCOUNT_DIR).join("ca.crt")),
        }
    }

    /// Listen address for a tool bound on `port` of the configured host
    pub fn listen_addr(&self, port: u16) -> String {
        format!("{}:{}", self.host, port)
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            extension_addr: "127.0.0.1:8081".to_string(),
            extension_root: PathBuf::from("."),
            echo_port: DEFAULT_ECHO_PORT,
            max_body_size: 20 * 1024 * 1024,
            connect_timeout: Duration::from_secs(10),
            http_timeout: Duration::from_secs(30),
            kube_api: DEFAULT_KUBE_API.to_string(),
            kube_token_path: PathBuf::from(SERVICE_ACCOUNT_DIR).join("token"),
            kube_ca_path: PathBuf::from(SERVICE_ACCOUNT_DIR).join("ca.crt"),
        }
    }
}
