//! fkit tools - auxiliary host utilities
//!
//! Small servers (extension files, directories, echo, webhooks), PEM and
//! certificate tooling, schema generators and thin API clients. Files the
//! tools write go through the mode gate in `fkit_core`.

pub mod client;
pub mod cluster;
pub mod config;
pub mod error;
pub mod feeds;
pub mod logging;
pub mod middleware;
pub mod pki;
pub mod rewrite;
pub mod routes;
pub mod schema;
pub mod server;
pub mod tuf;

pub use config::ToolsConfig;
pub use error::{Result, ToolsError};
