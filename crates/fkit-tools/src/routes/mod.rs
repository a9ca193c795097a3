//! HTTP routers for the fkit servers
//!
//! Each router is built from explicit parameters so tests and binaries can
//! construct it without touching process-wide state.

mod directory;
mod echo;
mod extension;
mod webhook;

pub use directory::directory_router;
pub use echo::{dump_request, echo_router};
pub use extension::{extension_router, EXTENSION_CONTENT_TYPE, EXTENSION_SUFFIX};
pub use webhook::webhook_router;
