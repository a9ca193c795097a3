//! Tracing setup shared by the fkit binaries

/// Initialize the global tracing subscriber
///
/// Compact output by default; set RUST_LOG_FORMAT=json for JSON lines.
/// Output goes to stderr so tools that print results keep stdout clean.
pub fn init() {
    let use_json = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());

    if use_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}
