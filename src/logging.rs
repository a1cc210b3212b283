//! ES-012: Tracing subscriber setup. Logs go to stderr; stdout carries output.

use std::sync::OnceLock;

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Map a configured level onto a filter directive, falling back to `info`.
pub fn level_directive(level: &str) -> &'static str {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" => "warn",
        "error" => "error",
        _ => "info",
    }
}

/// Install the global subscriber once. `RUST_LOG` takes precedence over `level`.
pub fn init(level: &str) {
    TRACING_INIT.get_or_init(|| {
        let fallback = level_directive(level);
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .or_else(|_| tracing_subscriber::EnvFilter::try_new(fallback))
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    });
}
