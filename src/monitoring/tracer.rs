/*!
 * Structured Tracing
 * Subscriber setup for queue events using the tracing crate
 */

use tracing::info;
use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable enabling JSON output
pub const ENV_TRACE_JSON: &str = "NLQUEUE_TRACE_JSON";

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - NLQUEUE_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns false if a global subscriber was already installed, so tests and
/// benches may call it repeatedly.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        // JSON output for production/parsing
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
            .is_ok()
    } else {
        // Human-readable output for development
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    }
    installed
}
