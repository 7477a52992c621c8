//! Logging initialization.
//!
//! Format and level come from the `[logging]` config section; `RUST_LOG`
//! overrides the configured level when set. JSON output is the production
//! default, pretty output is for local development.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initializes the tracing subscriber from configuration.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Quiet sqlx statement logging at the default level; per-query
        // timings are exported as metrics instead.
        EnvFilter::new(format!("{},sqlx::query=warn", config.level))
    });

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "pretty" => {
            let layer = fmt::layer()
                .pretty()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(true);
            registry.with(layer).init();
        }
        _ => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true);
            registry.with(layer).init();
        }
    }
}
