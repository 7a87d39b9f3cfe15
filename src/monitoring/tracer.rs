/*!
 * Tracing
 * Structured logging for the scheduler using the tracing crate
 *
 * Logs go to stderr so the report written to stdout stays clean.
 */

use std::time::Instant;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use uuid::Uuid;

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - SCHEDULER_TRACE_JSON: Enable JSON output (default: false)
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("SCHEDULER_TRACE_JSON")
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let initialized = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_current_span(true)
                    .with_span_list(true),
            )
            .try_init()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
    };

    if initialized.is_ok() {
        debug!(json = use_json, "Structured tracing initialized");
    }
}

/// Generate a unique id correlating every event of one scheduling run
pub fn generate_run_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span around one phase of the binary (loading, scheduling, reporting),
/// logging its duration when dropped
pub struct PhaseSpan {
    span: tracing::Span,
    start: Instant,
    phase: &'static str,
}

impl PhaseSpan {
    pub fn new(phase: &'static str) -> Self {
        let span = span!(Level::INFO, "phase", phase = phase);
        Self {
            span,
            start: Instant::now(),
            phase,
        }
    }

    /// Enter the span context
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }
}

impl Drop for PhaseSpan {
    fn drop(&mut self) {
        let _entered = self.span.enter();
        info!(
            phase = self.phase,
            duration_ms = self.start.elapsed().as_secs_f64() * 1000.0,
            "phase completed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_ids_are_unique() {
        let a = generate_run_id();
        let b = generate_run_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing();
        init_tracing();
    }
}
