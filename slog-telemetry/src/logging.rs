//! ## slog-telemetry::logging
//! **Diagnostics output for the library's own messages**
//!
//! Dropped lines, failed writes and arena growth are reported through
//! `tracing`. This module installs the subscriber that prints them.
//!
//! ### Expectations:
//! - Diagnostics go to stderr so they never mix with log lines on stdout
//! - Quiet by default: only warnings and errors
//!
//! The filter is read from `SLOG_DIAG`, then `RUST_LOG`.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding the diagnostics filter directive.
pub const DIAG_ENV: &str = "SLOG_DIAG";

const DEFAULT_DIRECTIVE: &str = "warn";

#[derive(Clone)]
pub struct DiagnosticsLogger;

impl DiagnosticsLogger {
    /// Installs the global subscriber. Later calls are no-ops.
    pub fn init() {
        Self::init_with(Self::filter_from_env());
    }

    /// Installs the global subscriber with an explicit filter directive.
    pub fn init_with_directive(directive: &str) {
        let filter =
            EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
        Self::init_with(filter);
    }

    fn init_with(filter: EnvFilter) {
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(true)
            .try_init();
    }

    fn filter_from_env() -> EnvFilter {
        EnvFilter::try_from_env(DIAG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slog_core::alloc::ArenaOptions;
    use slog_core::{emit, CallSite, FieldArena, Level};
    use tracing_test::traced_test;

    #[traced_test]
    #[test]
    fn dropped_line_is_reported() {
        let arena = FieldArena::with_options(ArenaOptions {
            node_capacity: 4,
            output_limit: Some(16),
        });
        // Overflows before reaching the process-wide sink.
        emit(&arena, CallSite::new("t.rs", 1, "t"), Level::Info, "much too long", []);
        assert!(logs_contain("log line dropped"));
        assert!(logs_contain("t.rs"));
    }

    #[test]
    fn init_twice_does_not_panic() {
        DiagnosticsLogger::init_with_directive("not a [valid directive");
        DiagnosticsLogger::init();
    }
}
