//! # slog Telemetry
//!
//! Diagnostics for the logging library itself: a `tracing` subscriber for
//! the library's own warnings, and Prometheus counters around any sink.

pub mod logging;
pub mod metrics;

pub use logging::DiagnosticsLogger;
pub use metrics::{MeteredSink, MetricsRecorder};
