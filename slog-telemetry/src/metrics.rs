//! ## slog-telemetry::metrics
//! **Prometheus counters for emitted log lines**
//!
//! [`MeteredSink`] wraps any sink and records lines written, bytes
//! written, lines dropped and the line size distribution.

use std::sync::Arc;

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};

use slog_core::sink::{Record, Sink};
use slog_core::SlogError;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub lines_written: IntCounter,
    pub bytes_written: IntCounter,
    pub lines_dropped: IntCounter,
    pub line_bytes: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let lines_written = IntCounter::new("slog_lines_total", "Log lines handed to the sink")?;
        let bytes_written =
            IntCounter::new("slog_bytes_total", "Bytes of rendered log text handed to the sink")?;
        let lines_dropped = IntCounter::new(
            "slog_dropped_lines_total",
            "Log lines dropped by a formatting or sink error",
        )?;
        let line_bytes = Histogram::with_opts(
            HistogramOpts::new("slog_line_bytes", "Rendered log line size in bytes")
                .buckets(vec![64.0, 128.0, 256.0, 512.0, 1_024.0, 4_096.0, 16_384.0]),
        )?;

        registry.register(Box::new(lines_written.clone()))?;
        registry.register(Box::new(bytes_written.clone()))?;
        registry.register(Box::new(lines_dropped.clone()))?;
        registry.register(Box::new(line_bytes.clone()))?;

        Ok(Self {
            registry,
            lines_written,
            bytes_written,
            lines_dropped,
            line_bytes,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn record_line(&self, bytes: usize) {
        self.lines_written.inc();
        self.bytes_written.inc_by(bytes as u64);
        self.line_bytes.observe(bytes as f64);
    }

    pub fn record_drop(&self) {
        self.lines_dropped.inc();
    }
}

/// A sink that counts what passes through it.
pub struct MeteredSink<S> {
    inner: S,
    metrics: Arc<MetricsRecorder>,
}

impl<S: Sink> MeteredSink<S> {
    pub fn new(inner: S, metrics: Arc<MetricsRecorder>) -> Self {
        Self { inner, metrics }
    }

    pub fn metrics(&self) -> &Arc<MetricsRecorder> {
        &self.metrics
    }
}

impl<S: Sink> Sink for MeteredSink<S> {
    fn dispatch(&self, record: &mut Record<'_, '_>) -> Result<(), SlogError> {
        match self.inner.dispatch(record) {
            Ok(()) => {
                self.metrics.record_line(record.rendered_len());
                Ok(())
            }
            Err(e) => {
                self.metrics.record_drop();
                Err(e)
            }
        }
    }
}
