//! Where log lines go.

use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use validator::Validate;

use slog_core::sink::{Sink, StderrSink, StdoutSink, WriterSink};

use crate::validation;
use crate::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkTarget {
    #[default]
    Stdout,
    Stderr,
    File,
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = validation::validate_sink))]
pub struct SinkConfig {
    #[serde(default)]
    pub target: SinkTarget,

    /// Log file, required when `target` is `file`.
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Append to an existing file instead of truncating it.
    #[serde(default = "default_true")]
    pub append: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            target: SinkTarget::default(),
            path: None,
            append: true,
        }
    }
}

impl SinkConfig {
    /// Opens the configured destination.
    pub fn open(&self) -> Result<Arc<dyn Sink>, ConfigError> {
        match self.target {
            SinkTarget::Stdout => Ok(Arc::new(StdoutSink)),
            SinkTarget::Stderr => Ok(Arc::new(StderrSink)),
            SinkTarget::File => {
                let path = self
                    .path
                    .clone()
                    .ok_or_else(|| ConfigError::Validation(missing_path()))?;
                let opened = if self.append {
                    WriterSink::append_file(&path)
                } else {
                    File::create(&path).map(WriterSink::new)
                };
                opened
                    .map(|sink| Arc::new(sink) as Arc<dyn Sink>)
                    .map_err(|source| ConfigError::SinkOpen { path, source })
            }
        }
    }
}

fn missing_path() -> validator::ValidationErrors {
    let mut errors = validator::ValidationErrors::new();
    errors.add("path", validator::ValidationError::new("file_sink_requires_path"));
    errors
}
