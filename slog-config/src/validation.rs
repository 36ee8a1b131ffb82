//! Custom validation functions for configuration.

use validator::ValidationError;

use crate::sink::{SinkConfig, SinkTarget};

/// Smallest output limit that still fits the fixed call-site members.
pub const MIN_OUTPUT_LIMIT: usize = 128;

pub fn validate_output_limit(limit: usize) -> Result<(), ValidationError> {
    if limit >= MIN_OUTPUT_LIMIT {
        Ok(())
    } else {
        let mut err = ValidationError::new("output_limit_too_small");
        err.message = Some(format!("must be at least {MIN_OUTPUT_LIMIT} bytes").into());
        Err(err)
    }
}

/// A file sink needs a non-empty path; other targets must not set one.
pub fn validate_sink(sink: &SinkConfig) -> Result<(), ValidationError> {
    match (sink.target, &sink.path) {
        (SinkTarget::File, Some(path)) if !path.as_os_str().is_empty() => Ok(()),
        (SinkTarget::File, _) => Err(ValidationError::new("file_sink_requires_path")),
        (_, Some(_)) => Err(ValidationError::new("path_only_valid_for_file_sink")),
        (_, None) => Ok(()),
    }
}
