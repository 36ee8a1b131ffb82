//! Line rendering options.

use serde::{Deserialize, Serialize};
use validator::Validate;

use slog_core::serializer::{
    FormatOptions, Separators, TimePrecision, TimeZoneMode, DEFAULT_FLOAT_PRECISION,
    DEFAULT_MAX_DEPTH,
};

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct FormatConfig {
    /// `millis` or `nanos`.
    #[serde(default)]
    pub time_precision: TimePrecision,

    /// `local` or `utc`.
    #[serde(default)]
    pub time_zone: TimeZoneMode,

    #[serde(default = "default_float_precision")]
    #[validate(range(max = 17))]
    pub float_precision: usize,

    /// Drops the space after `,` and `:`.
    #[serde(default)]
    pub compact: bool,

    /// Deepest container nesting rendered before the line is dropped.
    #[serde(default = "default_max_depth")]
    #[validate(range(min = 1, max = 4096))]
    pub max_depth: usize,
}

fn default_float_precision() -> usize {
    DEFAULT_FLOAT_PRECISION
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            time_precision: TimePrecision::default(),
            time_zone: TimeZoneMode::default(),
            float_precision: default_float_precision(),
            compact: false,
            max_depth: default_max_depth(),
        }
    }
}

impl FormatConfig {
    pub fn to_options(&self) -> FormatOptions {
        FormatOptions {
            time_precision: self.time_precision,
            time_zone: self.time_zone,
            float_precision: self.float_precision,
            separators: if self.compact {
                Separators::Compact
            } else {
                Separators::Spaced
            },
            max_depth: self.max_depth,
        }
    }
}
