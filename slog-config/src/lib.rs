//! # slog Configuration
//!
//! Hierarchical configuration for the structured logger: arena sizing,
//! line format and destination.
//!
//! ## Features
//! - **Layered sources**: defaults, YAML files, then `SLOG_*` variables
//! - **Validation**: ranges and cross-field rules checked before use
//! - **Direct mapping**: sections convert straight into `slog-core` options

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use validator::Validate;

use slog_core::{LocalArena, Logger};

mod arena;
mod error;
mod format;
mod sink;
mod validation;

pub use arena::ArenaConfig;
pub use error::ConfigError;
pub use format::FormatConfig;
pub use sink::{SinkConfig, SinkTarget};
pub use validation::MIN_OUTPUT_LIMIT;

/// Base configuration file, relative to the working directory.
pub const BASE_FILE: &str = "config/slog.yaml";

/// Selects `config/<name>.yaml` as an override layer.
pub const ENV_SELECTOR: &str = "SLOG_ENV";

const ENV_PREFIX: &str = "SLOG_";

/// Top-level configuration container.
#[derive(Debug, Serialize, Deserialize, Validate, Default, Clone, PartialEq)]
pub struct SlogConfig {
    /// Node pool and output buffer sizing.
    #[serde(default)]
    #[validate(nested)]
    pub arena: ArenaConfig,

    /// How lines are rendered.
    #[serde(default)]
    #[validate(nested)]
    pub format: FormatConfig,

    /// Where lines are written.
    #[serde(default)]
    #[validate(nested)]
    pub sink: SinkConfig,
}

impl SlogConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/slog.yaml`, if present
    /// 3. `config/<SLOG_ENV>.yaml`, if `SLOG_ENV` is set and the file exists
    /// 4. `SLOG_*` environment variables, `__` separating sections
    ///    (`SLOG_FORMAT__TIME_ZONE=utc`)
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(SlogConfig::default()));

        if Path::new(BASE_FILE).exists() {
            figment = figment.merge(Yaml::file(BASE_FILE));
        } else {
            debug!("{BASE_FILE} not found, using default configuration");
        }

        if let Ok(env) = std::env::var(ENV_SELECTOR) {
            let env_file = format!("config/{}.yaml", env);
            if Path::new(&env_file).exists() {
                figment = figment.merge(Yaml::file(env_file));
            }
        }

        Self::finish(figment)
    }

    /// Load configuration from a specific file plus environment overrides.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Self::finish(
            Figment::from(Serialized::defaults(SlogConfig::default())).merge(Yaml::file(path)),
        )
    }

    fn finish(figment: Figment) -> Result<Self, ConfigError> {
        figment
            .merge(
                Env::prefixed(ENV_PREFIX)
                    .ignore(&["env", "diag"])
                    .split("__"),
            )
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// A logger with the configured format, writing to the configured sink.
    pub fn build_logger(&self) -> Result<Logger, ConfigError> {
        Ok(Logger::new(self.sink.open()?).with_format(self.format.to_options()))
    }

    /// Installs the logger process-wide and sizes this thread's arena pool.
    pub fn apply(&self) -> Result<(), ConfigError> {
        slog_core::set_logger(self.build_logger()?);
        LocalArena::configure(self.arena.to_options(), self.arena.pool_size);
        Ok(())
    }
}
