//! Arena sizing and per-thread pooling.

use serde::{Deserialize, Serialize};
use validator::Validate;

use slog_core::alloc::{ArenaOptions, DEFAULT_NODE_CAPACITY, DEFAULT_POOL_SIZE};

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct ArenaConfig {
    /// Node slots reserved per arena before the first growth.
    #[serde(default = "default_node_capacity")]
    #[validate(range(min = 1, max = 1048576))]
    pub node_capacity: usize,

    /// Hard cap on one rendered line in bytes; unset means unbounded.
    #[serde(default)]
    #[validate(custom(function = validate_limit))]
    pub output_limit: Option<usize>,

    /// Released arenas kept per thread.
    #[serde(default = "default_pool_size")]
    #[validate(range(max = 64))]
    pub pool_size: usize,
}

fn validate_limit(limit: usize) -> Result<(), validator::ValidationError> {
    crate::validation::validate_output_limit(limit)
}

fn default_node_capacity() -> usize {
    DEFAULT_NODE_CAPACITY
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            node_capacity: default_node_capacity(),
            output_limit: None,
            pool_size: default_pool_size(),
        }
    }
}

impl ArenaConfig {
    pub fn to_options(&self) -> ArenaOptions {
        ArenaOptions {
            node_capacity: self.node_capacity,
            output_limit: self.output_limit,
        }
    }
}
