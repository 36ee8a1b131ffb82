//! ## slog-core::alloc
//! **Field arenas using `bumpalo`, output buffers and per-thread pooling**
//!
//! ### Key Submodules:
//! - `arena`: `FieldArena`, the per-call node pool + output buffer
//! - `output`: growable, optionally bounded byte buffer
//! - `pool`: thread-local free list of arenas (`LocalArena`)
//! - `stats`: atomic usage counters

pub mod arena;
pub mod output;
pub mod pool;
pub mod stats;

pub use arena::{ArenaOptions, FieldArena, DEFAULT_NODE_CAPACITY, OUTPUT_BYTES_PER_NODE};
pub use output::OutputBuffer;
pub use pool::{LocalArena, DEFAULT_POOL_SIZE};
pub use stats::ArenaStats;
