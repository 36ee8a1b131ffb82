//! # slog-core
//!
//! Structured-logging field engine: typed key/value fields built into an
//! arena, rendered as one JSON line per call.
//!
//! ### Expectations (Production):
//! - No heap allocation per field once an arena has warmed up
//! - Byte-exact escaping and insertion-ordered keys
//! - Arenas are per call or per thread, never shared, so no locking on the
//!   formatting path
//!
//! ### Key Submodules:
//! - `alloc`: field arenas using `bumpalo`, output buffers, per-thread pool
//! - `field`: field nodes, typed constructors, timestamps
//! - `serializer`: recursive tree → JSON writer
//! - `sink`: destinations receiving the finished tree
//! - `frame`: call frame assembly, `Logger`, process-wide entry point
//!
//! ```ignore
//! use slog_core::prelude::*;
//!
//! let arena = LocalArena::acquire();
//! let f = arena.builder();
//! slog!(
//!     arena,
//!     Level::Info,
//!     "user login",
//!     f.string("name", "qaqland"),
//!     f.object("details", [f.bool("active", false), f.integer("id", 233)]),
//! );
//! ```

pub mod alloc;
pub mod error;
pub mod field;
pub mod frame;
pub mod level;
pub mod serializer;
pub mod sink;

pub mod prelude {
    pub use crate::alloc::*;
    pub use crate::error::*;
    pub use crate::field::*;
    pub use crate::frame::*;
    pub use crate::level::*;
    pub use crate::serializer::{FormatOptions, Separators, TimePrecision, TimeZoneMode};
    pub use crate::sink::*;
    pub use crate::{call_site, slog};
}

pub use alloc::{ArenaOptions, FieldArena, LocalArena};
pub use error::SlogError;
pub use field::{Field, FieldBuilder, FieldKind, FieldNode, FieldValue, Timestamp};
pub use frame::{emit, logger, reset_sink, set_file, set_format, set_logger, set_sink, CallSite, Logger};
pub use level::Level;
pub use serializer::FormatOptions;
pub use sink::{Record, Sink};
