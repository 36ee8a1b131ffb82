//! ## slog-core::field
//! **Field nodes, constructors and timestamps**
//!
//! ### Key Submodules:
//! - `node`: the closed `FieldValue` enumeration and intrusive sibling links
//! - `builder`: one constructor per kind, bound to an arena borrow
//! - `time`: wall-clock `Timestamp` (seconds + nanoseconds)

pub mod builder;
pub mod node;
pub mod time;

pub use builder::{Field, FieldBuilder, FieldList};
pub use node::{FieldKind, FieldNode, FieldValue, Siblings};
pub use time::Timestamp;
