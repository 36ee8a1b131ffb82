//! ## slog-core::serializer
//! **Recursive field tree → JSON text**
//!
//! Objects are emitted with members in list order, `Plain` lists are
//! spliced into their parent without braces or key, arrays emit only the
//! element values. Every byte goes through [`OutputBuffer::append`], so a
//! render that cannot grow the buffer (or hits its limit) fails as a whole
//! and the partial text is cut off again.
//!
//! ### Key Submodules:
//! - `escape`: byte-transparent JSON string escaping
//! - `time`: fixed-width calendar formatting for timestamps

pub mod escape;
pub mod time;

use serde::{Deserialize, Serialize};

use crate::alloc::OutputBuffer;
use crate::error::SlogError;
use crate::field::{FieldNode, FieldValue, Siblings};

pub use escape::escape_into;
pub use time::{TimePrecision, TimeZoneMode};

/// Default nesting limit for one rendered tree.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Default fractional digits for floats, matching C's `%f`.
pub const DEFAULT_FLOAT_PRECISION: usize = 6;

/// Separator style between members and between key and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Separators {
    /// `", "` and `": "`.
    #[default]
    Spaced,
    /// `","` and `":"`.
    Compact,
}

impl Separators {
    #[inline]
    fn member(self) -> &'static [u8] {
        match self {
            Separators::Spaced => b", ",
            Separators::Compact => b",",
        }
    }

    #[inline]
    fn key_value(self) -> &'static [u8] {
        match self {
            Separators::Spaced => b": ",
            Separators::Compact => b":",
        }
    }
}

/// Rendering knobs shared by every line a logger emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub time_precision: TimePrecision,
    pub time_zone: TimeZoneMode,
    pub float_precision: usize,
    pub separators: Separators,
    pub max_depth: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            time_precision: TimePrecision::default(),
            time_zone: TimeZoneMode::default(),
            float_precision: DEFAULT_FLOAT_PRECISION,
            separators: Separators::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Depth-first writer of one field tree.
pub struct Serializer<'o> {
    out: &'o mut OutputBuffer,
    opts: &'o FormatOptions,
}

impl<'o> Serializer<'o> {
    pub fn new(out: &'o mut OutputBuffer, opts: &'o FormatOptions) -> Self {
        Self { out, opts }
    }

    /// Appends `node` as one JSON object.
    ///
    /// Containers render their children as the object's members; a leaf
    /// renders as a single-member object. Siblings of `node` are ignored.
    /// On error the buffer is restored to its previous length.
    ///
    /// Depth counts the objects and arrays that appear in the text, the
    /// outer object being level 1. `Plain` splices add no level; their own
    /// nesting is bounded separately by the same limit.
    pub fn render(&mut self, node: &FieldNode<'_>) -> Result<(), SlogError> {
        let start = self.out.len();
        let result = match node.value() {
            FieldValue::Object(head) | FieldValue::Plain(head) => self.object(head, 1),
            _ => self.single(node),
        };
        if result.is_err() {
            self.out.truncate(start);
        }
        result
    }

    fn single(&mut self, node: &FieldNode<'_>) -> Result<(), SlogError> {
        self.check(1)?;
        self.out.append(b"{")?;
        let mut first = true;
        self.member(node, &mut first, 1)?;
        self.out.append(b"}")
    }

    #[inline]
    fn check(&self, level: usize) -> Result<(), SlogError> {
        if level > self.opts.max_depth {
            return Err(SlogError::DepthExceeded {
                limit: self.opts.max_depth,
            });
        }
        Ok(())
    }

    fn object<'a>(&mut self, head: Option<&'a FieldNode<'a>>, depth: usize) -> Result<(), SlogError> {
        self.check(depth)?;
        self.out.append(b"{")?;
        let mut first = true;
        self.members(head, &mut first, depth, 0)?;
        self.out.append(b"}")
    }

    fn members<'a>(
        &mut self,
        head: Option<&'a FieldNode<'a>>,
        first: &mut bool,
        depth: usize,
        splices: usize,
    ) -> Result<(), SlogError> {
        for node in Siblings::new(head) {
            match node.value() {
                FieldValue::Plain(inner) => {
                    self.check(splices + 1)?;
                    self.members(inner, first, depth, splices + 1)?;
                }
                _ => self.member(node, first, depth)?,
            }
        }
        Ok(())
    }

    fn member(&mut self, node: &FieldNode<'_>, first: &mut bool, depth: usize) -> Result<(), SlogError> {
        if !std::mem::take(first) {
            self.out.append(self.opts.separators.member())?;
        }
        self.out.append(b"\"")?;
        escape_into(self.out, node.key().unwrap_or_default().as_bytes())?;
        self.out.append(b"\"")?;
        self.out.append(self.opts.separators.key_value())?;
        self.value(node.value(), depth)
    }

    fn array<'a>(&mut self, head: Option<&'a FieldNode<'a>>, depth: usize) -> Result<(), SlogError> {
        self.check(depth)?;
        self.out.append(b"[")?;
        let mut first = true;
        self.elements(head, &mut first, depth, 0)?;
        self.out.append(b"]")
    }

    fn elements<'a>(
        &mut self,
        head: Option<&'a FieldNode<'a>>,
        first: &mut bool,
        depth: usize,
        splices: usize,
    ) -> Result<(), SlogError> {
        for node in Siblings::new(head) {
            match node.value() {
                FieldValue::Plain(inner) => {
                    self.check(splices + 1)?;
                    self.elements(inner, first, depth, splices + 1)?;
                }
                value => {
                    if !std::mem::take(first) {
                        self.out.append(self.opts.separators.member())?;
                    }
                    self.value(value, depth)?;
                }
            }
        }
        Ok(())
    }

    fn value(&mut self, value: FieldValue<'_>, depth: usize) -> Result<(), SlogError> {
        match value {
            FieldValue::Null => self.out.append(b"null"),
            FieldValue::Bool(true) => self.out.append(b"true"),
            FieldValue::Bool(false) => self.out.append(b"false"),
            FieldValue::Integer(i) => self.out.append_fmt(format_args!("{i}")),
            // Non-finite values have no JSON token.
            FieldValue::Float(f) if !f.is_finite() => self.out.append(b"null"),
            FieldValue::Float(f) => self
                .out
                .append_fmt(format_args!("{:.*}", self.opts.float_precision, f)),
            FieldValue::String(bytes) => {
                self.out.append(b"\"")?;
                escape_into(self.out, bytes)?;
                self.out.append(b"\"")
            }
            FieldValue::Timestamp(ts) => {
                self.out.append(b"\"")?;
                time::write_timestamp(
                    self.out,
                    ts,
                    self.opts.time_zone,
                    self.opts.time_precision,
                )?;
                self.out.append(b"\"")
            }
            FieldValue::Object(head) | FieldValue::Plain(head) => self.object(head, depth + 1),
            FieldValue::Array(head) => self.array(head, depth + 1),
        }
    }
}

/// Renders `node` into a fresh byte vector.
pub fn to_vec(node: &FieldNode<'_>, opts: &FormatOptions) -> Result<Vec<u8>, SlogError> {
    let mut out = OutputBuffer::with_capacity(256);
    Serializer::new(&mut out, opts).render(node)?;
    Ok(out.as_bytes().to_vec())
}
