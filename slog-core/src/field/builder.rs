//! ## slog-core::field::builder
//! **Typed constructors, one per field kind**
//!
//! Every constructor allocates exactly one node in the arena. Container
//! constructors take their children by value, link them in the order given
//! and return the container; a [`Field`] cannot be cloned, so a child can
//! only ever end up in one list.

use std::fmt;

use super::node::{FieldKind, FieldNode, FieldValue, Siblings};
use super::time::Timestamp;
use crate::alloc::FieldArena;

/// A constructed node not yet attached to a parent.
pub struct Field<'b> {
    node: &'b FieldNode<'b>,
}

impl<'b> Field<'b> {
    #[inline]
    pub fn node(&self) -> &'b FieldNode<'b> {
        self.node
    }

    #[inline]
    pub fn key(&self) -> Option<&'b str> {
        self.node.key()
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.node.kind()
    }
}

impl fmt::Debug for Field<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.node.fmt(f)
    }
}

/// Sibling list under construction. Pushing links in place; nothing is
/// allocated.
#[derive(Default)]
pub struct FieldList<'b> {
    head: Option<&'b FieldNode<'b>>,
    tail: Option<&'b FieldNode<'b>>,
    len: usize,
}

impl<'b> FieldList<'b> {
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn push(&mut self, field: Field<'b>) {
        let node = field.node;
        match self.tail {
            Some(tail) => tail.link_next(node),
            None => self.head = Some(node),
        }
        self.tail = Some(node);
        self.len += 1;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn head(&self) -> Option<&'b FieldNode<'b>> {
        self.head
    }

    pub fn iter(&self) -> Siblings<'b> {
        Siblings::new(self.head)
    }
}

impl<'b> Extend<Field<'b>> for FieldList<'b> {
    fn extend<I: IntoIterator<Item = Field<'b>>>(&mut self, iter: I) {
        for field in iter {
            self.push(field);
        }
    }
}

impl<'b> FromIterator<Field<'b>> for FieldList<'b> {
    fn from_iter<I: IntoIterator<Item = Field<'b>>>(iter: I) -> Self {
        let mut list = FieldList::new();
        list.extend(iter);
        list
    }
}

impl fmt::Debug for FieldList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Field constructors bound to one arena borrow.
#[derive(Clone, Copy)]
pub struct FieldBuilder<'b> {
    arena: &'b FieldArena,
}

impl<'b> FieldBuilder<'b> {
    #[inline]
    pub fn new(arena: &'b FieldArena) -> Self {
        Self { arena }
    }

    #[inline]
    fn make(self, key: Option<&'b str>, value: FieldValue<'b>) -> Field<'b> {
        Field {
            node: self.arena.alloc_node(key, value),
        }
    }

    pub fn null(self, key: &'b str) -> Field<'b> {
        self.make(Some(key), FieldValue::Null)
    }

    pub fn bool(self, key: &'b str, value: bool) -> Field<'b> {
        self.make(Some(key), FieldValue::Bool(value))
    }

    pub fn integer(self, key: &'b str, value: i64) -> Field<'b> {
        self.make(Some(key), FieldValue::Integer(value))
    }

    pub fn float(self, key: &'b str, value: f64) -> Field<'b> {
        self.make(Some(key), FieldValue::Float(value))
    }

    /// String field borrowing `value`; the bytes are copied only when the
    /// tree is rendered.
    pub fn string(self, key: &'b str, value: &'b str) -> Field<'b> {
        self.make(Some(key), FieldValue::String(value.as_bytes()))
    }

    /// String field from raw bytes. No UTF-8 validation is done.
    pub fn bytes(self, key: &'b str, value: &'b [u8]) -> Field<'b> {
        self.make(Some(key), FieldValue::String(value))
    }

    /// Timestamp field holding the wall-clock time of this call.
    pub fn timestamp(self, key: &'b str) -> Field<'b> {
        self.timespec(key, Timestamp::now())
    }

    /// Timestamp field holding a given instant.
    pub fn timespec(self, key: &'b str, value: impl Into<Timestamp>) -> Field<'b> {
        self.make(Some(key), FieldValue::Timestamp(value.into()))
    }

    pub fn object<I>(self, key: &'b str, children: I) -> Field<'b>
    where
        I: IntoIterator<Item = Field<'b>>,
    {
        let list: FieldList<'b> = children.into_iter().collect();
        self.make(Some(key), FieldValue::Object(list.head))
    }

    /// Array of element values. Element keys are not rendered.
    pub fn array<I>(self, key: &'b str, elements: I) -> Field<'b>
    where
        I: IntoIterator<Item = Field<'b>>,
    {
        let list: FieldList<'b> = elements.into_iter().collect();
        self.make(Some(key), FieldValue::Array(list.head))
    }

    /// Keyless list whose children are rendered as members of the parent.
    pub fn plain<I>(self, children: I) -> Field<'b>
    where
        I: IntoIterator<Item = Field<'b>>,
    {
        let list: FieldList<'b> = children.into_iter().collect();
        self.plain_list(list)
    }

    pub fn plain_list(self, list: FieldList<'b>) -> Field<'b> {
        self.make(None, FieldValue::Plain(list.head))
    }

    /// Keyless top-level object.
    pub fn root<I>(self, children: I) -> Field<'b>
    where
        I: IntoIterator<Item = Field<'b>>,
    {
        let list: FieldList<'b> = children.into_iter().collect();
        self.make(None, FieldValue::Object(list.head))
    }
}
