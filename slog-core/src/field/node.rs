//! ## slog-core::field::node
//! **Field nodes: the closed set of value kinds and their sibling links**
//!
//! Nodes live in a [`FieldArena`](crate::alloc::FieldArena) and are only ever
//! handed out as shared references tied to the arena borrow. Siblings form a
//! singly linked intrusive list through `next`; containers hold the head of
//! their child list.

use std::cell::Cell;
use std::fmt;

use super::time::Timestamp;

/// Discriminant of a [`FieldValue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Timestamp,
    Object,
    Array,
    Plain,
}

impl FieldKind {
    #[inline]
    pub fn is_container(self) -> bool {
        matches!(self, FieldKind::Object | FieldKind::Array | FieldKind::Plain)
    }
}

/// The value carried by one node.
///
/// String payloads are raw bytes: text fields borrow a `&str`, byte fields a
/// `&[u8]`, and both serialize through the same byte-transparent escaper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'b> {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(&'b [u8]),
    Timestamp(Timestamp),
    Object(Option<&'b FieldNode<'b>>),
    Array(Option<&'b FieldNode<'b>>),
    /// Keyless list spliced into the enclosing object or array.
    Plain(Option<&'b FieldNode<'b>>),
}

impl<'b> FieldValue<'b> {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Null => FieldKind::Null,
            FieldValue::Bool(_) => FieldKind::Bool,
            FieldValue::Integer(_) => FieldKind::Integer,
            FieldValue::Float(_) => FieldKind::Float,
            FieldValue::String(_) => FieldKind::String,
            FieldValue::Timestamp(_) => FieldKind::Timestamp,
            FieldValue::Object(_) => FieldKind::Object,
            FieldValue::Array(_) => FieldKind::Array,
            FieldValue::Plain(_) => FieldKind::Plain,
        }
    }

    /// Head of the child list for container kinds.
    #[inline]
    pub fn children_head(&self) -> Option<&'b FieldNode<'b>> {
        match *self {
            FieldValue::Object(head) | FieldValue::Array(head) | FieldValue::Plain(head) => head,
            _ => None,
        }
    }
}

/// One key/value entry, or one container of entries.
#[derive(PartialEq)]
pub struct FieldNode<'b> {
    key: Option<&'b str>,
    value: FieldValue<'b>,
    next: Cell<Option<&'b FieldNode<'b>>>,
}

impl<'b> FieldNode<'b> {
    #[inline]
    pub(crate) fn new(key: Option<&'b str>, value: FieldValue<'b>) -> Self {
        Self {
            key,
            value,
            next: Cell::new(None),
        }
    }

    #[inline]
    pub fn key(&self) -> Option<&'b str> {
        self.key
    }

    #[inline]
    pub fn value(&self) -> FieldValue<'b> {
        self.value
    }

    #[inline]
    pub fn kind(&self) -> FieldKind {
        self.value.kind()
    }

    /// Following sibling in the same list.
    #[inline]
    pub fn next(&self) -> Option<&'b FieldNode<'b>> {
        self.next.get()
    }

    #[inline]
    pub(crate) fn link_next(&self, next: &'b FieldNode<'b>) {
        debug_assert!(self.next.get().is_none(), "sibling tail already linked");
        self.next.set(Some(next));
    }

    /// Direct children in list order. Empty for leaf kinds.
    pub fn children(&self) -> Siblings<'b> {
        Siblings::new(self.value.children_head())
    }

    /// Finds a child by key, looking through spliced `Plain` lists.
    pub fn get(&self, key: &str) -> Option<&'b FieldNode<'b>> {
        find_in(self.value.children_head(), key)
    }

    /// Text payload of a string field, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&'b str> {
        match self.value {
            FieldValue::String(bytes) => std::str::from_utf8(bytes).ok(),
            _ => None,
        }
    }
}

fn find_in<'b>(head: Option<&'b FieldNode<'b>>, key: &str) -> Option<&'b FieldNode<'b>> {
    for node in Siblings::new(head) {
        if let FieldValue::Plain(inner) = node.value {
            if let Some(found) = find_in(inner, key) {
                return Some(found);
            }
        } else if node.key == Some(key) {
            return Some(node);
        }
    }
    None
}

impl fmt::Debug for FieldNode<'_> {
    // Siblings are left out; `children` shows the subtree.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("FieldNode");
        s.field("key", &self.key);
        match self.value {
            FieldValue::String(bytes) => s.field("value", &String::from_utf8_lossy(bytes)),
            v if v.kind().is_container() => s.field("children", &self.children().collect::<Vec<_>>()),
            v => s.field("value", &v),
        };
        s.finish()
    }
}

/// Iterator over a sibling list, stopping at the first empty `next`.
#[derive(Clone)]
pub struct Siblings<'b> {
    cur: Option<&'b FieldNode<'b>>,
}

impl<'b> Siblings<'b> {
    #[inline]
    pub fn new(head: Option<&'b FieldNode<'b>>) -> Self {
        Self { cur: head }
    }
}

impl<'b> Iterator for Siblings<'b> {
    type Item = &'b FieldNode<'b>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let node = self.cur?;
        self.cur = node.next();
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn siblings_stop_at_empty_next() {
        let c = FieldNode::new(Some("c"), FieldValue::Integer(3));
        let b = FieldNode::new(Some("b"), FieldValue::Integer(2));
        let a = FieldNode::new(Some("a"), FieldValue::Integer(1));
        a.link_next(&b);
        b.link_next(&c);

        let keys: Vec<_> = Siblings::new(Some(&a)).filter_map(|n| n.key()).collect();
        assert_eq!(keys, ["a", "b", "c"]);
    }

    #[test]
    fn get_looks_through_plain_lists() {
        let inner = FieldNode::new(Some("inner"), FieldValue::Bool(true));
        let plain = FieldNode::new(None, FieldValue::Plain(Some(&inner)));
        let first = FieldNode::new(Some("first"), FieldValue::Null);
        first.link_next(&plain);
        let root = FieldNode::new(None, FieldValue::Object(Some(&first)));

        assert_eq!(root.get("inner").map(|n| n.value()), Some(FieldValue::Bool(true)));
        assert!(root.get("missing").is_none());
        assert_eq!(root.children().count(), 2);
    }

    #[test]
    fn leaf_has_no_children() {
        let leaf = FieldNode::new(Some("n"), FieldValue::String(b"x"));
        assert_eq!(leaf.children().count(), 0);
        assert_eq!(leaf.as_str(), Some("x"));
        assert!(!leaf.kind().is_container());
    }
}
