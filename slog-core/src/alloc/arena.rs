//! ## slog-core::alloc::arena
//! **Per-call field arena using `bumpalo`**
//!
//! A `FieldArena` owns two independently growable pools: a chained-block
//! node pool (`bumpalo::Bump`) and the byte buffer the serializer writes
//! into. Nodes are handed out as `&'b FieldNode<'b>` where `'b` is the
//! borrow of the arena, so growing the pool never moves a node and
//! [`reset`](FieldArena::reset), which takes `&mut self`, cannot run while
//! any node is still reachable.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::mem;
use std::sync::Arc;

use bumpalo::Bump;
use tracing::trace;

use super::output::OutputBuffer;
use super::stats::ArenaStats;
use crate::error::SlogError;
use crate::field::{FieldBuilder, FieldNode, FieldValue};

/// Node slots reserved when no capacity is given.
pub const DEFAULT_NODE_CAPACITY: usize = 128;

/// Initial output bytes reserved per node slot.
pub const OUTPUT_BYTES_PER_NODE: usize = 32;

const NODE_SIZE: usize = mem::size_of::<FieldNode<'static>>();

/// Sizing for a new [`FieldArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaOptions {
    /// Node slots to reserve up front; `0` selects [`DEFAULT_NODE_CAPACITY`].
    pub node_capacity: usize,
    /// Hard cap on one rendered line. `None` lets the buffer grow freely.
    pub output_limit: Option<usize>,
}

impl Default for ArenaOptions {
    fn default() -> Self {
        Self {
            node_capacity: DEFAULT_NODE_CAPACITY,
            output_limit: None,
        }
    }
}

/// Node pool plus output buffer for one log call at a time.
pub struct FieldArena {
    nodes: Bump,
    node_count: Cell<usize>,
    node_capacity: Cell<usize>,
    output: RefCell<OutputBuffer>,
    stats: Arc<ArenaStats>,
}

impl FieldArena {
    /// Creates an arena with [`DEFAULT_NODE_CAPACITY`] slots.
    pub fn new() -> Self {
        Self::with_options(ArenaOptions::default())
    }

    pub fn with_capacity(node_capacity: usize) -> Self {
        Self::with_options(ArenaOptions {
            node_capacity,
            ..ArenaOptions::default()
        })
    }

    pub fn with_options(options: ArenaOptions) -> Self {
        Self::with_stats(options, Arc::new(ArenaStats::new()))
    }

    /// Creates an arena that reports into shared counters.
    pub fn with_stats(options: ArenaOptions, stats: Arc<ArenaStats>) -> Self {
        let node_capacity = match options.node_capacity {
            0 => DEFAULT_NODE_CAPACITY,
            n => n,
        };
        let output_capacity = node_capacity.saturating_mul(OUTPUT_BYTES_PER_NODE);
        let output = match options.output_limit {
            Some(limit) => OutputBuffer::bounded(output_capacity, limit),
            None => OutputBuffer::with_capacity(output_capacity),
        };

        Self {
            nodes: Bump::with_capacity(node_capacity * NODE_SIZE),
            node_count: Cell::new(0),
            node_capacity: Cell::new(node_capacity),
            output: RefCell::new(output),
            stats,
        }
    }

    /// Field constructors allocating from this arena.
    #[inline]
    pub fn builder(&self) -> FieldBuilder<'_> {
        FieldBuilder::new(self)
    }

    /// Allocates one node. Previously returned nodes stay where they are.
    ///
    /// Aborts through the global allocation error handler if the pool
    /// cannot grow.
    pub(crate) fn alloc_node<'b>(
        &'b self,
        key: Option<&'b str>,
        value: FieldValue<'b>,
    ) -> &'b FieldNode<'b> {
        let count = self.node_count.get() + 1;
        self.node_count.set(count);
        self.stats.increment_nodes_allocated();

        let node = self.nodes.alloc(FieldNode::new(key, value));

        if count > self.node_capacity.get() {
            let capacity = (self.nodes.allocated_bytes() / NODE_SIZE).max(count);
            self.node_capacity.set(capacity);
            self.stats.increment_node_growths();
            trace!(nodes = count, capacity, "field arena node pool grew");
        }
        node
    }

    /// Appends formatted text to the output buffer.
    pub fn append_text(&self, args: fmt::Arguments<'_>) -> Result<(), SlogError> {
        self.with_output(|out| out.append_fmt(args))
    }

    /// Runs `f` with exclusive access to the output buffer.
    pub(crate) fn with_output<R>(
        &self,
        f: impl FnOnce(&mut OutputBuffer) -> Result<R, SlogError>,
    ) -> Result<R, SlogError> {
        let mut out = self
            .output
            .try_borrow_mut()
            .map_err(|_| SlogError::ArenaBusy)?;
        let before = out.growths();
        let result = f(&mut out);
        self.stats.add_output_growths(out.growths() - before);
        result
    }

    /// Current contents of the output buffer.
    ///
    /// Panics if called while a sink is rendering into this arena.
    pub fn output(&self) -> Ref<'_, [u8]> {
        Ref::map(self.output.borrow(), OutputBuffer::as_bytes)
    }

    pub fn output_capacity(&self) -> usize {
        self.output.borrow().capacity()
    }

    /// Nodes allocated since the last reset.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.node_count.get()
    }

    #[inline]
    pub fn node_capacity(&self) -> usize {
        self.node_capacity.get()
    }

    #[inline]
    pub fn stats(&self) -> &Arc<ArenaStats> {
        &self.stats
    }

    /// Releases every node and clears the output, keeping the memory for
    /// the next call.
    pub fn reset(&mut self) {
        self.nodes.reset();
        self.node_count.set(0);
        self.output.get_mut().clear();
        self.stats.increment_resets();
    }
}

impl Default for FieldArena {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FieldArena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldArena")
            .field("node_count", &self.node_count.get())
            .field("node_capacity", &self.node_capacity.get())
            .field("output", &self.output)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;

    #[test]
    fn zero_capacity_selects_default() {
        let arena = FieldArena::with_capacity(0);
        assert_eq!(arena.node_capacity(), DEFAULT_NODE_CAPACITY);
        assert!(arena.output_capacity() >= DEFAULT_NODE_CAPACITY * OUTPUT_BYTES_PER_NODE);
    }

    #[test]
    fn nodes_survive_pool_growth() {
        let arena = FieldArena::with_capacity(2);
        let f = arena.builder();
        let first = f.integer("first", 1);
        let many: Vec<_> = (0..100).map(|i| f.integer("n", i)).collect();

        assert_eq!(first.node().value(), FieldValue::Integer(1));
        assert_eq!(many[99].node().value(), FieldValue::Integer(99));
        assert_eq!(arena.node_count(), 101);
        assert!(arena.node_capacity() >= 101);
        assert!(arena.stats().node_growths() >= 1);
    }

    #[test]
    fn reset_clears_nodes_and_output() {
        let mut arena = FieldArena::with_capacity(4);
        {
            let f = arena.builder();
            let node = f.null("k");
            assert_eq!(node.kind(), FieldKind::Null);
            arena.append_text(format_args!("{}", "text")).unwrap();
            assert_eq!(&*arena.output(), b"text");
        }
        arena.reset();
        assert_eq!(arena.node_count(), 0);
        assert!(arena.output().is_empty());
        assert_eq!(arena.stats().resets(), 1);
    }

    #[test]
    fn bounded_output_is_enforced() {
        let arena = FieldArena::with_options(ArenaOptions {
            node_capacity: 1,
            output_limit: Some(4),
        });
        arena.append_text(format_args!("abcd")).unwrap();
        assert!(matches!(
            arena.append_text(format_args!("e")),
            Err(SlogError::OutputOverflow { limit: 4 })
        ));
    }

    #[test]
    fn nested_output_borrow_is_reported() {
        let arena = FieldArena::new();
        let result = arena.with_output(|_| arena.append_text(format_args!("x")));
        assert!(matches!(result, Err(SlogError::ArenaBusy)));
    }

    #[test]
    fn shared_stats_see_every_arena() {
        let stats = Arc::new(ArenaStats::new());
        let a = FieldArena::with_stats(ArenaOptions::default(), Arc::clone(&stats));
        let b = FieldArena::with_stats(ArenaOptions::default(), Arc::clone(&stats));
        a.builder().bool("x", true);
        b.builder().bool("y", false);
        assert_eq!(stats.nodes_allocated(), 2);
    }
}
