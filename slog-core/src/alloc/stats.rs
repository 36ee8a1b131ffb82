//! ## slog-core::alloc::stats
//! **Arena usage statistics**
//!
//! Counters are atomic so one `Arc<ArenaStats>` can be shared by every
//! arena in a thread pool, or across threads, and read from anywhere.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Allocation and rendering counters for one or more arenas.
#[derive(Debug, Default)]
pub struct ArenaStats {
    nodes_allocated: AtomicUsize,
    node_growths: AtomicUsize,
    output_growths: AtomicUsize,
    resets: AtomicUsize,
    bytes_rendered: AtomicUsize,
}

impl ArenaStats {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment_nodes_allocated(&self) {
        self.nodes_allocated.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_node_growths(&self) {
        self.node_growths.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_output_growths(&self, n: usize) {
        self.output_growths.fetch_add(n, Ordering::Relaxed);
    }

    #[inline]
    pub fn increment_resets(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_bytes_rendered(&self, n: usize) {
        self.bytes_rendered.fetch_add(n, Ordering::Relaxed);
    }

    pub fn nodes_allocated(&self) -> usize {
        self.nodes_allocated.load(Ordering::Relaxed)
    }

    pub fn node_growths(&self) -> usize {
        self.node_growths.load(Ordering::Relaxed)
    }

    pub fn output_growths(&self) -> usize {
        self.output_growths.load(Ordering::Relaxed)
    }

    pub fn resets(&self) -> usize {
        self.resets.load(Ordering::Relaxed)
    }

    pub fn bytes_rendered(&self) -> usize {
        self.bytes_rendered.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn counters_start_at_zero() {
        let stats = ArenaStats::new();
        assert_eq!(stats.nodes_allocated(), 0);
        assert_eq!(stats.node_growths(), 0);
        assert_eq!(stats.output_growths(), 0);
        assert_eq!(stats.resets(), 0);
        assert_eq!(stats.bytes_rendered(), 0);
    }

    #[test]
    fn shared_counters_aggregate_across_threads() {
        let stats = Arc::new(ArenaStats::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let stats = Arc::clone(&stats);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        stats.increment_nodes_allocated();
                        stats.add_bytes_rendered(2);
                    }
                    stats.increment_resets();
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(stats.nodes_allocated(), 400);
        assert_eq!(stats.bytes_rendered(), 800);
        assert_eq!(stats.resets(), 4);
    }
}
