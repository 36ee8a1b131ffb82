//! ## slog-core::alloc::pool
//! **Per-thread pool of reusable field arenas**
//!
//! Each thread keeps a small free list of arenas. [`LocalArena::acquire`]
//! pops one (or creates a fresh one) and dropping the guard resets it and
//! pushes it back, so steady-state logging reuses the same node chunks and
//! output buffer. Free lists are never shared between threads; the sizing
//! they use is process-wide.
//!
//! Acquiring again on the same thread while a guard is alive (a sink that
//! logs, for example) simply takes another arena, so nested calls never
//! contend for the same buffer.

use std::cell::RefCell;
use std::mem::ManuallyDrop;
use std::ops::Deref;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::arena::{ArenaOptions, FieldArena};

/// Arenas kept per thread once released.
pub const DEFAULT_POOL_SIZE: usize = 4;

#[derive(Debug, Clone, Copy)]
struct PoolConfig {
    options: ArenaOptions,
    pool_size: usize,
    /// Bumped by every `configure`; free lists from older generations are
    /// discarded.
    generation: u64,
}

static CONFIG: Lazy<RwLock<PoolConfig>> = Lazy::new(|| {
    RwLock::new(PoolConfig {
        options: ArenaOptions::default(),
        pool_size: DEFAULT_POOL_SIZE,
        generation: 0,
    })
});

struct FreeList {
    generation: u64,
    arenas: Vec<FieldArena>,
}

impl FreeList {
    fn sync(&mut self, generation: u64) {
        if self.generation != generation {
            self.arenas.clear();
            self.generation = generation;
        }
    }
}

thread_local! {
    static POOL: RefCell<FreeList> = const {
        RefCell::new(FreeList {
            generation: 0,
            arenas: Vec::new(),
        })
    };
}

/// An arena borrowed from the current thread's pool.
#[derive(Debug)]
pub struct LocalArena {
    arena: ManuallyDrop<FieldArena>,
    generation: u64,
}

impl LocalArena {
    /// Takes an arena from this thread's pool, creating one if it is empty.
    pub fn acquire() -> Self {
        let config = *CONFIG.read();
        let recycled = POOL
            .try_with(|pool| {
                pool.try_borrow_mut().ok().and_then(|mut p| {
                    p.sync(config.generation);
                    p.arenas.pop()
                })
            })
            .ok()
            .flatten();
        let arena = recycled.unwrap_or_else(|| FieldArena::with_options(config.options));
        Self {
            arena: ManuallyDrop::new(arena),
            generation: config.generation,
        }
    }

    /// Sets how new arenas are sized and how many released arenas each
    /// thread keeps. Applies to every thread; arenas pooled under the
    /// previous settings are discarded.
    pub fn configure(options: ArenaOptions, pool_size: usize) {
        let mut config = CONFIG.write();
        config.options = options;
        config.pool_size = pool_size;
        config.generation += 1;
    }

    /// Current process-wide sizing and pool size.
    pub fn configured() -> (ArenaOptions, usize) {
        let config = CONFIG.read();
        (config.options, config.pool_size)
    }

    /// Number of idle arenas in this thread's pool.
    pub fn pooled() -> usize {
        let generation = CONFIG.read().generation;
        POOL.try_with(|pool| {
            pool.try_borrow()
                .map(|p| if p.generation == generation { p.arenas.len() } else { 0 })
                .unwrap_or(0)
        })
        .unwrap_or(0)
    }
}

impl Deref for LocalArena {
    type Target = FieldArena;

    #[inline]
    fn deref(&self) -> &FieldArena {
        &self.arena
    }
}

impl Drop for LocalArena {
    fn drop(&mut self) {
        // SAFETY: `self.arena` is never touched again after this point.
        let mut arena = unsafe { ManuallyDrop::take(&mut self.arena) };
        arena.reset();
        let config = *CONFIG.read();
        if self.generation != config.generation {
            return;
        }
        // The pool may already be gone during thread teardown.
        let _ = POOL.try_with(|pool| {
            if let Ok(mut pool) = pool.try_borrow_mut() {
                pool.sync(config.generation);
                if pool.arenas.len() < config.pool_size {
                    pool.arenas.push(arena);
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::thread;

    // Sizing is process-wide, so tests touching it run one at a time.
    static SERIAL: Mutex<()> = parking_lot::const_mutex(());

    fn restore_defaults() {
        LocalArena::configure(ArenaOptions::default(), DEFAULT_POOL_SIZE);
    }

    #[test]
    fn released_arenas_are_reused() {
        let _guard = SERIAL.lock();
        thread::spawn(|| {
            assert_eq!(LocalArena::pooled(), 0);
            {
                let arena = LocalArena::acquire();
                arena.builder().string("k", "v");
            }
            assert_eq!(LocalArena::pooled(), 1);

            let arena = LocalArena::acquire();
            assert_eq!(LocalArena::pooled(), 0);
            assert_eq!(arena.node_count(), 0);
            assert_eq!(arena.stats().resets(), 1);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn nested_acquire_gets_a_distinct_arena() {
        let _guard = SERIAL.lock();
        thread::spawn(|| {
            let outer = LocalArena::acquire();
            let inner = LocalArena::acquire();
            outer.builder().null("a");
            assert_eq!(inner.node_count(), 0);
            drop(inner);
            drop(outer);
            assert_eq!(LocalArena::pooled(), 2);
        })
        .join()
        .unwrap();
    }

    #[test]
    fn pool_size_bounds_retained_arenas() {
        let _guard = SERIAL.lock();
        LocalArena::configure(ArenaOptions::default(), 1);
        thread::spawn(|| {
            let a = LocalArena::acquire();
            let b = LocalArena::acquire();
            drop(a);
            drop(b);
            assert_eq!(LocalArena::pooled(), 1);
        })
        .join()
        .unwrap();
        restore_defaults();
    }

    #[test]
    fn configuration_reaches_other_threads() {
        let _guard = SERIAL.lock();
        let options = ArenaOptions {
            node_capacity: 7,
            output_limit: Some(64),
        };
        LocalArena::configure(options, DEFAULT_POOL_SIZE);
        assert_eq!(LocalArena::acquire().node_capacity(), 7);

        let (capacity, overflowed) = thread::spawn(|| {
            let arena = LocalArena::acquire();
            let overflowed = arena.append_text(format_args!("{}", "x".repeat(65))).is_err();
            (arena.node_capacity(), overflowed)
        })
        .join()
        .unwrap();
        assert_eq!(capacity, 7);
        assert!(overflowed);
        assert_eq!(LocalArena::configured(), (options, DEFAULT_POOL_SIZE));
        restore_defaults();
    }

    #[test]
    fn reconfigure_discards_stale_arenas() {
        let _guard = SERIAL.lock();
        thread::spawn(|| {
            drop(LocalArena::acquire());
            assert_eq!(LocalArena::pooled(), 1);

            let held = LocalArena::acquire();
            LocalArena::configure(
                ArenaOptions {
                    node_capacity: 9,
                    output_limit: None,
                },
                DEFAULT_POOL_SIZE,
            );
            drop(held);
            assert_eq!(LocalArena::pooled(), 0);
            assert_eq!(LocalArena::acquire().node_capacity(), 9);
        })
        .join()
        .unwrap();
        restore_defaults();
    }
}
