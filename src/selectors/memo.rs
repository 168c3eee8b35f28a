// SPDX-License-Identifier: MPL-2.0
//! Reference-keyed memoization.
//!
//! Inputs are `Arc`s taken straight from store slices. A cached output is
//! reused only while the caller passes the *same* allocation; an equal but
//! freshly allocated input always recomputes.

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// Hit/miss counters of one or more memos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
}

impl std::ops::Add for MemoStats {
    type Output = MemoStats;

    fn add(self, rhs: Self) -> Self::Output {
        MemoStats {
            hits: self.hits + rhs.hits,
            misses: self.misses + rhs.misses,
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Counters {
    fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> MemoStats {
        MemoStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }
}

/// Single-slot memo over one input reference.
pub struct Memo<I, O> {
    compute: fn(&I) -> O,
    slot: Mutex<Option<(Arc<I>, Arc<O>)>>,
    counters: Counters,
}

impl<I, O> Memo<I, O> {
    #[must_use]
    pub fn new(compute: fn(&I) -> O) -> Self {
        Self {
            compute,
            slot: Mutex::new(None),
            counters: Counters::default(),
        }
    }

    /// Returns the cached output if `input` is the cached allocation,
    /// recomputing otherwise.
    pub fn get(&self, input: &Arc<I>) -> Arc<O> {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached_input, output)) = slot.as_ref() {
            if Arc::ptr_eq(cached_input, input) {
                self.counters.hit();
                return Arc::clone(output);
            }
        }

        self.counters.miss();
        let output = Arc::new((self.compute)(input));
        *slot = Some((Arc::clone(input), Arc::clone(&output)));
        output
    }

    #[must_use]
    pub fn stats(&self) -> MemoStats {
        self.counters.snapshot()
    }
}

/// Memo for parameterized selectors: one entry per parameter value, each
/// valid only for the input reference it was computed from.
pub struct KeyedMemo<K: Hash + Eq, I, O> {
    compute: fn(&I, &K) -> O,
    cache: Mutex<LruCache<K, (Arc<I>, Arc<O>)>>,
    counters: Counters,
}

impl<K: Hash + Eq + Clone, I, O> KeyedMemo<K, I, O> {
    #[must_use]
    pub fn new(compute: fn(&I, &K) -> O, capacity: NonZeroUsize) -> Self {
        Self {
            compute,
            cache: Mutex::new(LruCache::new(capacity)),
            counters: Counters::default(),
        }
    }

    pub fn get(&self, input: &Arc<I>, key: &K) -> Arc<O> {
        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((cached_input, output)) = cache.get(key) {
            if Arc::ptr_eq(cached_input, input) {
                self.counters.hit();
                return Arc::clone(output);
            }
        }

        self.counters.miss();
        let output = Arc::new((self.compute)(input, key));
        cache.put(key.clone(), (Arc::clone(input), Arc::clone(&output)));
        output
    }

    #[must_use]
    pub fn stats(&self) -> MemoStats {
        self.counters.snapshot()
    }
}
