/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Keyed mutual exclusion.

use dashmap::DashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, PoisonError};

/// One mutex per key, created on first use.
///
/// The mutexes guard no data, only critical sections, so a poisoned lock is
/// simply taken over.
#[derive(Debug)]
pub(crate) struct LockTable<K: Eq + Hash> {
    locks: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash + Copy> LockTable<K> {
    pub(crate) fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    /// Runs `f` while holding the lock for `key`.
    pub(crate) fn run<R>(&self, key: K, f: impl FnOnce() -> R) -> R {
        let lock = Arc::clone(self.locks.entry(key).or_default().value());
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_same_key_is_exclusive() {
        let table = Arc::new(LockTable::<u64>::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let table = Arc::clone(&table);
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        table.run(1, || {
                            let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                            max_seen.fetch_max(now, Ordering::SeqCst);
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_different_keys_do_not_block() {
        let table = LockTable::<u64>::new();
        let value = table.run(1, || table.run(2, || 42));
        assert_eq!(value, 42);
    }
}
