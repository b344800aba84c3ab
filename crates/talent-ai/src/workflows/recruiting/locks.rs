use std::hash::Hash;
use std::sync::{Arc, Mutex};

use dashmap::DashMap;

/// Registry handing out one mutex per key so writes for the same key are serialized.
///
/// Slots are created on demand and dropped again once no caller holds them.
#[derive(Debug)]
pub struct KeyedLocks<K: Eq + Hash> {
    slots: DashMap<K, Arc<Mutex<()>>>,
}

impl<K: Eq + Hash> Default for KeyedLocks<K> {
    fn default() -> Self {
        Self {
            slots: DashMap::new(),
        }
    }
}

impl<K> KeyedLocks<K>
where
    K: Eq + Hash + Clone,
{
    fn slot(&self, key: &K) -> Arc<Mutex<()>> {
        self.slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run `work` while holding the lock for `key`.
    pub fn with_lock<T>(&self, key: &K, work: impl FnOnce() -> T) -> T {
        let slot = self.slot(key);
        let outcome = {
            // The guarded data is `()`, so a poisoned lock is still usable.
            let _guard = slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            work()
        };
        drop(slot);
        self.slots
            .remove_if(key, |_, slot| Arc::strong_count(slot) == 1);
        outcome
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    #[test]
    fn same_key_shares_a_slot() {
        let locks = KeyedLocks::default();
        let first = locks.slot(&"app-1".to_string());
        let second = locks.slot(&"app-1".to_string());
        let other = locks.slot(&"app-2".to_string());

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn released_slots_are_pruned() {
        let locks = KeyedLocks::default();
        let value = locks.with_lock(&"app-1".to_string(), || 7);

        assert_eq!(value, 7);
        assert!(locks.is_empty());
    }

    #[test]
    fn slot_held_elsewhere_survives_release() {
        let locks = KeyedLocks::default();
        let key = "app-1".to_string();
        let waiting = locks.slot(&key);

        locks.with_lock(&key, || ());
        assert_eq!(locks.len(), 1);

        drop(waiting);
        locks.with_lock(&key, || ());
        assert!(locks.is_empty());
    }

    #[test]
    fn with_lock_serializes_concurrent_writers() {
        let locks = Arc::new(KeyedLocks::default());
        let inside = Arc::new(AtomicUsize::new(0));
        let overlaps = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let locks = locks.clone();
                let inside = inside.clone();
                let overlaps = overlaps.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        locks.with_lock(&"shared".to_string(), || {
                            if inside.fetch_add(1, Ordering::SeqCst) > 0 {
                                overlaps.fetch_add(1, Ordering::SeqCst);
                            }
                            inside.fetch_sub(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("writer thread");
        }
        assert_eq!(overlaps.load(Ordering::SeqCst), 0);
        assert!(locks.is_empty());
    }
}
