//! The index of live connections for multi-threaded servers.
//!
//! A hash map split across buckets, each protected by its own
//! reader-writer lock, so that lookups from different worker threads
//! are typically uncontended. The index holds the sole strong
//! reference to each entry and hands out weak handles, so dropping a
//! connection from the index is what actually tears it down.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock, Weak};

/// The default number of buckets. More buckets lower the probability
/// of lock contention between worker threads.
pub const DEFAULT_BUCKETS: usize = 16;

/// A bucketed map from connection keys to live connection handles.
pub struct ConnectionIndex<K: Hash + Eq, T> {
    buckets: Vec<RwLock<HashMap<K, Arc<T>>>>,
}

impl<K: Hash + Eq, T> ConnectionIndex<K, T> {
    pub fn new() -> ConnectionIndex<K, T> {
        ConnectionIndex::with_buckets(DEFAULT_BUCKETS)
    }

    /// Create an index with a specific bucket count.
    pub fn with_buckets(num_buckets: usize) -> ConnectionIndex<K, T> {
        assert!(num_buckets > 0);
        let mut buckets = Vec::with_capacity(num_buckets);
        for _ in 0..num_buckets {
            buckets.push(RwLock::new(HashMap::new()));
        }
        ConnectionIndex { buckets: buckets }
    }

    fn bucket(&self, key: &K) -> &RwLock<HashMap<K, Arc<T>>> {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        let index = hasher.finish() as usize % self.buckets.len();
        &self.buckets[index]
    }

    /// Insert a connection, returning the previous entry for the key,
    /// if any. Takes ownership: the index holds the strong reference.
    pub fn insert(&self, key: K, connection: Arc<T>) -> Option<Arc<T>> {
        let mut bucket = self.bucket(&key).write()
            .expect("connection index lock poisoned");
        bucket.insert(key, connection)
    }

    /// Remove a connection, dropping the index's strong reference.
    pub fn remove(&self, key: &K) -> Option<Arc<T>> {
        let mut bucket = self.bucket(key).write()
            .expect("connection index lock poisoned");
        bucket.remove(key)
    }

    /// Look up a connection, handing out a weak handle.
    pub fn find(&self, key: &K) -> Option<Weak<T>> {
        let bucket = self.bucket(key).read()
            .expect("connection index lock poisoned");
        bucket.get(key).map(|conn| Arc::downgrade(conn))
    }

    /// The number of live connections; locks every bucket for reading.
    pub fn len(&self) -> usize {
        self.buckets.iter()
            .map(|bucket| {
                bucket.read()
                    .expect("connection index lock poisoned")
                    .len()
            })
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Weak handles to every live connection, taken under all bucket
    /// locks in order. Used by server shutdown to disconnect everyone.
    pub fn snapshot(&self) -> Vec<Weak<T>> {
        let mut connections = Vec::new();
        for bucket in &self.buckets {
            let bucket = bucket.read()
                .expect("connection index lock poisoned");
            connections.extend(bucket.values().map(Arc::downgrade));
        }
        connections
    }

    /// Drop every entry, releasing the index's strong references.
    pub fn clear(&self) {
        for bucket in &self.buckets {
            bucket.write()
                .expect("connection index lock poisoned")
                .clear();
        }
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;
    use std::thread;

    use super::ConnectionIndex;

    #[test]
    fn insert_find_remove() {
        let index: ConnectionIndex<usize, String> = ConnectionIndex::new();
        assert!(index.insert(7, Arc::new("seven".to_string())).is_none());
        assert_eq!(index.len(), 1);

        let weak = index.find(&7).unwrap();
        assert_eq!(*weak.upgrade().unwrap(), "seven");

        index.remove(&7).unwrap();
        assert!(index.find(&7).is_none());
        // the index held the only strong reference
        assert!(weak.upgrade().is_none());
        assert!(index.is_empty());
    }

    #[test]
    fn snapshot_sees_all_buckets() {
        let index: ConnectionIndex<usize, usize> =
            ConnectionIndex::with_buckets(3);
        for key in 0..100 {
            index.insert(key, Arc::new(key));
        }
        assert_eq!(index.len(), 100);
        let mut values: Vec<usize> = index.snapshot().iter()
            .map(|weak| *weak.upgrade().unwrap())
            .collect();
        values.sort();
        assert_eq!(values, (0..100).collect::<Vec<usize>>());
    }

    #[test]
    fn concurrent_readers() {
        let index: Arc<ConnectionIndex<usize, usize>> =
            Arc::new(ConnectionIndex::new());
        for key in 0..64 {
            index.insert(key, Arc::new(key * 2));
        }
        let mut workers = Vec::new();
        for _ in 0..4 {
            let index = index.clone();
            workers.push(thread::spawn(move || {
                for key in 0..64 {
                    let weak = index.find(&key).unwrap();
                    assert_eq!(*weak.upgrade().unwrap(), key * 2);
                }
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }
        index.clear();
        assert!(index.is_empty());
    }
}
