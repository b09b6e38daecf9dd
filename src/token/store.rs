use std::{
    collections::HashMap,
    sync::Mutex,
    time::{Duration, Instant},
};

use async_trait::async_trait;

/// A durable keyed cache with per-entry TTL, the only shared mutable state of
/// the engine.
///
/// Token lifecycle managers receive a store by injection; production uses the
/// file-backed store, tests the in-memory one. Values are opaque strings
/// (serialized token records). An expired entry behaves exactly like a missing
/// one.
///
/// Note on concurrency: a read-refresh-write sequence for one key is not
/// mutually excluded across callers. Two concurrent refreshes of the same
/// expired token both succeed independently and the last write wins.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn put(&self, key: &str, value: String, ttl: Duration);
    async fn delete(&self, key: &str);
}

/// Process-local token store backed by a mutex-guarded map.
pub struct MemoryTokenStore {
    entries: Mutex<HashMap<String, (String, Instant)>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some((value, deadline)) if *deadline > Instant::now() => Some(value.clone()),
            Some(_) => {
                // expired, evict lazily
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) {
        let deadline = Instant::now() + ttl;
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), (value, deadline));
    }

    async fn delete(&self, key: &str) {
        self.entries.lock().unwrap().remove(key);
    }
}
