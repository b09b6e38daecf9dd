use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::TokenStore;

#[derive(Serialize, Deserialize)]
struct FileEntry {
    expires_at: i64,
    value: String,
}

/// Token store persisted as one JSON file per key under the local data
/// directory, so tokens survive between CLI invocations.
pub struct FileTokenStore {
    root: PathBuf,
}

impl FileTokenStore {
    pub fn new() -> Self {
        let mut root = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        root.push("tunebridge/tokens");
        Self { root }
    }

    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        // keys contain ':' which is not portable in file names; escape every
        // non-alphanumeric byte (including '_' itself) so distinct keys can
        // never map to the same file
        let mut file = String::with_capacity(key.len());
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() {
                file.push(byte as char);
            } else {
                file.push_str(&format!("_{:02x}", byte));
            }
        }
        self.root.join(format!("{}.json", file))
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        let content = async_fs::read_to_string(&path).await.ok()?;
        let entry: FileEntry = serde_json::from_str(&content).ok()?;

        if Utc::now().timestamp() >= entry.expires_at {
            let _ = async_fs::remove_file(&path).await;
            return None;
        }

        Some(entry.value)
    }

    async fn put(&self, key: &str, value: String, ttl: Duration) {
        let path = self.path_for(key);
        if let Some(parent) = path.parent() {
            if async_fs::create_dir_all(parent).await.is_err() {
                return;
            }
        }

        let entry = FileEntry {
            expires_at: Utc::now().timestamp() + ttl.as_secs() as i64,
            value,
        };
        if let Ok(json) = serde_json::to_string_pretty(&entry) {
            let _ = async_fs::write(path, json).await;
        }
    }

    async fn delete(&self, key: &str) {
        let _ = async_fs::remove_file(self.path_for(key)).await;
    }
}
