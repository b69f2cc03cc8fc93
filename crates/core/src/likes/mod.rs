//! Persistent like store. Likes are a mapping from track id to the
//! epoch-millis timestamp of the like, kept in a JSON file; entries older
//! than the TTL are purged when the store loads. A missing or corrupt
//! file never crashes the application, it simply loads as empty.

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::Result;

/// Default lifetime of a like: 24 hours.
pub const LIKE_TTL_MILLIS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug)]
pub struct LikeStore {
    path: PathBuf,
    ttl_millis: u64,
    entries: HashMap<String, u64>,
}

impl LikeStore {
    /// Loads the store from `path`, purging expired entries. If anything
    /// was purged the pruned file is written back immediately.
    pub fn load(path: impl Into<PathBuf>, ttl_millis: u64) -> Self {
        let path = path.into();
        let mut entries: HashMap<String, u64> = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|err| {
                tracing::warn!(%err, path = %path.display(), "like store unreadable, starting empty");
                HashMap::new()
            }),
            Err(_) => HashMap::new(),
        };

        let now = epoch_millis();
        let before = entries.len();
        entries.retain(|_, stamp| now.saturating_sub(*stamp) <= ttl_millis);

        let store = Self {
            path,
            ttl_millis,
            entries,
        };
        if store.entries.len() != before {
            tracing::debug!(purged = before - store.entries.len(), "expired likes removed");
            if let Err(err) = store.persist() {
                tracing::warn!(%err, "failed to rewrite pruned like store");
            }
        }
        store
    }

    /// Records a like for `id` at the current time and persists the store.
    /// Liking an already-liked track refreshes its timestamp.
    pub fn like(&mut self, id: &str) -> Result<()> {
        self.entries.insert(id.to_string(), epoch_millis());
        self.persist()
    }

    /// Whether `id` carries an unexpired like.
    pub fn is_liked(&self, id: &str) -> bool {
        self.entries
            .get(id)
            .map(|stamp| epoch_millis().saturating_sub(*stamp) <= self.ttl_millis)
            .unwrap_or(false)
    }

    /// Ids of all stored likes, sorted for stable display.
    pub fn liked_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_vec_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TempPath(PathBuf);

    impl TempPath {
        fn new(tag: &str) -> Self {
            let path = std::env::temp_dir().join(format!(
                "airglow_likes_{tag}_{}.json",
                std::process::id()
            ));
            let _ = fs::remove_file(&path);
            Self(path)
        }
    }

    impl Drop for TempPath {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let temp = TempPath::new("missing");
        let store = LikeStore::load(&temp.0, LIKE_TTL_MILLIS);
        assert!(store.is_empty());
        assert!(!store.is_liked("anything"));
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let temp = TempPath::new("corrupt");
        fs::write(&temp.0, b"not json at all").unwrap();

        let store = LikeStore::load(&temp.0, LIKE_TTL_MILLIS);
        assert!(store.is_empty());
    }

    #[test]
    fn likes_survive_a_reload() {
        let temp = TempPath::new("reload");
        {
            let mut store = LikeStore::load(&temp.0, LIKE_TTL_MILLIS);
            store.like("abc123").unwrap();
            store.like("def456").unwrap();
        }

        let store = LikeStore::load(&temp.0, LIKE_TTL_MILLIS);
        assert_eq!(store.len(), 2);
        assert!(store.is_liked("abc123"));
        assert_eq!(store.liked_ids(), vec!["abc123", "def456"]);
    }

    #[test]
    fn expired_entries_are_purged_on_load() {
        let temp = TempPath::new("expired");
        let stale = epoch_millis() - LIKE_TTL_MILLIS - 60_000;
        let fresh = epoch_millis();
        let seed = format!(r#"{{"old":{stale},"new":{fresh}}}"#);
        fs::write(&temp.0, seed).unwrap();

        let store = LikeStore::load(&temp.0, LIKE_TTL_MILLIS);
        assert_eq!(store.len(), 1);
        assert!(store.is_liked("new"));
        assert!(!store.is_liked("old"));

        // The pruned state was written back.
        let rewritten = fs::read_to_string(&temp.0).unwrap();
        assert!(!rewritten.contains("old"));
    }

    #[test]
    fn reliking_refreshes_the_timestamp() {
        let temp = TempPath::new("refresh");
        let mut store = LikeStore::load(&temp.0, LIKE_TTL_MILLIS);
        store.like("abc").unwrap();
        store.like("abc").unwrap();
        assert_eq!(store.len(), 1);
    }
}
