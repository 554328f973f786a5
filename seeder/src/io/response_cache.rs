//! Content-addressed cache for translator and language-model responses.
//!
//! Entries live at `{cache_dir}/{namespace}/{hash}.txt` where the hash is
//! derived from the request text, so changing a prompt invalidates its entry.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Compute a short hash of content for cache keys.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    hex::encode(&result[..8])
}

#[derive(Debug, Clone)]
pub struct ResponseCache {
    root: PathBuf,
}

impl ResponseCache {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            root: cache_dir.to_path_buf(),
        }
    }

    pub fn entry_path(&self, namespace: &str, key: &str) -> PathBuf {
        self.root
            .join(namespace)
            .join(format!("{}.txt", content_hash(key)))
    }

    pub fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let path = self.entry_path(namespace, key);
        if !path.exists() {
            return Ok(None);
        }
        debug!(path = %path.display(), "cache hit");
        let contents =
            fs::read_to_string(&path).with_context(|| format!("read cache {}", path.display()))?;
        Ok(Some(contents))
    }

    pub fn put(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let path = self.entry_path(namespace, key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create cache dir {}", parent.display()))?;
        }
        fs::write(&path, value).with_context(|| format!("write cache {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_short_and_stable() {
        let a = content_hash("crested gecko");
        assert_eq!(a.len(), 16);
        assert_eq!(a, content_hash("crested gecko"));
        assert_ne!(a, content_hash("gargoyle gecko"));
    }

    #[test]
    fn put_then_get_returns_value() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cache = ResponseCache::new(temp.path());
        assert_eq!(cache.get("translate", "hello").expect("get"), None);
        cache.put("translate", "hello", "안녕하세요").expect("put");
        assert_eq!(
            cache.get("translate", "hello").expect("get").as_deref(),
            Some("안녕하세요")
        );
        assert_eq!(cache.get("llm", "hello").expect("get"), None);
    }
}
