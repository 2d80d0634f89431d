use std::collections::HashMap;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;
use crate::core::library::LibraryResult;
use crate::storage::key::public_url;
use crate::storage::objects::ObjectStore;

#[derive(Debug, Clone, PartialEq)]
#[allow(dead_code)]
pub(crate) struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

// MemoryObjectStore stands in for the bucket when running locally.
#[derive(Debug)]
pub struct MemoryObjectStore {
    base_url: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryObjectStore {
    pub(crate) fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    #[cfg(test)]
    pub(crate) async fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.read().await.get(key).cloned()
    }

    #[cfg(test)]
    pub(crate) async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> LibraryResult<String> {
        self.objects.write().await.insert(key.to_string(), StoredObject {
            bytes,
            content_type: content_type.to_string(),
        });
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> LibraryResult<()> {
        if self.objects.write().await.remove(key).is_none() {
            info!(key, "object to delete was already gone");
        }
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        public_url(self.base_url.as_str(), key)
    }
}
