use std::sync::Arc;
use tracing::info;
use crate::core::domain::Configuration;
use crate::storage::memory::MemoryObjectStore;
use crate::storage::objects::ObjectStore;
use crate::storage::ObjectStoreVia;
use crate::storage::s3::{build_s3_client, S3ObjectStore};

pub(crate) async fn create_object_store(config: &Configuration) -> Arc<dyn ObjectStore> {
    info!(via = ?config.object_store, bucket = config.bucket_name.as_str(), public_url = config.public_base_url.as_str(), "creating object store");
    match config.object_store {
        ObjectStoreVia::S3 => {
            let client = build_s3_client(config).await;
            Arc::new(S3ObjectStore::new(client, config.bucket_name.as_str(), config.public_base_url.as_str()))
        }
        ObjectStoreVia::Memory => {
            Arc::new(MemoryObjectStore::new(config.public_base_url.as_str()))
        }
    }
}
