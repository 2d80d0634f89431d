use async_trait::async_trait;
use crate::core::library::LibraryResult;

// ObjectStore is the bucket holding cover images. Keys are chosen by the caller.
#[async_trait]
pub(crate) trait ObjectStore: Sync + Send {
    // stores the bytes as a publicly readable object and returns its public url
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> LibraryResult<String>;

    // removes the object; a key that does not exist is not an error
    async fn delete(&self, key: &str) -> LibraryResult<()>;

    fn public_url(&self, key: &str) -> String;
}
