use async_trait::async_trait;
use std::collections::HashMap;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};

// Repository covers single-document reads and writes. Absence is reported as `None` rather than
// as an error so callers can tell "no such document" apart from a failing store.
#[async_trait]
pub trait Repository<Entity, Patch>: Sync + Send {
    // get an entity
    async fn get(&self, id: &str) -> LibraryResult<Option<Entity>>;

    // applies the patch and returns the updated entity
    async fn update(&self, id: &str, patch: &Patch) -> LibraryResult<Option<Entity>>;

    // delete an entity and return what was removed
    async fn delete(&self, id: &str) -> LibraryResult<Option<Entity>>;

    // find by string equality on the predicate attributes
    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<Entity>>;
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RepositoryStore {
    DynamoDB,
    LocalDynamoDB,
    Memory,
}

impl RepositoryStore {
    pub fn parse(name: &str) -> LibraryResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "dynamodb" => Ok(RepositoryStore::DynamoDB),
            "local-dynamodb" => Ok(RepositoryStore::LocalDynamoDB),
            "memory" => Ok(RepositoryStore::Memory),
            other => Err(LibraryError::validation(
                format!("unknown repository store {}", other).as_str(), Some("config".to_string()))),
        }
    }
}
