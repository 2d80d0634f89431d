pub mod factory;
pub mod key;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod upload;

use crate::core::library::{LibraryError, LibraryResult};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ObjectStoreVia {
    S3,
    Memory,
}

impl ObjectStoreVia {
    pub fn parse(name: &str) -> LibraryResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "s3" => Ok(ObjectStoreVia::S3),
            "memory" => Ok(ObjectStoreVia::Memory),
            other => Err(LibraryError::validation(
                format!("unknown object store {}", other).as_str(), Some("config".to_string()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::storage::ObjectStoreVia;

    #[tokio::test]
    async fn test_should_parse_object_store_via() {
        assert_eq!(ObjectStoreVia::S3, ObjectStoreVia::parse("S3").expect("should parse"));
        assert_eq!(ObjectStoreVia::Memory, ObjectStoreVia::parse("memory").expect("should parse"));
        assert!(ObjectStoreVia::parse("gcs").is_err());
    }
}
