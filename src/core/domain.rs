use std::path::PathBuf;
use std::str::FromStr;
use tracing::Level;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::RepositoryStore;
use crate::storage::ObjectStoreVia;

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
    fn version(&self) -> i64;
}

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_LOCAL_BUCKET: &str = "local-books";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration holds everything the catalog needs to reach its two backing stores. It is built
/// once when the process starts and handed to the factories, nothing reads the environment after
/// that.
#[derive(Debug, PartialEq, Clone)]
pub struct Configuration {
    pub store: RepositoryStore,
    pub table_name: String,
    pub dynamodb_endpoint: Option<String>,
    pub object_store: ObjectStoreVia,
    pub bucket_name: String,
    pub region: String,
    pub s3_endpoint: Option<String>,
    pub public_base_url: String,
    pub key_prefix: String,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub listen_addr: Option<String>,
    pub log_level: Level,
}

impl Configuration {
    /// In-process stores, handy for local runs and tests.
    pub fn memory(bucket_name: &str) -> Self {
        Configuration {
            store: RepositoryStore::Memory,
            table_name: "books".to_string(),
            dynamodb_endpoint: None,
            object_store: ObjectStoreVia::Memory,
            bucket_name: bucket_name.to_string(),
            region: DEFAULT_REGION.to_string(),
            s3_endpoint: None,
            public_base_url: format!("https://{}.s3.{}.amazonaws.com", bucket_name, DEFAULT_REGION),
            key_prefix: "books".to_string(),
            upload_dir: std::env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            listen_addr: None,
            log_level: Level::INFO,
        }
    }

    pub fn from_env() -> LibraryResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> LibraryResult<Self>
        where F: Fn(&str) -> Option<String> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let store = match var("BOOKS_STORE") {
            Some(name) => RepositoryStore::parse(name.as_str())?,
            None => RepositoryStore::DynamoDB,
        };
        let object_store = match var("OBJECT_STORE") {
            Some(name) => ObjectStoreVia::parse(name.as_str())?,
            None => ObjectStoreVia::S3,
        };
        let bucket_name = match (var("AWS_S3_BUCKET_NAME"), object_store) {
            (Some(bucket), _) => bucket,
            (None, ObjectStoreVia::Memory) => DEFAULT_LOCAL_BUCKET.to_string(),
            (None, ObjectStoreVia::S3) => {
                return Err(LibraryError::validation("AWS_S3_BUCKET_NAME must be set", Some("config".to_string())));
            }
        };
        let region = var("AWS_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string());
        let public_base_url = var("AWS_S3_PUBLIC_URL")
            .unwrap_or_else(|| format!("https://{}.s3.{}.amazonaws.com", bucket_name, region))
            .trim_end_matches('/')
            .to_string();
        let dynamodb_endpoint = match store {
            RepositoryStore::LocalDynamoDB => Some(var("DYNAMODB_ENDPOINT")
                .unwrap_or_else(|| "http://localhost:8000".to_string())),
            _ => var("DYNAMODB_ENDPOINT"),
        };
        let key_prefix = var("IMAGE_KEY_PREFIX")
            .map(|p| p.trim_matches('/').to_string())
            .unwrap_or_else(|| "books".to_string());
        if key_prefix.is_empty() {
            return Err(LibraryError::validation("IMAGE_KEY_PREFIX must not be blank", Some("config".to_string())));
        }
        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(v) => v.parse::<usize>().map_err(|err| LibraryError::validation(
                format!("MAX_UPLOAD_BYTES {} is not a number: {}", v, err).as_str(), Some("config".to_string())))?,
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        let log_level = match var("LOG_LEVEL") {
            Some(v) => Level::from_str(v.as_str()).map_err(|err| LibraryError::validation(
                format!("LOG_LEVEL {} is not a level: {}", v, err).as_str(), Some("config".to_string())))?,
            None => Level::INFO,
        };

        Ok(Configuration {
            store,
            table_name: var("BOOKS_TABLE").unwrap_or_else(|| "books".to_string()),
            dynamodb_endpoint,
            object_store,
            bucket_name,
            region,
            s3_endpoint: var("AWS_S3_ENDPOINT"),
            public_base_url,
            key_prefix,
            upload_dir: var("UPLOAD_DIR").map(PathBuf::from).unwrap_or_else(std::env::temp_dir),
            max_upload_bytes,
            listen_addr: var("LISTEN_ADDR"),
            log_level,
        })
    }
}
