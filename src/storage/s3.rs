use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::delete_object::DeleteObjectError;
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use tracing::{debug, info};
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::storage::key::public_url;
use crate::storage::objects::ObjectStore;
use crate::utils::aws::{retryable_sdk_error, service_status};

#[derive(Debug)]
pub struct S3ObjectStore {
    client: Client,
    bucket_name: String,
    base_url: String,
}

impl S3ObjectStore {
    pub(crate) fn new(client: Client, bucket_name: &str, base_url: &str) -> Self {
        Self {
            client,
            bucket_name: bucket_name.to_string(),
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> LibraryResult<String> {
        let size = bytes.len();
        self.client
            .put_object()
            .bucket(self.bucket_name.as_str())
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(LibraryError::from)?;
        debug!(bucket = self.bucket_name.as_str(), key, size, "stored object");
        Ok(self.public_url(key))
    }

    async fn delete(&self, key: &str) -> LibraryResult<()> {
        match self.client
            .delete_object()
            .bucket(self.bucket_name.as_str())
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err) if service_status(&err) == Some(404) => {
                info!(bucket = self.bucket_name.as_str(), key, "object to delete was already gone");
                Ok(())
            }
            Err(err) => Err(LibraryError::from(err)),
        }
    }

    fn public_url(&self, key: &str) -> String {
        public_url(self.base_url.as_str(), key)
    }
}

// helper method to build s3-client, honouring a custom endpoint for MinIO or LocalStack
pub(crate) async fn build_s3_client(config: &Configuration) -> Client {
    let sdk_config = aws_config::from_env()
        .region(Region::new(config.region.to_string()))
        .load()
        .await;
    match config.s3_endpoint.as_deref() {
        Some(endpoint) => {
            let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                .endpoint_url(endpoint)
                .force_path_style(true)
                .build();
            Client::from_conf(s3_config)
        }
        None => Client::new(&sdk_config),
    }
}

impl From<SdkError<PutObjectError>> for LibraryError {
    fn from(err: SdkError<PutObjectError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::storage_write(format!("{:?}", err).as_str(), reason, retryable)
    }
}

impl From<SdkError<DeleteObjectError>> for LibraryError {
    fn from(err: SdkError<DeleteObjectError>) -> Self {
        let (retryable, reason) = retryable_sdk_error(&err);
        LibraryError::storage_delete(format!("{:?}", err).as_str(), reason, retryable)
    }
}
