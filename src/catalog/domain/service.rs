use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, warn};
use crate::books::domain::Book;
use crate::books::domain::model::{BookEntity, BookFields, BookPatch};
use crate::books::dto::{BookDto, BookImageDto};
use crate::books::repository::{BookRepository, QUERYABLE_ATTRIBUTES};
use crate::catalog::domain::{CatalogError, CatalogResult, CatalogService, CatalogWarning, FlowOutcome};
use crate::core::domain::Configuration;
use crate::core::library::{LibraryError, LibraryResult};
use crate::storage::key::{derive_key, parse_key};
use crate::storage::objects::ObjectStore;
use crate::storage::upload::StagedUpload;
use crate::utils::lock::KeyedMutex;

const FIND_PAGE_SIZE: usize = 100;

/// Coordinates book records with their cover objects.
///
/// Every flow runs its remote calls one after another so that a record never references an
/// object that is not in the bucket. An object nobody references any more is tolerated and
/// reported through a warning or the error's `orphaned_key`.
pub(crate) struct CatalogServiceImpl {
    book_repository: Arc<dyn BookRepository>,
    object_store: Arc<dyn ObjectStore>,
    key_prefix: String,
    public_base_url: String,
    locks: KeyedMutex,
}

impl CatalogServiceImpl {
    pub(crate) fn new(config: &Configuration, book_repository: Arc<dyn BookRepository>,
                      object_store: Arc<dyn ObjectStore>) -> Self {
        Self {
            book_repository,
            object_store,
            key_prefix: config.key_prefix.to_string(),
            public_base_url: config.public_base_url.to_string(),
            locks: KeyedMutex::new(),
        }
    }

    async fn lookup(&self, id: &str) -> CatalogResult<BookEntity> {
        match self.book_repository.get(id).await {
            Ok(Some(book)) => Ok(book),
            Ok(None) | Err(LibraryError::NotFound { .. }) => {
                info!(book_id = id, "book not found");
                Err(CatalogError::book_not_found(id))
            }
            Err(cause) => {
                error!(book_id = id, error = %cause, "failed to load book");
                Err(CatalogError::RecordLookupFailed { cause })
            }
        }
    }

    // pushes the staged file to the bucket and returns its public url
    async fn upload(&self, key: &str, upload: &StagedUpload) -> CatalogResult<String> {
        let stored = match upload.read().await {
            Ok(bytes) => self.object_store.put(key, bytes, upload.content_type()).await,
            Err(err) => Err(err),
        };
        match stored {
            Ok(url) => {
                info!(key, url = url.as_str(), "uploaded image");
                Ok(url)
            }
            Err(cause) => {
                error!(key, error = %cause, "failed to upload image");
                Err(CatalogError::ImageUploadFailed { cause })
            }
        }
    }

    fn new_key(&self, upload: &StagedUpload) -> String {
        derive_key(self.key_prefix.as_str(), Utc::now().timestamp_millis(), upload.original_name())
    }

    fn key_of(&self, image: &str) -> LibraryResult<String> {
        parse_key(image, self.public_base_url.as_str(), self.key_prefix.as_str())
    }

    // removes an object no record references any more; returns the failure instead of raising it
    async fn discard(&self, image: &str, key: LibraryResult<String>) -> Option<(Option<String>, String)> {
        let key = match key {
            Ok(key) => key,
            Err(err) => {
                warn!(image, error = %err, "cannot derive storage key of image");
                return Some((None, err.to_string()));
            }
        };
        match self.object_store.delete(key.as_str()).await {
            Ok(_) => {
                info!(key = key.as_str(), "deleted image");
                None
            }
            Err(err) => {
                warn!(key = key.as_str(), error = %err, "failed to delete image, object is orphaned");
                Some((Some(key), err.to_string()))
            }
        }
    }
}

fn report(id: &str, warning: Option<&CatalogWarning>) {
    if let Some(warning) = warning {
        warn!(book_id = id, kind = warning.kind(), "book changed but an image was left behind in the bucket");
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, fields: BookFields, upload: StagedUpload) -> CatalogResult<FlowOutcome<BookDto>> {
        if fields.title.trim().is_empty() {
            return Err(CatalogError::validation("Book title is required"));
        }
        let key = self.new_key(&upload);
        let url = self.upload(key.as_str(), &upload).await?;
        drop(upload);

        match self.book_repository.create(&fields, url.as_str()).await {
            Ok(book) => {
                info!(book_id = book.book_id.as_str(), image = url.as_str(), "added book");
                Ok(FlowOutcome::succeeded(BookDto::from(&book)))
            }
            Err(cause) => {
                error!(key = key.as_str(), error = %cause, "failed to create book, uploaded image is orphaned");
                Err(CatalogError::RecordCreateFailed { cause, orphaned_key: key })
            }
        }
    }

    async fn update_book_image(&self, id: &str, upload: StagedUpload) -> CatalogResult<FlowOutcome<BookImageDto>> {
        let _guard = self.locks.lock(id).await;
        let book = self.lookup(id).await?;
        let old_image = book.cover_url().map(str::to_string);

        let key = self.new_key(&upload);
        let new_url = self.upload(key.as_str(), &upload).await?;
        drop(upload);

        match self.book_repository.update(id, &BookPatch::image(new_url.as_str())).await {
            Ok(Some(_)) => {
                info!(book_id = id, image = new_url.as_str(), "replaced book image");
            }
            Ok(None) => {
                error!(book_id = id, key = key.as_str(), "book vanished before its image was replaced, uploaded image is orphaned");
                return Err(CatalogError::RecordUpdateFailed {
                    cause: LibraryError::not_found(format!("book {} not found", id).as_str()),
                    orphaned_key: Some(key),
                });
            }
            Err(cause) => {
                error!(book_id = id, key = key.as_str(), error = %cause, "failed to update book, uploaded image is orphaned");
                return Err(CatalogError::RecordUpdateFailed { cause, orphaned_key: Some(key) });
            }
        }

        let value = BookImageDto::new(id, new_url.as_str());
        let old_image = match old_image {
            Some(old_image) => old_image,
            None => return Ok(FlowOutcome::succeeded(value)),
        };
        let old_key = self.key_of(old_image.as_str());
        if old_key.as_deref().ok() == Some(key.as_str()) {
            return Ok(FlowOutcome::succeeded(value));
        }
        let failure = self.discard(old_image.as_str(), old_key).await;
        let warning = failure
            .map(|(key, message)| CatalogWarning::StaleImageCleanupFailed { image: old_image, key, message });
        report(id, warning.as_ref());
        Ok(FlowOutcome::with_warning(value, warning))
    }

    async fn remove_book(&self, id: &str) -> CatalogResult<FlowOutcome<()>> {
        let _guard = self.locks.lock(id).await;
        let book = self.lookup(id).await?;
        let image = book.cover_url().map(|url| (url.to_string(), self.key_of(url)));

        match self.book_repository.delete(id).await {
            Ok(Some(_)) => {
                info!(book_id = id, "removed book");
            }
            Ok(None) => {
                info!(book_id = id, "book vanished before it was removed");
                return Err(CatalogError::book_not_found(id));
            }
            Err(cause) => {
                error!(book_id = id, error = %cause, "failed to delete book");
                return Err(CatalogError::RecordDeleteFailed { cause });
            }
        }

        let warning = match image {
            Some((image, key)) => {
                let failure = self.discard(image.as_str(), key).await;
                failure.map(|(key, message)| CatalogWarning::ImageCleanupFailed { image, key, message })
            }
            None => None,
        };
        report(id, warning.as_ref());
        Ok(FlowOutcome::with_warning((), warning))
    }

    async fn update_book(&self, id: &str, patch: BookPatch) -> CatalogResult<BookDto> {
        let patch = patch.without_image();
        let _guard = self.locks.lock(id).await;
        match self.book_repository.update(id, &patch).await {
            Ok(Some(book)) => {
                info!(book_id = id, version = book.version, "updated book");
                Ok(BookDto::from(&book))
            }
            Ok(None) | Err(LibraryError::NotFound { .. }) => Err(CatalogError::book_not_found(id)),
            Err(cause) => {
                error!(book_id = id, error = %cause, "failed to update book");
                Err(CatalogError::RecordUpdateFailed { cause, orphaned_key: None })
            }
        }
    }

    async fn find_book_by_id(&self, id: &str) -> CatalogResult<BookDto> {
        self.lookup(id).await.map(|book| BookDto::from(&book))
    }

    async fn find_books(&self, predicate: &HashMap<String, String>) -> CatalogResult<Vec<BookDto>> {
        if let Some(attr) = predicate.keys().find(|k| !QUERYABLE_ATTRIBUTES.contains(&k.as_str())) {
            return Err(CatalogError::validation(format!("Cannot filter books by {}", attr).as_str()));
        }
        let mut books = vec![];
        let mut next_page: Option<String> = None;
        loop {
            let res = if predicate.is_empty() {
                self.book_repository.find_all(next_page.as_deref(), FIND_PAGE_SIZE).await
            } else {
                self.book_repository.query(predicate, next_page.as_deref(), FIND_PAGE_SIZE).await
            };
            let res = res
                .map_err(|cause| {
                    error!(error = %cause, "failed to query books");
                    CatalogError::RecordLookupFailed { cause }
                })?;
            books.extend(res.records.iter().map(BookDto::from));
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        Ok(books)
    }
}
