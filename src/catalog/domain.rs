pub mod service;

use std::collections::HashMap;
use std::fmt;
use std::fmt::{Display, Formatter};
use async_trait::async_trait;
use serde::Serialize;
use crate::books::domain::model::{BookFields, BookPatch};
use crate::books::dto::{BookDto, BookImageDto};
use crate::core::library::LibraryError;
use crate::storage::upload::StagedUpload;

/// Failures that end a catalog flow. Every variant past `Validation` carries the lower-level
/// cause so the response and the logs can report it.
#[derive(Debug)]
pub(crate) enum CatalogError {
    BookNotFound {
        book_id: String,
    },
    Validation {
        message: String,
    },
    RecordLookupFailed {
        cause: LibraryError,
    },
    ImageUploadFailed {
        cause: LibraryError,
    },
    // the stored cover under `orphaned_key` is no longer referenced by any record
    RecordCreateFailed {
        cause: LibraryError,
        orphaned_key: String,
    },
    RecordUpdateFailed {
        cause: LibraryError,
        orphaned_key: Option<String>,
    },
    RecordDeleteFailed {
        cause: LibraryError,
    },
}

impl CatalogError {
    pub fn book_not_found(book_id: &str) -> Self {
        CatalogError::BookNotFound { book_id: book_id.to_string() }
    }

    pub fn validation(message: &str) -> Self {
        CatalogError::Validation { message: message.to_string() }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::BookNotFound { .. } => "BookNotFound",
            CatalogError::Validation { .. } => "Validation",
            CatalogError::RecordLookupFailed { .. } => "RecordLookupFailed",
            CatalogError::ImageUploadFailed { .. } => "ImageUploadFailed",
            CatalogError::RecordCreateFailed { .. } => "RecordCreateFailed",
            CatalogError::RecordUpdateFailed { .. } => "RecordUpdateFailed",
            CatalogError::RecordDeleteFailed { .. } => "RecordDeleteFailed",
        }
    }

    pub fn cause(&self) -> Option<&LibraryError> {
        match self {
            CatalogError::BookNotFound { .. } | CatalogError::Validation { .. } => None,
            CatalogError::RecordLookupFailed { cause } => Some(cause),
            CatalogError::ImageUploadFailed { cause } => Some(cause),
            CatalogError::RecordCreateFailed { cause, .. } => Some(cause),
            CatalogError::RecordUpdateFailed { cause, .. } => Some(cause),
            CatalogError::RecordDeleteFailed { cause } => Some(cause),
        }
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::BookNotFound { book_id } => {
                write!(f, "Book with id {} doesn't exist", book_id)
            }
            CatalogError::Validation { message } => {
                write!(f, "{}", message)
            }
            CatalogError::RecordLookupFailed { .. } => {
                write!(f, "Failed to load book")
            }
            CatalogError::ImageUploadFailed { .. } => {
                write!(f, "Failed to upload image")
            }
            CatalogError::RecordCreateFailed { .. } => {
                write!(f, "Failed to create book")
            }
            CatalogError::RecordUpdateFailed { .. } => {
                write!(f, "Failed to update book")
            }
            CatalogError::RecordDeleteFailed { .. } => {
                write!(f, "Failed to delete book")
            }
        }
    }
}

pub(crate) type CatalogResult<T> = Result<T, CatalogError>;

/// Non-fatal outcome of a flow: the record change committed but an object could not be removed
/// from the bucket and is now an orphan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub(crate) enum CatalogWarning {
    StaleImageCleanupFailed {
        image: String,
        key: Option<String>,
        message: String,
    },
    ImageCleanupFailed {
        image: String,
        key: Option<String>,
        message: String,
    },
}

impl CatalogWarning {
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogWarning::StaleImageCleanupFailed { .. } => "StaleImageCleanupFailed",
            CatalogWarning::ImageCleanupFailed { .. } => "ImageCleanupFailed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct FlowOutcome<T> {
    pub value: T,
    pub warning: Option<CatalogWarning>,
}

impl<T> FlowOutcome<T> {
    pub fn succeeded(value: T) -> Self {
        Self { value, warning: None }
    }

    pub fn with_warning(value: T, warning: Option<CatalogWarning>) -> Self {
        Self { value, warning }
    }
}

#[async_trait]
pub(crate) trait CatalogService: Sync + Send {
    async fn add_book(&self, fields: BookFields, upload: StagedUpload) -> CatalogResult<FlowOutcome<BookDto>>;
    async fn update_book_image(&self, id: &str, upload: StagedUpload) -> CatalogResult<FlowOutcome<BookImageDto>>;
    async fn remove_book(&self, id: &str) -> CatalogResult<FlowOutcome<()>>;
    async fn update_book(&self, id: &str, patch: BookPatch) -> CatalogResult<BookDto>;
    async fn find_book_by_id(&self, id: &str) -> CatalogResult<BookDto>;
    async fn find_books(&self, predicate: &HashMap<String, String>) -> CatalogResult<Vec<BookDto>>;
}
