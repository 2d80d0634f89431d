use async_trait::async_trait;
use crate::catalog::domain::CatalogError;
use crate::core::library::LibraryError;

#[derive(Debug)]
pub enum CommandError {
    NotFound {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Database {
        message: String,
        reason_code: Option<String>,
        cause: String,
        // object left in the bucket by a failed record write
        orphaned_key: Option<String>,
    },
    Storage {
        message: String,
        reason_code: Option<String>,
        cause: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Serialization { message }
            }
            LibraryError::StorageWrite { .. } | LibraryError::StorageDelete { .. } => {
                CommandError::Storage { message: "Object storage failure".to_string(), reason_code: None, cause: other.to_string() }
            }
            LibraryError::Database { .. } | LibraryError::DuplicateKey { .. } | LibraryError::CurrentlyUnavailable { .. } => {
                CommandError::Database { message: "Database failure".to_string(), reason_code: None, cause: other.to_string(), orphaned_key: None }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Runtime { message, reason_code }
            }
        }
    }
}

impl From<CatalogError> for CommandError {
    fn from(other: CatalogError) -> Self {
        let message = other.to_string();
        let reason_code = Some(other.kind().to_string());
        let cause = other.cause().map(|c| c.to_string()).unwrap_or_default();
        match other {
            CatalogError::BookNotFound { .. } => {
                CommandError::NotFound { message }
            }
            CatalogError::Validation { .. } => {
                CommandError::Validation { message, reason_code }
            }
            CatalogError::ImageUploadFailed { .. } => {
                CommandError::Storage { message, reason_code, cause }
            }
            CatalogError::RecordCreateFailed { orphaned_key, .. } => {
                CommandError::Database { message, reason_code, cause, orphaned_key: Some(orphaned_key) }
            }
            CatalogError::RecordUpdateFailed { orphaned_key, .. } => {
                CommandError::Database { message, reason_code, cause, orphaned_key }
            }
            CatalogError::RecordLookupFailed { .. } |
            CatalogError::RecordDeleteFailed { .. } => {
                CommandError::Database { message, reason_code, cause, orphaned_key: None }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::catalog::domain::CatalogError;
    use crate::core::command::CommandError;
    use crate::core::library::LibraryError;

    #[tokio::test]
    async fn test_should_map_catalog_errors() {
        let err = CommandError::from(CatalogError::book_not_found("x"));
        assert!(matches!(err, CommandError::NotFound { ref message } if message == "Book with id x doesn't exist"));

        let err = CommandError::from(CatalogError::ImageUploadFailed { cause: LibraryError::storage_write("denied", None, false) });
        assert!(matches!(err, CommandError::Storage { ref reason_code, .. } if reason_code.as_deref() == Some("ImageUploadFailed")));

        let err = CommandError::from(CatalogError::RecordUpdateFailed {
            cause: LibraryError::database("boom", None, false), orphaned_key: Some("books/1_a.png".to_string()) });
        match err {
            CommandError::Database { message, reason_code, cause, orphaned_key } => {
                assert_eq!("Failed to update book", message);
                assert_eq!(Some("RecordUpdateFailed".to_string()), reason_code);
                assert!(cause.contains("boom"));
                assert_eq!(Some("books/1_a.png".to_string()), orphaned_key);
            }
            other => panic!("unexpected {:?}", other),
        }

        let err = CommandError::from(CatalogError::RecordCreateFailed {
            cause: LibraryError::database("boom", None, false), orphaned_key: "books/2_b.png".to_string() });
        assert!(matches!(err, CommandError::Database { ref orphaned_key, .. } if orphaned_key.as_deref() == Some("books/2_b.png")));

        let err = CommandError::from(CatalogError::RecordDeleteFailed { cause: LibraryError::database("boom", None, false) });
        assert!(matches!(err, CommandError::Database { orphaned_key: None, .. }));
    }

    #[tokio::test]
    async fn test_should_map_library_errors() {
        assert!(matches!(CommandError::from(LibraryError::not_found("x")), CommandError::NotFound { .. }));
        assert!(matches!(CommandError::from(LibraryError::validation("x", None)), CommandError::Validation { .. }));
        assert!(matches!(CommandError::from(LibraryError::runtime("x", None)), CommandError::Runtime { .. }));
        assert!(matches!(CommandError::from(LibraryError::storage_delete("x", None, false)), CommandError::Storage { .. }));
        assert!(matches!(CommandError::from(LibraryError::duplicate_key("x")), CommandError::Database { .. }));
    }
}
