use std::sync::Arc;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use crate::catalog::domain::{CatalogService, CatalogWarning};
use crate::core::command::{Command, CommandError};

pub(crate) struct RemoveBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl RemoveBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RemoveBookCommandRequest {
    pub(crate) book_id: String,
}

impl RemoveBookCommandRequest {
    pub fn new(book_id: &str) -> Self {
        Self {
            book_id: book_id.to_string(),
        }
    }
}

// data is always null, the book is gone
#[derive(Debug, Serialize)]
pub(crate) struct RemoveBookCommandResponse {
    pub success: bool,
    pub data: Option<()>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<CatalogWarning>,
}

impl RemoveBookCommandResponse {
    pub fn new(warning: Option<CatalogWarning>) -> Self {
        Self {
            success: true,
            data: None,
            warning,
        }
    }
}

#[async_trait]
impl Command<RemoveBookCommandRequest, RemoveBookCommandResponse> for RemoveBookCommand {
    async fn execute(&self, req: RemoveBookCommandRequest) -> Result<RemoveBookCommandResponse, CommandError> {
        self.catalog_service.remove_book(req.book_id.as_str()).await
            .map_err(CommandError::from)
            .map(|outcome| RemoveBookCommandResponse::new(outcome.warning))
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::BookFields;
    use crate::catalog::command::remove_book_cmd::{RemoveBookCommand, RemoveBookCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::storage::upload::StagedUpload;

    #[tokio::test]
    async fn test_should_run_remove_book() {
        let svc = factory::create_catalog_service(&Configuration::memory("test")).await;
        let upload = StagedUpload::stage(&std::env::temp_dir(), "cover.png", "image/png", b"png").await.expect("should stage");
        let added = svc.add_book(BookFields::new("test book", "author"), upload).await.expect("should add book").value;

        let cmd = RemoveBookCommand::new(svc.clone());
        let res = cmd.execute(RemoveBookCommandRequest::new(added.book_id.as_str())).await.expect("should remove book");
        let json = serde_json::to_value(&res).expect("should serialize");
        assert_eq!(serde_json::json!({"success": true, "data": null}), json);
        assert!(svc.find_book_by_id(added.book_id.as_str()).await.is_err());

        let err = cmd.execute(RemoveBookCommandRequest::new(added.book_id.as_str())).await.expect_err("should fail");
        assert!(matches!(err, CommandError::NotFound { .. }));
    }
}
