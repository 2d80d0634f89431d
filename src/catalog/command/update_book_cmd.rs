use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::domain::model::BookPatch;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct UpdateBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl UpdateBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct UpdateBookCommandRequest {
    pub(crate) book_id: String,
    pub(crate) patch: BookPatch,
}

impl UpdateBookCommandRequest {
    pub fn new(book_id: &str, patch: BookPatch) -> Self {
        Self {
            book_id: book_id.to_string(),
            patch,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookCommandResponse {
    pub success: bool,
    pub data: BookDto,
}

impl UpdateBookCommandResponse {
    pub fn new(data: BookDto) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

#[async_trait]
impl Command<UpdateBookCommandRequest, UpdateBookCommandResponse> for UpdateBookCommand {
    async fn execute(&self, req: UpdateBookCommandRequest) -> Result<UpdateBookCommandResponse, CommandError> {
        self.catalog_service.update_book(req.book_id.as_str(), req.patch)
            .await.map_err(CommandError::from).map(UpdateBookCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::books::domain::model::{BookFields, BookPatch};
    use crate::catalog::command::update_book_cmd::{UpdateBookCommand, UpdateBookCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::storage::upload::StagedUpload;

    #[tokio::test]
    async fn test_should_run_update_book() {
        let svc = factory::create_catalog_service(&Configuration::memory("test")).await;
        let upload = StagedUpload::stage(&std::env::temp_dir(), "cover.png", "image/png", b"png").await.expect("should stage");
        let added = svc.add_book(BookFields::new("test book", "author"), upload).await.expect("should add book").value;

        let cmd = UpdateBookCommand::new(svc);
        let patch = BookPatch { available: Some(true), image: Some("https://elsewhere/x.png".to_string()), ..Default::default() };
        let res = cmd.execute(UpdateBookCommandRequest::new(added.book_id.as_str(), patch)).await.expect("should update book");
        assert!(res.data.available);
        assert_eq!(added.image, res.data.image);

        let err = cmd.execute(UpdateBookCommandRequest::new("missing", BookPatch::default())).await.expect_err("should fail");
        assert!(matches!(err, CommandError::NotFound { .. }));
    }
}
