use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookImageDto;
use crate::catalog::domain::{CatalogService, CatalogWarning};
use crate::core::command::{Command, CommandError};
use crate::storage::upload::StagedUpload;

pub(crate) struct UpdateBookImageCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl UpdateBookImageCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct UpdateBookImageCommandRequest {
    pub(crate) book_id: String,
    pub(crate) upload: StagedUpload,
}

impl UpdateBookImageCommandRequest {
    pub fn new(book_id: &str, upload: StagedUpload) -> Self {
        Self {
            book_id: book_id.to_string(),
            upload,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct UpdateBookImageCommandResponse {
    pub success: bool,
    pub data: BookImageDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<CatalogWarning>,
}

impl UpdateBookImageCommandResponse {
    pub fn new(data: BookImageDto, warning: Option<CatalogWarning>) -> Self {
        Self {
            success: true,
            data,
            warning,
        }
    }
}

#[async_trait]
impl Command<UpdateBookImageCommandRequest, UpdateBookImageCommandResponse> for UpdateBookImageCommand {
    async fn execute(&self, req: UpdateBookImageCommandRequest) -> Result<UpdateBookImageCommandResponse, CommandError> {
        self.catalog_service.update_book_image(req.book_id.as_str(), req.upload).await
            .map_err(CommandError::from)
            .map(|outcome| UpdateBookImageCommandResponse::new(outcome.value, outcome.warning))
    }
}
