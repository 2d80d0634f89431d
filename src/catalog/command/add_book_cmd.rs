use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::domain::model::BookFields;
use crate::books::dto::BookDto;
use crate::catalog::domain::{CatalogService, CatalogWarning};
use crate::core::command::{Command, CommandError};
use crate::storage::upload::StagedUpload;

pub(crate) struct AddBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl AddBookCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub(crate) struct AddBookCommandRequest {
    pub(crate) fields: BookFields,
    pub(crate) upload: StagedUpload,
}

impl AddBookCommandRequest {
    pub fn new(fields: BookFields, upload: StagedUpload) -> Self {
        Self {
            fields,
            upload,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AddBookCommandResponse {
    pub success: bool,
    pub data: BookDto,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<CatalogWarning>,
}

impl AddBookCommandResponse {
    pub fn new(data: BookDto, warning: Option<CatalogWarning>) -> Self {
        Self {
            success: true,
            data,
            warning,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        self.catalog_service.add_book(req.fields, req.upload).await
            .map_err(CommandError::from)
            .map(|outcome| AddBookCommandResponse::new(outcome.value, outcome.warning))
    }
}
