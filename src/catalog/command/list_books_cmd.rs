use std::collections::HashMap;
use std::sync::Arc;
use async_trait::async_trait;
use serde::Serialize;
use crate::books::dto::BookDto;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};

pub(crate) struct ListBooksCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl ListBooksCommand {
    pub(crate) fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

// equality filters taken from the query string
#[derive(Debug, Default)]
pub(crate) struct ListBooksCommandRequest {
    pub(crate) predicate: HashMap<String, String>,
}

impl ListBooksCommandRequest {
    pub fn new(predicate: HashMap<String, String>) -> Self {
        Self {
            predicate,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ListBooksCommandResponse {
    pub success: bool,
    #[serde(rename = "totalHits")]
    pub total_hits: usize,
    pub data: Vec<BookDto>,
}

impl ListBooksCommandResponse {
    pub fn new(data: Vec<BookDto>) -> Self {
        Self {
            success: true,
            total_hits: data.len(),
            data,
        }
    }
}

#[async_trait]
impl Command<ListBooksCommandRequest, ListBooksCommandResponse> for ListBooksCommand {
    async fn execute(&self, req: ListBooksCommandRequest) -> Result<ListBooksCommandResponse, CommandError> {
        self.catalog_service.find_books(&req.predicate)
            .await.map_err(CommandError::from).map(ListBooksCommandResponse::new)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use crate::books::domain::model::BookFields;
    use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
    use crate::catalog::factory;
    use crate::core::command::{Command, CommandError};
    use crate::core::domain::Configuration;
    use crate::storage::upload::StagedUpload;

    #[tokio::test]
    async fn test_should_run_list_books() {
        let svc = factory::create_catalog_service(&Configuration::memory("test")).await;
        for author in ["a", "b", "a"] {
            let upload = StagedUpload::stage(&std::env::temp_dir(), "cover.png", "image/png", b"png").await.expect("should stage");
            svc.add_book(BookFields::new("title", author), upload).await.expect("should add book");
        }
        let cmd = ListBooksCommand::new(svc);
        let res = cmd.execute(ListBooksCommandRequest::default()).await.expect("should list books");
        assert_eq!(3, res.total_hits);

        let res = cmd.execute(ListBooksCommandRequest::new(HashMap::from([("author".to_string(), "a".to_string())])))
            .await.expect("should list books");
        assert_eq!(2, res.total_hits);
        let json = serde_json::to_value(&res).expect("should serialize");
        assert_eq!(2, json["totalHits"]);

        let err = cmd.execute(ListBooksCommandRequest::new(HashMap::from([("isbn".to_string(), "1".to_string())])))
            .await.expect_err("should fail");
        assert!(matches!(err, CommandError::Validation { .. }));
    }
}
