use std::sync::Arc;
use tracing::info;
use crate::books::repository::BookRepository;
use crate::books::repository::ddb_book_repository::DDBBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;
use crate::utils::ddb::{build_db_client, create_table};

pub(crate) async fn create_book_repository(config: &Configuration) -> Arc<dyn BookRepository> {
    info!(store = ?config.store, table = config.table_name.as_str(), "creating book repository");
    match config.store {
        RepositoryStore::DynamoDB => {
            let client = build_db_client(config).await;
            Arc::new(DDBBookRepository::new(client, config.table_name.as_str()))
        }
        RepositoryStore::LocalDynamoDB => {
            let client = build_db_client(config).await;
            let _ = create_table(&client, config.table_name.as_str(), "book_id").await;
            Arc::new(DDBBookRepository::new(client, config.table_name.as_str()))
        }
        RepositoryStore::Memory => {
            Arc::new(MemoryBookRepository::new())
        }
    }
}
