use std::sync::Arc;
use crate::books::factory::create_book_repository;
use crate::catalog::domain::CatalogService;
use crate::catalog::domain::service::CatalogServiceImpl;
use crate::core::domain::Configuration;
use crate::storage::factory::create_object_store;

pub(crate) async fn create_catalog_service(config: &Configuration) -> Arc<dyn CatalogService> {
    let book_repo = create_book_repository(config).await;
    let object_store = create_object_store(config).await;
    Arc::new(CatalogServiceImpl::new(config, book_repo, object_store))
}
