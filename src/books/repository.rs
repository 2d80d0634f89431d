pub mod ddb_book_repository;
pub mod memory_book_repository;

use std::collections::HashMap;
use async_trait::async_trait;
use crate::books::domain::model::{BookEntity, BookFields, BookPatch};
use crate::core::library::{LibraryResult, PaginatedResult};
use crate::core::repository::Repository;

#[async_trait]
pub(crate) trait BookRepository: Repository<BookEntity, BookPatch> {
    // create a book; the repository assigns its id
    async fn create(&self, fields: &BookFields, image: &str) -> LibraryResult<BookEntity>;

    async fn find_all(&self, page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        self.query(&HashMap::new(), page, page_size).await
    }
}

// attributes that may be used in a query predicate
pub(crate) const QUERYABLE_ATTRIBUTES: [&str; 4] = ["title", "author", "language", "category"];
