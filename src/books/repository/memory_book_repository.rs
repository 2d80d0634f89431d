use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::books::domain::model::{BookEntity, BookFields, BookPatch};
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;

// MemoryBookRepository keeps books in process, ordered by id so paging is stable.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    books: RwLock<BTreeMap<String, BookEntity>>,
}

impl MemoryBookRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

fn matches(book: &BookEntity, predicate: &HashMap<String, String>) -> LibraryResult<bool> {
    for (k, v) in predicate {
        let actual = match k.as_str() {
            "title" => &book.title,
            "author" => &book.author,
            "language" => &book.language,
            "category" => &book.category,
            "image" => &book.image,
            other => {
                return Err(LibraryError::validation(
                    format!("cannot query books by {}", other).as_str(), None));
            }
        };
        if actual != v {
            return Ok(false);
        }
    }
    Ok(true)
}

#[async_trait]
impl Repository<BookEntity, BookPatch> for MemoryBookRepository {
    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        Ok(self.books.read().await.get(id).cloned())
    }

    async fn update(&self, id: &str, patch: &BookPatch) -> LibraryResult<Option<BookEntity>> {
        let mut books = self.books.write().await;
        Ok(books.get_mut(id).map(|book| {
            book.apply(patch);
            book.clone()
        }))
    }

    async fn delete(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        Ok(self.books.write().await.remove(id))
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        let books = self.books.read().await;
        let page_size = page_size.max(1);
        let mut records = vec![];
        let mut next_page = None;
        for (id, book) in books.iter() {
            if let Some(after) = page {
                if id.as_str() <= after {
                    continue;
                }
            }
            if !matches(book, predicate)? {
                continue;
            }
            if records.len() == page_size {
                next_page = records.last().map(|b: &BookEntity| b.book_id.to_string());
                break;
            }
            records.push(book.clone());
        }
        Ok(PaginatedResult::new(page, page_size, next_page, records))
    }
}

#[async_trait]
impl BookRepository for MemoryBookRepository {
    async fn create(&self, fields: &BookFields, image: &str) -> LibraryResult<BookEntity> {
        let book = BookEntity::new(fields, image);
        let mut books = self.books.write().await;
        if books.contains_key(&book.book_id) {
            return Err(LibraryError::duplicate_key(format!("book {} already exists", book.book_id).as_str()));
        }
        books.insert(book.book_id.to_string(), book.clone());
        Ok(book)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use crate::books::domain::model::{BookFields, BookPatch};
    use crate::books::repository::BookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::core::repository::Repository;

    #[tokio::test]
    async fn test_should_create_get_books() {
        let books_repo = MemoryBookRepository::new();
        let book = books_repo.create(&BookFields::new("test book", "author"), "").await.expect("should create book");
        let loaded = books_repo.get(book.book_id.as_str()).await.expect("should return book");
        assert_eq!(Some(book), loaded);
        assert_eq!(None, books_repo.get("missing").await.expect("should query"));
    }

    #[tokio::test]
    async fn test_should_update_books() {
        let books_repo = MemoryBookRepository::new();
        let book = books_repo.create(&BookFields::new("test book", "author"), "").await.expect("should create book");
        let updated = books_repo.update(book.book_id.as_str(), &BookPatch::image("https://bucket.example.com/books/1_a.png"))
            .await.expect("should update book").expect("should find book");
        assert_eq!("https://bucket.example.com/books/1_a.png", updated.image);
        assert_eq!(1, updated.version);
        assert_eq!(None, books_repo.update("missing", &BookPatch::default()).await.expect("should update"));
    }

    #[tokio::test]
    async fn test_should_delete_books() {
        let books_repo = MemoryBookRepository::new();
        let book = books_repo.create(&BookFields::new("test book", "author"), "").await.expect("should create book");
        let deleted = books_repo.delete(book.book_id.as_str()).await.expect("should delete book");
        assert_eq!(Some(book.clone()), deleted);
        assert_eq!(None, books_repo.delete(book.book_id.as_str()).await.expect("should delete book"));
    }

    #[tokio::test]
    async fn test_should_query_books() {
        let books_repo = MemoryBookRepository::new();
        for i in 0..25 {
            let mut fields = BookFields::new(format!("title_{}", i).as_str(), "author");
            fields.category = format!("category_{}", i % 5);
            books_repo.create(&fields, "").await.expect("should create book");
        }
        let res = books_repo.query(&HashMap::from([("category".to_string(), "category_0".to_string())]), None, 100)
            .await.expect("should query books");
        assert_eq!(5, res.records.len());

        let mut next_page = None;
        let mut total = 0;
        loop {
            let res = books_repo.find_all(next_page.as_deref(), 10).await.expect("should return books");
            total += res.records.len();
            next_page = res.next_page;
            if next_page.is_none() {
                break;
            }
        }
        assert_eq!(25, total);
        assert!(books_repo.query(&HashMap::from([("isbn".to_string(), "x".to_string())]), None, 10).await.is_err());
    }
}
