use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use async_trait::async_trait;
use crate::books::domain::model::{BookEntity, BookFields, BookPatch};
use crate::books::repository::BookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::library::{LibraryError, LibraryResult, PaginatedResult};
use crate::core::repository::Repository;
use crate::storage::memory::MemoryObjectStore;
use crate::storage::objects::ObjectStore;

// Journal records remote calls across the repository and the object store in the order they were made.
#[derive(Debug, Clone, Default)]
pub(crate) struct Journal {
    calls: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    pub fn position(&self, prefix: &str) -> Option<usize> {
        self.calls().iter().position(|c| c.starts_with(prefix))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Fault {
    // the call returns an error
    Fail,
    // the call succeeds but finds nothing
    Vanish,
}

#[derive(Debug, Default)]
struct Faults {
    faults: Mutex<HashMap<&'static str, Fault>>,
}

impl Faults {
    fn inject(&self, op: &'static str, fault: Fault) {
        if let Ok(mut faults) = self.faults.lock() {
            faults.insert(op, fault);
        }
    }

    fn get(&self, op: &str) -> Option<Fault> {
        self.faults.lock().ok().and_then(|faults| faults.get(op).copied())
    }
}

pub(crate) struct RecordingBookRepository {
    inner: MemoryBookRepository,
    journal: Journal,
    faults: Faults,
}

impl RecordingBookRepository {
    pub fn new(journal: &Journal) -> Self {
        Self { inner: MemoryBookRepository::new(), journal: journal.clone(), faults: Faults::default() }
    }

    pub fn inject(&self, op: &'static str, fault: Fault) {
        self.faults.inject(op, fault);
    }

    // seeds a record without touching the journal
    pub async fn seed(&self, fields: &BookFields, image: &str) -> BookEntity {
        self.inner.create(fields, image).await.expect("should seed book")
    }

    pub async fn peek(&self, id: &str) -> Option<BookEntity> {
        self.inner.get(id).await.expect("should read book")
    }

    fn check(&self, op: &'static str) -> LibraryResult<Option<Fault>> {
        match self.faults.get(op) {
            Some(Fault::Fail) => Err(LibraryError::database(format!("injected {} failure", op).as_str(), None, false)),
            other => Ok(other),
        }
    }
}

#[async_trait]
impl Repository<BookEntity, BookPatch> for RecordingBookRepository {
    async fn get(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        self.journal.record(format!("repo.get:{}", id));
        if self.check("get")? == Some(Fault::Vanish) {
            return Ok(None);
        }
        self.inner.get(id).await
    }

    async fn update(&self, id: &str, patch: &BookPatch) -> LibraryResult<Option<BookEntity>> {
        self.journal.record(format!("repo.update:{}", id));
        if self.check("update")? == Some(Fault::Vanish) {
            return Ok(None);
        }
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: &str) -> LibraryResult<Option<BookEntity>> {
        self.journal.record(format!("repo.delete:{}", id));
        if self.check("delete")? == Some(Fault::Vanish) {
            return Ok(None);
        }
        self.inner.delete(id).await
    }

    async fn query(&self, predicate: &HashMap<String, String>,
                   page: Option<&str>, page_size: usize) -> LibraryResult<PaginatedResult<BookEntity>> {
        self.journal.record("repo.query".to_string());
        self.check("query")?;
        self.inner.query(predicate, page, page_size).await
    }
}

#[async_trait]
impl BookRepository for RecordingBookRepository {
    async fn create(&self, fields: &BookFields, image: &str) -> LibraryResult<BookEntity> {
        self.journal.record(format!("repo.create:{}", image));
        self.check("create")?;
        self.inner.create(fields, image).await
    }
}

pub(crate) struct RecordingObjectStore {
    inner: MemoryObjectStore,
    journal: Journal,
    failing: Mutex<HashSet<&'static str>>,
}

impl RecordingObjectStore {
    pub fn new(journal: &Journal, base_url: &str) -> Self {
        Self { inner: MemoryObjectStore::new(base_url), journal: journal.clone(), failing: Mutex::new(HashSet::new()) }
    }

    pub fn fail(&self, op: &'static str) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(op);
        }
    }

    pub async fn seed(&self, key: &str) {
        self.inner.put(key, b"seed".to_vec(), "image/png").await.expect("should seed object");
    }

    pub async fn keys(&self) -> Vec<String> {
        self.inner.keys().await
    }

    fn fails(&self, op: &str) -> bool {
        self.failing.lock().map(|failing| failing.contains(op)).unwrap_or(false)
    }
}

#[async_trait]
impl ObjectStore for RecordingObjectStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> LibraryResult<String> {
        self.journal.record(format!("store.put:{}", key));
        if self.fails("put") {
            return Err(LibraryError::storage_write("injected put failure", Some("AccessDenied".to_string()), false));
        }
        self.inner.put(key, bytes, content_type).await
    }

    async fn delete(&self, key: &str) -> LibraryResult<()> {
        self.journal.record(format!("store.delete:{}", key));
        if self.fails("delete") {
            return Err(LibraryError::storage_delete("injected delete failure", Some("AccessDenied".to_string()), false));
        }
        self.inner.delete(key).await
    }

    fn public_url(&self, key: &str) -> String {
        self.inner.public_url(key)
    }
}
