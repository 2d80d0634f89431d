use std::sync::Arc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes work on a single key (a book id) without a global lock.
/// Entries are dropped again once no task holds or waits on them.
#[derive(Debug, Clone, Default)]
pub(crate) struct KeyedMutex {
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

pub(crate) struct KeyedGuard {
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<DashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedMutex {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, key: &str) -> KeyedGuard {
        let mutex = self
            .locks
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let guard = mutex.lock_owned().await;
        KeyedGuard {
            key: key.to_string(),
            guard: Some(guard),
            locks: self.locks.clone(),
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.locks.len()
    }
}

impl Drop for KeyedGuard {
    fn drop(&mut self) {
        // release first so the map holds the only remaining reference when idle
        self.guard.take();
        self.locks.remove_if(self.key.as_str(), |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use crate::utils::lock::KeyedMutex;

    #[tokio::test]
    async fn test_should_serialize_same_key() {
        let locks = KeyedMutex::new();
        let active = Arc::new(AtomicUsize::new(0));
        let max_active = Arc::new(AtomicUsize::new(0));
        let mut handles = vec![];
        for _ in 0..4 {
            let locks = locks.clone();
            let active = active.clone();
            let max_active = max_active.clone();
            handles.push(tokio::spawn(async move {
                let _guard = locks.lock("book-1").await;
                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                max_active.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                active.fetch_sub(1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.expect("task should finish");
        }
        assert_eq!(1, max_active.load(Ordering::SeqCst));
        assert_eq!(0, locks.len());
    }

    #[tokio::test]
    async fn test_should_not_block_other_keys() {
        let locks = KeyedMutex::new();
        let _first = locks.lock("book-1").await;
        let second = tokio::time::timeout(Duration::from_millis(100), locks.lock("book-2")).await;
        assert!(second.is_ok());
        assert_eq!(2, locks.len());
    }
}
