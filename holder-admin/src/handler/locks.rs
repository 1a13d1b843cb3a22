use std::collections::HashMap;
use std::sync::Arc;

use rst_common::with_tokio::tokio::sync::{Mutex, OwnedMutexGuard};

/// `RecordLocks` hands out one exclusive section per exchange record id
///
/// The guard must be held for the whole read, check and engine call sequence. Idle
/// entries are pruned on the next acquisition
#[derive(Clone, Default)]
pub struct RecordLocks {
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl RecordLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, record_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);

            locks
                .entry(record_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };

        lock.lock_owned().await
    }

    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
