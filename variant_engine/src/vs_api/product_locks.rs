use std::{collections::HashMap, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Serializes work on the same product.
///
/// Saves, syncs, clears and price propagations for one product must not interleave. Work on different products runs
/// in parallel. Clones share the same locks.
#[derive(Debug, Clone, Default)]
pub struct ProductLocks {
    locks: Arc<std::sync::Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl ProductLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no one else holds the lock for `product_id`. The lock is released when the guard is dropped.
    pub async fn lock(&self, product_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks.entry(product_id).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// The number of products that have been locked at some point.
    pub fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
