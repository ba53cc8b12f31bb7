//! Per-department mutual exclusion for schedule regeneration.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::Department;

/// Registry of per-department async mutexes.
///
/// Regeneration deletes and reinserts a department's schedule; two
/// interleaved runs for the same department could otherwise each delete the
/// other's freshly inserted entries. The guard is an async mutex because it
/// is held across repository awaits.
#[derive(Default)]
pub struct DepartmentLocks {
    locks: RwLock<HashMap<String, Arc<Mutex<()>>>>,
}

impl DepartmentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for one department, creating it on first use.
    pub async fn acquire(&self, department: &Department) -> OwnedMutexGuard<()> {
        let lock = {
            let read = self.locks.read();
            read.get(department.as_str()).cloned()
        };

        let lock = match lock {
            Some(lock) => lock,
            None => {
                let mut write = self.locks.write();
                write
                    .entry(department.as_str().to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone()
            }
        };

        // The registry guard is dropped before this await.
        lock.lock_owned().await
    }

    /// Number of departments with a registered lock.
    pub fn len(&self) -> usize {
        self.locks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_department_is_exclusive() {
        let locks = Arc::new(DepartmentLocks::new());
        let dept = Department::new("computer science");

        let guard = locks.acquire(&dept).await;
        // A second acquire for the same department must not be ready while
        // the first guard is alive.
        let second = locks.acquire(&dept);
        tokio::pin!(second);
        let ready = tokio::time::timeout(std::time::Duration::from_millis(50), &mut second).await;
        assert!(ready.is_err());

        drop(guard);
        let _second = second.await;
    }

    #[tokio::test]
    async fn different_departments_do_not_block() {
        let locks = DepartmentLocks::new();
        let _a = locks.acquire(&Department::new("computer science")).await;
        let _b = locks.acquire(&Department::new("mass communication")).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn normalization_shares_the_lock() {
        let locks = DepartmentLocks::new();
        let _a = locks.acquire(&Department::new("Computer Science ")).await;
        // Same department after normalization: only one registry slot.
        let other = Department::new("computer science");
        let pending = locks.acquire(&other);
        tokio::pin!(pending);
        let ready = tokio::time::timeout(std::time::Duration::from_millis(50), &mut pending).await;
        assert!(ready.is_err());
        assert_eq!(locks.len(), 1);
    }
}
