//! # Tracker of tasks that have not returned yet.
//!
//! The run inserts a [`TaskContext`] right before its chain is spawned and
//! removes it once the chain returned (successfully or not). Snapshots back
//! [`AppHandle::running`](crate::AppHandle::running), e.g. to report which tasks
//! are holding up a shutdown.
//!
//! ## Rules
//! - Read operations are **eventually consistent** with the runners.
//! - Snapshots are sorted by registration id.

use std::collections::HashSet;

use tokio::sync::RwLock;

use crate::tasks::TaskContext;

/// Thread-safe set of running tasks.
pub(crate) struct AliveTracker {
    state: RwLock<HashSet<TaskContext>>,
}

impl AliveTracker {
    /// Creates a new empty tracker.
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(HashSet::new()),
        }
    }

    /// Marks `tc` as running.
    pub(crate) async fn insert(&self, tc: &TaskContext) {
        self.state.write().await.insert(tc.clone());
    }

    /// Marks `tc` as returned.
    pub(crate) async fn remove(&self, tc: &TaskContext) {
        self.state.write().await.remove(tc);
    }

    /// Returns running tasks ordered by registration id.
    pub(crate) async fn snapshot(&self) -> Vec<TaskContext> {
        let state = self.state.read().await;
        let mut alive: Vec<TaskContext> = state.iter().cloned().collect();
        alive.sort_unstable_by_key(TaskContext::id);
        alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn snapshot_tracks_insert_and_remove() {
        let tracker = AliveTracker::new();
        let a = TaskContext::new("a");
        let b = TaskContext::new("b");

        tracker.insert(&b).await;
        tracker.insert(&a).await;
        assert_eq!(tracker.snapshot().await, vec![a.clone(), b.clone()]);

        tracker.remove(&a).await;
        assert_eq!(tracker.snapshot().await, vec![b]);
    }
}
