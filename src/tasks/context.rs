//! # Identity of a registered main task.
//!
//! [`TaskContext`] is returned by [`App::add_main_task`](crate::App::add_main_task)
//! and handed to error strategies and interceptors. Two contexts are equal iff
//! they come from the same registration; the name is carried along for display
//! only, so several tasks may share a name (including the empty one).

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide registration counter.
static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque, immutable handle of one registered task.
///
/// Cheap to clone; usable as a `HashMap`/`HashSet` key.
#[derive(Clone)]
pub struct TaskContext {
    id: u64,
    name: Arc<str>,
}

impl TaskContext {
    /// Allocates a fresh identity.
    pub(crate) fn new(name: &str) -> Self {
        Self {
            id: NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed),
            name: Arc::from(name),
        }
    }

    /// Unique registration id (process-wide, never reused).
    #[inline]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Name given at registration; advisory only.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_arc(&self) -> Arc<str> {
        Arc::clone(&self.name)
    }
}

impl PartialEq for TaskContext {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TaskContext {}

impl Hash for TaskContext {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskContext")
            .field("id", &self.id)
            .field("name", &&*self.name)
            .finish()
    }
}

impl fmt::Display for TaskContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name.is_empty() {
            write!(f, "#{}", self.id)
        } else {
            write!(f, "{}#{}", self.name, self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identity_ignores_name() {
        let a = TaskContext::new("");
        let b = TaskContext::new("");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());

        let set: HashSet<TaskContext> = [a.clone(), b.clone(), a.clone()].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_includes_id() {
        let named = TaskContext::new("http");
        assert_eq!(named.to_string(), format!("http#{}", named.id()));

        let anon = TaskContext::new("");
        assert_eq!(anon.to_string(), format!("#{}", anon.id()));
    }
}
