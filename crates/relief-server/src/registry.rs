//! Pending task registry
//!
//! The one piece of state shared between the dispatch path and the
//! reconciliation loop. Constructed at process start and passed explicitly
//! to both sides; a process restart forgets in-flight work (the durable
//! store is not rescanned on startup).

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use relief_core::{ProjectId, ReliefError, Result, TaskType};

/// Concurrency-safe mapping from task type to the set of in-flight ids.
///
/// Insertion happens only on the dispatch path, removal only in the
/// reconciler (plus the dispatcher's rollback of a failed enqueue).
/// Cloning is cheap and shares the underlying state. A poisoned lock
/// surfaces as an error, matching the store and queue backends.
#[derive(Clone, Default)]
pub struct PendingTaskRegistry {
    inner: Arc<Mutex<HashMap<TaskType, HashSet<ProjectId>>>>,
}

impl PendingTaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<TaskType, HashSet<ProjectId>>>> {
        self.inner
            .lock()
            .map_err(|e| ReliefError::Registry(e.to_string()))
    }

    /// Record `id` as in flight for `task_type`
    pub fn mark_pending(&self, task_type: TaskType, id: ProjectId) -> Result<()> {
        self.lock()?.entry(task_type).or_default().insert(id);
        Ok(())
    }

    /// Clear `id` for `task_type`; returns whether it was present
    pub fn clear_pending(&self, task_type: TaskType, id: &ProjectId) -> Result<bool> {
        Ok(self
            .lock()?
            .get_mut(&task_type)
            .is_some_and(|set| set.remove(id)))
    }

    /// Whether `id` is in flight for `task_type`
    pub fn is_pending(&self, task_type: TaskType, id: &ProjectId) -> Result<bool> {
        Ok(self
            .lock()?
            .get(&task_type)
            .is_some_and(|set| set.contains(id)))
    }

    /// Whether `id` is in flight for any task type
    pub fn is_pending_any(&self, id: &ProjectId) -> Result<bool> {
        Ok(self.lock()?.values().any(|set| set.contains(id)))
    }

    /// Number of in-flight ids for `task_type`
    pub fn pending_count(&self, task_type: TaskType) -> Result<usize> {
        Ok(self.lock()?.get(&task_type).map_or(0, |set| set.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_clear_is_pending() {
        let registry = PendingTaskRegistry::new();
        let id = ProjectId::new();

        assert!(!registry.is_pending(TaskType::ImageGeneration, &id).unwrap());

        registry.mark_pending(TaskType::ImageGeneration, id).unwrap();
        assert!(registry.is_pending(TaskType::ImageGeneration, &id).unwrap());
        assert!(!registry.is_pending(TaskType::PerspectiveMesh, &id).unwrap());

        assert!(registry.clear_pending(TaskType::ImageGeneration, &id).unwrap());
        assert!(!registry.is_pending(TaskType::ImageGeneration, &id).unwrap());
    }

    #[test]
    fn test_clear_absent_returns_false() {
        let registry = PendingTaskRegistry::new();
        let id = ProjectId::new();
        assert!(!registry.clear_pending(TaskType::ObjectMesh, &id).unwrap());

        // Clearing twice reports the second as absent.
        registry.mark_pending(TaskType::ObjectMesh, id).unwrap();
        assert!(registry.clear_pending(TaskType::ObjectMesh, &id).unwrap());
        assert!(!registry.clear_pending(TaskType::ObjectMesh, &id).unwrap());
    }

    #[test]
    fn test_is_pending_any_spans_task_types() {
        let registry = PendingTaskRegistry::new();
        let id = ProjectId::new();

        registry.mark_pending(TaskType::PerspectiveMesh, id).unwrap();
        assert!(registry.is_pending_any(&id).unwrap());
        registry.clear_pending(TaskType::PerspectiveMesh, &id).unwrap();
        assert!(!registry.is_pending_any(&id).unwrap());
    }

    #[test]
    fn test_clones_share_state() {
        let registry = PendingTaskRegistry::new();
        let observer = registry.clone();
        let id = ProjectId::new();

        registry.mark_pending(TaskType::ImageGeneration, id).unwrap();
        assert!(observer.is_pending(TaskType::ImageGeneration, &id).unwrap());
        observer.clear_pending(TaskType::ImageGeneration, &id).unwrap();
        assert!(!registry.is_pending(TaskType::ImageGeneration, &id).unwrap());
    }

    #[test]
    fn test_concurrent_marks_are_not_lost() {
        let registry = PendingTaskRegistry::new();
        let ids: Vec<ProjectId> = (0..100).map(|_| ProjectId::new()).collect();

        let handles: Vec<_> = ids
            .chunks(25)
            .map(|chunk| {
                let registry = registry.clone();
                let chunk = chunk.to_vec();
                std::thread::spawn(move || {
                    for id in chunk {
                        registry.mark_pending(TaskType::ImageGeneration, id).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(
            registry.pending_count(TaskType::ImageGeneration).unwrap(),
            100
        );
    }
}
