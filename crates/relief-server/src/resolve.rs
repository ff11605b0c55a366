//! Resource status resolution
//!
//! Answers "is artifact X ready?" by combining pending-registry state with
//! a store lookup. The pending check comes first: while work is in flight
//! no storage round-trip is made at all.

use std::sync::Arc;

use tracing::debug;

use relief_core::{image_key, mesh_key, ProjectId, Result, TaskType};
use relief_store::ArtifactStore;

use crate::registry::PendingTaskRegistry;

/// Readiness of a requested artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    /// Dispatched but no completion observed yet
    Pending,
    /// Artifact present in the store
    Available,
    /// No pending work and no stored artifact
    NotAvailable,
}

/// Result of resolving an artifact request
#[derive(Debug)]
pub struct ResolvedResource {
    pub id: ProjectId,
    pub status: ResourceStatus,
    /// Artifact bytes, only for `Available`
    pub data: Option<Vec<u8>>,
}

/// Combines registry state and store lookups into a tri-state answer.
pub struct ResourceStatusResolver {
    store: Arc<dyn ArtifactStore>,
    registry: PendingTaskRegistry,
}

impl ResourceStatusResolver {
    pub fn new(store: Arc<dyn ArtifactStore>, registry: PendingTaskRegistry) -> Self {
        Self { store, registry }
    }

    /// Resolve the generated or uploaded image for `id`.
    pub fn resolve_image(&self, id: ProjectId) -> Result<ResolvedResource> {
        self.resolve(id, TaskType::ImageGeneration, image_key(&id))
    }

    /// Resolve a mesh archive for `id` with the given variant flags.
    pub fn resolve_mesh(
        &self,
        id: ProjectId,
        perspective: bool,
        textured: bool,
    ) -> Result<ResolvedResource> {
        self.resolve(
            id,
            TaskType::for_mesh(perspective),
            mesh_key(&id, perspective, textured),
        )
    }

    fn resolve(&self, id: ProjectId, task_type: TaskType, key: String) -> Result<ResolvedResource> {
        if self.registry.is_pending(task_type, &id)? {
            debug!(project_id = %id, task_type = %task_type, "task still pending");
            return Ok(ResolvedResource {
                id,
                status: ResourceStatus::Pending,
                data: None,
            });
        }

        match self.store.get(&key)? {
            Some(bytes) => Ok(ResolvedResource {
                id,
                status: ResourceStatus::Available,
                data: Some(bytes),
            }),
            None => Ok(ResolvedResource {
                id,
                status: ResourceStatus::NotAvailable,
                data: None,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relief_store::MemoryStore;

    fn resolver() -> (Arc<MemoryStore>, PendingTaskRegistry, ResourceStatusResolver) {
        let store = Arc::new(MemoryStore::new());
        let registry = PendingTaskRegistry::new();
        let resolver =
            ResourceStatusResolver::new(store.clone() as Arc<dyn ArtifactStore>, registry.clone());
        (store, registry, resolver)
    }

    #[test]
    fn test_pending_wins_over_store() {
        let (store, registry, resolver) = resolver();
        let id = ProjectId::new();

        registry.mark_pending(TaskType::ImageGeneration, id).unwrap();
        // Even with an artifact present, pending short-circuits.
        store.put(&image_key(&id), b"png").unwrap();

        let resolved = resolver.resolve_image(id).unwrap();
        assert_eq!(resolved.status, ResourceStatus::Pending);
        assert!(resolved.data.is_none());
    }

    #[test]
    fn test_available_after_clear() {
        let (store, registry, resolver) = resolver();
        let id = ProjectId::new();

        registry.mark_pending(TaskType::ImageGeneration, id).unwrap();
        store.put(&image_key(&id), b"png").unwrap();
        registry.clear_pending(TaskType::ImageGeneration, &id).unwrap();

        let resolved = resolver.resolve_image(id).unwrap();
        assert_eq!(resolved.status, ResourceStatus::Available);
        assert_eq!(resolved.data.unwrap(), b"png");
    }

    #[test]
    fn test_not_available_when_absent() {
        let (_store, _registry, resolver) = resolver();
        let resolved = resolver.resolve_image(ProjectId::new()).unwrap();
        assert_eq!(resolved.status, ResourceStatus::NotAvailable);
        assert!(resolved.data.is_none());
    }

    #[test]
    fn test_mesh_variants_resolve_their_own_keys() {
        let (store, _registry, resolver) = resolver();
        let id = ProjectId::new();
        store.put(&mesh_key(&id, true, false), b"bare zip").unwrap();

        let textured = resolver.resolve_mesh(id, true, true).unwrap();
        assert_eq!(textured.status, ResourceStatus::NotAvailable);

        let bare = resolver.resolve_mesh(id, true, false).unwrap();
        assert_eq!(bare.status, ResourceStatus::Available);
        assert_eq!(bare.data.unwrap(), b"bare zip");
    }

    #[test]
    fn test_mesh_pending_checks_matching_task_type() {
        let (_store, registry, resolver) = resolver();
        let id = ProjectId::new();
        registry.mark_pending(TaskType::PerspectiveMesh, id).unwrap();

        assert_eq!(
            resolver.resolve_mesh(id, true, true).unwrap().status,
            ResourceStatus::Pending
        );
        // An object-mesh poll is unaffected by perspective-mesh work.
        assert_eq!(
            resolver.resolve_mesh(id, false, true).unwrap().status,
            ResourceStatus::NotAvailable
        );
    }
}
