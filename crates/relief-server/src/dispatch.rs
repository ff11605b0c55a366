//! Task dispatch
//!
//! Validates preconditions, allocates identifiers, enqueues task messages
//! and marks them pending. The pending mark is made before the enqueue, so
//! a resolver racing the dispatch can only ever over-report `Pending`,
//! never observe "absent and not pending" for work actually in flight. A
//! failed enqueue rolls the mark back.

use std::sync::Arc;

use tracing::{debug, info};

use relief_core::{image_key, mesh_key, ImageTask, MeshTask, ProjectId, ReliefError, Result, TaskType};
use relief_store::{ArtifactStore, WorkQueue};

use crate::image_io::normalize_image;
use crate::registry::PendingTaskRegistry;

/// Longer-edge size uploaded images are normalized to
pub const UPLOAD_IMAGE_EDGE: u32 = 512;

/// Identifier allocation gives up after this many collisions.
///
/// Collisions are astronomically unlikely with a good random source, so
/// the bound only matters against corrupted or adversarial input.
const MAX_ALLOCATION_ATTEMPTS: u32 = 16;

/// Client-facing dispatch operations, one per task type.
pub struct TaskDispatcher {
    store: Arc<dyn ArtifactStore>,
    image_queue: Arc<dyn WorkQueue>,
    perspective_queue: Arc<dyn WorkQueue>,
    object_queue: Arc<dyn WorkQueue>,
    registry: PendingTaskRegistry,
}

impl TaskDispatcher {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        image_queue: Arc<dyn WorkQueue>,
        perspective_queue: Arc<dyn WorkQueue>,
        object_queue: Arc<dyn WorkQueue>,
        registry: PendingTaskRegistry,
    ) -> Self {
        Self {
            store,
            image_queue,
            perspective_queue,
            object_queue,
            registry,
        }
    }

    /// Allocate a fresh identifier, collision-free against artifacts
    /// already in the store and ids currently in flight in this process.
    ///
    /// With multiple dispatcher processes the store existence check is the
    /// only cross-process guard, leaving a narrow check-then-write race;
    /// this deployment assumes a single allocator (see DESIGN.md).
    pub fn allocate(&self) -> Result<ProjectId> {
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let id = ProjectId::new();
            if self.registry.is_pending_any(&id)? {
                continue;
            }
            if self.store.exists(&image_key(&id))? {
                continue;
            }
            return Ok(id);
        }
        Err(ReliefError::AllocationExhausted {
            attempts: MAX_ALLOCATION_ATTEMPTS,
        })
    }

    /// Enqueue an image-generation task and return its identifier.
    pub fn request_image_generation(
        &self,
        positive_prompt: &str,
        negative_prompt: Option<&str>,
    ) -> Result<ProjectId> {
        let id = self.allocate()?;
        let task = ImageTask {
            project_id: id,
            positive_prompt: positive_prompt.to_string(),
            negative_prompt: negative_prompt.map(str::to_string),
        };

        self.registry.mark_pending(TaskType::ImageGeneration, id)?;
        if let Err(e) = self.image_queue.send(&task.to_json()?) {
            self.registry
                .clear_pending(TaskType::ImageGeneration, &id)
                .ok();
            return Err(e);
        }

        info!(project_id = %id, "dispatched image generation");
        Ok(id)
    }

    /// Enqueue a mesh-generation task for an already-stored image.
    ///
    /// Fails with `PreconditionFailed` when no image exists for `id`. A
    /// mesh artifact already present for this orientation makes the call a
    /// silent no-op, so re-requests are idempotent.
    pub fn request_mesh_generation(&self, id: ProjectId, perspective: bool) -> Result<()> {
        if !self.store.exists(&image_key(&id))? {
            return Err(ReliefError::PreconditionFailed(format!(
                "no image stored for project {}",
                id
            )));
        }

        if self.store.exists(&mesh_key(&id, perspective, true))? {
            debug!(project_id = %id, perspective, "mesh already exists, skipping dispatch");
            return Ok(());
        }

        let task_type = TaskType::for_mesh(perspective);
        let queue = if perspective {
            &self.perspective_queue
        } else {
            &self.object_queue
        };
        let task = MeshTask { project_id: id };

        self.registry.mark_pending(task_type, id)?;
        if let Err(e) = queue.send(&task.to_json()?) {
            self.registry.clear_pending(task_type, &id).ok();
            return Err(e);
        }

        info!(project_id = %id, task_type = %task_type, "dispatched mesh generation");
        Ok(())
    }

    /// Normalize and store a client-supplied image, returning its
    /// identifier. No asynchronous work is triggered, so nothing is marked
    /// pending.
    pub fn upload_image(&self, bytes: &[u8]) -> Result<ProjectId> {
        let id = self.allocate()?;
        let png = normalize_image(bytes, UPLOAD_IMAGE_EDGE)?;
        self.store.put(&image_key(&id), &png)?;

        info!(project_id = %id, size = png.len(), "stored uploaded image");
        Ok(id)
    }
}
