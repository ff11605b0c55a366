//! Server model façade
//!
//! Wires the store, the per-task-type queues, the pending registry and the
//! background reconciler into one object owning the full client-facing
//! surface. Constructed at process start, shut down explicitly (or on
//! drop, via the reconciler handle).

use std::sync::Arc;
use std::time::Duration;

use relief_core::{ProjectId, Result};
use relief_store::{ArtifactStore, WorkQueue};

use crate::dispatch::TaskDispatcher;
use crate::reconcile::{ReconcilerHandle, ResultReconciler};
use crate::registry::PendingTaskRegistry;
use crate::resolve::{ResolvedResource, ResourceStatusResolver};

/// The four channels the orchestration core talks to.
pub struct QueueSet {
    pub image: Arc<dyn WorkQueue>,
    pub perspective_mesh: Arc<dyn WorkQueue>,
    pub object_mesh: Arc<dyn WorkQueue>,
    pub results: Arc<dyn WorkQueue>,
}

/// Client-facing orchestration surface.
pub struct ServerModel {
    dispatcher: TaskDispatcher,
    resolver: ResourceStatusResolver,
    registry: PendingTaskRegistry,
    reconciler: Option<ReconcilerHandle>,
}

impl ServerModel {
    /// Build the model and start the reconciliation loop.
    pub fn new(store: Arc<dyn ArtifactStore>, queues: QueueSet, result_wait: Duration) -> Self {
        let registry = PendingTaskRegistry::new();
        let dispatcher = TaskDispatcher::new(
            Arc::clone(&store),
            queues.image,
            queues.perspective_mesh,
            queues.object_mesh,
            registry.clone(),
        );
        let resolver = ResourceStatusResolver::new(store, registry.clone());
        let reconciler =
            ResultReconciler::new(queues.results, registry.clone(), result_wait).spawn();

        Self {
            dispatcher,
            resolver,
            registry,
            reconciler: Some(reconciler),
        }
    }

    /// The shared pending registry (for inspection and tests)
    pub fn registry(&self) -> &PendingTaskRegistry {
        &self.registry
    }

    pub fn request_image_generation(
        &self,
        positive_prompt: &str,
        negative_prompt: Option<&str>,
    ) -> Result<ProjectId> {
        self.dispatcher
            .request_image_generation(positive_prompt, negative_prompt)
    }

    pub fn request_mesh_generation(&self, id: ProjectId, perspective: bool) -> Result<()> {
        self.dispatcher.request_mesh_generation(id, perspective)
    }

    pub fn upload_image(&self, bytes: &[u8]) -> Result<ProjectId> {
        self.dispatcher.upload_image(bytes)
    }

    pub fn resolve_image(&self, id: ProjectId) -> Result<ResolvedResource> {
        self.resolver.resolve_image(id)
    }

    pub fn resolve_mesh(
        &self,
        id: ProjectId,
        perspective: bool,
        textured: bool,
    ) -> Result<ResolvedResource> {
        self.resolver.resolve_mesh(id, perspective, textured)
    }

    /// Stop the reconciliation loop and wait for it to finish.
    pub fn shutdown(&mut self) {
        if let Some(handle) = self.reconciler.take() {
            handle.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ResourceStatus;
    use relief_core::{image_key, Completion, TaskType};
    use relief_store::{MemoryQueue, MemoryStore};

    fn model_with_backends() -> (Arc<MemoryStore>, Arc<MemoryQueue>, ServerModel) {
        let store = Arc::new(MemoryStore::new());
        let results = Arc::new(MemoryQueue::new());
        let queues = QueueSet {
            image: Arc::new(MemoryQueue::new()),
            perspective_mesh: Arc::new(MemoryQueue::new()),
            object_mesh: Arc::new(MemoryQueue::new()),
            results: Arc::clone(&results) as Arc<dyn WorkQueue>,
        };
        let model = ServerModel::new(
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
            queues,
            Duration::from_millis(5),
        );
        (store, results, model)
    }

    #[test]
    fn test_dispatch_then_reconcile_then_resolve() {
        let (store, results, mut model) = model_with_backends();

        let id = model.request_image_generation("a lighthouse", None).unwrap();
        assert_eq!(
            model.resolve_image(id).unwrap().status,
            ResourceStatus::Pending
        );

        // Simulated worker: upload artifact, publish completion.
        store.put(&image_key(&id), b"png bytes").unwrap();
        let completion = Completion {
            project_id: id,
            task_type: TaskType::ImageGeneration,
        };
        results.send(&completion.to_json().unwrap()).unwrap();

        // Wait for the background reconciler to clear the mark.
        for _ in 0..200 {
            if !model
                .registry()
                .is_pending(TaskType::ImageGeneration, &id)
                .unwrap()
            {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }

        let resolved = model.resolve_image(id).unwrap();
        assert_eq!(resolved.status, ResourceStatus::Available);
        assert_eq!(resolved.data.unwrap(), b"png bytes");

        model.shutdown();
    }

    #[test]
    fn test_full_pipeline_with_real_workers() {
        use relief_worker::{ImageWorker, MeshWorker, MockDepthEstimator, MockSynthesizer};

        let store = Arc::new(MemoryStore::new());
        let image_tasks = Arc::new(MemoryQueue::new());
        let pmesh_tasks = Arc::new(MemoryQueue::new());
        let omesh_tasks = Arc::new(MemoryQueue::new());
        let results = Arc::new(MemoryQueue::new());

        let queues = QueueSet {
            image: image_tasks.clone(),
            perspective_mesh: pmesh_tasks.clone(),
            object_mesh: omesh_tasks.clone(),
            results: results.clone(),
        };
        let mut model = ServerModel::new(
            Arc::clone(&store) as Arc<dyn ArtifactStore>,
            queues,
            Duration::from_millis(5),
        );

        let no_wait = Duration::from_millis(0);
        let image_worker = ImageWorker::new(
            store.clone(),
            image_tasks,
            results.clone(),
            Arc::new(MockSynthesizer {
                width: 32,
                height: 32,
            }),
            no_wait,
        );
        let mesh_worker = MeshWorker::new(
            store.clone(),
            pmesh_tasks,
            results.clone(),
            Arc::new(MockDepthEstimator),
            true,
            no_wait,
        )
        .with_resolution(16);

        // Image round: dispatch, let the worker run, wait for reconcile.
        let id = model.request_image_generation("a quiet harbor", None).unwrap();
        assert_eq!(
            model.resolve_image(id).unwrap().status,
            ResourceStatus::Pending
        );
        assert_eq!(image_worker.poll_once(), 1);
        wait_until_cleared(&model, TaskType::ImageGeneration, &id);
        assert_eq!(
            model.resolve_image(id).unwrap().status,
            ResourceStatus::Available
        );

        // Mesh round against the freshly generated image.
        model.request_mesh_generation(id, true).unwrap();
        assert_eq!(
            model.resolve_mesh(id, true, true).unwrap().status,
            ResourceStatus::Pending
        );
        assert_eq!(mesh_worker.poll_once(), 1);
        wait_until_cleared(&model, TaskType::PerspectiveMesh, &id);
        assert_eq!(
            model.resolve_mesh(id, true, true).unwrap().status,
            ResourceStatus::Available
        );
        assert_eq!(
            model.resolve_mesh(id, true, false).unwrap().status,
            ResourceStatus::Available
        );
        // The object-mesh variant was never requested.
        assert_eq!(
            model.resolve_mesh(id, false, true).unwrap().status,
            ResourceStatus::NotAvailable
        );

        // Re-requesting the finished mesh is a no-op.
        model.request_mesh_generation(id, true).unwrap();
        assert_eq!(
            model
                .registry()
                .pending_count(TaskType::PerspectiveMesh)
                .unwrap(),
            0
        );

        model.shutdown();
    }

    fn wait_until_cleared(model: &ServerModel, task_type: TaskType, id: &relief_core::ProjectId) {
        for _ in 0..200 {
            if !model.registry().is_pending(task_type, id).unwrap() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("pending mark for {} never cleared", id);
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let (_store, _results, mut model) = model_with_backends();
        model.shutdown();
        model.shutdown();
    }
}
