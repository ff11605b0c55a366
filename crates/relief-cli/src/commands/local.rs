//! Local single-process service wiring
//!
//! Stands up the full pipeline in one process: filesystem artifact store,
//! in-memory queues, mock inference workers, server model with its
//! background reconciler. Artifacts persist under the data directory
//! across invocations; queue state does not, which is fine because every
//! dispatched task is driven to completion within the invocation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};

use relief_core::{ProjectId, TaskType};
use relief_server::{QueueSet, ReliefConfig, ServerModel};
use relief_store::{ArtifactStore, FsStore, MemoryQueue};
use relief_worker::{ImageWorker, MeshWorker, MockDepthEstimator, MockSynthesizer, Worker};

const DRIVE_ATTEMPTS: u32 = 200;

/// The orchestration core plus an in-process worker.
pub struct LocalService {
    model: ServerModel,
    worker: Worker,
}

impl LocalService {
    pub fn new() -> Result<Self> {
        Self::with_config(ReliefConfig::load()?)
    }

    /// Build the pipeline from an explicit config: the data directory
    /// roots the store, the configured waits drive the reconciler and
    /// worker polls.
    pub fn with_config(config: ReliefConfig) -> Result<Self> {
        let store: Arc<dyn ArtifactStore> = Arc::new(FsStore::new(&config.data_dir));

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
        let model = ServerModel::new(Arc::clone(&store), queues, config.result_wait());

        let poll_wait = config.worker_wait();
        let worker = Worker::new(
            Some(ImageWorker::new(
                Arc::clone(&store),
                image_tasks,
                results.clone(),
                Arc::new(MockSynthesizer::default()),
                poll_wait,
            )),
            vec![
                MeshWorker::new(
                    Arc::clone(&store),
                    pmesh_tasks,
                    results.clone(),
                    Arc::new(MockDepthEstimator),
                    true,
                    poll_wait,
                ),
                MeshWorker::new(
                    store,
                    omesh_tasks,
                    results,
                    Arc::new(MockDepthEstimator),
                    false,
                    poll_wait,
                ),
            ],
        );

        Ok(Self { model, worker })
    }

    pub fn model(&self) -> &ServerModel {
        &self.model
    }

    /// Poll the worker until the pending mark for (task_type, id) clears.
    pub fn drive_to_completion(&self, task_type: TaskType, id: ProjectId) -> Result<()> {
        for _ in 0..DRIVE_ATTEMPTS {
            if !self.model.registry().is_pending(task_type, &id)? {
                return Ok(());
            }
            self.worker.poll_once();
            std::thread::sleep(Duration::from_millis(10));
        }
        bail!("task {} for {} did not complete", task_type, id);
    }

    pub fn shutdown(&mut self) {
        self.model.shutdown();
    }
}
