//! Worker loops
//!
//! Each worker drains one task queue. A completion message is published
//! after every task, success or failure, so the dispatcher's pending mark
//! always clears; a failed task simply leaves no artifact behind and
//! resolves as not available. Task failures are isolated: the loop logs
//! and moves on.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{DynamicImage, ImageFormat, RgbImage};
use tracing::{info, warn};

use relief_core::{
    image_key, mesh_key, Completion, ImageTask, MeshTask, ProjectId, ReliefError, Result, TaskType,
};
use relief_mesh::mesh_to_zip;
use relief_store::{ArtifactStore, QueueMessage, WorkQueue};

use crate::inference::{DepthEstimator, ImageSynthesizer};
use crate::pipeline::{build_depth_mesh, MESH_RESOLUTION};

/// Drains the image-generation queue.
pub struct ImageWorker {
    store: Arc<dyn ArtifactStore>,
    task_queue: Arc<dyn WorkQueue>,
    result_queue: Arc<dyn WorkQueue>,
    synthesizer: Arc<dyn ImageSynthesizer>,
    wait: Duration,
}

impl ImageWorker {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        task_queue: Arc<dyn WorkQueue>,
        result_queue: Arc<dyn WorkQueue>,
        synthesizer: Arc<dyn ImageSynthesizer>,
        wait: Duration,
    ) -> Self {
        Self {
            store,
            task_queue,
            result_queue,
            synthesizer,
            wait,
        }
    }

    /// Receive and process at most one task; returns the number processed.
    pub fn poll_once(&self) -> usize {
        let messages = match self.task_queue.receive(1, self.wait) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "failed to receive image tasks");
                return 0;
            }
        };

        let count = messages.len();
        for message in messages {
            self.process(message);
        }
        count
    }

    fn process(&self, message: QueueMessage) {
        let task = match ImageTask::from_json(&message.body) {
            Ok(task) => task,
            Err(e) => {
                warn!(error = %e, body = %message.body, "dropping malformed image task");
                delete_message(&self.task_queue, &message.ack_token);
                return;
            }
        };

        if let Err(e) = self.generate(&task) {
            warn!(project_id = %task.project_id, error = %e, "image generation failed");
        } else {
            info!(project_id = %task.project_id, "image generated");
        }

        delete_message(&self.task_queue, &message.ack_token);
        publish_completion(
            &self.result_queue,
            task.project_id,
            TaskType::ImageGeneration,
        );
    }

    fn generate(&self, task: &ImageTask) -> Result<()> {
        let image = self
            .synthesizer
            .synthesize(&task.positive_prompt, task.negative_prompt.as_deref())?;
        let png = encode_png(&image)?;
        self.store.put(&image_key(&task.project_id), &png)
    }
}

/// Drains one of the mesh-generation queues.
pub struct MeshWorker {
    store: Arc<dyn ArtifactStore>,
    task_queue: Arc<dyn WorkQueue>,
    result_queue: Arc<dyn WorkQueue>,
    estimator: Arc<dyn DepthEstimator>,
    perspective: bool,
    resolution: u32,
    wait: Duration,
}

impl MeshWorker {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        task_queue: Arc<dyn WorkQueue>,
        result_queue: Arc<dyn WorkQueue>,
        estimator: Arc<dyn DepthEstimator>,
        perspective: bool,
        wait: Duration,
    ) -> Self {
        Self {
            store,
            task_queue,
            result_queue,
            estimator,
            perspective,
            resolution: MESH_RESOLUTION,
            wait,
        }
    }

    /// Override the working resolution (tests use small grids)
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Receive and process at most one task; returns the number processed.
    pub fn poll_once(&self) -> usize {
        let messages = match self.task_queue.receive(1, self.wait) {
            Ok(messages) => messages,
            Err(e) => {
                warn!(error = %e, "failed to receive mesh tasks");
                return 0;
            }
        };

        let count = messages.len();
        for message in messages {
            self.process(message);
        }
        count
    }

    fn process(&self, message: QueueMessage) {
        let task = match MeshTask::from_json(&message.body) {
            Ok(task) => task,
            Err(e) => {
                warn!(error = %e, body = %message.body, "dropping malformed mesh task");
                delete_message(&self.task_queue, &message.ack_token);
                return;
            }
        };

        if let Err(e) = self.generate(task.project_id) {
            warn!(project_id = %task.project_id, error = %e, "mesh generation failed");
        } else {
            info!(project_id = %task.project_id, perspective = self.perspective, "mesh generated");
        }

        delete_message(&self.task_queue, &message.ack_token);
        publish_completion(
            &self.result_queue,
            task.project_id,
            TaskType::for_mesh(self.perspective),
        );
    }

    fn generate(&self, id: ProjectId) -> Result<()> {
        let bytes = self
            .store
            .get(&image_key(&id))?
            .ok_or_else(|| {
                ReliefError::PreconditionFailed(format!("no image stored for project {}", id))
            })?;
        let image = image::load_from_memory(&bytes)
            .map_err(|e| ReliefError::Image(e.to_string()))?
            .to_rgb8();

        let depth = self.estimator.estimate(&image)?;
        let mesh = build_depth_mesh(&image, &depth, self.resolution);

        let textured = mesh_to_zip(&mesh)?;
        self.store
            .put(&mesh_key(&id, self.perspective, true), &textured)?;

        let bare = mesh_to_zip(&mesh.untextured())?;
        self.store
            .put(&mesh_key(&id, self.perspective, false), &bare)?;
        Ok(())
    }
}

/// A worker process: one image loop and any number of mesh loops,
/// polled round-robin until stopped.
pub struct Worker {
    image: Option<ImageWorker>,
    mesh: Vec<MeshWorker>,
}

impl Worker {
    pub fn new(image: Option<ImageWorker>, mesh: Vec<MeshWorker>) -> Self {
        Self { image, mesh }
    }

    /// Poll every queue once; returns the number of tasks processed.
    pub fn poll_once(&self) -> usize {
        let mut processed = 0;
        if let Some(worker) = &self.image {
            processed += worker.poll_once();
        }
        for worker in &self.mesh {
            processed += worker.poll_once();
        }
        processed
    }

    /// Poll until the stop flag is set.
    pub fn run(&self, stop: &AtomicBool) {
        info!("worker started");
        while !stop.load(Ordering::Relaxed) {
            self.poll_once();
        }
        info!("worker stopped");
    }
}

fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| ReliefError::Image(e.to_string()))?;
    Ok(png)
}

fn delete_message(queue: &Arc<dyn WorkQueue>, ack_token: &str) {
    if let Err(e) = queue.delete(ack_token) {
        warn!(error = %e, "failed to delete task message");
    }
}

fn publish_completion(queue: &Arc<dyn WorkQueue>, id: ProjectId, task_type: TaskType) {
    let completion = Completion {
        project_id: id,
        task_type,
    };
    match completion.to_json() {
        Ok(body) => {
            if let Err(e) = queue.send(&body) {
                warn!(project_id = %id, error = %e, "failed to publish completion");
            }
        }
        Err(e) => warn!(project_id = %id, error = %e, "failed to serialize completion"),
    }
}
