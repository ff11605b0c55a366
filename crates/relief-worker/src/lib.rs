//! Relief Worker - Queue-driven generation workers
//!
//! Workers drain the task queues the dispatcher feeds, invoke the
//! generative models through the [`ImageSynthesizer`] and
//! [`DepthEstimator`] traits (the models themselves are external
//! collaborators), build mesh artifacts, upload them to the artifact
//! store and publish completion messages on the results queue.

mod inference;
mod pipeline;
mod worker;

pub use inference::{DepthEstimator, ImageSynthesizer, MockDepthEstimator, MockSynthesizer};
pub use pipeline::{build_depth_mesh, DEPTH_DIVISOR, DEPTH_VALID_MIN, MESH_RESOLUTION};
pub use worker::{ImageWorker, MeshWorker, Worker};
