//! Relief Server - Orchestration core for the generation service
//!
//! Requests for expensive GPU-bound artifacts are dispatched through
//! at-least-once work queues. This crate owns the client-facing half of
//! that flow:
//! - `TaskDispatcher` - validates preconditions, allocates identifiers,
//!   enqueues tasks and marks them pending
//! - `PendingTaskRegistry` - the shared in-flight set
//! - `ResultReconciler` - background loop clearing pending state as
//!   completion messages arrive
//! - `ResourceStatusResolver` - answers "is artifact X ready?" without
//!   over-querying durable storage
//! - `ServerModel` - a façade wiring the above together

mod config;
mod dispatch;
mod image_io;
mod model;
mod reconcile;
mod registry;
mod resolve;

pub use config::ReliefConfig;
pub use dispatch::TaskDispatcher;
pub use image_io::normalize_image;
pub use model::{QueueSet, ServerModel};
pub use reconcile::{ReconcilerHandle, ResultReconciler};
pub use registry::PendingTaskRegistry;
pub use resolve::{ResolvedResource, ResourceStatus, ResourceStatusResolver};
