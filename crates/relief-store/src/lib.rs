//! Relief Store - Artifact store and work queue contracts
//!
//! The orchestration core talks to durable storage and message transport
//! only through the [`ArtifactStore`] and [`WorkQueue`] traits. Production
//! deployments plug in an object store and an at-least-once queue service;
//! this crate ships an in-memory backend (tests, single-process local mode)
//! and a filesystem-backed store.

mod fs;
mod memory;
mod queue;
mod store;

pub use fs::FsStore;
pub use memory::{MemoryQueue, MemoryStore};
pub use queue::{QueueMessage, WorkQueue};
pub use store::ArtifactStore;
