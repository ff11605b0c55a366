//! Relief Core - Foundational types for the Relief generation service
//!
//! This crate provides the types all other Relief crates depend on:
//! - `ProjectId` - Unique handles for units of generation work
//! - `TaskType` - The closed set of asynchronous task kinds
//! - Queue message schemas (`ImageTask`, `MeshTask`, `Completion`)
//! - Artifact key derivation shared by dispatch and worker paths
//! - Error types and Result alias

mod error;
mod id;
mod key;
mod task;

pub use error::{ReliefError, Result};
pub use id::ProjectId;
pub use key::{image_key, mesh_key};
pub use task::{Completion, ImageTask, MeshTask, TaskType};
