//! Task types and queue message schemas
//!
//! Messages are closed, typed structs that round-trip exactly through JSON.
//! Unknown task types and unexpected fields are rejected at the parse
//! boundary rather than tolerated downstream.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::id::ProjectId;

/// The closed set of asynchronous task kinds.
///
/// Each variant has its own outbound queue and its own slot in the pending
/// task registry. The serde names are the wire names used in completion
/// messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskType {
    #[serde(rename = "image_gen")]
    ImageGeneration,
    #[serde(rename = "pmesh_gen")]
    PerspectiveMesh,
    #[serde(rename = "omesh_gen")]
    ObjectMesh,
}

impl TaskType {
    /// All task types, in dispatch order
    pub const ALL: [TaskType; 3] = [
        TaskType::ImageGeneration,
        TaskType::PerspectiveMesh,
        TaskType::ObjectMesh,
    ];

    /// The wire name used in completion messages
    pub fn wire_name(&self) -> &'static str {
        match self {
            TaskType::ImageGeneration => "image_gen",
            TaskType::PerspectiveMesh => "pmesh_gen",
            TaskType::ObjectMesh => "omesh_gen",
        }
    }

    /// Task type for a mesh request with the given orientation
    pub fn for_mesh(perspective: bool) -> Self {
        if perspective {
            TaskType::PerspectiveMesh
        } else {
            TaskType::ObjectMesh
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// An image-generation task message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImageTask {
    pub project_id: ProjectId,
    pub positive_prompt: String,
    #[serde(default)]
    pub negative_prompt: Option<String>,
}

/// A mesh-generation task message (perspective and object queues share it)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MeshTask {
    pub project_id: ProjectId,
}

/// A completion notification published by a worker on the results queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Completion {
    pub project_id: ProjectId,
    pub task_type: TaskType,
}

impl ImageTask {
    /// Serialize to a queue message body
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from a queue message body
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

impl MeshTask {
    /// Serialize to a queue message body
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from a queue message body
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

impl Completion {
    /// Serialize to a queue message body
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse from a queue message body
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReliefError;

    #[test]
    fn test_image_task_wire_fields() {
        let task = ImageTask {
            project_id: "8c4a7b77-0f3c-4d27-9a5e-2f1fbb7e6a10".parse().unwrap(),
            positive_prompt: "an old tavern".to_string(),
            negative_prompt: None,
        };
        let json = task.to_json().unwrap();
        assert!(json.contains("\"project_id\":\"8c4a7b77-0f3c-4d27-9a5e-2f1fbb7e6a10\""));
        assert!(json.contains("\"positive_prompt\":\"an old tavern\""));
        assert!(json.contains("\"negative_prompt\":null"));

        let back = ImageTask::from_json(&json).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_completion_wire_names() {
        let id = ProjectId::new();
        for (task_type, name) in [
            (TaskType::ImageGeneration, "image_gen"),
            (TaskType::PerspectiveMesh, "pmesh_gen"),
            (TaskType::ObjectMesh, "omesh_gen"),
        ] {
            let msg = Completion {
                project_id: id,
                task_type,
            };
            let json = msg.to_json().unwrap();
            assert!(json.contains(&format!("\"task_type\":\"{}\"", name)));
            assert_eq!(Completion::from_json(&json).unwrap().task_type, task_type);
        }
    }

    #[test]
    fn test_unknown_task_type_rejected() {
        let body = r#"{"project_id":"8c4a7b77-0f3c-4d27-9a5e-2f1fbb7e6a10","task_type":"voxel_gen"}"#;
        let err = Completion::from_json(body).unwrap_err();
        assert!(matches!(err, ReliefError::MalformedMessage(_)));
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let body = r#"{"project_id":"8c4a7b77-0f3c-4d27-9a5e-2f1fbb7e6a10","resolution":256}"#;
        assert!(MeshTask::from_json(body).is_err());
    }

    #[test]
    fn test_malformed_body_rejected() {
        assert!(Completion::from_json("not json").is_err());
        assert!(MeshTask::from_json(r#"{"project_id":"not-a-uuid"}"#).is_err());
    }
}
