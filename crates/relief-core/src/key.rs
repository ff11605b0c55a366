//! Artifact key derivation
//!
//! Keys are derived deterministically from the project id and variant flags,
//! so the dispatch side and the worker side agree on storage paths without
//! any coordination.

use crate::id::ProjectId;

/// Storage key of the source/generated image for a project.
pub fn image_key(id: &ProjectId) -> String {
    format!("{}/image.png", id)
}

/// Storage key of a mesh archive.
///
/// `perspective` selects the single-view depth mesh over the multi-view
/// object mesh; `textured` selects the archive that carries UVs and the
/// texture image over the bare structural copy.
pub fn mesh_key(id: &ProjectId, perspective: bool, textured: bool) -> String {
    let mesh_dir = if perspective { "perspective" } else { "object" };
    let mesh_file = if textured { "textured" } else { "mesh" };
    format!("{}/{}/{}.zip", id, mesh_dir, mesh_file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_key_layout() {
        let id = ProjectId::new();
        assert_eq!(image_key(&id), format!("{}/image.png", id));
    }

    #[test]
    fn test_mesh_key_variants() {
        let id = ProjectId::new();
        assert_eq!(mesh_key(&id, true, true), format!("{}/perspective/textured.zip", id));
        assert_eq!(mesh_key(&id, true, false), format!("{}/perspective/mesh.zip", id));
        assert_eq!(mesh_key(&id, false, true), format!("{}/object/textured.zip", id));
        assert_eq!(mesh_key(&id, false, false), format!("{}/object/mesh.zip", id));
    }

    #[test]
    fn test_keys_deterministic_across_paths() {
        // The worker derives keys independently from the same id; both
        // sides must produce byte-identical strings.
        let id: ProjectId = "8c4a7b77-0f3c-4d27-9a5e-2f1fbb7e6a10".parse().unwrap();
        let dispatch_side = mesh_key(&id, true, true);
        let worker_side = mesh_key(&id.to_string().parse().unwrap(), true, true);
        assert_eq!(dispatch_side, worker_side);
        assert_eq!(
            dispatch_side,
            "8c4a7b77-0f3c-4d27-9a5e-2f1fbb7e6a10/perspective/textured.zip"
        );
    }
}
