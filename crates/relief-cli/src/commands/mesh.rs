use anyhow::{bail, Result};

use relief_core::{ProjectId, TaskType};
use relief_server::ResourceStatus;

use super::LocalService;

pub fn run(id: &str, perspective: bool) -> Result<()> {
    let id: ProjectId = id.parse()?;
    let mut service = LocalService::new()?;

    service.model().request_mesh_generation(id, perspective)?;
    service.drive_to_completion(TaskType::for_mesh(perspective), id)?;

    let kind = if perspective { "perspective" } else { "object" };
    let resolved = service.model().resolve_mesh(id, perspective, true)?;
    service.shutdown();

    if resolved.status != ResourceStatus::Available {
        bail!("{} mesh generation failed for {}", kind, id);
    }
    println!("{} mesh ready", kind);
    Ok(())
}
