use anyhow::{bail, Result};

use relief_core::ProjectId;
use relief_server::ResourceStatus;

use super::LocalService;

pub fn run(id: &str, target: &str, untextured: bool, out: &str) -> Result<()> {
    let id: ProjectId = id.parse()?;
    let mut service = LocalService::new()?;

    let resolved = match target {
        "image" => service.model().resolve_image(id)?,
        "perspective" => service.model().resolve_mesh(id, true, !untextured)?,
        "object" => service.model().resolve_mesh(id, false, !untextured)?,
        other => bail!("unknown target {:?} (expected image, perspective or object)", other),
    };
    service.shutdown();

    match (resolved.status, resolved.data) {
        (ResourceStatus::Available, Some(data)) => {
            std::fs::write(out, &data)?;
            println!("wrote {} ({} bytes)", out, data.len());
            Ok(())
        }
        (ResourceStatus::Pending, _) => bail!("{} is still pending for {}", target, id),
        _ => bail!("no {} artifact stored for {}", target, id),
    }
}
