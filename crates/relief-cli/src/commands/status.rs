use anyhow::Result;

use relief_core::ProjectId;
use relief_server::ResourceStatus;

use super::LocalService;

pub fn run(id: &str) -> Result<()> {
    let id: ProjectId = id.parse()?;
    let mut service = LocalService::new()?;
    let model = service.model();

    println!("image:                {}", describe(model.resolve_image(id)?.status));
    println!(
        "perspective mesh:     {}",
        describe(model.resolve_mesh(id, true, true)?.status)
    );
    println!(
        "perspective (bare):   {}",
        describe(model.resolve_mesh(id, true, false)?.status)
    );
    println!(
        "object mesh:          {}",
        describe(model.resolve_mesh(id, false, true)?.status)
    );
    println!(
        "object (bare):        {}",
        describe(model.resolve_mesh(id, false, false)?.status)
    );

    service.shutdown();
    Ok(())
}

fn describe(status: ResourceStatus) -> &'static str {
    match status {
        ResourceStatus::Pending => "pending",
        ResourceStatus::Available => "available",
        ResourceStatus::NotAvailable => "not available",
    }
}
