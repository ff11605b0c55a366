use anyhow::Result;

use relief_core::TaskType;

use super::LocalService;

pub fn run(prompt: &str, negative: Option<&str>, mesh: bool, perspective: bool) -> Result<()> {
    let mut service = LocalService::new()?;

    let id = service.model().request_image_generation(prompt, negative)?;
    println!("project {}", id);

    service.drive_to_completion(TaskType::ImageGeneration, id)?;
    println!("image ready");

    if mesh {
        service.model().request_mesh_generation(id, perspective)?;
        service.drive_to_completion(TaskType::for_mesh(perspective), id)?;
        let kind = if perspective { "perspective" } else { "object" };
        println!("{} mesh ready", kind);
    }

    service.shutdown();
    Ok(())
}
