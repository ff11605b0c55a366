use anyhow::{Context, Result};

use super::LocalService;

pub fn run(path: &str) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path))?;

    let mut service = LocalService::new()?;
    let id = service.model().upload_image(&bytes)?;
    println!("project {}", id);

    service.shutdown();
    Ok(())
}
