//! CLI command implementations

pub mod fetch;
pub mod generate;
pub mod mesh;
pub mod status;
pub mod upload;

mod local;

pub use local::LocalService;
