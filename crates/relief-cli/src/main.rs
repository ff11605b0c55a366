//! Relief CLI - Command-line interface for the Relief generation service
//!
//! Runs the orchestration core in local mode: a filesystem artifact store
//! under the configured data directory, in-process queues, and mock
//! inference backends standing in for the GPU workers.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "relief")]
#[command(about = "Image and depth-mesh generation service", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image (and optionally a mesh) through the local pipeline
    Generate {
        /// Positive prompt
        prompt: String,

        /// Negative prompt
        #[arg(long)]
        negative: Option<String>,

        /// Also generate a mesh from the result
        #[arg(long)]
        mesh: bool,

        /// Generate an object mesh instead of a perspective mesh
        #[arg(long)]
        object: bool,
    },

    /// Upload a local image file, normalizing it for later mesh requests
    Upload {
        /// Path to the image file
        path: String,
    },

    /// Request mesh generation for an already-stored image
    Mesh {
        /// Project id returned by generate/upload
        id: String,

        /// Generate an object mesh instead of a perspective mesh
        #[arg(long)]
        object: bool,
    },

    /// Report the status of a project's artifacts
    Status {
        /// Project id
        id: String,
    },

    /// Fetch an artifact to a local file
    Fetch {
        /// Project id
        id: String,

        /// Artifact to fetch (image, perspective or object)
        #[arg(long, default_value = "image")]
        target: String,

        /// Fetch the untextured mesh variant
        #[arg(long)]
        untextured: bool,

        /// Output file path
        #[arg(long, short)]
        out: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Generate {
            prompt,
            negative,
            mesh,
            object,
        } => commands::generate::run(&prompt, negative.as_deref(), mesh, !object),
        Commands::Upload { path } => commands::upload::run(&path),
        Commands::Mesh { id, object } => commands::mesh::run(&id, !object),
        Commands::Status { id } => commands::status::run(&id),
        Commands::Fetch {
            id,
            target,
            untextured,
            out,
        } => commands::fetch::run(&id, &target, untextured, &out),
    }
}
