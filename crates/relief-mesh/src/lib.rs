//! Relief Mesh - Depth-map triangulation
//!
//! Turns a per-pixel depth map plus a validity mask into a textured
//! triangle mesh:
//! - `DepthGrid` - row-major float depth values with bilinear resampling
//! - `VertexIndexGrid` - pixel -> vertex index mapping with a -1 sentinel
//! - `triangulate` - quad-by-quad rule-table triangulation
//! - OBJ serialization and in-memory ZIP archiving of the result

mod archive;
mod grid;
mod mesh;
mod obj;
mod triangulate;

pub use archive::mesh_to_zip;
pub use grid::{DepthGrid, VertexIndexGrid};
pub use mesh::Mesh;
pub use obj::{write_mtl, write_obj};
pub use triangulate::triangulate;
