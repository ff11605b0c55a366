//! Wavefront OBJ serialization

use std::io::{self, Write};

use crate::mesh::Mesh;

/// Write a mesh as Wavefront OBJ.
///
/// Textured meshes reference `mtl_name` via `mtllib` and emit one `vt`
/// line per triangle corner, so face corners index `vt` entries
/// independently of vertex positions. Untextured meshes emit plain
/// `f a b c` faces.
pub fn write_obj<W: Write>(mesh: &Mesh, writer: &mut W, mtl_name: Option<&str>) -> io::Result<()> {
    let textured = !mesh.uvs.is_empty();

    if let Some(mtl) = mtl_name {
        writeln!(writer, "mtllib {}", mtl)?;
        writeln!(writer, "usemtl relief")?;
    }

    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", p[0], p[1], p[2])?;
    }

    if textured {
        for uv in &mesh.uvs {
            writeln!(writer, "vt {} {}", uv[0], uv[1])?;
        }
        for (i, t) in mesh.triangles.iter().enumerate() {
            // Corner k of triangle i uses vt entry 3*i + k (1-based in OBJ).
            let base = 3 * i + 1;
            writeln!(
                writer,
                "f {}/{} {}/{} {}/{}",
                t[0] + 1,
                base,
                t[1] + 1,
                base + 1,
                t[2] + 1,
                base + 2,
            )?;
        }
    } else {
        for t in &mesh.triangles {
            writeln!(writer, "f {} {} {}", t[0] + 1, t[1] + 1, t[2] + 1)?;
        }
    }

    Ok(())
}

/// Write the companion MTL file referencing the texture image.
pub fn write_mtl<W: Write>(writer: &mut W, texture_name: &str) -> io::Result<()> {
    writeln!(writer, "newmtl relief")?;
    writeln!(writer, "Ka 1.0 1.0 1.0")?;
    writeln!(writer, "Kd 1.0 1.0 1.0")?;
    writeln!(writer, "map_Kd {}", texture_name)?;
    Ok(())
}
