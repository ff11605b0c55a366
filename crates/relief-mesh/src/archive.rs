//! In-memory ZIP archiving of meshes
//!
//! Mesh artifacts are stored as deflate-compressed ZIP archives holding
//! `mesh.obj` plus, for textured meshes, `mesh.mtl` and `texture.png`.

use std::io::{Cursor, Write};

use image::{ImageEncoder, codecs::png::PngEncoder};
use relief_core::{ReliefError, Result};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::mesh::Mesh;
use crate::obj::{write_mtl, write_obj};

/// Serialize a mesh to an in-memory ZIP archive.
pub fn mesh_to_zip(mesh: &Mesh) -> Result<Vec<u8>> {
    let texture = if mesh.uvs.is_empty() {
        None
    } else {
        mesh.texture.as_ref()
    };

    let mut obj = Vec::new();
    let mtl_name = texture.map(|_| "mesh.mtl");
    write_obj(mesh, &mut obj, mtl_name)?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("mesh.obj", options)
        .map_err(|e| ReliefError::Archive(e.to_string()))?;
    zip.write_all(&obj)?;

    if let Some(texture) = texture {
        let mut mtl = Vec::new();
        write_mtl(&mut mtl, "texture.png")?;
        zip.start_file("mesh.mtl", options)
            .map_err(|e| ReliefError::Archive(e.to_string()))?;
        zip.write_all(&mtl)?;

        let mut png = Vec::new();
        PngEncoder::new(&mut png)
            .write_image(
                texture.as_raw(),
                texture.width(),
                texture.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| ReliefError::Image(e.to_string()))?;
        zip.start_file("texture.png", options)
            .map_err(|e| ReliefError::Archive(e.to_string()))?;
        zip.write_all(&png)?;
    }

    let cursor = zip
        .finish()
        .map_err(|e| ReliefError::Archive(e.to_string()))?;
    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn sample_mesh(textured: bool) -> Mesh {
        Mesh {
            positions: vec![[0.0, 0.0, 0.0], [0.5, 0.0, 0.0], [0.0, -0.5, 0.1]],
            triangles: vec![[0, 2, 1]],
            uvs: if textured {
                vec![[0.0, 1.0], [0.0, 0.5], [0.5, 1.0]]
            } else {
                Vec::new()
            },
            texture: if textured {
                Some(RgbImage::from_pixel(4, 4, image::Rgb([120, 80, 40])))
            } else {
                None
            },
        }
    }

    fn entry_names(bytes: &[u8]) -> Vec<String> {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_untextured_zip_contains_only_obj() {
        let bytes = mesh_to_zip(&sample_mesh(false)).unwrap();
        assert_eq!(entry_names(&bytes), vec!["mesh.obj"]);
    }

    #[test]
    fn test_textured_zip_contains_obj_mtl_texture() {
        let bytes = mesh_to_zip(&sample_mesh(true)).unwrap();
        assert_eq!(entry_names(&bytes), vec!["mesh.obj", "mesh.mtl", "texture.png"]);
    }

    #[test]
    fn test_zipped_texture_decodes_back() {
        use std::io::Read;

        let bytes = mesh_to_zip(&sample_mesh(true)).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut png = Vec::new();
        archive
            .by_name("texture.png")
            .unwrap()
            .read_to_end(&mut png)
            .unwrap();

        let decoded = image::load_from_memory(&png).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), (4, 4));
        assert_eq!(decoded.get_pixel(0, 0), &image::Rgb([120, 80, 40]));
    }
}
