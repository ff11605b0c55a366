//! Depth-to-mesh pipeline
//!
//! The numeric treatment mirrors the production depth network's output
//! range: the raw depth map is resampled to a square working resolution,
//! pixels at or below `DEPTH_VALID_MIN` are masked out as background, and
//! the remaining values are divided by `DEPTH_DIVISOR` so scene depth
//! spans a range comparable to the unit-normalized planar axes.

use image::RgbImage;

use relief_mesh::{triangulate, DepthGrid, Mesh, VertexIndexGrid};

/// Square working resolution meshes are built at
pub const MESH_RESOLUTION: u32 = 256;

/// Raw depth values at or below this are background
pub const DEPTH_VALID_MIN: f32 = 5.0;

/// Raw depth is divided by this before triangulation
pub const DEPTH_DIVISOR: f32 = 200.0;

/// Build a centered, textured mesh from an image and its raw depth map.
pub fn build_depth_mesh(image: &RgbImage, depth: &DepthGrid, resolution: u32) -> Mesh {
    let working = depth.resized(resolution, resolution);
    let grid = VertexIndexGrid::build(&working, |d| d > DEPTH_VALID_MIN);
    // The triangulator emits -depth as z; the negative divisor flips the
    // disparity-like raw values so foreground ends up at positive z.
    let scaled = working.scaled(-1.0 / DEPTH_DIVISOR);

    let mut mesh = triangulate(image, &scaled, &grid);
    mesh.recenter();
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_depth(width: u32, height: u32, value: f32) -> DepthGrid {
        DepthGrid::new(width, height, vec![value; (width * height) as usize])
    }

    #[test]
    fn test_fully_valid_depth_gives_full_grid() {
        let image = RgbImage::new(8, 8);
        let mesh = build_depth_mesh(&image, &flat_depth(8, 8, 100.0), 8);

        assert_eq!(mesh.vertex_count(), 64);
        // 7x7 quads, two triangles each.
        assert_eq!(mesh.triangle_count(), 98);
        assert!(mesh.texture.is_some());
    }

    #[test]
    fn test_background_depth_gives_empty_mesh() {
        let image = RgbImage::new(8, 8);
        let mesh = build_depth_mesh(&image, &flat_depth(8, 8, 0.0), 8);
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn test_mesh_is_centered() {
        let image = RgbImage::new(16, 16);
        let mesh = build_depth_mesh(&image, &flat_depth(16, 16, 60.0), 16);
        for axis in mesh.centroid() {
            assert!(axis.abs() < 1e-4);
        }
    }

    #[test]
    fn test_depth_scale_applied() {
        let image = RgbImage::new(4, 4);
        // Uniform raw depth 100 -> z = 100/200 = 0.5 before centering, so
        // all z are equal and centering zeroes them.
        let mesh = build_depth_mesh(&image, &flat_depth(4, 4, 100.0), 4);
        for p in &mesh.positions {
            assert!(p[2].abs() < 1e-5);
        }
    }

    #[test]
    fn test_resamples_to_requested_resolution() {
        let image = RgbImage::new(64, 64);
        let mesh = build_depth_mesh(&image, &flat_depth(64, 64, 100.0), 16);
        assert_eq!(mesh.vertex_count(), 256);
    }
}
