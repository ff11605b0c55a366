//! Quad rule-table triangulation of a depth grid
//!
//! Each valid pixel looks at the validity of its below-left, below,
//! below-right and right neighbors and emits up to two triangles per 2x2
//! neighborhood. A per-quad diagonal-claim flag keeps the two possible
//! diagonal splits of a quad from both being emitted, so a fully valid
//! block triangulates into a regular, non-overlapping grid of quads.

use image::RgbImage;

use crate::grid::{DepthGrid, VertexIndexGrid};
use crate::mesh::Mesh;

/// Build a textured mesh from a depth grid and its vertex-index mapping.
///
/// The position of valid pixel (x, y) is `(x/s, -y/s, -depth(x, y))` with
/// `s = max(width, height)`, which normalizes the planar extent to roughly
/// unit size. Depth is taken as-is; callers pre-scale it so scene depth
/// spans a range comparable to the planar axes. UVs are assigned per
/// triangle corner, normalized with a vertical flip to texture-space
/// convention. The caller is expected to recenter the result.
pub fn triangulate(texture: &RgbImage, depth: &DepthGrid, grid: &VertexIndexGrid) -> Mesh {
    assert_eq!(depth.width(), grid.width());
    assert_eq!(depth.height(), grid.height());

    let width = grid.width();
    let height = grid.height();
    let scale = width.max(height) as f32;

    let mut positions = vec![[0.0f32; 3]; grid.vertex_count() as usize];
    let mut triangles: Vec<[u32; 3]> = Vec::new();
    let mut corner_px: Vec<[u32; 2]> = Vec::new();

    for y in 0..height {
        // Set when the previous pixel's quad claimed the shared diagonal.
        let mut prev_claimed = false;

        for x in 0..width {
            let Some(current) = grid.index(x, y) else {
                prev_claimed = false;
                continue;
            };

            positions[current as usize] = [
                x as f32 / scale,
                -(y as f32) / scale,
                -depth.get(x, y),
            ];

            if y == height - 1 {
                continue;
            }

            let bl = x > 0 && grid.cell(x - 1, y + 1) != VertexIndexGrid::INVALID;
            let b = grid.cell(x, y + 1) != VertexIndexGrid::INVALID;
            let br = x < width - 1 && grid.cell(x + 1, y + 1) != VertexIndexGrid::INVALID;
            let r = x < width - 1 && grid.cell(x + 1, y) != VertexIndexGrid::INVALID;

            if bl && b && !prev_claimed {
                triangles.push([
                    current,
                    grid.index(x - 1, y + 1).unwrap(),
                    grid.index(x, y + 1).unwrap(),
                ]);
                corner_px.push([x, y]);
                corner_px.push([x - 1, y + 1]);
                corner_px.push([x, y + 1]);
            }

            prev_claimed = false;
            if b && br {
                triangles.push([
                    current,
                    grid.index(x, y + 1).unwrap(),
                    grid.index(x + 1, y + 1).unwrap(),
                ]);
                corner_px.push([x, y]);
                corner_px.push([x, y + 1]);
                corner_px.push([x + 1, y + 1]);
                prev_claimed = true;
            }

            if r && br {
                triangles.push([
                    current,
                    grid.index(x + 1, y + 1).unwrap(),
                    grid.index(x + 1, y).unwrap(),
                ]);
                corner_px.push([x, y]);
                corner_px.push([x + 1, y + 1]);
                corner_px.push([x + 1, y]);
                prev_claimed = true;
            }

            if r && b && !prev_claimed {
                triangles.push([
                    current,
                    grid.index(x, y + 1).unwrap(),
                    grid.index(x + 1, y).unwrap(),
                ]);
                corner_px.push([x, y]);
                corner_px.push([x, y + 1]);
                corner_px.push([x + 1, y]);
                prev_claimed = true;
            }
        }
    }

    // Pixel coordinates to [0,1]^2 with vertical flip.
    let uvs = corner_px
        .iter()
        .map(|&[px, py]| {
            [
                px as f32 / width as f32,
                1.0 - py as f32 / height as f32,
            ]
        })
        .collect();

    Mesh {
        positions,
        triangles,
        uvs,
        texture: Some(texture.clone()),
    }
}
