//! Textured triangle mesh

use image::RgbImage;

/// A triangle mesh built from a depth grid.
///
/// UV coordinates are stored per triangle corner (three per triangle), not
/// per vertex: corners of adjacent triangles may carry different UVs even
/// at a shared vertex. Built once per task and not mutated afterwards,
/// apart from the untextured structural copy.
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Triangle index triples into `positions`
    pub triangles: Vec<[u32; 3]>,
    /// Per-corner UV coordinates, `3 * triangles.len()` entries
    pub uvs: Vec<[f32; 2]>,
    /// Source color image used as the texture
    pub texture: Option<RgbImage>,
}

impl Mesh {
    /// An empty mesh (zero vertices, zero triangles)
    pub fn empty() -> Self {
        Self {
            positions: Vec::new(),
            triangles: Vec::new(),
            uvs: Vec::new(),
            texture: None,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Mean of all vertex positions; the origin for an empty mesh.
    pub fn centroid(&self) -> [f32; 3] {
        if self.positions.is_empty() {
            return [0.0; 3];
        }
        let mut sum = [0.0f64; 3];
        for p in &self.positions {
            for i in 0..3 {
                sum[i] += p[i] as f64;
            }
        }
        let n = self.positions.len() as f64;
        [
            (sum[0] / n) as f32,
            (sum[1] / n) as f32,
            (sum[2] / n) as f32,
        ]
    }

    /// Translate all vertices so the centroid lands on the origin.
    pub fn recenter(&mut self) {
        let c = self.centroid();
        for p in &mut self.positions {
            for i in 0..3 {
                p[i] -= c[i];
            }
        }
    }

    /// Structural copy: positions and triangles only, no UVs, no texture.
    pub fn untextured(&self) -> Mesh {
        Mesh {
            positions: self.positions.clone(),
            triangles: self.triangles.clone(),
            uvs: Vec::new(),
            texture: None,
        }
    }
}
