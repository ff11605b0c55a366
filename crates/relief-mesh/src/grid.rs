//! Depth and vertex-index grids

/// A row-major grid of per-pixel depth values aligned with a source image.
pub struct DepthGrid {
    width: u32,
    height: u32,
    values: Vec<f32>,
}

impl DepthGrid {
    /// Create a grid from row-major values. Panics if the length does not
    /// match `width * height`.
    pub fn new(width: u32, height: u32, values: Vec<f32>) -> Self {
        assert_eq!(values.len(), (width * height) as usize);
        Self {
            width,
            height,
            values,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[(y * self.width + x) as usize]
    }

    /// Resample to a new size with bilinear interpolation.
    pub fn resized(&self, width: u32, height: u32) -> DepthGrid {
        let mut values = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let u = if width > 1 {
                    x as f32 / (width - 1) as f32
                } else {
                    0.0
                };
                let v = if height > 1 {
                    y as f32 / (height - 1) as f32
                } else {
                    0.0
                };
                values.push(self.sample(u, v));
            }
        }
        DepthGrid::new(width, height, values)
    }

    /// Multiply every depth value by `factor`.
    pub fn scaled(&self, factor: f32) -> DepthGrid {
        DepthGrid::new(
            self.width,
            self.height,
            self.values.iter().map(|d| d * factor).collect(),
        )
    }

    /// Bilinear sample at normalized UV coordinates (0..1, 0..1).
    fn sample(&self, u: f32, v: f32) -> f32 {
        if self.width == 1 && self.height == 1 {
            return self.values[0];
        }

        let u = u.clamp(0.0, 1.0);
        let v = v.clamp(0.0, 1.0);

        let fx = u * (self.width - 1) as f32;
        let fy = v * (self.height - 1) as f32;

        let x0 = (fx as u32).min(self.width.saturating_sub(2));
        let y0 = (fy as u32).min(self.height.saturating_sub(2));
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);

        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;

        let d00 = self.get(x0, y0);
        let d10 = self.get(x1, y0);
        let d01 = self.get(x0, y1);
        let d11 = self.get(x1, y1);

        let d0 = d00 * (1.0 - tx) + d10 * tx;
        let d1 = d01 * (1.0 - tx) + d11 * tx;

        d0 * (1.0 - ty) + d1 * ty
    }
}

/// Maps each pixel of a grid to a vertex index, or -1 for invalid pixels.
///
/// Valid pixels receive sequential indices in row-major scan order, so the
/// highest index plus one equals the vertex count.
pub struct VertexIndexGrid {
    width: u32,
    height: u32,
    cells: Vec<i32>,
    vertex_count: u32,
}

impl VertexIndexGrid {
    /// Sentinel for pixels that map to no vertex
    pub const INVALID: i32 = -1;

    /// Build the mapping from a depth grid and a validity predicate.
    pub fn build<F: Fn(f32) -> bool>(depth: &DepthGrid, valid: F) -> Self {
        let width = depth.width();
        let height = depth.height();
        let mut cells = vec![Self::INVALID; (width * height) as usize];
        let mut next = 0i32;
        for y in 0..height {
            for x in 0..width {
                if valid(depth.get(x, y)) {
                    cells[(y * width + x) as usize] = next;
                    next += 1;
                }
            }
        }
        Self {
            width,
            height,
            cells,
            vertex_count: next as u32,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of valid pixels / vertices
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    /// Raw cell value: a vertex index, or [`Self::INVALID`]
    pub fn cell(&self, x: u32, y: u32) -> i32 {
        self.cells[(y * self.width + x) as usize]
    }

    /// Vertex index of a valid pixel, `None` for invalid ones
    pub fn index(&self, x: u32, y: u32) -> Option<u32> {
        match self.cell(x, y) {
            Self::INVALID => None,
            i => Some(i as u32),
        }
    }
}
