use glam::Vec3;
use noise::{NoiseFn, Perlin};

use crate::mesh::{MeshData, MeshError};

/// Square heightmap terrain sampled from Perlin noise.
///
/// Vertices form a `(resolution + 1)²` grid starting at the origin, two triangles per cell.
pub struct HeightmapTerrain {
    resolution: usize,
    spacing: f32,
    height_limit: f32,
    perlin: Perlin,
}

impl HeightmapTerrain {
    pub fn new(resolution: usize, spacing: f32, seed: u32) -> HeightmapTerrain {
        debug_assert!(resolution > 0, "Terrain needs at least one cell");
        Self {
            resolution,
            spacing,
            height_limit: 16.0,
            perlin: Perlin::new(seed),
        }
    }

    pub fn with_height_limit(mut self, height_limit: f32) -> HeightmapTerrain {
        self.height_limit = height_limit;
        self
    }

    /// Edge length of the terrain on x and z
    pub fn extent(&self) -> f32 {
        self.resolution as f32 * self.spacing
    }

    fn height(&self, x: usize, z: usize) -> f32 {
        // TUNING
        let scale = 0.07;
        // Offset keeps samples off the integer lattice where Perlin is always zero
        let fx = (x as f64 + 0.5) * scale;
        let fz = (z as f64 + 0.5) * scale;
        let noise_val = (self.perlin.get([fx, fz]) as f32).clamp(-1.0, 1.0);
        (noise_val + 1.0) * (self.height_limit / 2.0)
    }

    pub fn generate(&self) -> Result<MeshData, MeshError> {
        let side = self.resolution + 1;
        let index = |x: usize, z: usize| (z * side + x) as u32;

        let heights: Vec<f32> = (0..side)
            .flat_map(|z| (0..side).map(move |x| (x, z)))
            .map(|(x, z)| self.height(x, z))
            .collect();
        let height_at = |x: usize, z: usize| heights[z * side + x];

        let vertices: Vec<Vec3> = (0..side)
            .flat_map(|z| (0..side).map(move |x| (x, z)))
            .map(|(x, z)| {
                Vec3::new(
                    x as f32 * self.spacing,
                    height_at(x, z),
                    z as f32 * self.spacing,
                )
            })
            .collect();

        // Central differences, one sided at the border
        let normals: Vec<Vec3> = (0..side)
            .flat_map(|z| (0..side).map(move |x| (x, z)))
            .map(|(x, z)| {
                let (x0, x1) = (x.saturating_sub(1), (x + 1).min(side - 1));
                let (z0, z1) = (z.saturating_sub(1), (z + 1).min(side - 1));
                let dx = (height_at(x1, z) - height_at(x0, z)) / ((x1 - x0) as f32 * self.spacing);
                let dz = (height_at(x, z1) - height_at(x, z0)) / ((z1 - z0) as f32 * self.spacing);
                Vec3::new(-dx, 1.0, -dz).normalize()
            })
            .collect();

        let mut indices = Vec::with_capacity(self.resolution * self.resolution * 6);
        for z in 0..self.resolution {
            for x in 0..self.resolution {
                let (a, b) = (index(x, z), index(x + 1, z));
                let (c, d) = (index(x + 1, z + 1), index(x, z + 1));
                indices.extend_from_slice(&[a, d, c, c, b, a]);
            }
        }

        MeshData::new(vertices, indices)?.with_normals(normals)
    }
}
