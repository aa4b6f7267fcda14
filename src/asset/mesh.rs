//! CPU-side mesh representation produced by the loaders
//!
//! Loaders hand back `MeshData` with 32-bit indices. macroquad draws
//! `Mesh` values with 16-bit indices and a bounded batch size, so each
//! mesh is cut into batches before upload.

use super::TextureImage;
use crate::picking::BoundingBox;
use macroquad::models::Vertex;
use macroquad::prelude::{Color, Vec2, Vec3, WHITE};
use std::collections::HashMap;
use std::sync::Arc;

/// Per-batch limits, kept below macroquad's default draw call capacity
/// (10000 vertices, 5000 indices)
pub const MAX_BATCH_VERTICES: usize = 8000;
pub const MAX_BATCH_INDICES: usize = 4800;

/// Material authored in the model file (glTF base colour, OBJ `.mtl`)
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Multiplied into every vertex colour
    pub color: [u8; 4],
    /// Diffuse map, shared between meshes using the same image
    pub texture: Option<Arc<TextureImage>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: [255, 255, 255, 255],
            texture: None,
        }
    }
}

/// Indexed triangle mesh.
///
/// `normals`, `uvs` and `colors` are either empty or one entry per position.
/// Meshes without a `material` take the viewer's texture.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<[u8; 4]>,
    pub indices: Vec<u32>,
    pub material: Option<Material>,
}

/// One drawable chunk of a mesh
#[derive(Clone, Default)]
pub struct MeshBatch {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Non-empty, whole triangles, every index in range
    pub fn is_valid(&self) -> bool {
        let n = self.positions.len();
        !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
            && (self.uvs.is_empty() || self.uvs.len() == n)
            && (self.colors.is_empty() || self.colors.len() == n)
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_points(self.positions.iter().copied())
    }

    fn vertex(&self, index: usize) -> Vertex {
        let p = self.positions[index];
        let uv = self.uvs.get(index).copied().unwrap_or(Vec2::ZERO);
        let mut color = self
            .colors
            .get(index)
            .map(|&[r, g, b, a]| Color::from_rgba(r, g, b, a))
            .unwrap_or(WHITE);
        if let Some(material) = &self.material {
            let [r, g, b, a] = material.color;
            color.r *= r as f32 / 255.0;
            color.g *= g as f32 / 255.0;
            color.b *= b as f32 / 255.0;
            color.a *= a as f32 / 255.0;
        }
        Vertex::new(p.x, p.y, p.z, uv.x, uv.y, color)
    }

    pub fn batches(&self) -> Vec<MeshBatch> {
        self.batches_with_limits(MAX_BATCH_VERTICES, MAX_BATCH_INDICES)
    }

    /// Split into batches without cutting triangles apart.
    ///
    /// Vertices shared by triangles in the same batch stay shared; a vertex
    /// used across a batch boundary is duplicated.
    pub fn batches_with_limits(&self, max_vertices: usize, max_indices: usize) -> Vec<MeshBatch> {
        let max_vertices = max_vertices.clamp(3, u16::MAX as usize);
        let max_indices = max_indices.max(3);

        let mut batches = Vec::new();
        let mut current = MeshBatch::default();
        let mut remap: HashMap<u32, u16> = HashMap::new();

        for tri in self.indices.chunks_exact(3) {
            let new_vertices = tri.iter().filter(|&&i| !remap.contains_key(&i)).count();
            if current.indices.len() + 3 > max_indices
                || current.vertices.len() + new_vertices > max_vertices
            {
                batches.push(std::mem::take(&mut current));
                remap.clear();
            }

            for &index in tri {
                let local = match remap.get(&index) {
                    Some(&local) => local,
                    None => {
                        let local = current.vertices.len() as u16;
                        current.vertices.push(self.vertex(index as usize));
                        remap.insert(index, local);
                        local
                    }
                };
                current.indices.push(local);
            }
        }

        if !current.indices.is_empty() {
            batches.push(current);
        }
        batches
    }
}
