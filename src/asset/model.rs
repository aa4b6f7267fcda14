//! Loaded model: CPU meshes plus the macroquad batches drawn each frame

use super::{load_meshes, AssetError, MeshData, TextureImage};
use crate::picking::BoundingBox;
use macroquad::models::{draw_mesh, Mesh};
use macroquad::texture::Texture2D;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

struct Batch {
    mesh: Mesh,
    /// Uses a material from the model file; never takes the viewer texture
    own_material: bool,
}

pub struct Model {
    pub name: String,
    meshes: Vec<MeshData>,
    batches: Vec<Batch>,
}

impl Model {
    /// Load from any supported model file
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let model = Self::from_meshes(name, load_meshes(path)?)?;
        log::info!(
            "Loaded model {} ({} meshes, {} triangles, {} draw batches)",
            path.display(),
            model.meshes.len(),
            model.triangle_count(),
            model.batches.len()
        );
        Ok(model)
    }

    /// Build from loader output. Invalid meshes are dropped; a model with
    /// nothing drawable left is an error. Material textures are uploaded
    /// here, once per image.
    pub fn from_meshes(name: String, meshes: Vec<MeshData>) -> Result<Self, AssetError> {
        let total = meshes.len();
        let meshes: Vec<MeshData> = meshes.into_iter().filter(MeshData::is_valid).collect();
        if meshes.len() < total {
            log::warn!("{}: skipped {} malformed meshes", name, total - meshes.len());
        }
        if meshes.is_empty() {
            return Err(AssetError::Empty(name));
        }

        let mut uploaded: HashMap<*const TextureImage, Texture2D> = HashMap::new();
        let mut batches = Vec::new();
        for mesh in &meshes {
            let own_material = mesh.material.is_some();
            let texture = mesh
                .material
                .as_ref()
                .and_then(|m| m.texture.as_ref())
                .map(|image| {
                    uploaded
                        .entry(Arc::as_ptr(image))
                        .or_insert_with(|| image.upload())
                        .clone()
                });
            for batch in mesh.batches() {
                batches.push(Batch {
                    own_material,
                    mesh: Mesh {
                        vertices: batch.vertices,
                        indices: batch.indices,
                        texture: texture.clone(),
                    },
                });
            }
        }

        Ok(Self { name, meshes, batches })
    }

    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(MeshData::triangle_count).sum()
    }

    /// Model-space bounds of the first mesh, the pick target
    pub fn bounds(&self) -> BoundingBox {
        self.meshes
            .first()
            .map(MeshData::bounds)
            .unwrap_or(BoundingBox::EMPTY)
    }

    /// Set (or clear) the viewer texture. Meshes with a material of their
    /// own keep it.
    pub fn set_texture(&mut self, texture: Option<&Texture2D>) {
        for batch in self.batches.iter_mut().filter(|b| !b.own_material) {
            batch.mesh.texture = texture.cloned();
        }
    }

    /// Draw with the current camera and model matrix
    pub fn draw(&self) {
        for batch in &self.batches {
            draw_mesh(&batch.mesh);
        }
    }
}

#[cfg(test)]
impl Model {
    pub fn meshes(&self) -> &[MeshData] {
        &self.meshes
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn textured_batch_count(&self) -> usize {
        self.batches.iter().filter(|b| b.mesh.texture.is_some()).count()
    }
}
