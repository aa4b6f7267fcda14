//! Model and texture loading
//!
//! Each supported format has its own importer producing `MeshData`, the
//! format-neutral geometry the viewer draws and picks against. `Model`
//! owns those meshes plus their GPU batches.
//!
//! ```text
//! .obj       -> obj_import  (tobj)
//! .gltf/.glb -> gltf_import (gltf)
//! .vox       -> vox_import  (dot_vox)
//! .png/.jpg/.bmp -> texture (image)
//! ```

mod gltf_import;
mod mesh;
mod model;
mod obj_import;
mod texture;
mod vox_import;

pub use gltf_import::load_gltf;
pub use mesh::*;
pub use model::Model;
pub use obj_import::load_obj;
pub use texture::{decode_texture, load_texture, TextureImage};
pub use vox_import::load_vox;

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("OBJ load failed: {0}")]
    Obj(#[from] tobj::LoadError),
    #[error("glTF load failed: {0}")]
    Gltf(#[from] gltf::Error),
    #[error("VOX load failed: {0}")]
    Vox(String),
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
    #[error("{0} contains no drawable meshes")]
    Empty(String),
    #[error("texture is {width}x{height}, max side is 65535")]
    TextureTooLarge { width: u32, height: u32 },
}

/// Model file types recognised by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelFormat {
    Obj,
    Gltf,
    Glb,
    Vox,
    /// Recognised but no importer
    Iqm,
    /// Recognised but no importer
    M3d,
}

impl ModelFormat {
    pub const ALL: [ModelFormat; 6] = [
        ModelFormat::Obj,
        ModelFormat::Gltf,
        ModelFormat::Glb,
        ModelFormat::Vox,
        ModelFormat::Iqm,
        ModelFormat::M3d,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            ModelFormat::Obj => "obj",
            ModelFormat::Gltf => "gltf",
            ModelFormat::Glb => "glb",
            ModelFormat::Vox => "vox",
            ModelFormat::Iqm => "iqm",
            ModelFormat::M3d => "m3d",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = extension_lowercase(path)?;
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureFormat {
    Png,
    Jpeg,
    Bmp,
}

impl TextureFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        match extension_lowercase(path)?.as_str() {
            "png" => Some(TextureFormat::Png),
            "jpg" | "jpeg" => Some(TextureFormat::Jpeg),
            "bmp" => Some(TextureFormat::Bmp),
            _ => None,
        }
    }
}

fn extension_lowercase(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Load raw meshes from a model file, dispatching on its extension
pub fn load_meshes(path: &Path) -> Result<Vec<MeshData>, AssetError> {
    match ModelFormat::from_path(path) {
        Some(ModelFormat::Obj) => load_obj(path),
        Some(ModelFormat::Gltf | ModelFormat::Glb) => load_gltf(path),
        Some(ModelFormat::Vox) => load_vox(path),
        Some(format @ (ModelFormat::Iqm | ModelFormat::M3d)) => Err(AssetError::UnsupportedFormat(
            format!("{} ({} models are not supported)", path.display(), format.extension()),
        )),
        None => Err(AssetError::UnsupportedFormat(path.display().to_string())),
    }
}
