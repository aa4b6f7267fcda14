//! The loaded model and texture
//!
//! Owns both handles and swaps them when files are dropped onto the
//! window. A failed load leaves the current asset in place and records the
//! error for the status line.

use crate::asset::{load_texture, AssetError, Model};
use crate::drop::DropAction;
use crate::draw::with_model_matrix;
use crate::picking::BoundingBox;
use macroquad::math::Mat4;
use macroquad::texture::Texture2D;
use std::path::{Path, PathBuf};

pub struct Scene {
    model: Model,
    texture: Option<Texture2D>,
    texture_path: Option<PathBuf>,
    /// First mesh bounds, model space
    bounds: BoundingBox,
    last_error: Option<String>,
}

impl Scene {
    /// Startup load. The model is required; a texture that fails to load
    /// only produces a warning.
    pub fn load(model_path: &Path, texture_path: Option<&Path>) -> Result<Self, AssetError> {
        let model = Model::load(model_path)?;
        let mut scene = Self::with_model(model);
        if let Some(path) = texture_path {
            if let Err(e) = scene.replace_texture(path) {
                log::warn!("Continuing without texture: {}", e);
            }
        }
        Ok(scene)
    }

    pub fn with_model(model: Model) -> Self {
        let bounds = model.bounds();
        Self {
            model,
            texture: None,
            texture_path: None,
            bounds,
            last_error: None,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    /// Swap in a new model, keeping the current texture
    pub fn replace_model(&mut self, path: &Path) -> Result<(), AssetError> {
        let mut model = Model::load(path)?;
        model.set_texture(self.texture.as_ref());
        self.bounds = model.bounds();
        self.model = model;
        Ok(())
    }

    /// Swap in a new texture and apply it to the model
    pub fn replace_texture(&mut self, path: &Path) -> Result<(), AssetError> {
        let texture = load_texture(path)?;
        self.model.set_texture(Some(&texture));
        self.texture = Some(texture);
        self.texture_path = Some(path.to_path_buf());
        Ok(())
    }

    /// Apply a classified drop. Returns true if the model was replaced.
    pub fn apply_drop(&mut self, action: &DropAction) -> bool {
        match action {
            DropAction::Nothing => false,
            DropAction::LoadModel(path) => match self.replace_model(path) {
                Ok(()) => {
                    self.last_error = None;
                    true
                }
                Err(e) => {
                    self.fail(path, e);
                    false
                }
            },
            DropAction::LoadTexture(path) => {
                match self.replace_texture(path) {
                    Ok(()) => self.last_error = None,
                    Err(e) => self.fail(path, e),
                }
                false
            }
            DropAction::Unsupported(path) => {
                log::info!("Ignoring dropped file {}", path.display());
                false
            }
            DropAction::MultipleFiles(n) => {
                log::debug!("Ignoring drop of {} files, drop one at a time", n);
                false
            }
            DropAction::NoPath => {
                log::debug!("Ignoring dropped data without a file path");
                false
            }
        }
    }

    fn fail(&mut self, path: &Path, error: AssetError) {
        log::error!("Failed to load {}: {}", path.display(), error);
        self.last_error = Some(format!("{}: {}", file_name(path), error));
    }

    /// Draw the model under `model_matrix`. Needs an active 3D camera.
    pub fn draw(&self, model_matrix: Mat4) {
        with_model_matrix(model_matrix, || self.model.draw());
    }

    pub fn status_line(&self) -> String {
        let texture = self
            .texture_path
            .as_deref()
            .map(file_name)
            .unwrap_or_else(|| "no texture".to_string());
        let mut line = format!("{} | {}", self.model.name, texture);
        if let Some(err) = &self.last_error {
            line.push_str(" | ");
            line.push_str(err);
        }
        line
    }
}

#[cfg(test)]
impl Scene {
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
