//! Dropped-file classification
//!
//! macroquad reports files dropped onto the window once per frame. Only a
//! single file per drop is acted on; its extension decides whether it
//! replaces the model or the texture.

use crate::asset::{ModelFormat, TextureFormat};
use std::path::{Path, PathBuf};

/// What to do with this frame's drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropAction {
    /// Nothing was dropped
    Nothing,
    LoadModel(PathBuf),
    LoadTexture(PathBuf),
    /// Single file with an extension we don't handle
    Unsupported(PathBuf),
    /// More than one file; ignored
    MultipleFiles(usize),
    /// Dropped data without a filesystem path (web builds)
    NoPath,
}

/// Classify the dropped file list (`None` entries carry no path)
pub fn classify_drop(paths: &[Option<PathBuf>]) -> DropAction {
    match paths {
        [] => DropAction::Nothing,
        [None] => DropAction::NoPath,
        [Some(path)] => classify_path(path),
        many => DropAction::MultipleFiles(many.len()),
    }
}

pub fn classify_path(path: &Path) -> DropAction {
    if ModelFormat::from_path(path).is_some() {
        DropAction::LoadModel(path.to_path_buf())
    } else if TextureFormat::from_path(path).is_some() {
        DropAction::LoadTexture(path.to_path_buf())
    } else {
        DropAction::Unsupported(path.to_path_buf())
    }
}

/// Paths of the files dropped since the last frame
pub fn poll_dropped() -> Vec<Option<PathBuf>> {
    macroquad::input::get_dropped_files()
        .into_iter()
        .map(|file| file.path)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(name: &str) -> DropAction {
        classify_drop(&[Some(PathBuf::from(name))])
    }

    #[test]
    fn test_empty_drop() {
        assert_eq!(classify_drop(&[]), DropAction::Nothing);
    }

    #[test]
    fn test_model_extensions() {
        for name in ["castle.obj", "coin.GLB", "scene.gltf", "chr_knight.vox", "guy.iqm", "suzanne.m3d"] {
            assert_eq!(one(name), DropAction::LoadModel(PathBuf::from(name)), "{}", name);
        }
    }

    #[test]
    fn test_texture_extensions() {
        assert_eq!(one("/tmp/wabbit.PNG"), DropAction::LoadTexture(PathBuf::from("/tmp/wabbit.PNG")));
        assert_eq!(one("diffuse.jpg"), DropAction::LoadTexture(PathBuf::from("diffuse.jpg")));
    }

    #[test]
    fn test_other_files_are_unsupported() {
        assert_eq!(one("notes.txt"), DropAction::Unsupported(PathBuf::from("notes.txt")));
        assert_eq!(one("Makefile"), DropAction::Unsupported(PathBuf::from("Makefile")));
    }

    #[test]
    fn test_multiple_files_are_ignored() {
        let paths = vec![Some(PathBuf::from("a.obj")), Some(PathBuf::from("a.png"))];
        assert_eq!(classify_drop(&paths), DropAction::MultipleFiles(2));
    }

    #[test]
    fn test_pathless_drop() {
        assert_eq!(classify_drop(&[None]), DropAction::NoPath);
    }
}
