//! Texture loading
//!
//! Images are decoded with the `image` crate into RGBA8 and uploaded as a
//! macroquad `Texture2D`. Decoding is split from upload so it can be
//! checked without a GL context.

use super::AssetError;
use macroquad::texture::{FilterMode, Texture2D};
use std::path::Path;

/// Decoded RGBA8 pixels, ready for upload
#[derive(Clone, Debug, PartialEq)]
pub struct TextureImage {
    pub width: u16,
    pub height: u16,
    pub rgba: Vec<u8>,
}

pub fn decode_texture(path: &Path) -> Result<TextureImage, AssetError> {
    TextureImage::from_rgba(image::open(path)?.to_rgba8())
}

impl TextureImage {
    pub fn from_rgba(rgba: image::RgbaImage) -> Result<Self, AssetError> {
        let (width, height) = rgba.dimensions();

        // macroquad takes u16 dimensions
        let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
            return Err(AssetError::TextureTooLarge { width, height });
        };

        Ok(TextureImage {
            width: w,
            height: h,
            rgba: rgba.into_raw(),
        })
    }

    /// Upload to the GPU. Needs the window's GL context.
    pub fn upload(&self) -> Texture2D {
        let texture = Texture2D::from_rgba8(self.width, self.height, &self.rgba);
        texture.set_filter(FilterMode::Linear);
        texture
    }
}

/// Decode and upload. Needs the window's GL context.
pub fn load_texture(path: &Path) -> Result<Texture2D, AssetError> {
    let image = decode_texture(path)?;
    let texture = image.upload();
    log::info!(
        "Loaded texture {} ({}x{})",
        path.display(),
        image.width,
        image.height
    );
    Ok(texture)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png_to_rgba8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("checker.png");
        let img = image::RgbaImage::from_fn(4, 2, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgba([255, 255, 255, 255])
            } else {
                image::Rgba([0, 0, 0, 0])
            }
        });
        img.save(&path).unwrap();

        let decoded = decode_texture(&path).unwrap();
        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.rgba.len(), 4 * 2 * 4);
        assert_eq!(&decoded.rgba[0..4], &[255, 255, 255, 255]);
        assert_eq!(&decoded.rgba[4..8], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_grayscale_is_expanded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::from_pixel(3, 3, image::Luma([128])).save(&path).unwrap();

        let decoded = decode_texture(&path).unwrap();
        assert_eq!(&decoded.rgba[0..4], &[128, 128, 128, 255]);
    }

    #[test]
    fn test_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        assert!(matches!(decode_texture(&path), Err(AssetError::Image(_))));
    }
}
