//! glTF / GLB import
//!
//! Reads geometry through the `gltf` crate. Node transforms of the default
//! scene are baked into the vertices, so the result is drawn with a single
//! model matrix. Each triangle primitive becomes one `MeshData` carrying its
//! material's base colour factor and base colour texture.

use super::{AssetError, Material, MeshData, TextureImage};
use gltf::image::Format;
use gltf::mesh::Mode;
use image::{DynamicImage, GrayAlphaImage, GrayImage, RgbImage, RgbaImage};
use macroquad::math::{Mat3, Mat4, Vec2, Vec3};
use std::path::Path;
use std::sync::Arc;

/// Buffers and decoded images shared by every primitive of one file
struct Import<'a> {
    buffers: &'a [gltf::buffer::Data],
    images: Vec<Option<Arc<TextureImage>>>,
}

pub fn load_gltf(path: &Path) -> Result<Vec<MeshData>, AssetError> {
    let (document, buffers, images) = gltf::import(path)?;
    let import = Import {
        buffers: &buffers,
        images: images.into_iter().enumerate().map(|(i, data)| convert_image(i, data)).collect(),
    };
    let mut meshes = Vec::new();

    match document.default_scene().or_else(|| document.scenes().next()) {
        Some(scene) => {
            for node in scene.nodes() {
                collect_node(&node, Mat4::IDENTITY, &import, &mut meshes);
            }
        }
        // No scene graph: take meshes as authored
        None => {
            for mesh in document.meshes() {
                collect_mesh(&mesh, Mat4::IDENTITY, &import, &mut meshes);
            }
        }
    }

    Ok(meshes)
}

fn convert_image(index: usize, data: gltf::image::Data) -> Option<Arc<TextureImage>> {
    let (w, h) = (data.width, data.height);
    let dynamic = match data.format {
        Format::R8 => GrayImage::from_raw(w, h, data.pixels).map(DynamicImage::ImageLuma8),
        Format::R8G8 => GrayAlphaImage::from_raw(w, h, data.pixels).map(DynamicImage::ImageLumaA8),
        Format::R8G8B8 => RgbImage::from_raw(w, h, data.pixels).map(DynamicImage::ImageRgb8),
        Format::R8G8B8A8 => RgbaImage::from_raw(w, h, data.pixels).map(DynamicImage::ImageRgba8),
        other => {
            log::warn!("image {}: {:?} pixels not supported, ignoring", index, other);
            return None;
        }
    };
    let Some(dynamic) = dynamic else {
        log::warn!("image {}: pixel data does not match {}x{}", index, w, h);
        return None;
    };
    match TextureImage::from_rgba(dynamic.to_rgba8()) {
        Ok(image) => Some(Arc::new(image)),
        Err(e) => {
            log::warn!("image {}: {}", index, e);
            None
        }
    }
}

fn convert_material(material: gltf::Material, import: &Import) -> Material {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();
    let texture = pbr
        .base_color_texture()
        .and_then(|info| import.images.get(info.texture().source().index()).cloned().flatten());
    Material {
        color: [to_u8(r), to_u8(g), to_u8(b), to_u8(a)],
        texture,
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn collect_node(node: &gltf::Node, parent: Mat4, import: &Import, out: &mut Vec<MeshData>) {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        collect_mesh(&mesh, transform, import, out);
    }
    for child in node.children() {
        collect_node(&child, transform, import, out);
    }
}

fn collect_mesh(mesh: &gltf::Mesh, transform: Mat4, import: &Import, out: &mut Vec<MeshData>) {
    let normal_matrix = Mat3::from_mat4(transform).inverse().transpose();

    for primitive in mesh.primitives() {
        if primitive.mode() != Mode::Triangles {
            log::debug!(
                "skipping {:?} primitive in mesh {}",
                primitive.mode(),
                mesh.name().unwrap_or("<unnamed>")
            );
            continue;
        }

        let reader = primitive.reader(|buffer| import.buffers.get(buffer.index()).map(|data| data.0.as_slice()));
        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let positions: Vec<Vec3> = positions
            .map(|p| transform.transform_point3(Vec3::from(p)))
            .collect();

        let normals = reader
            .read_normals()
            .map(|normals| {
                normals
                    .map(|n| (normal_matrix * Vec3::from(n)).normalize_or_zero())
                    .collect()
            })
            .unwrap_or_default();
        let uvs = reader
            .read_tex_coords(0)
            .map(|uvs| uvs.into_f32().map(Vec2::from).collect())
            .unwrap_or_default();
        let colors = reader
            .read_colors(0)
            .map(|colors| colors.into_rgba_u8().collect())
            .unwrap_or_default();
        let indices = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        // Primitives without a material use the glTF default, which the
        // viewer's texture stands in for
        let material = primitive
            .material()
            .index()
            .map(|_| convert_material(primitive.material(), import));

        out.push(MeshData {
            positions,
            normals,
            uvs,
            colors,
            indices,
            material,
        });
    }
}
