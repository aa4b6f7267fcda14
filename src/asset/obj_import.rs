//! OBJ import
//!
//! Parsing is done by `tobj`; this module only converts its flat arrays
//! into `MeshData`. Faces are triangulated and re-indexed so positions,
//! normals and texture coordinates share one index buffer.

use super::{decode_texture, AssetError, Material, MeshData, TextureImage};
use macroquad::math::{vec2, vec3};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Load an OBJ file, one `MeshData` per object/group
pub fn load_obj(path: &Path) -> Result<Vec<MeshData>, AssetError> {
    let options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options)?;

    let materials = match materials {
        Ok(materials) => {
            let base_dir = path.parent().unwrap_or(Path::new(""));
            convert_materials(&materials, base_dir)
        }
        // No .mtl: the viewer's texture is used instead
        Err(e) => {
            log::debug!("{}: materials not loaded: {}", path.display(), e);
            Vec::new()
        }
    };

    Ok(models
        .into_iter()
        .map(|model| {
            let material = model.mesh.material_id.and_then(|id| materials.get(id).cloned());
            convert_mesh(model.mesh, material)
        })
        .collect())
}

/// `Kd`, `d` and `map_Kd` of each `.mtl` entry. Texture paths are relative
/// to the OBJ file.
fn convert_materials(materials: &[tobj::Material], base_dir: &Path) -> Vec<Material> {
    let mut images: HashMap<&str, Option<Arc<TextureImage>>> = HashMap::new();

    materials
        .iter()
        .map(|mtl| {
            let [r, g, b] = mtl.diffuse.unwrap_or([1.0, 1.0, 1.0]);
            let alpha = mtl.dissolve.unwrap_or(1.0);
            let texture = mtl.diffuse_texture.as_deref().and_then(|name| {
                images
                    .entry(name)
                    .or_insert_with(|| {
                        let path = base_dir.join(name);
                        match decode_texture(&path) {
                            Ok(image) => Some(Arc::new(image)),
                            Err(e) => {
                                log::warn!("Material {}: cannot load {}: {}", mtl.name, path.display(), e);
                                None
                            }
                        }
                    })
                    .clone()
            });
            Material {
                color: [to_u8(r), to_u8(g), to_u8(b), to_u8(alpha)],
                texture,
            }
        })
        .collect()
}

fn convert_mesh(mesh: tobj::Mesh, material: Option<Material>) -> MeshData {
    let positions = mesh
        .positions
        .chunks_exact(3)
        .map(|p| vec3(p[0], p[1], p[2]))
        .collect();
    let normals = mesh
        .normals
        .chunks_exact(3)
        .map(|n| vec3(n[0], n[1], n[2]))
        .collect();
    // OBJ puts v=0 at the bottom of the image, macroquad at the top
    let uvs = mesh
        .texcoords
        .chunks_exact(2)
        .map(|t| vec2(t[0], 1.0 - t[1]))
        .collect();
    let colors = mesh
        .vertex_color
        .chunks_exact(3)
        .map(|c| [to_u8(c[0]), to_u8(c[1]), to_u8(c[2]), 255])
        .collect();

    MeshData {
        positions,
        normals,
        uvs,
        colors,
        indices: mesh.indices,
        material,
    }
}

fn to_u8(channel: f32) -> u8 {
    (channel.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_obj(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.obj");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn test_quad_is_triangulated() {
        let (_dir, path) = write_obj(
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
             vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
             f 1/1 2/2 3/3 4/4\n",
        );
        let meshes = load_obj(&path).unwrap();
        assert_eq!(meshes.len(), 1);
        let mesh = &meshes[0];
        assert!(mesh.is_valid());
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.uvs.len(), 4);
    }

    #[test]
    fn test_texture_v_is_flipped() {
        let (_dir, path) = write_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0.25\nf 1/1 2/1 3/1\n");
        let mesh = &load_obj(&path).unwrap()[0];
        assert!(mesh.uvs.iter().all(|uv| (uv.y - 0.75).abs() < 1e-6));
    }

    #[test]
    fn test_groups_become_separate_meshes() {
        let (_dir, path) = write_obj(
            "o first\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n\
             o second\nv 0 0 5\nv 1 0 5\nv 0 1 5\nf 4 5 6\n",
        );
        let meshes = load_obj(&path).unwrap();
        assert_eq!(meshes.len(), 2);
        assert_eq!(meshes[1].bounds().min.z, 5.0);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_obj(&dir.path().join("missing.obj")).unwrap_err();
        assert!(matches!(err, AssetError::Obj(_)));
    }

    #[test]
    fn test_mtl_material_is_loaded() {
        let (dir, path) = write_obj(
            "mtllib model.mtl\n\
             v 0 0 0\nv 1 0 0\nv 0 1 0\nvt 0 0\n\
             usemtl brick\nf 1/1 2/1 3/1\n",
        );
        std::fs::write(dir.path().join("model.mtl"), "newmtl brick\nKd 1.0 0.0 0.0\nmap_Kd brick.png\n").unwrap();
        image::RgbaImage::from_pixel(2, 2, image::Rgba([0, 255, 0, 255]))
            .save(dir.path().join("brick.png"))
            .unwrap();

        let mesh = &load_obj(&path).unwrap()[0];
        let material = mesh.material.as_ref().unwrap();
        assert_eq!(material.color, [255, 0, 0, 255]);
        let texture = material.texture.as_ref().unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert_eq!(&texture.rgba[0..4], &[0, 255, 0, 255]);
    }

    #[test]
    fn test_missing_map_keeps_colour() {
        let (dir, path) = write_obj(
            "mtllib model.mtl\nv 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl glass\nf 1 2 3\n",
        );
        std::fs::write(dir.path().join("model.mtl"), "newmtl glass\nKd 0 0 1\nd 0.5\nmap_Kd gone.png\n").unwrap();

        let material = load_obj(&path).unwrap()[0].material.clone().unwrap();
        assert_eq!(material.color, [0, 0, 255, 128]);
        assert!(material.texture.is_none());
    }

    #[test]
    fn test_no_mtl_means_no_material() {
        let (_dir, path) = write_obj("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n");
        assert!(load_obj(&path).unwrap()[0].material.is_none());
    }

    #[test]
    fn test_color_channel_conversion() {
        assert_eq!(to_u8(0.0), 0);
        assert_eq!(to_u8(1.0), 255);
        assert_eq!(to_u8(2.0), 255);
        assert_eq!(to_u8(0.5), 128);
    }
}
