//! MagicaVoxel VOX import
//!
//! `dot_vox` parses the file; each voxel model is turned into a cube mesh
//! with the faces between two occupied cells dropped. Palette colours
//! become vertex colours.
//!
//! MagicaVoxel is Z-up. Cell (x, y, z) maps to the Y-up cell
//! (x, z, -y - 1), and the model is centred on X/Z with its base at y = 0.

use super::{AssetError, MeshData};
use macroquad::math::{vec2, vec3, IVec3, Vec3};
use std::collections::HashSet;
use std::path::Path;

/// A voxel already converted to Y-up cell coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub pos: IVec3,
    pub color: [u8; 4],
}

/// Unit cube faces: neighbour offset and four corners, counter-clockwise
/// seen from outside
const FACES: [(IVec3, [Vec3; 4]); 6] = [
    (IVec3::X, [Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 0.0, 1.0)]),
    (IVec3::NEG_X, [Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 1.0), Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, 1.0, 0.0)]),
    (IVec3::Y, [Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(1.0, 1.0, 0.0)]),
    (IVec3::NEG_Y, [Vec3::new(0.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 1.0), Vec3::new(0.0, 0.0, 1.0)]),
    (IVec3::Z, [Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 1.0), Vec3::new(1.0, 1.0, 1.0), Vec3::new(0.0, 1.0, 1.0)]),
    (IVec3::NEG_Z, [Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)]),
];

pub fn load_vox(path: &Path) -> Result<Vec<MeshData>, AssetError> {
    let path_str = path
        .to_str()
        .ok_or_else(|| AssetError::Vox(format!("non UTF-8 path {}", path.display())))?;
    let data = dot_vox::load(path_str).map_err(|e| AssetError::Vox(e.to_string()))?;

    let meshes = data
        .models
        .iter()
        .map(|model| {
            let cells: Vec<Cell> = model
                .voxels
                .iter()
                .map(|v| {
                    let color = data
                        .palette
                        .get(v.i as usize)
                        .map(|c| [c.r, c.g, c.b, c.a])
                        .unwrap_or([255, 255, 255, 255]);
                    to_y_up(v.x, v.y, v.z, color)
                })
                .collect();
            voxel_mesh(&cells, [model.size.x, model.size.y])
        })
        .collect();
    Ok(meshes)
}

pub fn to_y_up(x: u8, y: u8, z: u8, color: [u8; 4]) -> Cell {
    Cell {
        pos: IVec3::new(x as i32, z as i32, -(y as i32) - 1),
        color,
    }
}

/// Build a cube mesh from Y-up cells. `footprint` is the model's
/// MagicaVoxel X/Y size, used for centring.
pub fn voxel_mesh(cells: &[Cell], footprint: [u32; 2]) -> MeshData {
    let occupied: HashSet<IVec3> = cells.iter().map(|c| c.pos).collect();
    // Y-up Z runs from -size_y to 0
    let offset = vec3(-(footprint[0] as f32) * 0.5, 0.0, footprint[1] as f32 * 0.5);

    let mut mesh = MeshData::default();
    for cell in cells {
        let origin = cell.pos.as_vec3() + offset;
        for (dir, corners) in FACES.iter() {
            if occupied.contains(&(cell.pos + *dir)) {
                continue;
            }
            let base = mesh.positions.len() as u32;
            for corner in corners {
                mesh.positions.push(origin + *corner);
                mesh.normals.push(dir.as_vec3());
                mesh.colors.push(cell.color);
            }
            mesh.uvs.extend_from_slice(&[vec2(0.0, 1.0), vec2(1.0, 1.0), vec2(1.0, 0.0), vec2(0.0, 0.0)]);
            mesh.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
    }
    mesh
}
