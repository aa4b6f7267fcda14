//! Drawing helpers: axes gizmo, bounding box, model matrix scope and HUD

use crate::picking::BoundingBox;
use macroquad::prelude::*;

/// Background colour
pub const RAYWHITE: Color = Color::new(245.0 / 255.0, 245.0 / 255.0, 245.0 / 255.0, 1.0);

const HUD_FONT: f32 = 16.0;
const HINT: &str = "Drag & drop model to load mesh/texture.";

/// One line of the axes gizmo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
}

/// Axis lines from the origin with a two-stroke arrowhead at each tip.
/// X is red, Y green, Z blue.
pub fn axis_segments(scale: f32) -> [Segment; 9] {
    let head = scale / 10.0;
    let axis = |dir: Vec3, side: Vec3, color: Color| {
        let tip = dir * scale;
        let back = tip - dir * head;
        [
            Segment { start: Vec3::ZERO, end: tip, color },
            Segment { start: tip, end: back + side * head, color },
            Segment { start: tip, end: back - side * head, color },
        ]
    };
    // Heads lie in the XZ plane for X and Z, and in the YZ plane for Y
    let [x0, x1, x2] = axis(Vec3::X, Vec3::Z, RED);
    let [y0, y1, y2] = axis(Vec3::Y, Vec3::Z, GREEN);
    let [z0, z1, z2] = axis(Vec3::Z, Vec3::X, BLUE);
    [x0, x1, x2, y0, y1, y2, z0, z1, z2]
}

pub fn draw_axes(scale: f32) {
    for segment in axis_segments(scale) {
        draw_line_3d(segment.start, segment.end, segment.color);
    }
}

pub fn draw_bounds(bounds: &BoundingBox, color: Color) {
    if !bounds.is_empty() {
        draw_cube_wires(bounds.center(), bounds.size(), color);
    }
}

/// Run `draw` with `matrix` pushed onto the model matrix stack
pub fn with_model_matrix(matrix: Mat4, draw: impl FnOnce()) {
    unsafe {
        get_internal_gl().quad_gl.push_model_matrix(matrix);
    }
    draw();
    unsafe {
        get_internal_gl().quad_gl.pop_model_matrix();
    }
}

/// 2D overlay, drawn after `set_default_camera`
pub fn draw_hud(selected: bool, status: &str) {
    let (w, h) = (screen_width(), screen_height());

    draw_text(&format!("FPS: {}", get_fps()), 10.0, 10.0 + HUD_FONT, HUD_FONT + 4.0, LIME);
    draw_text(HINT, 10.0, h - 12.0, HUD_FONT, DARKGRAY);
    draw_text(status, 10.0, h - 12.0 - HUD_FONT - 4.0, HUD_FONT, GRAY);

    if selected {
        let label = "MODEL SELECTED";
        let dims = measure_text(label, None, HUD_FONT as u16, 1.0);
        draw_text(label, w - dims.width - 10.0, 10.0 + HUD_FONT, HUD_FONT, GREEN);
    }
}
