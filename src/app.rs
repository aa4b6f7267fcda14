//! Viewer state and per-frame update
//!
//! Everything that changes from one frame to the next in response to input:
//! camera movement and look, model rotation, selection. Reads a
//! `FrameInput` snapshot and never touches macroquad's input directly.

use crate::camera::FreeCamera;
use crate::config::ViewerConfig;
use crate::input::{Action, FrameInput};
use crate::picking::{screen_to_world_ray, BoundingBox};
use macroquad::math::{Mat4, Vec2, Vec3};

/// Side effects the frame loop has to carry out after an update
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Update {
    pub quit: bool,
    /// Cursor grab changed; apply `Viewer::cursor_grabbed` to the window
    pub cursor_toggled: bool,
}

pub struct Viewer {
    pub camera: FreeCamera,
    pub model_position: Vec3,
    /// Euler angles in degrees, applied X then Y then Z
    pub model_rotation: Vec3,
    pub selected: bool,
    /// Cursor hidden and locked; mouse motion turns the camera
    pub cursor_grabbed: bool,

    move_speed: f32,
    look_sensitivity: f32,
    rotation_speed: f32,
}

impl Viewer {
    pub fn new(config: &ViewerConfig) -> Self {
        let cam = &config.camera;
        Self {
            camera: FreeCamera::new(
                Vec3::from(cam.position),
                Vec3::from(cam.target),
                Vec3::Y,
                cam.fovy_deg,
            ),
            model_position: Vec3::ZERO,
            model_rotation: Vec3::ZERO,
            selected: false,
            cursor_grabbed: config.input.grab_cursor,
            move_speed: cam.move_speed,
            look_sensitivity: cam.look_sensitivity,
            rotation_speed: config.model.rotation_speed_deg,
        }
    }

    /// Apply one frame of keyboard and mouse input
    pub fn update(&mut self, input: &FrameInput) -> Update {
        let mut result = Update::default();
        if input.pressed(Action::Quit) {
            result.quit = true;
            return result;
        }

        let dt = input.frame_time;
        self.camera.refresh_right();

        if input.pressed(Action::ResetCamera) {
            self.camera.reset();
            log::debug!("camera reset");
        }

        self.fly(input, self.move_speed * dt);

        if input.pressed(Action::ToggleCursor) {
            self.cursor_grabbed = !self.cursor_grabbed;
            result.cursor_toggled = true;
        } else if self.cursor_grabbed {
            let yaw = -input.mouse_delta.x * self.look_sensitivity * dt;
            let pitch = -input.mouse_delta.y * self.look_sensitivity * dt;
            self.camera.look(yaw, pitch);
        }

        let step = self.rotation_speed * dt;
        if input.down(Action::RotateModelX) {
            self.model_rotation.x += step;
        }
        if input.down(Action::RotateModelY) {
            self.model_rotation.y += step;
        }
        if input.down(Action::RotateModelZ) {
            self.model_rotation.z += step;
        }

        result
    }

    fn fly(&mut self, input: &FrameInput, distance: f32) {
        let cam = &self.camera;
        let mut delta = Vec3::ZERO;
        if input.down(Action::MoveForward) {
            delta += cam.direction;
        }
        if input.down(Action::MoveBackward) {
            delta -= cam.direction;
        }
        if input.down(Action::MoveLeft) {
            delta -= cam.right;
        }
        if input.down(Action::MoveRight) {
            delta += cam.right;
        }
        if input.down(Action::FlyUp) {
            delta += Vec3::Y;
        }
        if input.down(Action::FlyDown) {
            delta -= Vec3::Y;
        }
        self.camera.translate(delta * distance);
    }

    /// Left click: a hit on `bounds` toggles selection, a miss clears it.
    /// Returns true when a click was processed.
    pub fn handle_click(&mut self, input: &FrameInput, bounds: &BoundingBox, screen: Vec2) -> bool {
        if !input.left_pressed {
            return false;
        }

        let aspect = screen.x / screen.y.max(1.0);
        let ray = screen_to_world_ray(input.mouse_position, screen, self.camera.view_projection(aspect));
        let was = self.selected;
        self.selected = match bounds.intersect_ray(&ray) {
            Some(hit) => {
                log::debug!("pick hit at {:?}, distance {:.2}", hit.point, hit.distance);
                !self.selected
            }
            None => false,
        };
        if self.selected != was {
            log::info!("model {}", if self.selected { "selected" } else { "deselected" });
        }
        true
    }

    pub fn clear_selection(&mut self) {
        self.selected = false;
    }

    /// Translation then X, Y, Z rotations
    pub fn model_matrix(&self) -> Mat4 {
        let r = self.model_rotation;
        Mat4::from_translation(self.model_position)
            * Mat4::from_rotation_x(r.x.to_radians())
            * Mat4::from_rotation_y(r.y.to_radians())
            * Mat4::from_rotation_z(r.z.to_radians())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use macroquad::math::vec2;

    const SCREEN: Vec2 = Vec2::new(800.0, 450.0);

    fn viewer() -> Viewer {
        Viewer::new(&ViewerConfig::default())
    }

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_starts_looking_at_origin() {
        let v = viewer();
        assert_eq!(v.camera.position, Vec3::new(0.0, 10.0, 10.0));
        assert!(approx(v.camera.direction, Vec3::new(0.0, -1.0, -1.0).normalize()));
        assert!(!v.selected);
    }

    #[test]
    fn test_forward_moves_along_direction() {
        let mut v = viewer();
        let dir = v.camera.direction;
        v.update(&FrameInput::idle(0.5).with_down(Action::MoveForward));
        assert!(approx(v.camera.position, Vec3::new(0.0, 10.0, 10.0) + dir * 7.5));
    }

    #[test]
    fn test_strafe_and_fly() {
        let mut v = viewer();
        v.update(&FrameInput::idle(1.0).with_down(Action::MoveRight));
        assert!(approx(v.camera.position, Vec3::new(15.0, 10.0, 10.0)));

        v.update(&FrameInput::idle(1.0).with_down(Action::FlyDown));
        assert!(approx(v.camera.position, Vec3::new(15.0, -5.0, 10.0)));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut v = viewer();
        let input = FrameInput::idle(1.0)
            .with_down(Action::MoveLeft)
            .with_down(Action::MoveRight)
            .with_down(Action::FlyUp)
            .with_down(Action::FlyDown);
        v.update(&input);
        assert!(approx(v.camera.position, Vec3::new(0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_reset_returns_home_facing_last_target() {
        let mut v = viewer();
        v.update(&FrameInput::idle(1.0).with_down(Action::MoveRight).with_mouse_delta(vec2(40.0, 0.0)));
        let looked_at = v.camera.target();
        assert_ne!(v.camera.position, Vec3::new(0.0, 10.0, 10.0));

        v.update(&FrameInput::idle(0.0).with_pressed(Action::ResetCamera));
        let home = Vec3::new(0.0, 10.0, 10.0);
        assert!(approx(v.camera.position, home));
        assert!(approx(v.camera.direction, (looked_at - home).normalize()));
        // Turned well away from the origin before the reset
        assert!(v.camera.direction.x > 0.9);
    }

    #[test]
    fn test_mouse_right_turns_camera_right() {
        let mut v = viewer();
        v.update(&FrameInput::idle(1.0).with_mouse_delta(vec2(5.0, 0.0)));
        assert!(v.camera.direction.x > 0.0);
    }

    #[test]
    fn test_mouse_look_paused_when_cursor_released() {
        let mut v = viewer();
        v.cursor_grabbed = false;
        let before = v.camera.direction;
        v.update(&FrameInput::idle(1.0).with_mouse_delta(vec2(30.0, 30.0)));
        assert_eq!(v.camera.direction, before);
    }

    #[test]
    fn test_tab_toggles_cursor() {
        let mut v = viewer();
        let update = v.update(&FrameInput::idle(0.016).with_pressed(Action::ToggleCursor));
        assert!(update.cursor_toggled);
        assert!(!v.cursor_grabbed);
        v.update(&FrameInput::idle(0.016).with_pressed(Action::ToggleCursor));
        assert!(v.cursor_grabbed);
    }

    #[test]
    fn test_escape_quits() {
        let mut v = viewer();
        assert!(v.update(&FrameInput::idle(0.016).with_pressed(Action::Quit)).quit);
        assert!(!v.update(&FrameInput::idle(0.016)).quit);
    }

    #[test]
    fn test_rotation_accumulates_degrees() {
        let mut v = viewer();
        for _ in 0..4 {
            v.update(&FrameInput::idle(1.0).with_down(Action::RotateModelX));
        }
        v.update(&FrameInput::idle(0.5).with_down(Action::RotateModelZ));
        assert_eq!(v.model_rotation, Vec3::new(360.0, 0.0, 45.0));
    }

    #[test]
    fn test_model_matrix_order() {
        let mut v = viewer();
        v.model_position = Vec3::new(1.0, 0.0, 0.0);
        v.model_rotation = Vec3::new(0.0, 90.0, 0.0);
        // +X rotated 90 degrees about Y lands on -Z, then translated
        let p = v.model_matrix().transform_point3(Vec3::X);
        assert!(approx(p, Vec3::new(1.0, 0.0, -1.0)));
    }

    #[test]
    fn test_click_on_model_toggles_selection() {
        let mut v = viewer();
        let center = FrameInput::idle(0.016).with_click(SCREEN / 2.0);
        assert!(v.handle_click(&center, &unit_box(), SCREEN));
        assert!(v.selected);
        v.handle_click(&center, &unit_box(), SCREEN);
        assert!(!v.selected);
    }

    #[test]
    fn test_click_elsewhere_clears_selection() {
        let mut v = viewer();
        v.selected = true;
        v.handle_click(&FrameInput::idle(0.016).with_click(vec2(5.0, 5.0)), &unit_box(), SCREEN);
        assert!(!v.selected);
    }

    #[test]
    fn test_no_click_no_change() {
        let mut v = viewer();
        v.selected = true;
        assert!(!v.handle_click(&FrameInput::idle(0.016), &unit_box(), SCREEN));
        assert!(v.selected);
    }
}
