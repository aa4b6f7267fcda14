//! Free-fly camera
//!
//! Keeps an explicit view direction instead of yaw/pitch angles: mouse
//! look rotates the direction vector about the camera's right axis (pitch)
//! and the world up axis (yaw).

use macroquad::camera::{Camera3D, Projection};
use macroquad::math::{Mat4, Quat, Vec3};

/// Clip planes macroquad's `Camera3D` uses; picking must match them
const Z_NEAR: f32 = 0.01;
const Z_FAR: f32 = 10000.0;

/// Pitch steps that would bring the direction closer than this to the up
/// axis are dropped (cosine of 1 degree)
const POLE_COS: f32 = 0.999_847_7;

#[derive(Clone, Debug)]
pub struct FreeCamera {
    pub position: Vec3,
    /// Unit view direction
    pub direction: Vec3,
    pub up: Vec3,
    /// `direction x up`, refreshed once per frame
    pub right: Vec3,
    /// Vertical field of view in radians
    pub fovy: f32,

    home_position: Vec3,
}

impl FreeCamera {
    pub fn new(position: Vec3, target: Vec3, up: Vec3, fovy_deg: f32) -> Self {
        let up = up.normalize_or_zero();
        let mut direction = (target - position).normalize_or_zero();
        if direction == Vec3::ZERO || direction.dot(up).abs() >= POLE_COS {
            log::warn!("Camera target is on the up axis through the position, tilting the view");
            direction = off_pole(direction, up);
        }

        let mut cam = Self {
            position,
            direction,
            up,
            right: Vec3::X,
            fovy: fovy_deg.to_radians(),
            home_position: position,
        };
        cam.refresh_right();
        cam
    }

    pub fn refresh_right(&mut self) {
        self.right = self.direction.cross(self.up).normalize_or_zero();
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Jump back to the starting position, still facing the point the
    /// camera was looking at
    pub fn reset(&mut self) {
        let target = self.target();
        self.position = self.home_position;
        let direction = (target - self.position).normalize_or_zero();
        if direction != Vec3::ZERO {
            self.direction = direction;
        }
        self.refresh_right();
    }

    /// Rotate the view direction: pitch about `right`, then yaw about `up`
    pub fn look(&mut self, yaw: f32, pitch: f32) {
        if pitch != 0.0 && self.right != Vec3::ZERO {
            let pitched = (Quat::from_axis_angle(self.right, pitch) * self.direction).normalize();
            if pitched.dot(self.up).abs() < POLE_COS {
                self.direction = pitched;
            }
        }
        if yaw != 0.0 && self.up != Vec3::ZERO {
            self.direction = (Quat::from_axis_angle(self.up, yaw) * self.direction).normalize();
        }
    }

    /// Point one unit ahead of the camera
    pub fn target(&self) -> Vec3 {
        self.position + self.direction
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(self.fovy, aspect, Z_NEAR, Z_FAR)
            * Mat4::look_at_rh(self.position, self.target(), self.up)
    }

    pub fn to_macroquad(&self) -> Camera3D {
        Camera3D {
            position: self.position,
            target: self.target(),
            up: self.up,
            fovy: self.fovy,
            projection: Projection::Perspective,
            ..Default::default()
        }
    }
}

/// Tilt a direction lying on the up axis just past the pole guard
fn off_pole(direction: Vec3, up: Vec3) -> Vec3 {
    if up == Vec3::ZERO {
        return direction;
    }
    let side = up.any_orthonormal_vector();
    let dir = if direction == Vec3::ZERO { -up } else { direction };
    let sign = dir.dot(up).signum();
    (up * sign * POLE_COS + side * (1.0 - POLE_COS * POLE_COS).sqrt() * 1.01).normalize()
}
