//! Ray picking
//!
//! Screen-to-world rays and ray/box intersection for selecting the model
//! with the mouse.

use macroquad::math::{vec2, vec3, Mat4, Vec2, Vec3};

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,  // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Get point at distance t along ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Where a ray met a box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub distance: f32,
    pub point: Vec3,
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Inverted box that any expand() will overwrite
    pub const EMPTY: BoundingBox = BoundingBox::new(Vec3::splat(f32::INFINITY), Vec3::splat(f32::NEG_INFINITY));

    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::EMPTY;
        for point in points {
            bounds.expand(point);
        }
        bounds
    }

    /// Expand bounds to include a point
    pub fn expand(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Check if a point is inside the box
    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Slab test. A ray starting inside the box hits at distance 0.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<RayHit> {
        if self.is_empty() {
            return None;
        }
        if self.contains(ray.origin) {
            return Some(RayHit { distance: 0.0, point: ray.origin });
        }

        // Zero direction components give +-inf here, which the min/max below handle
        let inv = ray.direction.recip();
        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;
        let t_near = t1.min(t2).max_element();
        let t_far = t1.max(t2).min_element();

        if t_far < 0.0 || t_near > t_far {
            return None;
        }
        let distance = t_near.max(0.0);
        Some(RayHit { distance, point: ray.at(distance) })
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Ray from a screen position (pixels, y down) into the world.
///
/// Unprojects the pixel at the near and far clip planes through the
/// inverse view-projection; the ray starts on the near plane.
pub fn screen_to_world_ray(mouse: Vec2, screen: Vec2, view_projection: Mat4) -> Ray {
    let screen = screen.max(vec2(1.0, 1.0));
    let ndc_x = 2.0 * mouse.x / screen.x - 1.0;
    let ndc_y = 1.0 - 2.0 * mouse.y / screen.y;

    let inverse = view_projection.inverse();
    let near = inverse.project_point3(vec3(ndc_x, ndc_y, -1.0));
    let far = inverse.project_point3(vec3(ndc_x, ndc_y, 1.0));
    Ray::new(near, far - near)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FreeCamera;

    fn unit_box() -> BoundingBox {
        BoundingBox::new(Vec3::splat(-0.5), Vec3::splat(0.5))
    }

    #[test]
    fn test_ray_hits_box_front_face() {
        let ray = Ray::new(vec3(0.0, 0.0, 10.0), vec3(0.0, 0.0, -1.0));
        let hit = unit_box().intersect_ray(&ray).unwrap();
        assert!((hit.distance - 9.5).abs() < 1e-5);
        assert!((hit.point.z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_ray_pointing_away_misses() {
        let ray = Ray::new(vec3(0.0, 0.0, 10.0), vec3(0.0, 0.0, 1.0));
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_axis_parallel_ray_outside_slab_misses() {
        // Direction has zero x and y components
        let ray = Ray::new(vec3(2.0, 0.0, 10.0), vec3(0.0, 0.0, -1.0));
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_from_inside_hits_at_zero() {
        let ray = Ray::new(Vec3::ZERO, vec3(1.0, 2.0, 3.0));
        assert_eq!(unit_box().intersect_ray(&ray).unwrap().distance, 0.0);
    }

    #[test]
    fn test_empty_box_never_hit() {
        let ray = Ray::new(vec3(0.0, 0.0, 10.0), vec3(0.0, 0.0, -1.0));
        assert!(BoundingBox::EMPTY.is_empty());
        assert!(BoundingBox::EMPTY.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_from_points() {
        let bounds = BoundingBox::from_points([
            vec3(1.0, -2.0, 0.0),
            vec3(-1.0, 4.0, 3.0),
            vec3(0.0, 0.0, -5.0),
        ]);
        assert_eq!(bounds.min, vec3(-1.0, -2.0, -5.0));
        assert_eq!(bounds.max, vec3(1.0, 4.0, 3.0));
        assert_eq!(bounds.center(), vec3(0.0, 1.0, -1.0));
        assert_eq!(bounds.size(), vec3(2.0, 6.0, 8.0));
    }

    #[test]
    fn test_screen_center_ray_follows_view_direction() {
        let cam = FreeCamera::new(vec3(0.0, 10.0, 10.0), Vec3::ZERO, Vec3::Y, 45.0);
        let screen = vec2(800.0, 450.0);
        let ray = screen_to_world_ray(screen * 0.5, screen, cam.view_projection(screen.x / screen.y));
        assert!(ray.direction.dot(cam.direction) > 0.9999);
        assert!(unit_box().intersect_ray(&ray).is_some());
    }

    #[test]
    fn test_screen_corner_ray_misses_model_at_origin() {
        let cam = FreeCamera::new(vec3(0.0, 10.0, 10.0), Vec3::ZERO, Vec3::Y, 45.0);
        let screen = vec2(800.0, 450.0);
        let ray = screen_to_world_ray(vec2(5.0, 5.0), screen, cam.view_projection(screen.x / screen.y));
        assert!(unit_box().intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_ray_passes_through_projected_point() {
        let cam = FreeCamera::new(vec3(3.0, 4.0, 12.0), Vec3::ZERO, Vec3::Y, 45.0);
        let screen = vec2(800.0, 450.0);
        let view_proj = cam.view_projection(screen.x / screen.y);

        let world_point = vec3(1.5, 0.5, -2.0);
        let ndc = view_proj.project_point3(world_point);
        let pixel = vec2((ndc.x + 1.0) * 0.5 * screen.x, (1.0 - ndc.y) * 0.5 * screen.y);

        let ray = screen_to_world_ray(pixel, screen, view_proj);
        let t = (world_point - ray.origin).dot(ray.direction);
        let distance = (ray.at(t) - world_point).length();
        assert!(distance < 1e-2, "ray missed projected point by {}", distance);
    }
}
