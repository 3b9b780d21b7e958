// RustGlint
// copyright zipxing@hotmail.com 2022~2024

//! Quaternion trackball used by the demo cameras. Screen drags map onto a
//! virtual sphere centered on the window; the quaternion between the two
//! mapped points is accumulated into an orientation.

use glam::{Quat, Vec2, Vec3};

pub struct Trackball {
    center: Vec2,
    drag_start_position: Vec2,
    radius: f32,
    dragged: bool,
}

impl Trackball {
    pub fn new(radius: f32) -> Self {
        Self {
            center: Vec2::ZERO,
            drag_start_position: Vec2::ZERO,
            radius,
            dragged: false,
        }
    }

    pub fn set_center(&mut self, x: f32, y: f32) {
        self.center = Vec2::new(x, y);
    }

    pub fn drag_start(&mut self, x: f32, y: f32) {
        self.dragged = true;
        self.drag_update(x, y);
    }

    pub fn drag_update(&mut self, x: f32, y: f32) {
        if self.dragged {
            self.drag_start_position = Vec2::new(x, y) - self.center;
        }
    }

    pub fn drag_end(&mut self) {
        if self.dragged {
            self.drag_update(0.0, 0.0);
            self.dragged = false;
        }
    }

    pub fn dragged(&self) -> bool {
        self.dragged
    }

    /// Normalized drag direction in screen space, y pointing up.
    pub fn direction(&self, x: f32, y: f32) -> Vec2 {
        let drag_end_position = Vec2::new(x, y) - self.center;
        let mut v = drag_end_position - self.drag_start_position;
        v.y = -v.y;
        v.normalize_or_zero()
    }

    /// Rotate `orientation` by the arc between the drag start point and
    /// (x, y), both mapped to the trackball sphere.
    pub fn rotate(&self, orientation: Quat, x: f32, y: f32) -> Quat {
        if !self.dragged {
            return orientation;
        }

        let v0 = self.map_to_sphere(self.drag_start_position);
        let v1 = self.map_to_sphere(Vec2::new(x, y) - self.center);
        let v2 = v0.cross(v1); // rotation axis

        let d = v0.dot(v1);
        let s = ((1.0 + d) * 2.0).sqrt();
        let q = Quat::from_xyzw(v2.x / s, v2.y / s, v2.z / s, 0.5 * s);

        (q * orientation).normalize()
    }

    fn map_to_sphere(&self, point: Vec2) -> Vec3 {
        let mut p = point;
        p.y = -p.y;

        // clamp onto the sphere silhouette so z stays real
        let safe_radius = self.radius - 1.0;
        if p.length() > safe_radius {
            let theta = p.y.atan2(p.x);
            p.x = safe_radius * theta.cos();
            p.y = safe_radius * theta.sin();
        }

        let length_squared = p.x * p.x + p.y * p.y;
        let z = (self.radius * self.radius - length_squared).sqrt();
        (Vec3::new(p.x, p.y, z) / self.radius).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_maps_points_onto_the_unit_sphere() {
        let tb = Trackball::new(150.0);
        for point in [
            Vec2::new(0.0, 0.0),
            Vec2::new(30.0, -40.0),
            Vec2::new(149.0, 0.0),
            Vec2::new(500.0, 500.0),
        ] {
            let v = tb.map_to_sphere(point);
            assert!((v.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn it_keeps_orientation_for_a_zero_drag() {
        let mut tb = Trackball::new(150.0);
        tb.set_center(320.0, 240.0);
        tb.drag_start(330.0, 250.0);
        let q = tb.rotate(Quat::IDENTITY, 330.0, 250.0);
        assert!((q.x.abs() + q.y.abs() + q.z.abs()) < 1e-6);
        assert!((q.w - 1.0).abs() < 1e-6);
    }

    #[test]
    fn it_rotates_and_stays_normalized() {
        let mut tb = Trackball::new(150.0);
        tb.set_center(320.0, 240.0);
        tb.drag_start(320.0, 240.0);
        let q = tb.rotate(Quat::IDENTITY, 380.0, 240.0);
        assert!((q.length() - 1.0).abs() < 1e-5);
        assert!(q != Quat::IDENTITY);
    }

    #[test]
    fn it_reports_drag_direction_with_y_up() {
        let mut tb = Trackball::new(150.0);
        tb.set_center(0.0, 0.0);
        tb.drag_start(10.0, 10.0);
        // dragging down the screen means a negative y direction
        let d = tb.direction(10.0, 30.0);
        assert!(d.y < 0.0);
        assert!((d.length() - 1.0).abs() < 1e-5);
    }
}
