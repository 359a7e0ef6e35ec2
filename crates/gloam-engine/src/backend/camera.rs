use glam::{Mat4, Vec3};

use crate::coords::{CanvasPoint, CanvasRect, CanvasSize};

/// Perspective camera used to project world space onto the canvas.
#[derive(Debug, Clone)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_degrees: 70.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Camera at `eye` looking at `target`.
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target, ..Default::default() }
    }

    pub fn view_projection_matrix(&self, canvas: CanvasSize) -> Mat4 {
        let aspect = canvas.w.max(1) as f32 / canvas.h.max(1) as f32;
        let projection = Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far);
        projection * Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projects a world point; `None` when behind the camera or outside the frustum.
    pub fn project(&self, point: Vec3, canvas: CanvasSize) -> Option<CanvasPoint> {
        let (x, y) = self.project_ndc(point, canvas)?;
        if !(-1.0..=1.0).contains(&x) || !(-1.0..=1.0).contains(&y) {
            return None;
        }
        Some(ndc_to_canvas(x, y, canvas))
    }

    /// Projects a world-space box to the canvas rectangle covering its visible corners.
    pub fn project_bounds(&self, min: Vec3, max: Vec3, canvas: CanvasSize) -> Option<CanvasRect> {
        let corners = [
            Vec3::new(min.x, min.y, min.z),
            Vec3::new(max.x, min.y, min.z),
            Vec3::new(min.x, max.y, min.z),
            Vec3::new(max.x, max.y, min.z),
            Vec3::new(min.x, min.y, max.z),
            Vec3::new(max.x, min.y, max.z),
            Vec3::new(min.x, max.y, max.z),
            Vec3::new(max.x, max.y, max.z),
        ];

        let mut lo = (f32::INFINITY, f32::INFINITY);
        let mut hi = (f32::NEG_INFINITY, f32::NEG_INFINITY);
        let mut any = false;
        for corner in corners {
            if let Some((x, y)) = self.project_ndc(corner, canvas) {
                any = true;
                lo = (lo.0.min(x), lo.1.min(y));
                hi = (hi.0.max(x), hi.1.max(y));
            }
        }
        if !any || hi.0 < -1.0 || lo.0 > 1.0 || hi.1 < -1.0 || lo.1 > 1.0 {
            return None;
        }

        // NDC y points up; canvas y points down.
        let top_left = ndc_to_canvas(lo.0.max(-1.0), hi.1.min(1.0), canvas);
        let bottom_right = ndc_to_canvas(hi.0.min(1.0), lo.1.max(-1.0), canvas);
        Some(CanvasRect::new(
            top_left.x,
            top_left.y,
            bottom_right.x - top_left.x,
            bottom_right.y - top_left.y,
        ))
    }

    /// Normalized device x/y, or `None` when in front of the near plane or past the far plane.
    fn project_ndc(&self, point: Vec3, canvas: CanvasSize) -> Option<(f32, f32)> {
        let clip = self.view_projection_matrix(canvas) * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !(0.0..=1.0).contains(&ndc.z) {
            return None;
        }
        Some((ndc.x, ndc.y))
    }
}

fn ndc_to_canvas(x: f32, y: f32, canvas: CanvasSize) -> CanvasPoint {
    CanvasPoint::new(
        ((x + 1.0) * 0.5 * canvas.w as f32).round() as i32,
        ((1.0 - y) * 0.5 * canvas.h as f32).round() as i32,
    )
}
