/// Perspective camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

use crate::context::ViewerContext;
use crate::vector::Vector4d;

/// Look-at camera with a perspective frustum, in the manner of
/// `gluLookAt` + `gluPerspective`.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    /// Vertical field of view in radians.
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    /// Derive the camera from the viewer context for a `width` x `height`
    /// viewport.
    pub fn from_context(context: &ViewerContext, width: u32, height: u32) -> Self {
        let config = context.config();
        Self {
            position: to_point(context.eye()),
            target: to_point(context.target()),
            up: to_point(context.up()).coords,
            fov: config.fov_y_degrees.to_radians(),
            aspect: f64::from(width) / f64::from(height.max(1)),
            near: config.near,
            far: config.far,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f64> {
        Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Project a point to screen space, returning `(x, y, depth)` or `None`
    /// when it falls outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        let clip = self.projection_matrix() * self.view_matrix() * point.to_homogeneous();

        // Behind the eye or on the eye plane
        if clip.w <= 1e-9 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        if !(-1.0..=1.0).contains(&ndc_x)
            || !(-1.0..=1.0).contains(&ndc_y)
            || !(-1.0..=1.0).contains(&depth)
        {
            return None;
        }

        let screen_x = (ndc_x + 1.0) * 0.5 * f64::from(width);
        let screen_y = (1.0 - ndc_y) * 0.5 * f64::from(height);

        Some((screen_x, screen_y, depth))
    }
}

/// Drop `w` from a homogeneous point, dividing through when it is not 1.
fn to_point(v: Vector4d) -> Point3<f64> {
    let w = if v.w().abs() > f64::EPSILON { v.w() } else { 1.0 };
    Point3::new(v.x() / w, v.y() / w, v.z() / w)
}
