/// Named builders for homogeneous transform matrices
use crate::matrix::Matrix4x4;

/// Transform builder for 3D transformations.
///
/// Every builder returns a fresh matrix in standard homogeneous form: bottom
/// row `[0, 0, 0, 1]`, translation in the last column.
pub struct Transform;

impl Transform {
    pub fn identity() -> Matrix4x4 {
        Matrix4x4::from_elements([
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Right-handed rotation about the X axis (radians)
    pub fn rotate_x(theta: f64) -> Matrix4x4 {
        let (s, c) = theta.sin_cos();
        Matrix4x4::from_elements([
            1.0, 0.0, 0.0, 0.0, //
            0.0, c, -s, 0.0, //
            0.0, s, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Right-handed rotation about the Y axis (radians)
    pub fn rotate_y(theta: f64) -> Matrix4x4 {
        let (s, c) = theta.sin_cos();
        Matrix4x4::from_elements([
            c, 0.0, s, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            -s, 0.0, c, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Right-handed rotation about the Z axis (radians)
    pub fn rotate_z(theta: f64) -> Matrix4x4 {
        let (s, c) = theta.sin_cos();
        Matrix4x4::from_elements([
            c, -s, 0.0, 0.0, //
            s, c, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    pub fn translate(x: f64, y: f64, z: f64) -> Matrix4x4 {
        Matrix4x4::from_elements([
            1.0, 0.0, 0.0, x, //
            0.0, 1.0, 0.0, y, //
            0.0, 0.0, 1.0, z, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }

    /// Diagonal scale; the `w` coefficient stays 1.
    pub fn scale(x: f64, y: f64, z: f64) -> Matrix4x4 {
        Matrix4x4::from_elements([
            x, 0.0, 0.0, 0.0, //
            0.0, y, 0.0, 0.0, //
            0.0, 0.0, z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ])
    }
}
