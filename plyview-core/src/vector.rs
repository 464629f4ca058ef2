/// Four-component homogeneous vectors and epsilon-tolerant comparison
use std::fmt;
use std::ops::Index;

use nalgebra::Vector4;

use crate::error::{Error, Result};
use crate::matrix::Matrix4x4;

/// Tolerance used for every float, vector and matrix comparison.
pub const EPSILON: f64 = 0.001;

/// `true` when `a` and `b` differ by less than [`EPSILON`].
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Sum of pairwise products of two equally long sequences.
pub fn dot(u: &[f64], v: &[f64]) -> Result<f64> {
    if u.len() != v.len() {
        return Err(Error::DimensionMismatch {
            left: u.len(),
            right: v.len(),
        });
    }
    Ok(u.iter().zip(v).map(|(a, b)| a * b).sum())
}

/// Projection of `u` onto `v`: `v` scaled by `dot(u, v) / dot(v, v)`.
///
/// Projecting onto an exactly zero vector yields the zero vector.
pub fn proj(u: &Vector4d, v: &Vector4d) -> Vector4d {
    let denominator = v.dot(v);
    if denominator == 0.0 {
        return Vector4d::zero();
    }
    v.scaled(u.dot(v) / denominator)
}

/// A 4-component vector `(x, y, z, w)`.
///
/// Deliberately not `PartialEq`: compare with [`Vector4d::approx_eq`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Vector4d {
    values: [f64; 4],
}

impl Vector4d {
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self {
            values: [x, y, z, w],
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn x(&self) -> f64 {
        self.values[0]
    }

    pub fn y(&self) -> f64 {
        self.values[1]
    }

    pub fn z(&self) -> f64 {
        self.values[2]
    }

    pub fn w(&self) -> f64 {
        self.values[3]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Euclidean norm over all four components, `w` included.
    pub fn magnitude(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// All four components within epsilon of zero.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&c| approx_eq(c, 0.0))
    }

    /// Scale every component in place.
    pub fn scale(&mut self, factor: f64) {
        for c in &mut self.values {
            *c *= factor;
        }
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        self.scale(factor);
        self
    }

    /// Normalize in place; the zero vector is left untouched.
    pub fn make_unit(&mut self) {
        if self.is_zero() {
            return;
        }
        let m = self.magnitude();
        for c in &mut self.values {
            *c /= m;
        }
    }

    pub fn unit(mut self) -> Self {
        self.make_unit();
        self
    }

    pub fn dot(&self, other: &Self) -> f64 {
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| a * b)
            .sum()
    }

    pub fn add(&self, other: &Self) -> Self {
        Self::from_fn(|i| self.values[i] + other.values[i])
    }

    pub fn subtract(&self, other: &Self) -> Self {
        Self::from_fn(|i| self.values[i] - other.values[i])
    }

    pub fn add_in_place(&mut self, other: &Self) {
        for (c, o) in self.values.iter_mut().zip(other.values.iter()) {
            *c += o;
        }
    }

    pub fn subtract_in_place(&mut self, other: &Self) {
        for (c, o) in self.values.iter_mut().zip(other.values.iter()) {
            *c -= o;
        }
    }

    /// Vector-times-matrix: component `i` is `dot(m.transpose()[i], self)`,
    /// i.e. row `i` of `m` dotted with this vector.
    ///
    /// Camera position, target and up direction are all derived through this
    /// convention, so it must not be swapped for `m.transpose()` semantics.
    pub fn multiply(&self, m: &Matrix4x4) -> Self {
        let rows = m.transpose();
        Self::from_fn(|i| rows[i].dot(self))
    }

    /// Component-wise comparison within [`EPSILON`].
    pub fn approx_eq(&self, other: &Self) -> bool {
        self.values
            .iter()
            .zip(other.values.iter())
            .all(|(&a, &b)| approx_eq(a, b))
    }

    pub(crate) fn from_fn(f: impl Fn(usize) -> f64) -> Self {
        Self::new(f(0), f(1), f(2), f(3))
    }
}

impl Index<usize> for Vector4d {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values[index]
    }
}

impl fmt::Display for Vector4d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{:7.3}, {:7.3}, {:7.3}, {:7.3}>",
            self.values[0], self.values[1], self.values[2], self.values[3]
        )
    }
}

impl From<Vector4<f64>> for Vector4d {
    fn from(v: Vector4<f64>) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4d> for Vector4<f64> {
    fn from(v: Vector4d) -> Self {
        Vector4::new(v.x(), v.y(), v.z(), v.w())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;

    #[test]
    fn test_epsilon_equality() {
        let one = Vector4d::new(1.0, 1.0, 1.0, 1.0);
        assert!(one.approx_eq(&Vector4d::new(1.0005, 1.0, 1.0, 1.0)));
        assert!(!one.approx_eq(&Vector4d::new(1.002, 1.0, 1.0, 1.0)));
        // symmetric
        assert!(Vector4d::new(1.0005, 1.0, 1.0, 1.0).approx_eq(&one));
        assert!(one.approx_eq(&one));
    }

    #[test]
    fn test_magnitude_includes_w() {
        let v = Vector4d::new(1.0, 1.0, 1.0, 1.0);
        assert!(approx_eq(v.magnitude(), 2.0));
    }

    #[test]
    fn test_make_unit() {
        let mut v = Vector4d::new(3.0, 0.0, 4.0, 0.0);
        v.make_unit();
        assert!(v.approx_eq(&Vector4d::new(0.6, 0.0, 0.8, 0.0)));
        assert!(approx_eq(v.magnitude(), 1.0));

        let mut zero = Vector4d::new(0.0, 0.0005, 0.0, 0.0);
        zero.make_unit();
        assert_eq!(zero.y(), 0.0005);
    }

    #[test]
    fn test_dot_dimension_mismatch() {
        assert!(approx_eq(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap(), 32.0));
        assert!(matches!(
            dot(&[1.0, 2.0], &[1.0, 2.0, 3.0]),
            Err(Error::DimensionMismatch { left: 2, right: 3 })
        ));
    }

    #[test]
    fn test_projection() {
        let u = Vector4d::new(2.0, 3.0, 0.0, 0.0);
        let v = Vector4d::new(1.0, 0.0, 0.0, 0.0);
        assert!(proj(&u, &v).approx_eq(&Vector4d::new(2.0, 0.0, 0.0, 0.0)));
        assert!(proj(&u, &Vector4d::zero()).is_zero());
        // value semantics: v is not modified
        assert_eq!(v.x(), 1.0);
    }

    #[test]
    fn test_add_subtract() {
        let a = Vector4d::new(1.0, 2.0, 3.0, 4.0);
        let b = Vector4d::new(0.5, 0.5, 0.5, 0.5);
        assert!(a.add(&b).approx_eq(&Vector4d::new(1.5, 2.5, 3.5, 4.5)));
        assert!(a.subtract(&b).approx_eq(&Vector4d::new(0.5, 1.5, 2.5, 3.5)));

        let mut c = a;
        c.add_in_place(&b);
        c.subtract_in_place(&b);
        assert!(c.approx_eq(&a));
    }

    #[test]
    fn test_multiply_by_translation() {
        let origin = Vector4d::new(0.0, 0.0, 0.0, 1.0);
        let moved = origin.multiply(&Transform::translate(1.0, 2.0, 3.0));
        assert!(moved.approx_eq(&Vector4d::new(1.0, 2.0, 3.0, 1.0)));
    }

    #[test]
    fn test_multiply_matches_nalgebra() {
        let m = Transform::rotate_y(0.4).multiply(&Transform::translate(1.0, -2.0, 0.5));
        let v = Vector4d::new(0.3, 1.7, -2.0, 1.0);
        let expected = nalgebra::Matrix4::<f64>::from(m) * Vector4::<f64>::from(v);
        assert!(v.multiply(&m).approx_eq(&Vector4d::from(expected)));
    }

    #[test]
    fn test_display() {
        let v = Vector4d::new(1.0, -2.5, 0.0, 1.0);
        assert_eq!(v.to_string(), "<  1.000,  -2.500,   0.000,   1.000>");
    }
}
