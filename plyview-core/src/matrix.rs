/// 4x4 homogeneous matrices stored as four column vectors
use std::fmt;
use std::ops::Index;

use nalgebra::Matrix4;

use crate::vector::{proj, Vector4d};

/// A 4x4 matrix stored column-major as four [`Vector4d`] columns.
///
/// Like [`Vector4d`] it is a small `Copy` value; equality is only ever
/// epsilon-tolerant through [`Matrix4x4::approx_eq`].
#[derive(Debug, Clone, Copy)]
pub struct Matrix4x4 {
    columns: [Vector4d; 4],
}

impl Matrix4x4 {
    /// Build from 16 elements given in row-major order.
    pub fn from_elements(elements: [f64; 16]) -> Self {
        let column = |c: usize| {
            Vector4d::new(
                elements[c],
                elements[4 + c],
                elements[8 + c],
                elements[12 + c],
            )
        };
        Self {
            columns: [column(0), column(1), column(2), column(3)],
        }
    }

    pub fn from_columns(c0: Vector4d, c1: Vector4d, c2: Vector4d, c3: Vector4d) -> Self {
        Self {
            columns: [c0, c1, c2, c3],
        }
    }

    pub fn column(&self, index: usize) -> &Vector4d {
        &self.columns[index]
    }

    pub fn element(&self, row: usize, col: usize) -> f64 {
        self.columns[col][row]
    }

    pub fn row(&self, index: usize) -> Vector4d {
        Vector4d::from_fn(|c| self.element(index, c))
    }

    /// Elements in row-major order, the inverse of [`Matrix4x4::from_elements`].
    pub fn to_elements(&self) -> [f64; 16] {
        let mut elements = [0.0; 16];
        for (i, e) in elements.iter_mut().enumerate() {
            *e = self.element(i / 4, i % 4);
        }
        elements
    }

    pub fn set_column(&mut self, index: usize, column: Vector4d) {
        self.columns[index] = column;
    }

    pub fn with_column(mut self, index: usize, column: Vector4d) -> Self {
        self.set_column(index, column);
        self
    }

    /// Column `i` of the result is row `i` of `self`.
    pub fn transpose(&self) -> Self {
        Self {
            columns: [self.row(0), self.row(1), self.row(2), self.row(3)],
        }
    }

    /// `self * other`: element `(i, j)` is row `i` of `self` dotted with
    /// column `j` of `other`.
    pub fn multiply(&self, other: &Self) -> Self {
        let rows = self.transpose();
        let mut elements = [0.0; 16];
        for i in 0..4 {
            for j in 0..4 {
                elements[4 * i + j] = rows[i].dot(&other[j]);
            }
        }
        Self::from_elements(elements)
    }

    /// Scale every element in place.
    pub fn scale(&mut self, factor: f64) {
        for column in &mut self.columns {
            column.scale(factor);
        }
    }

    pub fn scaled(mut self, factor: f64) -> Self {
        self.scale(factor);
        self
    }

    /// Classical Gram-Schmidt over the columns in index order: column `i`
    /// becomes the original column `i` minus its projections onto every
    /// already orthogonalized column `j < i`.
    ///
    /// Columns must be linearly independent for a meaningful result.
    pub fn orthogonalize(&self) -> Self {
        let mut result = *self;
        for i in 0..4 {
            let original = self.columns[i];
            let mut column = original;
            for j in 0..i {
                column.subtract_in_place(&proj(&original, &result.columns[j]));
            }
            result.columns[i] = column;
        }
        result
    }

    pub fn orthonormalize(&self) -> Self {
        let mut result = self.orthogonalize();
        for column in &mut result.columns {
            column.make_unit();
        }
        result
    }

    /// `self * self.transpose()` equals the identity within epsilon.
    pub fn is_orthogonal(&self) -> bool {
        self.multiply(&self.transpose())
            .approx_eq(&crate::transform::Transform::identity())
    }

    pub fn approx_eq(&self, other: &Self) -> bool {
        self.columns
            .iter()
            .zip(other.columns.iter())
            .all(|(a, b)| a.approx_eq(b))
    }
}

impl Index<usize> for Matrix4x4 {
    type Output = Vector4d;

    fn index(&self, index: usize) -> &Vector4d {
        &self.columns[index]
    }
}

impl fmt::Display for Matrix4x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..4 {
            writeln!(
                f,
                "|{:7.3}, {:7.3}, {:7.3}, {:7.3}|",
                self.element(r, 0),
                self.element(r, 1),
                self.element(r, 2),
                self.element(r, 3)
            )?;
        }
        Ok(())
    }
}

impl From<Matrix4x4> for Matrix4<f64> {
    fn from(m: Matrix4x4) -> Self {
        Matrix4::from_fn(|r, c| m.element(r, c))
    }
}

impl From<Matrix4<f64>> for Matrix4x4 {
    fn from(m: Matrix4<f64>) -> Self {
        let mut elements = [0.0; 16];
        for (i, e) in elements.iter_mut().enumerate() {
            *e = m[(i / 4, i % 4)];
        }
        Self::from_elements(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::Transform;
    use crate::vector::approx_eq;
    use proptest::prelude::*;

    fn sample() -> Matrix4x4 {
        Matrix4x4::from_elements([
            1.0, 2.0, 3.0, 4.0, //
            5.0, 6.0, 7.0, 8.0, //
            9.0, 10.0, 11.0, 12.0, //
            13.0, 14.0, 15.0, 16.0,
        ])
    }

    fn any_matrix() -> impl Strategy<Value = Matrix4x4> {
        prop::array::uniform16(-100.0f64..100.0).prop_map(Matrix4x4::from_elements)
    }

    /// Strictly diagonally dominant, hence linearly independent columns.
    fn independent_matrix() -> impl Strategy<Value = Matrix4x4> {
        prop::array::uniform16(-1.0f64..1.0).prop_map(|mut e| {
            for d in 0..4 {
                e[5 * d] += 10.0;
            }
            Matrix4x4::from_elements(e)
        })
    }

    #[test]
    fn test_row_major_construction() {
        let m = sample();
        assert_eq!(m.element(0, 1), 2.0);
        assert_eq!(m.element(1, 0), 5.0);
        assert!(m.column(0).approx_eq(&Vector4d::new(1.0, 5.0, 9.0, 13.0)));
        assert_eq!(m.to_elements()[6], 7.0);
    }

    #[test]
    fn test_transpose_columns_are_rows() {
        let t = sample().transpose();
        assert!(t.column(0).approx_eq(&Vector4d::new(1.0, 2.0, 3.0, 4.0)));
        assert!(t.column(3).approx_eq(&Vector4d::new(13.0, 14.0, 15.0, 16.0)));
    }

    #[test]
    fn test_multiply_matches_nalgebra() {
        let a = sample();
        let b = Transform::rotate_z(0.7).multiply(&Transform::scale(2.0, 3.0, 4.0));
        let expected = Matrix4::<f64>::from(a) * Matrix4::<f64>::from(b);
        assert!(a.multiply(&b).approx_eq(&Matrix4x4::from(expected)));
    }

    #[test]
    fn test_scale_in_place() {
        let mut m = Transform::identity();
        m.scale(2.0);
        assert_eq!(m.element(3, 3), 2.0);
        assert_eq!(m.element(0, 1), 0.0);
    }

    #[test]
    fn test_orthonormalize_skewed_basis() {
        let m = Matrix4x4::from_columns(
            Vector4d::new(1.0, 1.0, 0.0, 0.0),
            Vector4d::new(1.0, 0.0, 1.0, 0.0),
            Vector4d::new(0.0, 1.0, 1.0, 0.0),
            Vector4d::new(0.0, 0.0, 1.0, 1.0),
        );
        assert!(!m.is_orthogonal());

        let o = m.orthogonalize();
        for i in 0..4 {
            for j in 0..i {
                assert!(approx_eq(o[i].dot(&o[j]), 0.0));
            }
        }
        // first column is untouched by Gram-Schmidt
        assert!(o[0].approx_eq(m.column(0)));

        assert!(m.orthonormalize().is_orthogonal());
    }

    #[test]
    fn test_rotation_is_orthogonal() {
        let r = Transform::rotate_x(0.3).multiply(&Transform::rotate_y(1.1));
        assert!(r.is_orthogonal());
        assert!(!Transform::scale(2.0, 1.0, 1.0).is_orthogonal());
    }

    #[test]
    fn test_display() {
        let text = Transform::identity().to_string();
        assert_eq!(text.lines().count(), 4);
        assert_eq!(
            text.lines().next(),
            Some("|  1.000,   0.000,   0.000,   0.000|")
        );
    }

    proptest! {
        #[test]
        fn transpose_is_an_involution(m in any_matrix()) {
            prop_assert!(m.transpose().transpose().approx_eq(&m));
        }

        #[test]
        fn identity_is_neutral(m in any_matrix()) {
            let identity = Transform::identity();
            prop_assert!(identity.multiply(&m).approx_eq(&m));
            prop_assert!(m.multiply(&identity).approx_eq(&m));
        }

        #[test]
        fn orthonormalized_matrices_are_orthogonal(m in independent_matrix()) {
            prop_assert!(m.orthonormalize().is_orthogonal());
        }
    }
}
