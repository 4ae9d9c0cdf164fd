//! 2D affine transformation matrices.

use crate::geometry::Point;

/// A 2D affine transformation matrix.
///
/// PDF matrices have the form:
/// ```text
/// [ a  b  0 ]
/// [ c  d  0 ]
/// [ e  f  1 ]
/// ```
/// where `(a,b,c,d)` scale/rotate/skew and `(e,f)` translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix {
    /// Horizontal scaling component.
    pub a: f32,
    /// Rotation/skew component.
    pub b: f32,
    /// Rotation/skew component.
    pub c: f32,
    /// Vertical scaling component.
    pub d: f32,
    /// Horizontal translation.
    pub e: f32,
    /// Vertical translation.
    pub f: f32,
}

impl Matrix {
    /// Create an identity matrix.
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Create a translation matrix.
    pub fn translation(tx: f32, ty: f32) -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: tx,
            f: ty,
        }
    }

    /// Create an axis-aligned scaling matrix.
    pub fn scaling(sx: f32, sy: f32) -> Self {
        Self {
            a: sx,
            b: 0.0,
            c: 0.0,
            d: sy,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Build a rotation matrix for a page `/Rotate` angle (degrees,
    /// clockwise, restricted to multiples of 90 as the PDF spec requires).
    pub fn rotation_degrees(degrees: i32) -> Self {
        let normalized = degrees.rem_euclid(360);
        match normalized {
            90 => Self {
                a: 0.0,
                b: -1.0,
                c: 1.0,
                d: 0.0,
                e: 0.0,
                f: 0.0,
            },
            180 => Self {
                a: -1.0,
                b: 0.0,
                c: 0.0,
                d: -1.0,
                e: 0.0,
                f: 0.0,
            },
            270 => Self {
                a: 0.0,
                b: 1.0,
                c: -1.0,
                d: 0.0,
                e: 0.0,
                f: 0.0,
            },
            _ => Self::identity(),
        }
    }

    /// Multiply this matrix by `other`, i.e. apply `self` then `other`.
    ///
    /// Matrix multiplication is not commutative: `A.multiply(&B) != B.multiply(&A)`.
    pub fn multiply(&self, other: &Matrix) -> Matrix {
        Matrix {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    /// Transform a point by this matrix.
    pub fn transform_point(&self, x: f32, y: f32) -> Point {
        Point {
            x: self.a * x + self.c * y + self.e,
            y: self.b * x + self.d * y + self.f,
        }
    }

    /// Determinant, indicating invertibility and area scale factor.
    pub fn determinant(&self) -> f32 {
        self.a * self.d - self.b * self.c
    }

    /// Whether this matrix is invertible (non-zero determinant).
    pub fn is_invertible(&self) -> bool {
        self.determinant().abs() > f32::EPSILON
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_identity() {
        let m = Matrix::identity();
        assert_eq!(m.a, 1.0);
        assert_eq!(m.e, 0.0);
    }

    #[test]
    fn test_matrix_translation() {
        let m = Matrix::translation(10.0, 20.0);
        let p = m.transform_point(5.0, 10.0);
        assert_eq!(p.x, 15.0);
        assert_eq!(p.y, 30.0);
    }

    #[test]
    fn test_matrix_multiply_order() {
        let translate = Matrix::translation(10.0, 20.0);
        let scale = Matrix::scaling(2.0, 2.0);
        let result = translate.multiply(&scale);
        // translate first, then scale: (5,5) -> (15,25) -> (30,50)
        let p = result.transform_point(5.0, 5.0);
        assert_eq!(p.x, 30.0);
        assert_eq!(p.y, 50.0);
    }

    #[test]
    fn test_matrix_multiply_not_commutative() {
        let translate = Matrix::translation(10.0, 0.0);
        let scale = Matrix::scaling(2.0, 1.0);
        let r1 = translate.multiply(&scale);
        let r2 = scale.multiply(&translate);
        let p1 = r1.transform_point(5.0, 0.0);
        let p2 = r2.transform_point(5.0, 0.0);
        assert_ne!(p1.x, p2.x);
    }

    #[test]
    fn test_matrix_associative_within_epsilon() {
        let a = Matrix {
            a: 1.2,
            b: 0.3,
            c: -0.5,
            d: 0.8,
            e: 3.0,
            f: -1.0,
        };
        let b = Matrix::scaling(1.5, 0.9);
        let c = Matrix::translation(-2.0, 4.0);
        let left = a.multiply(&b).multiply(&c);
        let right = a.multiply(&b.multiply(&c));
        let p = Point::new(7.0, -3.0);
        let pl = left.transform_point(p.x, p.y);
        let pr = right.transform_point(p.x, p.y);
        assert!((pl.x - pr.x).abs() < 1e-3);
        assert!((pl.y - pr.y).abs() < 1e-3);
    }

    #[test]
    fn test_matrix_invertible() {
        assert!(Matrix::scaling(2.0, 3.0).is_invertible());
        let degenerate = Matrix {
            a: 1.0,
            b: 2.0,
            c: 2.0,
            d: 4.0,
            e: 0.0,
            f: 0.0,
        };
        assert!(!degenerate.is_invertible());
    }

    #[test]
    fn test_rotation_90() {
        let m = Matrix::rotation_degrees(90);
        let p = m.transform_point(1.0, 0.0);
        assert!((p.x - 0.0).abs() < 1e-6);
        assert!((p.y - 1.0).abs() < 1e-6);
    }
}
