//! 4x4 transformation matrix using the column-vector convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//! - All projection and view helpers are **left-handed**: +Z points into the screen
//!
//! # Example
//! ```ignore
//! let transform = rotation * scale;  // scale applied first, then rotation
//! let result = transform * vertex;   // transform the vertex
//! ```

use std::ops::Mul;

use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub const fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub const fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a left-handed rotation matrix around the X axis.
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a left-handed rotation matrix around the Y axis.
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a left-handed rotation matrix around the Z axis.
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a left-handed perspective projection.
    ///
    /// View-space depth `near..far` maps to clip `z` in `0..w`, and the clip
    /// `w` equals the view-space depth. After the perspective divide, 1/w is
    /// therefore linear in screen space.
    ///
    /// # Arguments
    ///
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `near`, `far` - Clip plane distances (`0 < near < far`)
    pub fn perspective_lh(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let range = far / (far - near);
        Mat4::new([
            [f / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, range, -near * range],
            [0.0, 0.0, 1.0, 0.0],
        ])
    }

    /// Creates a view matrix with left-handed coordinate system.
    ///
    /// # Arguments
    ///
    /// * `eye` - The position of the camera.
    /// * `target` - The point the camera is looking at.
    /// * `up` - The up direction of the camera.
    pub fn look_at_lh(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - eye).normalize();
        let right = up.cross(forward).normalize();
        let up = forward.cross(right);

        Self::new([
            [right.x, right.y, right.z, -right.dot(eye)],
            [up.x, up.y, up.z, -up.dot(eye)],
            [forward.x, forward.y, forward.z, -forward.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn transpose(&self) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (row, values) in data.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[col][row];
            }
        }
        Mat4::new(data)
    }

    /// Computes the inverse of the matrix by Gauss-Jordan elimination with
    /// partial pivoting. Returns `None` if the matrix is singular.
    pub fn inverse(&self) -> Option<Mat4> {
        let mut m = self.data;
        let mut inv = Mat4::identity().data;

        for col in 0..4 {
            let pivot = (col..4).max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))?;
            if m[pivot][col].abs() < f32::EPSILON {
                return None;
            }
            m.swap(col, pivot);
            inv.swap(col, pivot);

            let scale = 1.0 / m[col][col];
            for k in 0..4 {
                m[col][k] *= scale;
                inv[col][k] *= scale;
            }

            for row in 0..4 {
                if row == col {
                    continue;
                }
                let factor = m[row][col];
                if factor == 0.0 {
                    continue;
                }
                for k in 0..4 {
                    m[row][k] -= factor * m[col][k];
                    inv[row][k] -= factor * inv[col][k];
                }
            }
        }

        Some(Mat4::new(inv))
    }

    /// Transforms a direction: ignores the translation column and w.
    pub fn transform_direction(&self, v: Vec3) -> Vec3 {
        let m = &self.data;
        Vec3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-vector convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, values) in result.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = (0..4).map(|k| self.data[row][k] * rhs.data[k][col]).sum();
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let row = |r: usize| {
            self.data[r][0] * v.x
                + self.data[r][1] * v.y
                + self.data[r][2] * v.z
                + self.data[r][3] * v.w
        };
        Vec4::new(row(0), row(1), row(2), row(3))
    }
}

/// Transform a point: Mat4 * Vec3 (treats Vec3 as column vector with w=1).
///
/// Affine matrices leave w at 1, so no divide happens for model and view
/// transforms.
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        let p = self * Vec4::from(v);
        if p.w != 0.0 && p.w != 1.0 {
            Vec3::new(p.x / p.w, p.y / p.w, p.z / p.w)
        } else {
            p.to_vec3()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    fn assert_mat_eq(a: Mat4, b: Mat4) {
        for row in 0..4 {
            for col in 0..4 {
                assert_relative_eq!(a.get(row, col), b.get(row, col), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn inverse_of_affine_transform_round_trips() {
        let m = Mat4::translation(1.0, -2.0, 3.0)
            * Mat4::rotation_y(0.7)
            * Mat4::rotation_x(-0.3)
            * Mat4::scaling(2.0, 0.5, 1.5);
        let inv = m.inverse().unwrap();
        assert_mat_eq(m * inv, Mat4::identity());
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Mat4::scaling(1.0, 0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn perspective_maps_near_and_far_to_depth_range() {
        let p = Mat4::perspective_lh(FRAC_PI_2, 1.0, 1.0, 10.0);
        let near = p * Vec4::new(0.0, 0.0, 1.0, 1.0);
        let far = p * Vec4::new(0.0, 0.0, 10.0, 1.0);
        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-6);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-6);
        assert_relative_eq!(far.w, 10.0);
    }

    #[test]
    fn look_at_moves_eye_to_origin_facing_plus_z() {
        let view = Mat4::look_at_lh(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO, Vec3::UP);
        let target = view * Vec3::ZERO;
        assert_relative_eq!(target.z, 5.0, epsilon = 1e-6);
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn transform_direction_ignores_translation() {
        let m = Mat4::translation(5.0, 5.0, 5.0);
        assert_eq!(m.transform_direction(Vec3::UP), Vec3::UP);
    }
}
