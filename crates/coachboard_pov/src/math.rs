// SPDX-License-Identifier: MIT OR Apache-2.0
//! Quaternion helpers for the chase camera.
//!
//! Quaternions are `[x, y, z, w]`. The camera uses the right-handed
//! convention with `-Z` as the neutral forward direction and `+Y` up.

use coachboard_playback::math::{cross, normalize};

/// The identity rotation
pub const IDENTITY: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// World up vector
pub const UP: [f32; 3] = [0.0, 1.0, 0.0];

/// Normalize a quaternion; degenerate input falls back to identity
pub fn quat_normalize(q: [f32; 4]) -> [f32; 4] {
    let len = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    if len < f32::EPSILON {
        IDENTITY
    } else {
        [q[0] / len, q[1] / len, q[2] / len, q[3] / len]
    }
}

/// Spherical linear interpolation between two quaternions
pub fn quat_slerp(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    let mut dot = a[0] * b[0] + a[1] * b[1] + a[2] * b[2] + a[3] * b[3];

    // Take the short way around
    let mut b = b;
    if dot < 0.0 {
        b = [-b[0], -b[1], -b[2], -b[3]];
        dot = -dot;
    }

    // Fall back to normalized lerp for nearly parallel rotations
    if dot > 0.9995 {
        return quat_normalize([
            a[0] + (b[0] - a[0]) * t,
            a[1] + (b[1] - a[1]) * t,
            a[2] + (b[2] - a[2]) * t,
            a[3] + (b[3] - a[3]) * t,
        ]);
    }

    let theta_0 = dot.acos();
    let theta = theta_0 * t;
    let sin_theta = theta.sin();
    let sin_theta_0 = theta_0.sin();

    let s0 = (theta_0 - theta).cos() - dot * sin_theta / sin_theta_0;
    let s1 = sin_theta / sin_theta_0;

    [
        a[0] * s0 + b[0] * s1,
        a[1] * s0 + b[1] * s1,
        a[2] * s0 + b[2] * s1,
        a[3] * s0 + b[3] * s1,
    ]
}

/// Rotation looking along `direction` with the given up vector
///
/// Maps the neutral `-Z` forward onto `direction`. Directions parallel to
/// `up` keep a stable basis by substituting `+X` as the right vector.
pub fn look_rotation(direction: [f32; 3], up: [f32; 3]) -> [f32; 4] {
    let back = normalize([-direction[0], -direction[1], -direction[2]]);
    let mut right = cross(up, back);
    if right[0] * right[0] + right[1] * right[1] + right[2] * right[2] < f32::EPSILON {
        right = [1.0, 0.0, 0.0];
    }
    let right = normalize(right);
    let up = cross(back, right);
    quat_from_basis(right, up, back)
}

/// Quaternion from an orthonormal basis given as matrix columns
fn quat_from_basis(x: [f32; 3], y: [f32; 3], z: [f32; 3]) -> [f32; 4] {
    // Row-major elements of the rotation matrix with columns x, y, z
    let (m00, m01, m02) = (x[0], y[0], z[0]);
    let (m10, m11, m12) = (x[1], y[1], z[1]);
    let (m20, m21, m22) = (x[2], y[2], z[2]);

    let trace = m00 + m11 + m22;
    if trace > 0.0 {
        let s = 0.5 / (trace + 1.0).sqrt();
        quat_normalize([(m21 - m12) * s, (m02 - m20) * s, (m10 - m01) * s, 0.25 / s])
    } else if m00 > m11 && m00 > m22 {
        let s = 2.0 * (1.0 + m00 - m11 - m22).sqrt();
        quat_normalize([0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s])
    } else if m11 > m22 {
        let s = 2.0 * (1.0 + m11 - m00 - m22).sqrt();
        quat_normalize([(m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s])
    } else {
        let s = 2.0 * (1.0 + m22 - m00 - m11).sqrt();
        quat_normalize([(m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s])
    }
}

/// Rotate a vector by a quaternion
pub fn quat_rotate(q: [f32; 4], v: [f32; 3]) -> [f32; 3] {
    // v' = v + 2 * qv x (qv x v + w * v)
    let qv = [q[0], q[1], q[2]];
    let t = cross(qv, v);
    let t = [t[0] + q[3] * v[0], t[1] + q[3] * v[1], t[2] + q[3] * v[2]];
    let u = cross(qv, t);
    [
        v[0] + 2.0 * u[0],
        v[1] + 2.0 * u[1],
        v[2] + 2.0 * u[2],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_quat_eq(a: [f32; 4], b: [f32; 4]) {
        // Q and -Q represent the same rotation
        let same: f32 = (0..4).map(|i| (a[i] - b[i]).abs()).sum();
        let negated: f32 = (0..4).map(|i| (a[i] + b[i]).abs()).sum();
        assert!(same < 1e-4 || negated < 1e-4, "{a:?} != {b:?}");
    }

    #[test]
    fn test_look_down_negative_z_is_identity() {
        assert_quat_eq(look_rotation([0.0, 0.0, -1.0], UP), IDENTITY);
    }

    #[test]
    fn test_look_rotation_maps_forward() {
        let directions = [
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0],
            [0.6, 0.0, -0.8],
        ];
        for dir in directions {
            let q = look_rotation(dir, UP);
            let forward = quat_rotate(q, [0.0, 0.0, -1.0]);
            for i in 0..3 {
                assert!((forward[i] - dir[i]).abs() < 1e-4, "{forward:?} != {dir:?}");
            }
        }
    }

    #[test]
    fn test_slerp_endpoints() {
        let a = look_rotation([1.0, 0.0, 0.0], UP);
        let b = look_rotation([0.0, 0.0, 1.0], UP);
        assert_quat_eq(quat_slerp(a, b, 0.0), a);
        assert_quat_eq(quat_slerp(a, b, 1.0), b);
    }

    #[test]
    fn test_slerp_midpoint_is_unit_length() {
        let a = look_rotation([1.0, 0.0, 0.0], UP);
        let b = look_rotation([0.0, 0.0, -1.0], UP);
        let mid = quat_slerp(a, b, 0.5);
        let len = (mid[0] * mid[0] + mid[1] * mid[1] + mid[2] * mid[2] + mid[3] * mid[3]).sqrt();
        assert!((len - 1.0).abs() < 1e-4);
    }
}
