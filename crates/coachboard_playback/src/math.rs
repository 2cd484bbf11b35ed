// SPDX-License-Identifier: MIT OR Apache-2.0
//! Small vector helpers shared by the interpolator and pose sampling.

/// Horizontal speed below which a movement direction is considered noise
///
/// Used both for the facing angle of entity poses and by the POV camera's
/// forward-vector update.
pub const DIRECTION_DEAD_ZONE: f32 = 0.01;

/// Linear interpolation between two floats
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Component-wise linear interpolation between two points
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp(a[0], b[0], t),
        lerp(a[1], b[1], t),
        lerp(a[2], b[2], t),
    ]
}

/// Component-wise sum
pub fn add(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

/// Component-wise difference `a - b`
pub fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Scale a vector by a scalar
pub fn scale(v: [f32; 3], s: f32) -> [f32; 3] {
    [v[0] * s, v[1] * s, v[2] * s]
}

/// Euclidean length
pub fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Unit vector in the direction of `v`; zero-length input is returned as-is
pub fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = length(v);
    if len < f32::EPSILON {
        v
    } else {
        scale(v, 1.0 / len)
    }
}

/// Cross product `a x b`
pub fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Magnitude of the horizontal (xz-plane) component of a vector
pub fn horizontal_length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(2.0, 6.0, 0.0), 2.0);
        assert_eq!(lerp(2.0, 6.0, 1.0), 6.0);
        assert_eq!(lerp(2.0, 6.0, 0.5), 4.0);
    }

    #[test]
    fn test_normalize_zero_is_noop() {
        assert_eq!(normalize([0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_cross_basis() {
        assert_eq!(cross([1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_horizontal_length_ignores_y() {
        assert_eq!(horizontal_length([3.0, 99.0, 4.0]), 5.0);
    }
}
