// Re-export glam for convenience
pub use glam::*;

// kdtrace math types
mod aabb;
mod interval;
mod optics;
mod ray;

pub use aabb::{Aabb, Axis, BOX_BIAS};
pub use interval::Interval;
pub use optics::{fresnel_transmittance, Vec3Ext};
pub use ray::Ray;

/// RGB color with channels nominally in [0, 1].
pub type Color = Vec3;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a * b, Vec3::new(4.0, 10.0, 18.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_vec3_axis_indexing() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(v[Axis::X.index()], 1.0);
        assert_eq!(v[Axis::Y.index()], 2.0);
        assert_eq!(v[Axis::Z.index()], 3.0);
    }
}
