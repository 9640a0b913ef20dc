// Optics utilities for Vec3
//
// Extends glam::Vec3 with the refraction helper the shader needs.
// glam already provides dot, cross, normalize, reflect and componentwise
// multiply. glam's own `refract` takes a single eta and returns zero on total
// internal reflection, so the two-index version here has a distinct name.

use glam::Vec3;

/// Extension trait for Vec3 to provide light-transport helpers
pub trait Vec3Ext {
    /// Bend this direction through an interface from `ior1` into `ior2`.
    ///
    /// `n` must face against the incoming direction. Returns `None` on total
    /// internal reflection.
    fn refract_between(self, n: Vec3, ior1: f32, ior2: f32) -> Option<Vec3>;

    /// Clamp every channel into [0, 1].
    fn clamp01(self) -> Vec3;
}

impl Vec3Ext for Vec3 {
    fn refract_between(self, n: Vec3, ior1: f32, ior2: f32) -> Option<Vec3> {
        let eta = ior1 / ior2;
        let cos_i = n.dot(self).abs();
        let sin_t2 = eta * eta * (1.0 - cos_i * cos_i);
        if sin_t2 > 1.0 {
            return None;
        }

        let cos_t = (1.0 - sin_t2).sqrt();
        Some(eta * self + (eta * cos_i - cos_t) * n)
    }

    fn clamp01(self) -> Vec3 {
        self.clamp(Vec3::ZERO, Vec3::ONE)
    }
}

/// Fraction of light transmitted through a dielectric interface.
///
/// Unpolarized Fresnel equations averaged over both polarizations; the
/// reflected fraction is `1.0 - fresnel_transmittance(..)`. Only meaningful
/// when [`Vec3Ext::refract_between`] found a direction.
pub fn fresnel_transmittance(n: Vec3, direction: Vec3, ior1: f32, ior2: f32) -> f32 {
    let cos_i = direction.dot(n).abs();
    let eta = ior1 / ior2;
    let sin_t2 = eta * eta * (1.0 - cos_i * cos_i);
    let cos_t = (1.0 - sin_t2).max(0.0).sqrt();

    let r_parallel = ((ior2 * cos_i - ior1 * cos_t) / (ior2 * cos_i + ior1 * cos_t)).powi(2);
    let r_perpendicular = ((ior1 * cos_i - ior2 * cos_t) / (ior1 * cos_i + ior2 * cos_t)).powi(2);

    1.0 - 0.5 * (r_parallel + r_perpendicular)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glam_reflect_mirrors_about_normal() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = d.reflect(Vec3::Y);

        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_refract_normal_incidence_passes_straight() {
        let d = -Vec3::Y;
        let t = d.refract_between(Vec3::Y, 1.0, 1.5).unwrap();

        assert!((t - d).length() < 1e-6);
    }

    #[test]
    fn test_refract_snell() {
        let angle = 30f32.to_radians();
        let d = Vec3::new(angle.sin(), -angle.cos(), 0.0);
        let t = d.refract_between(Vec3::Y, 1.0, 1.5).unwrap();

        // n1 sin(i) = n2 sin(t)
        let sin_t = t.x / t.length();
        assert!((angle.sin() - 1.5 * sin_t).abs() < 1e-5);
        assert!((t.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_refract_total_internal_reflection() {
        let angle = 60f32.to_radians();
        let d = Vec3::new(angle.sin(), -angle.cos(), 0.0);

        assert!(d.refract_between(Vec3::Y, 1.5, 1.0).is_none());
    }

    #[test]
    fn test_refract_leaving_dense_medium_bends_away() {
        let angle = 20f32.to_radians();
        let d = Vec3::new(angle.sin(), -angle.cos(), 0.0);
        let t = d.refract_between(Vec3::Y, 1.5, 1.0).unwrap();

        // 1.5 sin(i) = 1.0 sin(t)
        assert!((1.5 * angle.sin() - t.x).abs() < 1e-5);
        assert!(t.y < 0.0);
    }

    #[test]
    fn test_clamp01() {
        let c = Vec3::new(-0.5, 0.5, 1.5).clamp01();
        assert_eq!(c, Vec3::new(0.0, 0.5, 1.0));
    }

    #[test]
    fn test_fresnel_normal_incidence() {
        let t = fresnel_transmittance(Vec3::Y, -Vec3::Y, 1.0, 1.5);
        assert!((t - 0.96).abs() < 1e-5);
    }

    #[test]
    fn test_fresnel_matched_media_transmits_everything() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let t = fresnel_transmittance(Vec3::Y, d, 1.33, 1.33);
        assert!((t - 1.0).abs() < 1e-6);
    }
}
