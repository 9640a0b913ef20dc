//! Sphere primitive for ray tracing.

use kdtrace_core::Material;
use kdtrace_math::{Aabb, Ray, Vec3};

/// A sphere primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Material,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: Vec3, radius: f32, material: Material) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::padded(center - rvec, center + rvec);

        Self {
            center,
            radius,
            material,
            bbox,
        }
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn bounds(&self) -> Aabb {
        self.bbox
    }

    /// Distance to the nearest intersection in front of the ray origin.
    ///
    /// Assumes a normalized direction. A ray starting inside the sphere
    /// reports the exit point.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin - self.center;
        let b = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        if discriminant == 0.0 {
            return (-b > 0.0).then_some(-b);
        }

        let sqrtd = discriminant.sqrt();
        let near = -b - sqrtd;
        let far = -b + sqrtd;

        if near > 0.0 {
            Some(near)
        } else if far > 0.0 {
            Some(far)
        } else {
            None
        }
    }

    /// Outward unit normal at a point on the surface.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        (point - self.center).normalize()
    }

    /// True when the sphere touches the closed box.
    pub fn overlaps(&self, aabb: &Aabb) -> bool {
        let closest = self.center.clamp(aabb.min_corner(), aabb.max_corner());
        self.center.distance_squared(closest) <= self.radius * self.radius
    }
}
