//! The closed set of renderable primitives.

use kdtrace_core::{Material, SceneObject, Shape};
use kdtrace_math::{Aabb, Ray, Vec3};

use crate::{Sphere, Triangle};

/// A sphere or a triangle, with its material and precomputed bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Sphere(Sphere),
    Triangle(Triangle),
}

impl Primitive {
    /// Distance to the nearest intersection in front of the ray origin.
    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        match self {
            Primitive::Sphere(s) => s.intersect(ray),
            Primitive::Triangle(t) => t.intersect(ray),
        }
    }

    /// Geometric normal at a surface point. Spheres point outward; triangles
    /// return their face normal regardless of the side hit.
    pub fn normal(&self, point: Vec3) -> Vec3 {
        match self {
            Primitive::Sphere(s) => s.normal(point),
            Primitive::Triangle(t) => t.normal(),
        }
    }

    pub fn bounds(&self) -> Aabb {
        match self {
            Primitive::Sphere(s) => s.bounds(),
            Primitive::Triangle(t) => t.bounds(),
        }
    }

    /// True when the primitive touches the closed box.
    pub fn overlaps(&self, aabb: &Aabb) -> bool {
        match self {
            Primitive::Sphere(s) => s.overlaps(aabb),
            Primitive::Triangle(t) => t.overlaps(aabb),
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            Primitive::Sphere(s) => s.material(),
            Primitive::Triangle(t) => t.material(),
        }
    }
}

impl From<Sphere> for Primitive {
    fn from(sphere: Sphere) -> Self {
        Primitive::Sphere(sphere)
    }
}

impl From<Triangle> for Primitive {
    fn from(triangle: Triangle) -> Self {
        Primitive::Triangle(triangle)
    }
}

impl From<&SceneObject> for Primitive {
    fn from(object: &SceneObject) -> Self {
        match object.shape {
            Shape::Sphere { center, radius } => Sphere::new(center, radius, object.material).into(),
            Shape::Triangle {
                vertices: [v0, v1, v2],
                normal: Some(normal),
            } => Triangle::with_normal(v0, v1, v2, normal, object.material).into(),
            Shape::Triangle {
                vertices: [v0, v1, v2],
                normal: None,
            } => Triangle::new(v0, v1, v2, object.material).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_scene_object() {
        let sphere = SceneObject::new(
            Shape::Sphere {
                center: Vec3::ZERO,
                radius: 2.0,
            },
            Material::GLASS,
        );
        let prim = Primitive::from(&sphere);
        assert!(matches!(prim, Primitive::Sphere(_)));
        assert_eq!(prim.material().ior, 1.5);

        let wall = SceneObject::new(
            Shape::Triangle {
                vertices: [Vec3::ZERO, Vec3::X, Vec3::Y],
                normal: Some(-Vec3::Z),
            },
            Material::BLUE,
        );
        let prim = Primitive::from(&wall);
        assert_eq!(prim.normal(Vec3::ZERO), -Vec3::Z);
    }

    #[test]
    fn test_dispatch() {
        let prim: Primitive = Sphere::new(Vec3::ZERO, 1.0, Material::RED).into();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        assert_eq!(prim.intersect(&ray), Some(4.0));
        assert_eq!(prim.normal(Vec3::new(0.0, 0.0, -1.0)), -Vec3::Z);
        assert!(prim.overlaps(&prim.bounds()));
    }
}
