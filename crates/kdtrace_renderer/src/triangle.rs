//! Triangle primitive for ray tracing.
//!
//! Intersection is a plane hit followed by a barycentric containment test;
//! box overlap uses the separating axis theorem.

use kdtrace_core::Material;
use kdtrace_math::{Aabb, Ray, Vec3};

/// A triangle primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Vertices
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
    /// Face normal (unit length)
    normal: Vec3,
    material: Material,
    bbox: Aabb,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// The normal follows the right-hand rule over (v1 - v0) x (v2 - v0).
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, material: Material) -> Self {
        let normal = (v1 - v0).cross(v2 - v0).normalize_or_zero();
        let bbox = Aabb::padded(v0.min(v1).min(v2), v0.max(v1).max(v2));

        Self {
            v0,
            v1,
            v2,
            normal,
            material,
            bbox,
        }
    }

    /// Create a triangle facing the side `facing` points to.
    ///
    /// The plane always comes from the vertices; `facing` only chooses
    /// between the right-hand normal and its opposite.
    pub fn with_normal(v0: Vec3, v1: Vec3, v2: Vec3, facing: Vec3, material: Material) -> Self {
        let mut triangle = Self::new(v0, v1, v2, material);
        if triangle.normal.dot(facing) < 0.0 {
            triangle.normal = -triangle.normal;
        }
        triangle
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        [self.v0, self.v1, self.v2]
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn bounds(&self) -> Aabb {
        self.bbox
    }

    /// Distance along the ray to the triangle, if it is hit at or in front
    /// of the origin.
    ///
    /// Points exactly on the v1-v2 edge are rejected.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        let t = (self.v0 - ray.origin).dot(self.normal) / self.normal.dot(ray.direction);
        if !t.is_finite() || t < 0.0 {
            return None;
        }
        let point = ray.at(t);

        // Barycentric coordinates over the edges (v2 - v0) and (v1 - v0)
        let e0 = self.v2 - self.v0;
        let e1 = self.v1 - self.v0;
        let ep = point - self.v0;

        let dot00 = e0.dot(e0);
        let dot01 = e0.dot(e1);
        let dot02 = e0.dot(ep);
        let dot11 = e1.dot(e1);
        let dot12 = e1.dot(ep);

        let inv_denom = 1.0 / (dot00 * dot11 - dot01 * dot01);
        let u = (dot11 * dot02 - dot01 * dot12) * inv_denom;
        let v = (dot00 * dot12 - dot01 * dot02) * inv_denom;

        (u >= 0.0 && v >= 0.0 && u + v < 1.0).then_some(t)
    }

    /// Separating axis test against a closed box: the three box normals,
    /// the face normal and the nine edge cross products.
    pub fn overlaps(&self, aabb: &Aabb) -> bool {
        let center = aabb.centroid();
        let half = aabb.max_corner() - center;

        let v0 = self.v0 - center;
        let v1 = self.v1 - center;
        let v2 = self.v2 - center;

        let edges = [v1 - v0, v2 - v1, v0 - v2];
        let mut axes = [Vec3::ZERO; 13];
        axes[0] = Vec3::X;
        axes[1] = Vec3::Y;
        axes[2] = Vec3::Z;
        axes[3] = self.normal;
        for (i, unit) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().enumerate() {
            for (j, edge) in edges.iter().enumerate() {
                axes[4 + 3 * i + j] = unit.cross(*edge);
            }
        }

        axes.iter().all(|axis| {
            let p0 = v0.dot(*axis);
            let p1 = v1.dot(*axis);
            let p2 = v2.dot(*axis);
            let r = half.dot(axis.abs());

            let max_point = p0.max(p1).max(p2);
            let min_point = p0.min(p1).min(p2);
            (-max_point).max(min_point) <= r
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Material::RED,
        )
    }

    #[test]
    fn test_triangle_normal_right_hand() {
        assert_eq!(unit_triangle().normal(), Vec3::Z);
    }

    #[test]
    fn test_explicit_normal_only_sets_orientation() {
        let [v0, v1, v2] = unit_triangle().vertices();

        let flipped = Triangle::with_normal(v0, v1, v2, Vec3::new(0.3, 0.2, -1.0), Material::RED);
        assert_eq!(flipped.normal(), -Vec3::Z);

        // A tilted hint must not tilt the plane
        let tilted = Triangle::with_normal(v0, v1, v2, Vec3::new(1.0, 0.0, 0.2), Material::RED);
        assert_eq!(tilted.normal(), Vec3::Z);

        let ray = Ray::towards(Vec3::new(0.25, 0.25, -1.0), Vec3::new(0.25, 0.25, 0.0));
        assert_eq!(flipped.intersect(&ray), Some(1.0));
        assert_eq!(tilted.intersect(&ray), Some(1.0));

        let touching = Aabb::new(Vec3::new(0.1, 0.1, -0.1), Vec3::new(0.2, 0.2, 0.1));
        assert!(tilted.overlaps(&touching));
        let above = Aabb::new(Vec3::new(0.1, 0.1, 0.5), Vec3::new(0.2, 0.2, 0.6));
        assert!(!tilted.overlaps(&above));
    }

    #[test]
    fn test_triangle_hit() {
        let ray = Ray::towards(Vec3::new(0.25, 0.25, -1.0), Vec3::new(0.25, 0.25, 0.0));
        assert_eq!(unit_triangle().intersect(&ray), Some(1.0));
    }

    #[test]
    fn test_triangle_hit_from_back() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, 2.0), -Vec3::Z);
        assert_eq!(unit_triangle().intersect(&ray), Some(2.0));
    }

    #[test]
    fn test_triangle_miss_outside() {
        let ray = Ray::towards(Vec3::new(0.25, 0.25, -1.0), Vec3::new(2.0, 2.0, -1.0));
        assert_eq!(unit_triangle().intersect(&ray), None);

        let ray = Ray::new(Vec3::new(2.0, 2.0, -1.0), Vec3::Z);
        assert_eq!(unit_triangle().intersect(&ray), None);
    }

    #[test]
    fn test_triangle_miss_behind() {
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), -Vec3::Z);
        assert_eq!(unit_triangle().intersect(&ray), None);
    }

    #[test]
    fn test_triangle_parallel_ray() {
        let ray = Ray::new(Vec3::new(-1.0, 0.25, 0.0), Vec3::X);
        assert_eq!(unit_triangle().intersect(&ray), None);
    }

    #[test]
    fn test_triangle_hypotenuse_is_open() {
        let ray = Ray::new(Vec3::new(0.5, 0.5, -1.0), Vec3::Z);
        assert_eq!(unit_triangle().intersect(&ray), None);

        let ray = Ray::new(Vec3::new(0.0, 0.0, -1.0), Vec3::Z);
        assert_eq!(unit_triangle().intersect(&ray), Some(1.0));
    }

    #[test]
    fn test_triangle_bounds_padded() {
        let bounds = unit_triangle().bounds();
        assert_eq!(bounds.x.max, 1.0);
        assert!(bounds.z.min < 0.0 && bounds.z.max > 0.0);
    }

    #[test]
    fn test_triangle_box_overlap() {
        let tri = unit_triangle();

        let around = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        assert!(tri.overlaps(&around));

        // Above the plane
        let above = Aabb::new(Vec3::new(0.0, 0.0, 0.5), Vec3::new(1.0, 1.0, 1.0));
        assert!(!tri.overlaps(&above));

        // Beyond the hypotenuse but inside the triangle's bounds
        let corner = Aabb::new(Vec3::new(0.8, 0.8, -0.1), Vec3::new(1.0, 1.0, 0.1));
        assert!(!tri.overlaps(&corner));

        // Touching a vertex
        let vertex = Aabb::new(Vec3::new(1.0, -0.5, -0.5), Vec3::new(2.0, 0.5, 0.5));
        assert!(tri.overlaps(&vertex));
    }
}
