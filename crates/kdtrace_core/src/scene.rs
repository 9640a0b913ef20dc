//! Scene types for kdtrace.
//!
//! This module defines the renderer-agnostic scene representation: a flat
//! list of shapes with materials, the lights, and the settings needed to
//! build the spatial index and render an image.

use kdtrace_math::{Aabb, Vec3};

use crate::material::{Light, Material};
use crate::mesh::Mesh;
use crate::settings::{CameraSettings, RenderSettings, TreeSettings};

/// Geometry of a single scene object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Sphere {
        center: Vec3,
        radius: f32,
    },
    /// Counter-clockwise vertices give a right-hand-rule normal. An explicit
    /// normal only picks which side of the vertex plane the triangle faces.
    Triangle {
        vertices: [Vec3; 3],
        normal: Option<Vec3>,
    },
}

impl Shape {
    /// Padded bounding box of the shape.
    pub fn bounds(&self) -> Aabb {
        match *self {
            Shape::Sphere { center, radius } => {
                let r = Vec3::splat(radius.abs());
                Aabb::padded(center - r, center + r)
            }
            Shape::Triangle { vertices: [v0, v1, v2], .. } => {
                Aabb::padded(v0.min(v1).min(v2), v0.max(v1).max(v2))
            }
        }
    }
}

/// A shape paired with its material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneObject {
    pub shape: Shape,
    pub material: Material,
}

impl SceneObject {
    pub fn new(shape: Shape, material: Material) -> Self {
        Self { shape, material }
    }
}

/// A complete scene: geometry, lights and the settings used to render it.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Scene name (usually from filename)
    pub name: String,

    pub objects: Vec<SceneObject>,

    pub lights: Vec<Light>,

    pub camera: CameraSettings,

    pub render: RenderSettings,

    pub tree: TreeSettings,

    /// Root volume of the spatial index; `None` means the padded extent of
    /// the objects.
    pub bounds: Option<Aabb>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn add_sphere(&mut self, center: Vec3, radius: f32, material: Material) {
        self.objects
            .push(SceneObject::new(Shape::Sphere { center, radius }, material));
    }

    pub fn add_triangle(&mut self, vertices: [Vec3; 3], material: Material) {
        self.objects.push(SceneObject::new(
            Shape::Triangle {
                vertices,
                normal: None,
            },
            material,
        ));
    }

    /// Add every triangle of a mesh with a shared material.
    pub fn add_mesh(&mut self, mesh: &Mesh, material: Material) {
        for vertices in mesh.triangles() {
            self.add_triangle(vertices, material);
        }
    }

    pub fn add_objects(&mut self, objects: impl IntoIterator<Item = SceneObject>) {
        self.objects.extend(objects);
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Union of the padded bounds of all objects.
    pub fn extent(&self) -> Aabb {
        self.objects
            .iter()
            .fold(Aabb::EMPTY, |acc, object| Aabb::surrounding(&acc, &object.shape.bounds()))
    }

    /// The root volume for the spatial index. An empty scene without
    /// explicit bounds gets a zero-size volume at the origin.
    pub fn root_bounds(&self) -> Aabb {
        match self.bounds {
            Some(bounds) => bounds,
            None if self.objects.is_empty() => Aabb::new(Vec3::ZERO, Vec3::ZERO),
            None => self.extent(),
        }
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    pub fn sphere_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| matches!(o.shape, Shape::Sphere { .. }))
            .count()
    }

    pub fn triangle_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| matches!(o.shape, Shape::Triangle { .. }))
            .count()
    }
}
