//! The renderable world: primitives, lights and the kd-tree over them.

use kdtrace_core::{Light, Scene, TreeSettings};
use kdtrace_math::{Aabb, Ray};

use crate::error::BuildError;
use crate::kdtree::{Hit, KdTree, PrimitiveId};
use crate::Primitive;

/// Immutable after construction and shared by every render worker.
#[derive(Debug, Clone)]
pub struct World {
    primitives: Vec<Primitive>,
    lights: Vec<Light>,
    tree: KdTree,
}

impl World {
    /// Build the kd-tree over `primitives` inside `bounds`.
    pub fn build(
        primitives: Vec<Primitive>,
        lights: Vec<Light>,
        bounds: Aabb,
        settings: &TreeSettings,
    ) -> Result<Self, BuildError> {
        let tree = KdTree::build(&primitives, bounds, settings)?;
        Ok(Self {
            primitives,
            lights,
            tree,
        })
    }

    /// Convert every scene object and build over the scene's root volume.
    pub fn from_scene(scene: &Scene) -> Result<Self, BuildError> {
        let primitives = scene.objects.iter().map(Primitive::from).collect();
        Self::build(
            primitives,
            scene.lights.clone(),
            scene.root_bounds(),
            &scene.tree,
        )
    }

    #[inline]
    pub fn closest_hit(&self, ray: &Ray) -> Option<Hit> {
        self.tree.closest_hit(&self.primitives, ray)
    }

    pub fn primitive(&self, id: PrimitiveId) -> &Primitive {
        &self.primitives[id]
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn tree(&self) -> &KdTree {
        &self.tree
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kdtrace_core::Material;
    use kdtrace_math::Vec3;

    #[test]
    fn test_from_scene() {
        let mut scene = Scene::new("world");
        scene.add_sphere(Vec3::ZERO, 1.0, Material::RED);
        scene.add_triangle(
            [Vec3::new(-2.0, -2.0, 3.0), Vec3::new(2.0, -2.0, 3.0), Vec3::new(0.0, 2.0, 3.0)],
            Material::BLUE,
        );
        scene.add_light(Light::at(Vec3::new(0.0, 5.0, 0.0)));

        let world = World::from_scene(&scene).unwrap();
        assert_eq!(world.primitives().len(), 2);
        assert_eq!(world.lights().len(), 1);

        let hit = world.closest_hit(&Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z)).unwrap();
        assert_eq!(hit.primitive, 0);
        assert_eq!(hit.distance, 4.0);

        let hit = world.closest_hit(&Ray::new(Vec3::new(1.5, -1.5, -5.0), Vec3::Z)).unwrap();
        assert_eq!(hit.primitive, 1);
    }

    #[test]
    fn test_empty_scene_builds() {
        let world = World::from_scene(&Scene::new("empty")).unwrap();
        assert!(world.closest_hit(&Ray::new(Vec3::ZERO, Vec3::X)).is_none());
    }

    #[test]
    fn test_invalid_scene_bounds() {
        let mut scene = Scene::new("bad");
        scene.bounds = Some(Aabb::new(Vec3::ONE, Vec3::ZERO));

        assert!(matches!(
            World::from_scene(&scene),
            Err(BuildError::InvalidBounds { .. })
        ));
    }
}
