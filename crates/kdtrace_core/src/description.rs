//! JSON scene files.
//!
//! A scene file mirrors [`Scene`]: optional `camera`, `render` and `tree`
//! sections (every field defaulted), the root `bounds` of the spatial index,
//! the `lights`, and a list of `objects` tagged by `type`.
//!
//! ```json
//! {
//!   "bounds": { "min": [-10, -10, -10], "max": [10, 10, 10] },
//!   "lights": [{ "position": [0, 9, 0] }],
//!   "objects": [
//!     { "type": "room", "extent": [9.5, 9.5, 9.5],
//!       "materials": ["mirror", "red", "green", "purple", "blue", "black"] },
//!     { "type": "sphere", "center": [0, 0, 0], "radius": 1, "material": "glass" },
//!     { "type": "mesh", "path": "bunny.obj", "material": "green" }
//!   ]
//! }
//! ```

use std::path::{Path, PathBuf};

use kdtrace_math::{Aabb, Vec3};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Deserialize;

use crate::assembly;
use crate::error::{SceneError, SceneResult};
use crate::material::{Light, Material, MaterialPreset};
use crate::mesh::Mesh;
use crate::scene::{Scene, SceneObject, Shape};
use crate::settings::{CameraSettings, RenderSettings, TreeSettings};

/// Top level of a scene file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    pub name: Option<String>,
    pub camera: CameraSettings,
    pub render: RenderSettings,
    pub tree: TreeSettings,
    pub bounds: BoundsDescription,
    pub lights: Vec<Light>,
    pub objects: Vec<ObjectDescription>,
}

/// Root volume of the spatial index.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BoundsDescription {
    Explicit { min: Vec3, max: Vec3 },
    Keyword(BoundsKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsKeyword {
    /// Padded extent of the scene's objects.
    Auto,
}

impl Default for BoundsDescription {
    fn default() -> Self {
        Self::Keyword(BoundsKeyword::Auto)
    }
}

impl BoundsDescription {
    /// Explicit bounds, validated; `None` for `"auto"`.
    pub fn resolve(&self) -> SceneResult<Option<Aabb>> {
        match *self {
            Self::Explicit { min, max } => {
                let bounds = Aabb::new(min, max);
                bounds.validate().map_err(|axis| {
                    let interval = bounds.axis_interval(axis);
                    SceneError::InvalidBounds {
                        axis,
                        min: interval.min,
                        max: interval.max,
                    }
                })?;
                Ok(Some(bounds))
            }
            Self::Keyword(BoundsKeyword::Auto) => Ok(None),
        }
    }
}

/// A material given either by preset name or inline.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MaterialDescription {
    Preset(MaterialPreset),
    Inline(Material),
}

impl Default for MaterialDescription {
    fn default() -> Self {
        Self::Preset(MaterialPreset::Red)
    }
}

impl From<MaterialDescription> for Material {
    fn from(description: MaterialDescription) -> Self {
        match description {
            MaterialDescription::Preset(preset) => preset.into(),
            MaterialDescription::Inline(material) => material,
        }
    }
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

/// One entry of the `objects` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectDescription {
    Sphere {
        center: Vec3,
        radius: f32,
        #[serde(default)]
        material: MaterialDescription,
    },
    Triangle {
        vertices: [Vec3; 3],
        #[serde(default)]
        normal: Option<Vec3>,
        #[serde(default)]
        material: MaterialDescription,
    },
    /// OBJ file, relative paths resolved against the scene file's directory.
    Mesh {
        path: PathBuf,
        #[serde(default)]
        position: Vec3,
        #[serde(default = "unit_scale")]
        scale: Vec3,
        #[serde(default)]
        material: MaterialDescription,
    },
    /// Panels in the order +x, -x, +y, -y, +z, -z.
    Room {
        #[serde(default)]
        center: Vec3,
        extent: Vec3,
        materials: [MaterialDescription; 6],
    },
    RandomSpheres {
        min: Vec3,
        max: Vec3,
        count: usize,
        max_radius: f32,
        #[serde(default)]
        material: MaterialDescription,
        #[serde(default)]
        seed: Option<u64>,
    },
}

impl ObjectDescription {
    fn expand(&self, base_dir: &Path) -> SceneResult<Vec<SceneObject>> {
        let objects = match self {
            Self::Sphere {
                center,
                radius,
                material,
            } => vec![SceneObject::new(
                Shape::Sphere {
                    center: *center,
                    radius: *radius,
                },
                (*material).into(),
            )],
            Self::Triangle {
                vertices,
                normal,
                material,
            } => vec![SceneObject::new(
                Shape::Triangle {
                    vertices: *vertices,
                    normal: normal.map(Vec3::normalize),
                },
                (*material).into(),
            )],
            Self::Mesh {
                path,
                position,
                scale,
                material,
            } => {
                let mesh = Mesh::load_obj(base_dir.join(path))?.placed(*position, *scale);
                let material = Material::from(*material);
                mesh.triangles()
                    .into_iter()
                    .map(|vertices| {
                        SceneObject::new(
                            Shape::Triangle {
                                vertices,
                                normal: None,
                            },
                            material,
                        )
                    })
                    .collect()
            }
            Self::Room {
                center,
                extent,
                materials,
            } => assembly::room(*center, *extent, materials.map(Material::from)),
            Self::RandomSpheres {
                min,
                max,
                count,
                max_radius,
                material,
                seed,
            } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                let bounds = Aabb::padded(*min, *max);
                assembly::random_spheres(&bounds, *count, *max_radius, (*material).into(), &mut rng)
            }
        };
        Ok(objects)
    }
}

impl Scene {
    /// Assemble a scene from a parsed description. Mesh paths are resolved
    /// against `base_dir`.
    pub fn from_description(description: &SceneDescription, base_dir: &Path) -> SceneResult<Self> {
        description.camera.validate()?;

        let mut scene = Scene::new(description.name.clone().unwrap_or_else(|| "scene".to_string()));
        scene.camera = description.camera;
        scene.render = description.render;
        scene.tree = description.tree;
        scene.bounds = description.bounds.resolve()?;
        scene.lights = description.lights.clone();

        for object in &description.objects {
            scene.add_objects(object.expand(base_dir)?);
        }

        if scene.lights.is_empty() {
            log::warn!("Scene '{}' has no lights", scene.name);
        }

        Ok(scene)
    }
}

/// Load a scene file from disk. The scene is named after the file unless it
/// sets `name` itself.
pub fn load_scene<P: AsRef<Path>>(path: P) -> SceneResult<Scene> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let mut description: SceneDescription = serde_json::from_str(&contents)?;

    if description.name.is_none() {
        description.name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned());
    }

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let scene = Scene::from_description(&description, base_dir)?;

    log::info!(
        "Loaded scene '{}': {} objects ({} spheres, {} triangles), {} lights",
        scene.name,
        scene.object_count(),
        scene.sphere_count(),
        scene.triangle_count(),
        scene.lights.len()
    );
    Ok(scene)
}

/// Parse a scene from JSON text, resolving mesh paths against the current
/// directory.
pub fn load_scene_from_str(contents: &str) -> SceneResult<Scene> {
    let description: SceneDescription = serde_json::from_str(contents)?;
    Scene::from_description(&description, Path::new("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Visibility;
    use crate::settings::AxisPolicy;

    #[test]
    fn test_empty_scene_uses_defaults() {
        let scene = load_scene_from_str("{}").unwrap();

        assert_eq!(scene.name, "scene");
        assert_eq!(scene.object_count(), 0);
        assert_eq!(scene.camera, CameraSettings::default());
        assert_eq!(scene.render, RenderSettings::default());
        assert!(scene.bounds.is_none());
    }

    #[test]
    fn test_full_scene() {
        let scene = load_scene_from_str(
            r#"{
                "name": "demo",
                "camera": { "eye": [0, 0, -8], "width": 64, "height": 48 },
                "render": { "max_depth": 4 },
                "tree": { "leaf_size": 2, "axis": "round_robin" },
                "bounds": { "min": [-10, -10, -10], "max": [10, 10, 10] },
                "lights": [{ "position": [0, 9, 0] }],
                "objects": [
                    { "type": "room", "extent": [9.5, 9.5, 9.5],
                      "materials": ["mirror", "red", "green", "purple", "blue", "black"] },
                    { "type": "sphere", "center": [0, 0, 0], "radius": 1, "material": "glass" },
                    { "type": "triangle", "vertices": [[0, 0, 0], [1, 0, 0], [0, 1, 0]],
                      "material": { "visibility": "reflective" } },
                    { "type": "random_spheres", "min": [-1, -1, -1], "max": [1, 1, 1],
                      "count": 3, "max_radius": 0.2, "seed": 1 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scene.name, "demo");
        assert_eq!(scene.camera.width, 64);
        assert_eq!(scene.camera.fov, 50.0);
        assert_eq!(scene.render.max_depth, 4);
        assert_eq!(scene.render.bias, 0.01);
        assert_eq!(scene.tree.axis, AxisPolicy::RoundRobin);
        assert_eq!(scene.lights.len(), 1);
        assert_eq!(scene.object_count(), 12 + 1 + 1 + 3);
        assert_eq!(scene.sphere_count(), 4);
        assert_eq!(scene.objects[12].material, Material::GLASS);
        assert_eq!(scene.objects[13].material.visibility, Visibility::Reflective);

        let bounds = scene.bounds.unwrap();
        assert_eq!(bounds.min_corner(), Vec3::splat(-10.0));
    }

    #[test]
    fn test_auto_bounds_keyword() {
        let scene = load_scene_from_str(r#"{ "bounds": "auto" }"#).unwrap();
        assert!(scene.bounds.is_none());
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let result = load_scene_from_str(r#"{ "bounds": { "min": [0, 5, 0], "max": [1, 1, 1] } }"#);

        assert!(matches!(
            result,
            Err(SceneError::InvalidBounds { min, max, .. }) if min == 5.0 && max == 1.0
        ));
    }

    #[test]
    fn test_invalid_camera_rejected() {
        let result = load_scene_from_str(r#"{ "camera": { "fov": 0 } }"#);
        assert!(matches!(result, Err(SceneError::InvalidSetting(_))));
    }

    #[test]
    fn test_unknown_object_type_rejected() {
        let result = load_scene_from_str(r#"{ "objects": [{ "type": "torus" }] }"#);
        assert!(matches!(result, Err(SceneError::Json(_))));
    }

    #[test]
    fn test_missing_mesh_is_io_error() {
        let result = load_scene_from_str(
            r#"{ "objects": [{ "type": "mesh", "path": "does/not/exist.obj" }] }"#,
        );
        assert!(matches!(result, Err(SceneError::Io(_))));
    }

    #[test]
    fn test_bundled_room_scene() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenes/room.json");
        let scene = load_scene(path).unwrap();

        assert_eq!(scene.name, "room");
        // 12 room panels and 8 octahedron faces
        assert_eq!(scene.triangle_count(), 20);
        assert_eq!(scene.sphere_count(), 43);
        assert_eq!(scene.tree.axis, AxisPolicy::Random { seed: Some(7) });
        assert_eq!(scene.lights[0].position, Vec3::new(0.0, 9.0, 0.0));
    }
}
