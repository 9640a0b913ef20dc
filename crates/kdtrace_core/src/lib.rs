//! kdtrace core - scene model and scene-file loading.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `SceneObject`, `Shape`, `Material`, `Light`
//! - **Settings**: camera, shading and spatial-index parameters
//! - **Assembly**: axis-aligned rooms, random sphere fields and OBJ meshes
//! - **Scene files**: JSON descriptions loaded with `load_scene`
//!
//! # Example
//!
//! ```ignore
//! use kdtrace_core::load_scene;
//!
//! let scene = load_scene("scenes/room.json")?;
//! println!("Loaded {} objects, {} lights",
//!     scene.object_count(),
//!     scene.lights.len());
//! ```

pub mod assembly;
pub mod description;
pub mod error;
pub mod material;
pub mod mesh;
pub mod scene;
pub mod settings;

// Re-export commonly used types
pub use description::{load_scene, load_scene_from_str, SceneDescription};
pub use error::{SceneError, SceneResult};
pub use material::{Light, Material, MaterialPreset, Visibility};
pub use mesh::Mesh;
pub use scene::{Scene, SceneObject, Shape};
pub use settings::{AxisPolicy, CameraSettings, RenderSettings, TreeSettings};
