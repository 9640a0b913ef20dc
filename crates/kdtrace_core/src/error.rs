//! Errors raised while assembling a scene.

use kdtrace_math::Axis;
use thiserror::Error;

/// Errors that can occur while loading or assembling a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Scene file error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("OBJ error: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("Mesh {0} contains no triangles")]
    EmptyMesh(String),

    #[error("Invalid bounds on axis {axis:?}: max {max} is below min {min}")]
    InvalidBounds { axis: Axis, min: f32, max: f32 },

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

/// Result type for scene operations.
pub type SceneResult<T> = Result<T, SceneError>;
