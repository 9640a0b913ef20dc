//! Render, tree and camera settings.
//!
//! All settings have defaults and can be read from the `camera`, `render`
//! and `tree` sections of a scene file.

use kdtrace_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

use crate::error::{SceneError, SceneResult};

/// Shading configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Deepest recursion level that still shades; deeper rays see the background
    pub max_depth: u32,
    /// Offset applied along the normal to secondary ray origins
    pub bias: f32,
    /// Index of refraction of the medium surrounding every object
    pub ambient_ior: f32,
    /// Color returned for misses and for rays past the depth limit
    pub background: Color,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            max_depth: 9,
            bias: 0.01,
            ambient_ior: 1.0,
            background: Vec3::splat(0.2),
        }
    }
}

/// How the kd-tree picks the axis to split each node on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisPolicy {
    /// Uniformly random axis; seeded for reproducible trees.
    Random { seed: Option<u64> },
    /// Cycle X, Y, Z by depth.
    RoundRobin,
}

impl Default for AxisPolicy {
    fn default() -> Self {
        Self::Random { seed: None }
    }
}

/// Spatial index build parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Nodes holding at most this many primitives become leaves
    pub leaf_size: usize,
    /// Nodes at this depth become leaves
    pub max_depth: usize,
    pub axis: AxisPolicy,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            leaf_size: 10,
            max_depth: 40,
            axis: AxisPolicy::default(),
        }
    }
}

/// Pinhole camera placement and image resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Field of view in degrees
    pub fov: f32,
    pub width: u32,
    pub height: u32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            eye: Vec3::new(5.0, 0.0, -5.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 50.0,
            width: 500,
            height: 500,
        }
    }
}

impl CameraSettings {
    /// Reject settings that cannot produce an image.
    pub fn validate(&self) -> SceneResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SceneError::InvalidSetting(format!(
                "image size {}x{} must be non-zero",
                self.width, self.height
            )));
        }
        if !(self.fov > 0.0 && self.fov < 180.0) {
            return Err(SceneError::InvalidSetting(format!(
                "field of view {} must be within (0, 180) degrees",
                self.fov
            )));
        }
        let forward = self.target - self.eye;
        if forward.length_squared() == 0.0 || forward.cross(self.up).length_squared() == 0.0 {
            return Err(SceneError::InvalidSetting(
                "camera up vector must not be parallel to the view direction".to_string(),
            ));
        }
        Ok(())
    }
}
