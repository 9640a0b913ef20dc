//! Renderer errors.

use kdtrace_math::Axis;
use thiserror::Error;

/// Invalid spatial index configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Invalid root bounds on axis {axis}: max {max} is below min {min}")]
    InvalidBounds { axis: Axis, min: f32, max: f32 },

    #[error("Leaf size must be at least 1")]
    InvalidLeafSize,
}

/// Errors writing a rendered image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
}
