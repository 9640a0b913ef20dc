//! Pinhole camera for primary ray generation.

use kdtrace_core::CameraSettings;
use kdtrace_math::{Ray, Vec3};

/// Camera for generating rays into the scene.
///
/// One ray per pixel through the pixel center; no sampling or lens.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    eye: Vec3,

    // Orthonormal look-at basis
    right: Vec3,
    up: Vec3,
    forward: Vec3,

    // tan(fov / 2)
    half_height: f32,
    aspect: f32,
}

impl Camera {
    /// Build the look-at basis from the settings.
    pub fn new(settings: &CameraSettings) -> Self {
        let forward = (settings.target - settings.eye).normalize();
        let right = forward.cross(settings.up.normalize()).normalize();
        let up = right.cross(forward);

        Self {
            image_width: settings.width,
            image_height: settings.height,
            eye: settings.eye,
            right,
            up,
            forward,
            half_height: (settings.fov.to_radians() / 2.0).tan(),
            aspect: settings.width as f32 / settings.height as f32,
        }
    }

    pub fn eye(&self) -> Vec3 {
        self.eye
    }

    /// Unit ray from the eye through the center of pixel (row, col).
    /// Row 0 is the top of the image.
    pub fn primary_ray(&self, row: u32, col: u32) -> Ray {
        let py = (1.0 - 2.0 * (row as f32 + 0.5) / self.image_height as f32) * self.half_height;
        let px = (2.0 * (col as f32 + 0.5) / self.image_width as f32 - 1.0)
            * self.half_height
            * self.aspect;

        let direction = (px * self.right + py * self.up + self.forward).normalize();
        Ray::new(self.eye, direction)
    }
}
