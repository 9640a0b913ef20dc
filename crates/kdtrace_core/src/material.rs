//! Phong surface materials and point lights.

use kdtrace_math::{Color, Vec3};
use serde::{Deserialize, Serialize};

/// How a surface interacts with light.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Phong-lit with shadow rays.
    Opaque,
    /// Perfect mirror.
    Reflective,
    /// Dielectric that both reflects and refracts.
    Transparent,
}

/// Surface attributes carried by every primitive.
///
/// Materials are plain values, copied into each primitive at construction
/// and never modified afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    /// Ambient reflectance (ka)
    pub ambient: Color,

    /// Diffuse reflectance (kd)
    pub diffuse: Color,

    /// Specular reflectance (ks)
    pub specular: Color,

    pub visibility: Visibility,

    /// Phong exponent
    pub shininess: f32,

    /// Index of refraction (only used by transparent surfaces)
    pub ior: f32,
}

impl Material {
    pub const RED: Material = Material::opaque(
        Vec3::new(0.5, 0.0, 0.0),
        Vec3::new(0.7, 0.1, 0.1),
    );

    pub const GREEN: Material = Material::opaque(
        Vec3::new(0.0, 0.5, 0.0),
        Vec3::new(0.1, 0.7, 0.1),
    );

    pub const BLUE: Material = Material::opaque(
        Vec3::new(0.0, 0.0, 0.7),
        Vec3::new(0.1, 0.1, 0.7),
    );

    pub const PURPLE: Material = Material::opaque(
        Vec3::new(0.5, 0.0, 0.5),
        Vec3::new(0.7, 0.1, 0.7),
    );

    pub const BLACK: Material = Material::opaque(Vec3::ZERO, Vec3::new(0.1, 0.1, 0.1));

    pub const MIRROR: Material = Material {
        ambient: Vec3::ZERO,
        diffuse: Vec3::ZERO,
        specular: Vec3::ZERO,
        visibility: Visibility::Reflective,
        shininess: 5.0,
        ior: 1.0,
    };

    pub const GLASS: Material = Material::dielectric(1.5);

    pub const WATER: Material = Material::dielectric(1.333);

    /// Opaque material with a white highlight and the default exponent.
    pub const fn opaque(ambient: Color, diffuse: Color) -> Self {
        Self {
            ambient,
            diffuse,
            specular: Vec3::ONE,
            visibility: Visibility::Opaque,
            shininess: 100.0,
            ior: 1.0,
        }
    }

    /// Transparent material with the given index of refraction.
    pub const fn dielectric(ior: f32) -> Self {
        Self {
            ambient: Vec3::ZERO,
            diffuse: Vec3::ZERO,
            specular: Vec3::ZERO,
            visibility: Visibility::Transparent,
            shininess: 5.0,
            ior,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::RED
    }
}

/// Named materials usable from scene files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaterialPreset {
    Red,
    Green,
    Blue,
    Purple,
    Black,
    Mirror,
    Glass,
    Water,
}

impl From<MaterialPreset> for Material {
    fn from(preset: MaterialPreset) -> Self {
        match preset {
            MaterialPreset::Red => Material::RED,
            MaterialPreset::Green => Material::GREEN,
            MaterialPreset::Blue => Material::BLUE,
            MaterialPreset::Purple => Material::PURPLE,
            MaterialPreset::Black => Material::BLACK,
            MaterialPreset::Mirror => Material::MIRROR,
            MaterialPreset::Glass => Material::GLASS,
            MaterialPreset::Water => Material::WATER,
        }
    }
}

/// A point light with separate ambient, diffuse and specular intensities.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    #[serde(default = "Light::default_ambient")]
    pub ambient: Color,

    #[serde(default = "Light::default_diffuse")]
    pub diffuse: Color,

    #[serde(default = "Light::default_specular")]
    pub specular: Color,

    pub position: Vec3,
}

impl Light {
    pub fn new(ambient: Color, diffuse: Color, specular: Color, position: Vec3) -> Self {
        Self {
            ambient,
            diffuse,
            specular,
            position,
        }
    }

    /// White light at `position` with the default intensities.
    pub fn at(position: Vec3) -> Self {
        Self::new(
            Self::default_ambient(),
            Self::default_diffuse(),
            Self::default_specular(),
            position,
        )
    }

    fn default_ambient() -> Color {
        Vec3::splat(0.2)
    }

    fn default_diffuse() -> Color {
        Vec3::ONE
    }

    fn default_specular() -> Color {
        Vec3::splat(0.5)
    }
}
