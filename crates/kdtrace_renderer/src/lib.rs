//! kdtrace renderer
//!
//! A Whitted-style CPU ray tracer accelerated by a kd-tree.
//!
//! Spheres and triangles are converted from the scene description into
//! [`Primitive`]s, indexed by a [`KdTree`] and shaded with Phong lighting,
//! mirror reflection and Fresnel-weighted refraction. Images are rendered
//! in parallel buckets and written as a plain-text dump or a PNG.

mod bucket;
mod camera;
mod error;
mod kdtree;
mod output;
mod primitive;
mod renderer;
mod sphere;
mod triangle;
mod world;

pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult, DEFAULT_BUCKET_SIZE};
pub use camera::Camera;
pub use error::{BuildError, OutputError};
pub use kdtree::{linear_closest_hit, Hit, KdNode, KdTree, NodeId, PrimitiveId, TreeStats};
pub use output::{format_general, ImageBuffer};
pub use primitive::Primitive;
pub use renderer::{render, render_pixel, render_with_buckets, trace};
pub use sphere::Sphere;
pub use triangle::Triangle;
pub use world::World;

/// Re-export Vec3 and common math types from kdtrace_math
pub use kdtrace_math::{Aabb, Color, Interval, Ray, Vec3};
