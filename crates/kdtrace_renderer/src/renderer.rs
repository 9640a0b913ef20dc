//! Recursive Whitted-style shading and the parallel render loop.
//!
//! Implements:
//! - Phong lighting with hard shadows for opaque surfaces
//! - Perfect mirror reflection
//! - Fresnel-weighted reflection and refraction for dielectrics
//!
//! Every secondary ray goes back through the kd-tree. Recursion is bounded
//! by `RenderSettings::max_depth`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use kdtrace_core::{Light, Material, RenderSettings, Visibility};
use kdtrace_math::{fresnel_transmittance, Color, Ray, Vec3, Vec3Ext};
use rayon::prelude::*;

use crate::bucket::{generate_buckets, render_bucket, BucketResult, DEFAULT_BUCKET_SIZE};
use crate::kdtree::Hit;
use crate::{Camera, ImageBuffer, World};

/// Color seen along a ray.
///
/// Rays deeper than `settings.max_depth` and rays that hit nothing return
/// the background.
pub fn trace(world: &World, ray: &Ray, depth: u32, settings: &RenderSettings) -> Color {
    if depth > settings.max_depth {
        return settings.background;
    }

    match world.closest_hit(ray) {
        Some(hit) => shade(world, ray, hit, depth, settings),
        None => settings.background,
    }
}

fn shade(world: &World, ray: &Ray, hit: Hit, depth: u32, settings: &RenderSettings) -> Color {
    let primitive = world.primitive(hit.primitive);
    let material = primitive.material();
    let point = ray.at(hit.distance);
    let normal = primitive.normal(point);

    // Normal on the side the ray arrived from
    let facing = if ray.direction.dot(normal) > 0.0 {
        -normal
    } else {
        normal
    };

    let color = match material.visibility {
        Visibility::Opaque => world
            .lights()
            .iter()
            .map(|light| phong(world, ray, point, facing, material, light, settings))
            .sum(),
        Visibility::Reflective => {
            let reflected = Ray::new(
                point + settings.bias * facing,
                ray.direction.reflect(facing),
            );
            trace(world, &reflected, depth + 1, settings)
        }
        Visibility::Transparent => {
            let (mut ior1, mut ior2) = (settings.ambient_ior, material.ior);
            let mut normal = normal;
            // Leaving the object
            if ray.direction.dot(normal) > 0.0 {
                std::mem::swap(&mut ior1, &mut ior2);
                normal = -normal;
            }

            let reflected = Ray::new(
                point + settings.bias * normal,
                ray.direction.reflect(normal),
            );

            match ray.direction.refract_between(normal, ior1, ior2) {
                None => trace(world, &reflected, depth + 1, settings),
                Some(direction) => {
                    let refracted = Ray::new(point - settings.bias * normal, direction);
                    let transmitted = fresnel_transmittance(normal, ray.direction, ior1, ior2);

                    (1.0 - transmitted) * trace(world, &reflected, depth + 1, settings)
                        + transmitted * trace(world, &refracted, depth + 1, settings)
                }
            }
        }
    };

    color.clamp01()
}

/// Ambient term plus, when the light is visible, diffuse and specular.
fn phong(
    world: &World,
    ray: &Ray,
    point: Vec3,
    normal: Vec3,
    material: &Material,
    light: &Light,
    settings: &RenderSettings,
) -> Color {
    let mut color = material.ambient * light.ambient;

    if !in_shadow(world, point + settings.bias * normal, light) {
        let to_light = (light.position - point).normalize();
        let to_viewer = -ray.direction;
        let reflected = (-to_light).reflect(normal);

        color += normal.dot(to_light).max(0.0) * material.diffuse * light.diffuse
            + reflected.dot(to_viewer).max(0.0).powf(material.shininess)
                * material.specular
                * light.specular;
    }

    color
}

/// True when something lies between `point` and the light.
fn in_shadow(world: &World, point: Vec3, light: &Light) -> bool {
    let to_light = light.position - point;
    let distance = to_light.length();
    let ray = Ray::new(point, to_light / distance);

    world
        .closest_hit(&ray)
        .map_or(false, |hit| hit.distance < distance)
}

/// Color of pixel (x, y) with y = 0 at the top of the image.
pub fn render_pixel(
    camera: &Camera,
    world: &World,
    x: u32,
    y: u32,
    settings: &RenderSettings,
) -> Color {
    trace(world, &camera.primary_ray(y, x), 0, settings)
}

/// Render the entire image with the default bucket size.
pub fn render(camera: &Camera, world: &World, settings: &RenderSettings) -> ImageBuffer {
    render_with_buckets(camera, world, settings, DEFAULT_BUCKET_SIZE)
}

/// Render buckets in parallel on the current rayon pool and assemble them.
pub fn render_with_buckets(
    camera: &Camera,
    world: &World,
    settings: &RenderSettings,
    bucket_size: u32,
) -> ImageBuffer {
    let buckets = generate_buckets(camera.image_width, camera.image_height, bucket_size.max(1));
    let total_pixels = (camera.image_width as usize) * (camera.image_height as usize);
    let done = AtomicUsize::new(0);
    let start = Instant::now();

    log::info!(
        "Rendering {}x{} in {} buckets",
        camera.image_width,
        camera.image_height,
        buckets.len()
    );

    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| {
            let pixels = render_bucket(bucket, camera, world, settings);
            let finished = done.fetch_add(pixels.len(), Ordering::Relaxed) + pixels.len();
            log::info!(
                "{:.1}% done",
                100.0 * finished as f64 / total_pixels.max(1) as f64
            );
            BucketResult::new(*bucket, pixels)
        })
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in results {
        result.write_into(&mut image);
    }

    log::info!("Rendered in {:.2?}", start.elapsed());
    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Primitive, Sphere, Triangle};
    use kdtrace_core::{CameraSettings, TreeSettings};
    use kdtrace_math::Aabb;

    fn world_of(primitives: Vec<Primitive>, lights: Vec<Light>) -> World {
        let bounds = Aabb::new(Vec3::splat(-10.0), Vec3::splat(10.0));
        World::build(primitives, lights, bounds, &TreeSettings::default()).unwrap()
    }

    fn approx(a: Color, b: Color) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_miss_returns_background() {
        let world = world_of(vec![], vec![Light::at(Vec3::Y)]);
        let settings = RenderSettings::default();
        let color = trace(&world, &Ray::new(Vec3::ZERO, Vec3::X), 0, &settings);

        assert_eq!(color, settings.background);
    }

    #[test]
    fn test_depth_limit_returns_background() {
        let world = world_of(
            vec![Sphere::new(Vec3::ZERO, 1.0, Material::RED).into()],
            vec![Light::at(Vec3::new(0.0, 0.0, -5.0))],
        );
        let settings = RenderSettings::default();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z);

        assert_eq!(trace(&world, &ray, settings.max_depth + 1, &settings), settings.background);
        assert_ne!(trace(&world, &ray, settings.max_depth, &settings), settings.background);
    }

    #[test]
    fn test_opaque_lit_head_on() {
        // Light behind the viewer: full diffuse, full specular highlight
        let world = world_of(
            vec![Sphere::new(Vec3::ZERO, 1.0, Material::RED).into()],
            vec![Light::at(Vec3::new(0.0, 0.0, -5.0))],
        );
        let settings = RenderSettings::default();
        let color = trace(&world, &Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), 0, &settings);

        let red = Material::RED;
        let light = Light::at(Vec3::ZERO);
        let expected = (red.ambient * light.ambient
            + red.diffuse * light.diffuse
            + red.specular * light.specular)
            .clamp01();
        assert!(approx(color, expected), "{:?} != {:?}", color, expected);
    }

    #[test]
    fn test_opaque_back_face_is_lit() {
        // Camera and light on the side opposite the triangle's normal
        let world = world_of(
            vec![Triangle::new(
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
                Material::BLUE,
            )
            .into()],
            vec![Light::at(Vec3::new(0.0, 0.0, -5.0))],
        );
        let settings = RenderSettings::default();
        let color = trace(&world, &Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), 0, &settings);

        let ambient_only = Material::BLUE.ambient * Light::at(Vec3::ZERO).ambient;
        assert!(color.z > ambient_only.z + 0.1);
    }

    #[test]
    fn test_enclosed_sphere_is_shadowed() {
        let inner = Material::GREEN;
        let world = world_of(
            vec![
                Sphere::new(Vec3::ZERO, 1.0, inner).into(),
                Sphere::new(Vec3::ZERO, 5.0, Material::RED).into(),
            ],
            vec![Light::at(Vec3::new(0.0, 8.0, 0.0))],
        );
        let settings = RenderSettings::default();
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.0), Vec3::Z);
        let color = trace(&world, &ray, 0, &settings);

        let expected = inner.ambient * Light::at(Vec3::ZERO).ambient;
        assert!(approx(color, expected), "{:?} != {:?}", color, expected);
    }

    #[test]
    fn test_facing_mirrors_terminate() {
        let world = world_of(
            vec![
                Triangle::new(
                    Vec3::new(-5.0, -5.0, 2.0),
                    Vec3::new(5.0, -5.0, 2.0),
                    Vec3::new(0.0, 5.0, 2.0),
                    Material::MIRROR,
                )
                .into(),
                Triangle::new(
                    Vec3::new(-5.0, -5.0, -2.0),
                    Vec3::new(0.0, 5.0, -2.0),
                    Vec3::new(5.0, -5.0, -2.0),
                    Material::MIRROR,
                )
                .into(),
            ],
            vec![Light::at(Vec3::new(0.0, 4.0, 0.0))],
        );
        let settings = RenderSettings::default();

        // Bounces forever between the mirrors until the depth limit
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);
        let color = trace(&world, &ray, settings.max_depth - 1, &settings);
        assert_eq!(color, settings.background);

        let color = trace(&world, &ray, 0, &settings);
        assert_eq!(color, settings.background);
    }

    #[test]
    fn test_mirror_shows_reflected_surface() {
        let world = world_of(
            vec![
                Triangle::new(
                    Vec3::new(-5.0, -5.0, 2.0),
                    Vec3::new(5.0, -5.0, 2.0),
                    Vec3::new(0.0, 5.0, 2.0),
                    Material::MIRROR,
                )
                .into(),
                Sphere::new(Vec3::new(0.0, 0.0, -3.0), 0.5, Material::GREEN).into(),
            ],
            vec![Light::at(Vec3::new(3.0, 0.0, 0.0))],
        );
        let settings = RenderSettings::default();
        let color = trace(&world, &Ray::new(Vec3::ZERO, Vec3::Z), 0, &settings);

        // Reflection lands on the green sphere behind the origin
        assert!(color.y > color.x && color.y > color.z);
        assert_ne!(color, settings.background);
    }

    #[test]
    fn test_hit_normal_faces_incoming_ray() {
        // The same panel seen from the side its normal points to and from
        // behind must shade identically for opaque and mirror surfaces
        let (v0, v1, v2) = (
            Vec3::new(-5.0, -5.0, 2.0),
            Vec3::new(5.0, -5.0, 2.0),
            Vec3::new(0.0, 5.0, 2.0),
        );
        let settings = RenderSettings::default();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        for material in [Material::BLUE, Material::MIRROR] {
            let shade_with = |facing: Vec3| {
                let world = world_of(
                    vec![
                        Triangle::with_normal(v0, v1, v2, facing, material).into(),
                        Sphere::new(Vec3::new(0.0, 0.0, -3.0), 0.5, Material::GREEN).into(),
                    ],
                    vec![Light::at(Vec3::new(0.0, 0.0, -1.0))],
                );
                trace(&world, &ray, 0, &settings)
            };

            let front = shade_with(-Vec3::Z);
            let back = shade_with(Vec3::Z);
            assert!(approx(front, back), "{:?} != {:?}", front, back);
            assert_ne!(back, settings.background);
        }
    }

    #[test]
    fn test_matched_glass_is_invisible() {
        // A dielectric with the surrounding medium's index transmits straight through
        let glass = Material::dielectric(1.0);
        let world = world_of(
            vec![Sphere::new(Vec3::ZERO, 1.0, glass).into()],
            vec![Light::at(Vec3::new(0.0, 8.0, 0.0))],
        );
        let settings = RenderSettings {
            background: Vec3::new(0.1, 0.4, 0.7),
            ..Default::default()
        };
        let color = trace(&world, &Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::Z), 0, &settings);

        assert!(approx(color, settings.background), "{:?}", color);
    }

    #[test]
    fn test_glass_over_background_shows_background() {
        // Everything seen through the glass is the background, so the blend
        // of reflected and refracted background is the background itself
        let world = world_of(
            vec![Sphere::new(Vec3::ZERO, 1.0, Material::GLASS).into()],
            vec![Light::at(Vec3::new(0.0, 8.0, 0.0))],
        );
        let settings = RenderSettings::default();
        let color = trace(&world, &Ray::new(Vec3::new(0.3, 0.2, -5.0), Vec3::Z), 0, &settings);

        assert!(approx(color, settings.background), "{:?}", color);
    }

    #[test]
    fn test_render_assembles_buckets() {
        let world = world_of(
            vec![Sphere::new(Vec3::ZERO, 1.0, Material::RED).into()],
            vec![Light::at(Vec3::new(0.0, 0.0, -5.0))],
        );
        let settings = RenderSettings::default();
        let camera = Camera::new(&CameraSettings {
            eye: Vec3::new(0.0, 0.0, -5.0),
            width: 13,
            height: 9,
            ..Default::default()
        });

        let image = render_with_buckets(&camera, &world, &settings, 4);
        assert_eq!(image.pixels.len(), 13 * 9);

        for y in 0..9 {
            for x in 0..13 {
                assert_eq!(image.get(x, y), render_pixel(&camera, &world, x, y, &settings));
            }
        }

        // Corners see the background, the center sees the sphere
        assert_eq!(image.get(0, 0), settings.background);
        assert_ne!(image.get(6, 4), settings.background);
    }
}
