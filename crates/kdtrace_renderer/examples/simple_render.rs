//! Simple kd-tree ray tracer example.
//!
//! Builds a mirrored room with a few spheres and a pyramid mesh in code, renders it and saves
//! both the text dump and a PNG.
//!
//! Run with: cargo run --release --example simple_render

use kdtrace_core::assembly::{random_spheres, room};
use kdtrace_core::{CameraSettings, Light, Material, Mesh, Scene};
use kdtrace_math::Aabb;
use kdtrace_renderer::{render, Camera, Vec3, World};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("kdtrace - Simple Example");
    println!("========================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    let world = match World::from_scene(&scene) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("Failed to build kd-tree: {}", e);
            return;
        }
    };
    println!("Scene built in {:?}", start.elapsed());

    let stats = world.tree().stats();
    println!(
        "{} primitives, {} nodes, {} leaves, depth {}, {:.1} prims/leaf",
        world.primitives().len(),
        stats.nodes,
        stats.leaves,
        stats.max_depth,
        stats.average_leaf_size()
    );

    let camera = Camera::new(&scene.camera);
    println!("Rendering {}x{}...", camera.image_width, camera.image_height);

    let start = std::time::Instant::now();
    let image = render(&camera, &world, &scene.render);
    println!("Rendered in {:?}", start.elapsed());

    if let Err(e) = image.save_text("simple_render.txt") {
        eprintln!("Failed to write simple_render.txt: {}", e);
    }
    match image.save_png("simple_render.png") {
        Ok(()) => println!("Saved to simple_render.png"),
        Err(e) => eprintln!("Failed to write simple_render.png: {}", e),
    }
}

fn build_scene() -> Scene {
    let mut scene = Scene::new("simple");

    scene.camera = CameraSettings {
        eye: Vec3::new(0.0, 2.0, -8.5),
        target: Vec3::new(0.0, 0.0, 0.0),
        up: Vec3::Y,
        fov: 60.0,
        width: 400,
        height: 300,
    };
    scene.bounds = Some(Aabb::new(Vec3::splat(-10.0), Vec3::splat(10.0)));

    scene.add_objects(room(
        Vec3::ZERO,
        Vec3::splat(9.5),
        [
            Material::MIRROR,
            Material::RED,
            Material::GREEN,
            Material::PURPLE,
            Material::BLUE,
            Material::BLACK,
        ],
    ));

    scene.add_sphere(Vec3::new(-2.0, -1.0, 1.0), 2.0, Material::GLASS);
    scene.add_sphere(Vec3::new(2.5, -2.0, 2.0), 1.5, Material::MIRROR);
    scene.add_sphere(Vec3::new(0.5, 2.5, 3.0), 1.0, Material::BLUE);

    let pyramid = Mesh::new(
        vec![
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 1.0),
            Vec3::new(0.0, 1.5, 0.0),
        ],
        vec![0, 4, 1, 1, 4, 2, 2, 4, 3, 3, 4, 0],
    );
    scene.add_mesh(&pyramid.placed(Vec3::new(-5.0, -4.5, 5.0), Vec3::splat(1.5)), Material::GREEN);

    let mut rng = StdRng::seed_from_u64(42);
    let field = Aabb::new(Vec3::new(-4.0, -4.0, 4.0), Vec3::new(4.0, -3.0, 8.0));
    scene.add_objects(random_spheres(&field, 20, 0.5, Material::PURPLE, &mut rng));

    scene.add_light(Light::at(Vec3::new(0.0, 9.0, 0.0)));
    scene
}
