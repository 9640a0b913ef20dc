//! Example: Load and inspect a scene file.
//!
//! Run with: cargo run --example load_scene -- scenes/room.json

use std::env;

use kdtrace_core::{load_scene, Shape};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: load_scene <path-to-scene-json>");
        println!("\nExamples:");
        println!("  cargo run --example load_scene -- scenes/room.json");
        return;
    }

    let path = &args[1];
    println!("Loading scene file: {}", path);

    match load_scene(path) {
        Ok(scene) => {
            println!("\n=== Scene: {} ===", scene.name);
            println!("Objects: {}", scene.object_count());
            println!("Spheres: {}", scene.sphere_count());
            println!("Triangles: {}", scene.triangle_count());

            println!("\n--- Lights ---");
            for (i, light) in scene.lights.iter().enumerate() {
                let pos = light.position;
                println!("  [{}] at ({:.2}, {:.2}, {:.2})", i, pos.x, pos.y, pos.z);
            }

            println!("\n--- Spheres ---");
            for object in &scene.objects {
                if let Shape::Sphere { center, radius } = object.shape {
                    println!(
                        "  ({:.2}, {:.2}, {:.2}) r={:.2} {:?}",
                        center.x, center.y, center.z, radius, object.material.visibility
                    );
                }
            }

            let bounds = scene.root_bounds();
            println!("\n--- Root Bounds ({}) ---", if scene.bounds.is_some() { "explicit" } else { "auto" });
            println!(
                "  Min: ({:.2}, {:.2}, {:.2})",
                bounds.x.min, bounds.y.min, bounds.z.min
            );
            println!(
                "  Max: ({:.2}, {:.2}, {:.2})",
                bounds.x.max, bounds.y.max, bounds.z.max
            );

            let camera = scene.camera;
            println!("\n--- Camera ---");
            println!(
                "  Eye ({:.2}, {:.2}, {:.2}), fov {}, {}x{}",
                camera.eye.x, camera.eye.y, camera.eye.z, camera.fov, camera.width, camera.height
            );
        }
        Err(e) => {
            eprintln!("Error loading scene file: {}", e);
        }
    }
}
