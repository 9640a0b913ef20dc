//! Procedural scene pieces: axis-aligned rooms and random sphere fields.

use kdtrace_math::{Aabb, Axis, Vec3};
use rand::Rng;

use crate::material::Material;
use crate::scene::{SceneObject, Shape};

/// Axis-aligned box of six inward-facing panels, two triangles each.
///
/// `materials` are given in the order +x, -x, +y, -y, +z, -z, which is also
/// the order of the returned panels.
pub fn room(center: Vec3, extent: Vec3, materials: [Material; 6]) -> Vec<SceneObject> {
    let mut objects = Vec::with_capacity(12);

    for (i, material) in materials.into_iter().enumerate() {
        let axis = Axis::from_index(i / 2);
        let sign = if i % 2 == 0 { 1.0 } else { -1.0 };

        let mut panel_center = center;
        panel_center[axis.index()] += sign * extent[axis.index()];

        let mut panel_extent = extent;
        panel_extent[axis.index()] = 0.0;

        let normal = (center - panel_center).normalize_or_zero();
        for vertices in panel(panel_center, panel_extent) {
            objects.push(SceneObject::new(
                Shape::Triangle {
                    vertices,
                    normal: Some(normal),
                },
                material,
            ));
        }
    }

    objects
}

/// Two triangles covering a flat rectangle whose zero-extent axis is the
/// panel normal. Both share the diagonal from the low corner to the high one.
fn panel(center: Vec3, extent: Vec3) -> [[Vec3; 3]; 2] {
    let used: Vec<usize> = (0..3).filter(|&i| extent[i] != 0.0).collect();
    let (first, second) = match used.as_slice() {
        [a, b, ..] => (*a, *b),
        [a] => (*a, *a),
        [] => (0, 0),
    };

    let low = center - extent;
    let high = center + extent;

    let mut corner1 = high;
    corner1[first] = low[first];
    let mut corner2 = high;
    corner2[second] = low[second];

    [[low, high, corner1], [low, high, corner2]]
}

/// `count` spheres with uniformly random centers inside `bounds` and radii
/// in `[0, max_radius)`.
pub fn random_spheres<R: Rng>(
    bounds: &Aabb,
    count: usize,
    max_radius: f32,
    material: Material,
    rng: &mut R,
) -> Vec<SceneObject> {
    let min = bounds.min_corner();
    let size = bounds.max_corner() - min;

    (0..count)
        .map(|_| {
            let radius = max_radius * rng.gen::<f32>();
            let center = min + size * Vec3::new(rng.gen(), rng.gen(), rng.gen());
            SceneObject::new(Shape::Sphere { center, radius }, material)
        })
        .collect()
}
