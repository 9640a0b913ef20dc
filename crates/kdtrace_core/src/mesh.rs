//! Triangle meshes loaded from Wavefront OBJ files.
//!
//! Meshes are only an ingestion format: once placed in the world they are
//! flattened into independent triangles by [`Scene::add_mesh`].
//!
//! [`Scene::add_mesh`]: crate::Scene::add_mesh

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use kdtrace_math::{Aabb, Vec3};

use crate::error::{SceneError, SceneResult};

/// Indexed triangle soup.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,

    /// Padded bounding box of the positions
    pub bounds: Aabb,
}

impl Mesh {
    /// Create a mesh from positions and indices.
    ///
    /// Trailing indices that do not complete a triangle are ignored by
    /// [`Mesh::triangles`].
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let bounds = Self::compute_bounds(&positions);
        Self {
            positions,
            indices,
            bounds,
        }
    }

    fn compute_bounds(positions: &[Vec3]) -> Aabb {
        if positions.is_empty() {
            return Aabb::EMPTY;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);

        for pos in positions {
            min = min.min(*pos);
            max = max.max(*pos);
        }

        Aabb::padded(min, max)
    }

    /// Load every model of an OBJ file into a single mesh.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> SceneResult<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mesh = Self::from_obj_reader(&mut reader, &path.display().to_string())?;

        log::info!(
            "Loaded {} ({} vertices, {} triangles)",
            path.display(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    /// Parse OBJ text from a reader. Faces are triangulated and material
    /// libraries are ignored.
    pub fn from_obj_reader<R: BufRead>(reader: &mut R, name: &str) -> SceneResult<Self> {
        let (models, _materials) = tobj::load_obj_buf(
            reader,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
            |_| Err(tobj::LoadError::OpenFileFailed),
        )?;

        let mut positions = Vec::new();
        let mut indices = Vec::new();

        for model in &models {
            let mesh = &model.mesh;
            let offset = positions.len() as u32;

            positions.extend(mesh.positions.chunks_exact(3).map(Vec3::from_slice));
            indices.extend(mesh.indices.iter().map(|i| i + offset));
        }

        if indices.len() < 3 {
            return Err(SceneError::EmptyMesh(name.to_string()));
        }

        Ok(Self::new(positions, indices))
    }

    /// Average of every triangle corner, counting shared vertices once per
    /// triangle that uses them.
    pub fn vertex_centroid(&self) -> Vec3 {
        let triangles = self.triangles();
        if triangles.is_empty() {
            return Vec3::ZERO;
        }

        let sum: Vec3 = triangles.iter().map(|[a, b, c]| *a + *b + *c).sum();
        sum / (3 * triangles.len()) as f32
    }

    /// Copy of the mesh re-centred on its vertex centroid, scaled
    /// componentwise and moved to `position`.
    pub fn placed(&self, position: Vec3, scale: Vec3) -> Self {
        let centroid = self.vertex_centroid();
        let positions = self
            .positions
            .iter()
            .map(|p| (*p - centroid) * scale + position)
            .collect();

        Self::new(positions, self.indices.clone())
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Corner positions of every triangle, in index order.
    pub fn triangles(&self) -> Vec<[Vec3; 3]> {
        let mut triangles = Vec::with_capacity(self.triangle_count());

        for chunk in self.indices.chunks_exact(3) {
            let i0 = chunk[0] as usize;
            let i1 = chunk[1] as usize;
            let i2 = chunk[2] as usize;

            let (Some(&v0), Some(&v1), Some(&v2)) = (
                self.positions.get(i0),
                self.positions.get(i1),
                self.positions.get(i2),
            ) else {
                log::warn!(
                    "Invalid triangle indices: [{}, {}, {}], vertex count: {}",
                    i0,
                    i1,
                    i2,
                    self.positions.len()
                );
                continue;
            };

            triangles.push([v0, v1, v2]);
        }

        triangles
    }
}
