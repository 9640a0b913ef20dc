//! kd-tree acceleration structure.
//!
//! Space is split at the midpoint of one axis per level. Primitives are
//! not partitioned: each child receives every parent primitive that overlaps
//! its volume, so a primitive straddling a split plane is referenced by both
//! sides. Nodes live in a flat arena and are addressed by index.
//!
//! Traversal walks the tree front to back with an explicit stack of deferred
//! far children and stops at the first leaf whose nearest hit lies inside
//! that leaf's parametric window.

use std::fmt;

use kdtrace_core::{AxisPolicy, TreeSettings};
use kdtrace_math::{Aabb, Axis, Interval, Ray, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::BuildError;
use crate::output::format_general;
use crate::Primitive;

/// Index of a node in [`KdTree::nodes`].
pub type NodeId = usize;

/// Index of a primitive in the slice the tree was built over.
pub type PrimitiveId = usize;

/// Nearest intersection along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub primitive: PrimitiveId,
}

/// kd-tree node - either a split with two children or a leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum KdNode {
    Leaf {
        bounds: Aabb,
        depth: usize,
        primitives: Vec<PrimitiveId>,
    },
    Split {
        bounds: Aabb,
        depth: usize,
        axis: Axis,
        /// Coordinate of the split plane on `axis`
        position: f32,
        /// Lower then upper half along `axis`
        children: [NodeId; 2],
    },
}

impl KdNode {
    pub fn bounds(&self) -> &Aabb {
        match self {
            KdNode::Leaf { bounds, .. } | KdNode::Split { bounds, .. } => bounds,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            KdNode::Leaf { depth, .. } | KdNode::Split { depth, .. } => *depth,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, KdNode::Leaf { .. })
    }
}

/// Summary of a built tree.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TreeStats {
    pub nodes: usize,
    pub leaves: usize,
    pub empty_leaves: usize,
    /// Leaves over the size limit that stopped because the split plane
    /// could not be represented
    pub degenerate_leaves: usize,
    pub max_depth: usize,
    /// Sum of leaf sizes; exceeds the primitive count when primitives
    /// straddle split planes
    pub primitive_references: usize,
    pub largest_leaf: usize,
}

impl TreeStats {
    pub fn average_leaf_size(&self) -> f32 {
        if self.leaves == 0 {
            0.0
        } else {
            self.primitive_references as f32 / self.leaves as f32
        }
    }
}

/// Picks the split axis for each node.
enum AxisChooser {
    Random(StdRng),
    RoundRobin,
}

impl AxisChooser {
    fn new(policy: AxisPolicy) -> Self {
        match policy {
            AxisPolicy::Random { seed: Some(seed) } => {
                AxisChooser::Random(StdRng::seed_from_u64(seed))
            }
            AxisPolicy::Random { seed: None } => AxisChooser::Random(StdRng::from_entropy()),
            AxisPolicy::RoundRobin => AxisChooser::RoundRobin,
        }
    }

    fn next(&mut self, depth: usize) -> Axis {
        match self {
            AxisChooser::Random(rng) => Axis::from_index(rng.gen_range(0..3)),
            AxisChooser::RoundRobin => Axis::from_index(depth),
        }
    }
}

/// kd-tree over a primitive slice owned by the caller.
#[derive(Debug, Clone)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    root: NodeId,
    settings: TreeSettings,
}

impl KdTree {
    /// Build a tree over `primitives` inside `bounds`.
    ///
    /// The root volume is used exactly as given; primitives outside it are
    /// never found.
    pub fn build(
        primitives: &[Primitive],
        bounds: Aabb,
        settings: &TreeSettings,
    ) -> Result<Self, BuildError> {
        bounds.validate().map_err(|axis| {
            let interval = bounds.axis_interval(axis);
            BuildError::InvalidBounds {
                axis,
                min: interval.min,
                max: interval.max,
            }
        })?;
        if settings.leaf_size < 1 {
            return Err(BuildError::InvalidLeafSize);
        }

        let mut builder = Builder {
            primitives,
            settings,
            axes: AxisChooser::new(settings.axis),
            nodes: Vec::new(),
        };
        let all = (0..primitives.len()).collect();
        let root = builder.build_node(all, bounds, 0);

        let tree = Self {
            nodes: builder.nodes,
            root,
            settings: *settings,
        };

        let stats = tree.stats();
        log::info!(
            "kd-tree built: {} primitives, {} nodes, {} leaves, depth {}, {:.2} primitives per leaf",
            primitives.len(),
            stats.nodes,
            stats.leaves,
            stats.max_depth,
            stats.average_leaf_size()
        );
        if stats.degenerate_leaves > 0 {
            log::debug!(
                "{} leaves stopped at floating-point resolution",
                stats.degenerate_leaves
            );
        }

        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &KdNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[KdNode] {
        &self.nodes
    }

    pub fn bounds(&self) -> &Aabb {
        self.nodes[self.root].bounds()
    }

    pub fn settings(&self) -> &TreeSettings {
        &self.settings
    }

    /// All leaves, in arena order.
    pub fn leaves(&self) -> impl Iterator<Item = &KdNode> + '_ {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats {
            nodes: self.nodes.len(),
            ..Default::default()
        };

        for node in &self.nodes {
            stats.max_depth = stats.max_depth.max(node.depth());
            if let KdNode::Leaf {
                depth, primitives, ..
            } = node
            {
                stats.leaves += 1;
                stats.primitive_references += primitives.len();
                stats.largest_leaf = stats.largest_leaf.max(primitives.len());
                if primitives.is_empty() {
                    stats.empty_leaves += 1;
                }
                if primitives.len() > self.settings.leaf_size && *depth < self.settings.max_depth {
                    stats.degenerate_leaves += 1;
                }
            }
        }

        stats
    }

    /// Nearest primitive hit along the ray, or `None`.
    ///
    /// `primitives` must be the slice the tree was built over. Hits behind
    /// the ray origin are never reported.
    pub fn closest_hit(&self, primitives: &[Primitive], ray: &Ray) -> Option<Hit> {
        let range = self.bounds().intersect(ray);
        if range.is_miss() {
            return None;
        }
        let mut window = Interval::new(range.min.max(0.0), range.max);
        if window.is_empty() {
            return None;
        }

        let inv_dir = ray.direction.recip();
        let mut stack: Vec<(NodeId, Interval)> = Vec::new();
        let mut current = self.root;

        loop {
            match &self.nodes[current] {
                KdNode::Split {
                    axis,
                    position,
                    children: [lower, upper],
                    ..
                } => {
                    let a = axis.index();
                    let origin = ray.origin[a];
                    let direction = ray.direction[a];

                    // Parallel to the plane: the ray stays on its own side
                    if direction == 0.0 {
                        if origin < *position {
                            current = *lower;
                        } else if origin > *position {
                            current = *upper;
                        } else {
                            stack.push((*upper, window));
                            current = *lower;
                        }
                        continue;
                    }

                    let (near, far) = if direction > 0.0 {
                        (*lower, *upper)
                    } else {
                        (*upper, *lower)
                    };
                    let t_split = (position - origin) * inv_dir[a];

                    if t_split < window.min {
                        current = far;
                    } else if t_split > window.max {
                        current = near;
                    } else {
                        stack.push((far, Interval::new(t_split, window.max)));
                        window = Interval::new(window.min, t_split);
                        current = near;
                    }
                }
                KdNode::Leaf {
                    primitives: ids, ..
                } => {
                    if let Some(hit) = nearest_of(primitives, ids.iter().copied(), ray) {
                        if hit.distance <= window.max {
                            return Some(hit);
                        }
                    }
                    let (next, next_window) = stack.pop()?;
                    current = next;
                    window = next_window;
                }
            }
        }
    }
}

/// Nearest hit among `ids`; ties keep the first.
fn nearest_of(
    primitives: &[Primitive],
    ids: impl Iterator<Item = PrimitiveId>,
    ray: &Ray,
) -> Option<Hit> {
    let mut best: Option<Hit> = None;
    for id in ids {
        if let Some(distance) = primitives[id].intersect(ray) {
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(Hit {
                    distance,
                    primitive: id,
                });
            }
        }
    }
    best
}

/// Brute-force nearest hit over every primitive.
pub fn linear_closest_hit(primitives: &[Primitive], ray: &Ray) -> Option<Hit> {
    nearest_of(primitives, 0..primitives.len(), ray)
}

struct Builder<'a> {
    primitives: &'a [Primitive],
    settings: &'a TreeSettings,
    axes: AxisChooser,
    nodes: Vec<KdNode>,
}

impl Builder<'_> {
    fn build_node(&mut self, ids: Vec<PrimitiveId>, bounds: Aabb, depth: usize) -> NodeId {
        if ids.len() <= self.settings.leaf_size || depth >= self.settings.max_depth {
            return self.push_leaf(ids, bounds, depth);
        }

        let axis = self.axes.next(depth);
        let Some((lower_bounds, upper_bounds)) = bounds.split(axis) else {
            return self.push_leaf(ids, bounds, depth);
        };

        let lower_ids = self.overlapping(&ids, &lower_bounds);
        let upper_ids = self.overlapping(&ids, &upper_bounds);

        let lower = self.build_node(lower_ids, lower_bounds, depth + 1);
        let upper = self.build_node(upper_ids, upper_bounds, depth + 1);

        self.nodes.push(KdNode::Split {
            bounds,
            depth,
            axis,
            position: lower_bounds.axis_interval(axis).max,
            children: [lower, upper],
        });
        self.nodes.len() - 1
    }

    fn overlapping(&self, ids: &[PrimitiveId], bounds: &Aabb) -> Vec<PrimitiveId> {
        ids.iter()
            .copied()
            .filter(|&id| self.primitives[id].overlaps(bounds))
            .collect()
    }

    fn push_leaf(&mut self, primitives: Vec<PrimitiveId>, bounds: Aabb, depth: usize) -> NodeId {
        self.nodes.push(KdNode::Leaf {
            bounds,
            depth,
            primitives,
        });
        self.nodes.len() - 1
    }
}

struct DisplayVec3(Vec3);

impl fmt::Display for DisplayVec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            format_general(f64::from(self.0.x)),
            format_general(f64::from(self.0.y)),
            format_general(f64::from(self.0.z))
        )
    }
}

impl KdTree {
    fn fmt_node(&self, id: NodeId, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.nodes[id] {
            KdNode::Leaf {
                bounds, primitives, ..
            } => write!(
                f,
                "PRIM_SIZE {} MIN AND MAX {} {}",
                primitives.len(),
                DisplayVec3(bounds.min_corner()),
                DisplayVec3(bounds.max_corner())
            ),
            KdNode::Split {
                axis,
                children: [lower, upper],
                ..
            } => {
                write!(f, "[SPLIT AXIS {} [", axis)?;
                self.fmt_node(*lower, f)?;
                write!(f, "] [")?;
                self.fmt_node(*upper, f)?;
                write!(f, "]]")
            }
        }
    }
}

/// Bracketed dump of the whole tree.
impl fmt::Display for KdTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(self.root, f)
    }
}
