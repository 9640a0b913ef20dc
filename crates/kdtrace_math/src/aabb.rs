use std::fmt;

use crate::{Interval, Ray, Vec3};

/// Half-thickness added to each side of a zero-width primitive bound.
pub const BOX_BIAS: f32 = 0.01;

/// A coordinate axis.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Component index of this axis (0=X, 1=Y, 2=Z).
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }

    /// Axis for a component index, wrapping modulo 3.
    pub fn from_index(n: usize) -> Self {
        Self::ALL[n % 3]
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

/// Axis-aligned bounding volume used by the kd-tree and the primitives.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from its min and max corners exactly as given.
    ///
    /// No padding is applied, so split children still partition their parent.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self {
            x: Interval::new(min.x, max.x),
            y: Interval::new(min.y, max.y),
            z: Interval::new(min.z, max.z),
        }
    }

    /// Create an AABB from two corner points, inflating flat axes.
    ///
    /// Any axis with zero thickness (an axis-aligned triangle, for example)
    /// is grown by [`BOX_BIAS`] on each side so overlap tests stay well-defined.
    pub fn padded(a: Vec3, b: Vec3) -> Self {
        let mut aabb = Self::new(a.min(b), a.max(b));
        aabb.pad_to_minimums();
        aabb
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis.
    pub fn axis_interval(&self, axis: Axis) -> Interval {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    fn with_axis_interval(mut self, axis: Axis, interval: Interval) -> Self {
        match axis {
            Axis::X => self.x = interval,
            Axis::Y => self.y = interval,
            Axis::Z => self.z = interval,
        }
        self
    }

    pub fn min_corner(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max_corner(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Returns the first axis whose max is below its min (or NaN).
    pub fn validate(&self) -> Result<(), Axis> {
        for axis in Axis::ALL {
            let interval = self.axis_interval(axis);
            if !(interval.min <= interval.max) {
                return Err(axis);
            }
        }
        Ok(())
    }

    /// Slab test: parametric range over which the ray is inside the box.
    ///
    /// Zero direction components are handled through IEEE division, which
    /// yields signed infinities. A miss returns [`Interval::MISS`].
    pub fn intersect(&self, ray: &Ray) -> Interval {
        let inv = ray.direction.recip();
        let t0 = (self.min_corner() - ray.origin) * inv;
        let t1 = (self.max_corner() - ray.origin) * inv;

        let near = t0.min(t1);
        let far = t0.max(t1);

        let t_min = near.max_element();
        let t_max = far.min_element();

        if t_min > t_max {
            Interval::MISS
        } else {
            Interval::new(t_min, t_max)
        }
    }

    /// Split at the midpoint of `axis` into (lower, upper) halves.
    ///
    /// Returns `None` when the midpoint rounds onto either bound, i.e. the
    /// volume is too thin to subdivide further in floating point.
    pub fn split(&self, axis: Axis) -> Option<(Aabb, Aabb)> {
        let span = self.axis_interval(axis);
        let mid = span.midpoint();
        if mid <= span.min || mid >= span.max {
            return None;
        }

        let lower = self.with_axis_interval(axis, Interval::new(span.min, mid));
        let upper = self.with_axis_interval(axis, Interval::new(mid, span.max));
        Some((lower, upper))
    }

    /// Pad zero-thickness axes.
    fn pad_to_minimums(&mut self) {
        let delta = 2.0 * BOX_BIAS;
        if self.x.size() <= 0.0 {
            self.x = self.x.expand(delta);
        }
        if self.y.size() <= 0.0 {
            self.y = self.y.expand(delta);
        }
        if self.z.size() <= 0.0 {
            self.z = self.z.expand(delta);
        }
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        (self.min_corner() + self.max_corner()) * 0.5
    }

    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
