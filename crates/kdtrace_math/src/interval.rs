#[derive(Debug, Clone, Copy, PartialEq)]

pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if min > max.
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    /// Returns true for the sentinel produced by a missed slab test.
    ///
    /// An entry of `+inf` (or NaN) means the ray never enters the volume.
    pub fn is_miss(&self) -> bool {
        !(self.min < f32::INFINITY)
    }

    /// Expands the interval by delta/2 on each side.
    pub fn expand(&self, delta: f32) -> Interval {
        let padding = delta / 2.0;
        Interval::new(self.min - padding, self.max + padding)
    }

    /// Creates an interval that surrounds two other intervals.
    pub fn surrounding(a: &Interval, b: &Interval) -> Interval {
        Interval::new(a.min.min(b.min), a.max.max(b.max))
    }

    /// Midpoint of the interval.
    pub fn midpoint(&self) -> f32 {
        0.5 * (self.min + self.max)
    }

    /// An empty interval (min > max, contains nothing).
    pub const EMPTY: Interval = Interval {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    /// Parametric range reported when a ray misses a volume.
    pub const MISS: Interval = Interval {
        min: f32::INFINITY,
        max: f32::INFINITY,
    };
}
