use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, used both as a sampling region and as the box of an index node.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl BoundingBox {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Self { min, max }
    }

    /// A `width` x `height` rectangle anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new([0.0, 0.0], [width, height])
    }

    /// The unit square.
    pub fn unit() -> Self {
        Self::from_size(1.0, 1.0)
    }

    /// Tight box around `points`, or `None` when there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Point>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bounds = Self::new([first.x, first.y], [first.x, first.y]);
        for p in iter {
            bounds.expand_to(p);
        }
        Some(bounds)
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.min[0] && p.x <= self.max[0] && p.y >= self.min[1] && p.y <= self.max[1]
    }

    /// Grow the box so that it contains `p`.
    pub fn expand_to(&mut self, p: &Point) {
        if p.x < self.min[0] { self.min[0] = p.x; }
        if p.x > self.max[0] { self.max[0] = p.x; }
        if p.y < self.min[1] { self.min[1] = p.y; }
        if p.y > self.max[1] { self.max[1] = p.y; }
    }

    /// Squared distance from `p` to the closest point of the box, zero inside.
    ///
    /// Floating point subtraction is monotone, so for any stored point `q` inside the box
    /// this never exceeds `p.distance_sq(&q)`. Index pruning relies on that.
    pub fn distance_sq_to(&self, p: &Point) -> f64 {
        let coords = [p.x, p.y];
        let mut d2 = 0.0;
        for i in 0..2 {
            let v = coords[i];
            if v < self.min[i] {
                d2 += (self.min[i] - v) * (self.min[i] - v);
            } else if v > self.max[i] {
                d2 += (v - self.max[i]) * (v - self.max[i]);
            }
        }
        d2
    }
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::unit()
    }
}
