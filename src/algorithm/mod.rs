use crate::error::{GraphError, check_query, check_radius};
use crate::point::Point;

pub mod grid;
pub mod kdtree;

/// Trait defining a read-only spatial acceleration structure over a point set.
/// This allows swapping between the k-d tree, the uniform grid and a plain linear scan.
///
/// An index owns its points; a point's position in [`SpatialIndex::points`] is its
/// permanent identifier.
pub trait SpatialIndex: Send + Sync + Sized {
    /// Build the index over `points`.
    fn build(points: Vec<Point>) -> Self;

    /// The indexed points, in identifier order.
    fn points(&self) -> &[Point];

    fn len(&self) -> usize {
        self.points().len()
    }

    fn is_empty(&self) -> bool {
        self.points().is_empty()
    }

    /// Visit every stored point whose distance to `query` is at most `radius`.
    ///
    /// # Arguments
    /// * `query` - The centre of the search disc. Need not be a stored point.
    /// * `radius` - Inclusive search radius.
    /// * `visitor` - Called once per hit with the point's identifier and coordinates,
    ///               in no particular order.
    fn visit_within<F>(&self, query: Point, radius: f64, visitor: F)
    where
        F: FnMut(usize, Point);

    /// The stored point closest to `query`, lowest identifier on ties.
    ///
    /// Fails with [`GraphError::EmptyIndex`] on an empty index and with
    /// [`GraphError::InvalidParameter`] when `query` has a non-finite coordinate.
    fn nearest(&self, query: Point) -> Result<(usize, Point), GraphError>;

    /// Every unordered pair `(i, j)`, `i < j`, at distance at most `radius`, sorted ascending.
    fn radius_pairs(&self, radius: f64) -> Result<Vec<(usize, usize)>, GraphError> {
        check_radius("radius", radius)?;
        let mut pairs = Vec::new();
        for (i, &p) in self.points().iter().enumerate() {
            self.visit_within(p, radius, |j, _| {
                if j > i {
                    pairs.push((i, j));
                }
            });
        }
        pairs.sort_unstable();
        Ok(pairs)
    }
}

/// Keeps the running best candidate of a nearest-neighbour search.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NearestCandidate {
    pub index: usize,
    pub dist_sq: f64,
}

impl NearestCandidate {
    pub fn none() -> Self {
        Self { index: usize::MAX, dist_sq: f64::INFINITY }
    }

    /// Offer a point; keeps the closer one, or the lower index on an exact tie.
    #[inline]
    pub fn offer(&mut self, index: usize, dist_sq: f64) {
        if dist_sq < self.dist_sq || (dist_sq == self.dist_sq && index < self.index) {
            self.index = index;
            self.dist_sq = dist_sq;
        }
    }

    /// The winning index and its stored point.
    pub fn resolve(&self, points: &[Point]) -> Result<(usize, Point), GraphError> {
        points
            .get(self.index)
            .map(|p| (self.index, *p))
            .ok_or_else(|| GraphError::invalid("no stored point has a comparable distance to the query"))
    }
}

/// Index-free baseline: every query scans all points.
///
/// Quadratic for pair enumeration. Kept as the reference the other indices are checked against.
#[derive(Clone, Debug, Default)]
pub struct LinearScan {
    points: Vec<Point>,
}

impl SpatialIndex for LinearScan {
    fn build(points: Vec<Point>) -> Self {
        Self { points }
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn visit_within<F>(&self, query: Point, radius: f64, mut visitor: F)
    where
        F: FnMut(usize, Point),
    {
        for (i, p) in self.points.iter().enumerate() {
            if query.distance(p) <= radius {
                visitor(i, *p);
            }
        }
    }

    fn nearest(&self, query: Point) -> Result<(usize, Point), GraphError> {
        if self.points.is_empty() {
            return Err(GraphError::EmptyIndex);
        }
        check_query(&query)?;
        let mut best = NearestCandidate::none();
        for (i, p) in self.points.iter().enumerate() {
            best.offer(i, query.distance_sq(p));
        }
        best.resolve(&self.points)
    }
}
