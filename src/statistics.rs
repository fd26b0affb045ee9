use crate::algorithm::SpatialIndex;
use crate::error::GraphError;
use crate::graph::GeometricGraph;
use crate::point::Point;
use serde::{Deserialize, Serialize};

/// Perpendicular distance from points to the infinite line through two points.
#[derive(Clone, Copy, Debug)]
pub struct LineDistance {
    origin: Point,
    // Unit normal; `None` when both points coincide.
    normal: Option<[f64; 2]>,
}

impl LineDistance {
    pub fn new(a: Point, b: Point) -> Self {
        let d = a.distance(&b);
        let normal = (d > 0.0).then(|| [-(b.y - a.y) / d, (b.x - a.x) / d]);
        Self { origin: a, normal }
    }

    /// Distance from `p` to the line; distance to the point itself for a degenerate line.
    pub fn distance(&self, p: &Point) -> f64 {
        match self.normal {
            Some([nx, ny]) => (nx * (p.x - self.origin.x) + ny * (p.y - self.origin.y)).abs(),
            None => self.origin.distance(p),
        }
    }
}

/// Shape of the cheapest route between two arbitrary locations.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PathStatistics {
    /// Combined length of the two access segments from the query locations to their nearest nodes.
    pub nn_distance: f64,
    /// Graph cost plus the access segments.
    pub path_length: f64,
    /// Edges walked, counting the two access segments.
    pub hops: usize,
    /// Farthest any visited node strays from the straight line between the query locations.
    pub wander: f64,
}

impl PathStatistics {
    /// Measure the route from `start` to `end` through `graph`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NoPath`] if the nearest nodes are disconnected and
    /// [`GraphError::EmptyIndex`] if the graph has no nodes.
    pub fn measure<I: SpatialIndex>(graph: &GeometricGraph<I>, start: Point, end: Point) -> Result<Self, GraphError> {
        let path = graph.shortest_path(start, end)?;
        let positions = graph.path_positions(&path);
        let (Some(first), Some(last)) = (positions.first(), positions.last()) else {
            return Err(GraphError::EmptyIndex);
        };

        let nn_distance = start.distance(first) + end.distance(last);
        let line = LineDistance::new(start, end);
        let wander = positions.iter().map(|p| line.distance(p)).fold(0.0, f64::max);

        Ok(Self {
            nn_distance,
            path_length: path.cost + nn_distance,
            hops: path.hops() + 2,
            wander,
        })
    }
}

/// Positions of every node whose route from `center` is strictly shorter than `radius`.
///
/// The route is the access segment to the node nearest `center` followed by the graph
/// distance from there.
pub fn ball<I: SpatialIndex>(graph: &GeometricGraph<I>, center: Point, radius: f64) -> Result<Vec<Point>, GraphError> {
    let tree = graph.shortest_path_tree(center)?;
    let points = graph.points();
    let offset = center.distance(&points[tree.source()]);
    Ok(points
        .iter()
        .enumerate()
        .filter_map(|(i, p)| tree.distance(i).filter(|d| d + offset < radius).map(|_| *p))
        .collect())
}
