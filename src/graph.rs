use crate::algorithm::SpatialIndex;
use crate::algorithm::kdtree::KdTree;
use crate::error::{GraphError, check_radius};
use crate::point::Point;
use crate::shortest_path::{self, Path, ShortestPathTree};
use std::collections::VecDeque;

/// One entry of an adjacency list: the node on the other end and the cached edge weight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub node: usize,
    pub weight: f64,
}

/// A random geometric graph: points joined whenever they lie within `eps` of each other.
///
/// The graph owns its points through the spatial index and never changes after [`build`].
/// Edge weights are computed once from the stored coordinates; adjacency lists are sorted
/// by neighbour id so traversal order is fixed.
///
/// [`build`]: GeometricGraph::build
#[derive(Clone, Debug)]
pub struct GeometricGraph<I: SpatialIndex = KdTree> {
    index: I,
    eps: f64,
    adjacency: Vec<Vec<Neighbor>>,
    edge_count: usize,
}

impl<I: SpatialIndex> GeometricGraph<I> {
    /// Build the graph over `points` with neighbour threshold `eps`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidParameter`] if `eps` is negative or not finite, or if
    /// any point has a non-finite coordinate.
    pub fn build(points: Vec<Point>, eps: f64) -> Result<Self, GraphError> {
        check_radius("eps", eps)?;
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(GraphError::invalid(format!("point {i} has a non-finite coordinate")));
        }
        let index = I::build(points);
        let pairs = index.radius_pairs(eps)?;
        let points = index.points();

        let mut adjacency = vec![Vec::new(); points.len()];
        for &(i, j) in &pairs {
            let weight = points[i].distance(&points[j]);
            adjacency[i].push(Neighbor { node: j, weight });
            adjacency[j].push(Neighbor { node: i, weight });
        }
        // Pairs arrive sorted by (i, j), so each list is ascending already.
        debug_assert!(adjacency.iter().all(|links| links.windows(2).all(|w| w[0].node < w[1].node)));

        Ok(Self {
            index,
            eps,
            adjacency,
            edge_count: pairs.len(),
        })
    }

    /// Rebuild from an index and adjacency that already satisfy the graph invariants.
    fn from_parts(index: I, eps: f64, adjacency: Vec<Vec<Neighbor>>) -> Self {
        let edge_count = adjacency.iter().map(Vec::len).sum::<usize>() / 2;
        Self { index, eps, adjacency, edge_count }
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn points(&self) -> &[Point] {
        self.index.points()
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    pub fn adjacency(&self) -> &[Vec<Neighbor>] {
        &self.adjacency
    }

    pub fn position(&self, node: usize) -> Option<Point> {
        self.points().get(node).copied()
    }

    /// Neighbours of `node` in ascending id order; empty for unknown ids.
    pub fn neighbors(&self, node: usize) -> &[Neighbor] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every undirected edge once, as `(i, j, weight)` with `i < j`, in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, links)| {
            links.iter().filter(move |l| l.node > i).map(move |l| (i, l.node, l.weight))
        })
    }

    /// The node closest to `query`, lowest id on ties.
    pub fn nearest_node(&self, query: Point) -> Result<usize, GraphError> {
        self.index.nearest(query).map(|(i, _)| i)
    }

    /// Cheapest path between the nodes nearest to `start` and `end`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::EmptyIndex`] if the graph has no nodes.
    /// Returns [`GraphError::NoPath`] if the two nodes are in different components.
    pub fn shortest_path(&self, start: Point, end: Point) -> Result<Path, GraphError> {
        let source = self.nearest_node(start)?;
        let target = self.nearest_node(end)?;
        self.shortest_path_between(source, target)
    }

    /// Cheapest path between two node ids.
    pub fn shortest_path_between(&self, source: usize, target: usize) -> Result<Path, GraphError> {
        shortest_path::solve(&self.adjacency, source, target)
    }

    /// Distances from the node nearest to `query` to every node.
    pub fn shortest_path_tree(&self, query: Point) -> Result<ShortestPathTree, GraphError> {
        let source = self.nearest_node(query)?;
        ShortestPathTree::new(&self.adjacency, source)
    }

    /// Coordinates of the nodes along `path`.
    pub fn path_positions(&self, path: &Path) -> Vec<Point> {
        let points = self.points();
        path.nodes.iter().filter_map(|&i| points.get(i).copied()).collect()
    }

    /// Whether `a` and `b` are in the same connected component, by breadth-first search.
    pub fn connected(&self, a: usize, b: usize) -> bool {
        let n = self.node_count();
        if a >= n || b >= n {
            return false;
        }
        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([a]);
        seen[a] = true;
        while let Some(v) = queue.pop_front() {
            if v == b {
                return true;
            }
            for link in &self.adjacency[v] {
                if !seen[link.node] {
                    seen[link.node] = true;
                    queue.push_back(link.node);
                }
            }
        }
        false
    }
}

impl<I: SpatialIndex + Clone> GeometricGraph<I> {
    /// A new graph over the same points keeping only edges of weight at most `new_eps`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InvalidParameter`] if `new_eps` is negative or exceeds the
    /// threshold this graph was built with; longer edges were never computed.
    pub fn shrink(&self, new_eps: f64) -> Result<Self, GraphError> {
        check_radius("eps", new_eps)?;
        if new_eps > self.eps {
            return Err(GraphError::invalid(format!(
                "cannot shrink threshold {} up to {new_eps}",
                self.eps
            )));
        }
        let adjacency = self
            .adjacency
            .iter()
            .map(|links| links.iter().copied().filter(|l| l.weight <= new_eps).collect())
            .collect();
        Ok(Self::from_parts(self.index.clone(), new_eps, adjacency))
    }
}
