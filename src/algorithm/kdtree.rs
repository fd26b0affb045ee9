use crate::algorithm::{NearestCandidate, SpatialIndex};
use crate::bounds::BoundingBox;
use crate::error::{GraphError, check_query};
use crate::point::Point;

const LEAF_SIZE: usize = 16;

#[derive(Clone, Copy, Debug)]
struct KdNode {
    bounds: BoundingBox,
    left: u32, // u32::MAX if leaf
    right: u32,
    // Leaf data: indices[start..end]
    start: u32,
    end: u32,
    // Internal node data
    split_val: f64,
    axis: u8,
}

impl KdNode {
    fn is_leaf(&self) -> bool {
        self.left == u32::MAX
    }
}

/// A 2D k-d tree with median splits along the wider axis.
///
/// Node boxes are the tight bounds of the points below them, so the box distance is an exact
/// lower bound on the distance to every point inside and pruning never drops a true hit.
/// Handles any query radius, which makes it the default index.
#[derive(Clone, Debug)]
pub struct KdTree {
    points: Vec<Point>,
    nodes: Vec<KdNode>,
    indices: Vec<usize>,
}

impl KdTree {
    fn build_recursive(&mut self, start: usize, end: usize) -> u32 {
        let count = end - start;

        let bounds = BoundingBox::from_points(self.indices[start..end].iter().map(|&i| &self.points[i]))
            .unwrap_or_default();

        // Leaf condition: small number of points
        if count <= LEAF_SIZE {
            let node_idx = self.nodes.len() as u32;
            self.nodes.push(KdNode {
                bounds,
                left: u32::MAX,
                right: u32::MAX,
                start: start as u32,
                end: end as u32,
                split_val: 0.0,
                axis: 0,
            });
            return node_idx;
        }

        let axis = if bounds.width() >= bounds.height() { 0 } else { 1 };
        let coord = |p: &Point| if axis == 0 { p.x } else { p.y };

        // Median split
        let mid = start + count / 2;
        let points = &self.points;
        self.indices[start..end].select_nth_unstable_by(count / 2, |&a, &b| {
            coord(&points[a]).total_cmp(&coord(&points[b]))
        });
        let split_val = coord(&self.points[self.indices[mid]]);

        let left = self.build_recursive(start, mid);
        let right = self.build_recursive(mid, end);

        let node_idx = self.nodes.len() as u32;
        self.nodes.push(KdNode {
            bounds,
            left,
            right,
            start: 0,
            end: 0,
            split_val,
            axis: axis as u8,
        });
        node_idx
    }

    fn root(&self) -> Option<u32> {
        // Root is the last node pushed in our recursive build
        self.nodes.len().checked_sub(1).map(|i| i as u32)
    }

    /// Children ordered so the one on the query's side of the split comes first.
    fn ordered_children(&self, node: &KdNode, query: &Point) -> (u32, u32) {
        let v = if node.axis == 0 { query.x } else { query.y };
        if v <= node.split_val { (node.left, node.right) } else { (node.right, node.left) }
    }

    fn within_recursive<F>(&self, node_idx: u32, query: &Point, radius: f64, visitor: &mut F)
    where
        F: FnMut(usize, Point),
    {
        let node = &self.nodes[node_idx as usize];
        if node.bounds.distance_sq_to(query).sqrt() > radius {
            return;
        }

        if node.is_leaf() {
            for &idx in &self.indices[node.start as usize..node.end as usize] {
                let p = self.points[idx];
                if query.distance(&p) <= radius {
                    visitor(idx, p);
                }
            }
            return;
        }

        self.within_recursive(node.left, query, radius, visitor);
        self.within_recursive(node.right, query, radius, visitor);
    }

    fn nearest_recursive(&self, node_idx: u32, query: &Point, best: &mut NearestCandidate) {
        let node = &self.nodes[node_idx as usize];

        // Equal distance is still visited: a tied point with a lower index may be inside.
        if node.bounds.distance_sq_to(query) > best.dist_sq {
            return;
        }

        if node.is_leaf() {
            for &idx in &self.indices[node.start as usize..node.end as usize] {
                best.offer(idx, query.distance_sq(&self.points[idx]));
            }
            return;
        }

        // Visit nearest child first
        let (first, second) = self.ordered_children(node, query);
        self.nearest_recursive(first, query, best);
        self.nearest_recursive(second, query, best);
    }
}

impl SpatialIndex for KdTree {
    fn build(points: Vec<Point>) -> Self {
        let count = points.len();
        let mut tree = KdTree {
            points,
            // A balanced tree has 2*N/LEAF_SIZE nodes roughly
            nodes: Vec::with_capacity(2 * count / LEAF_SIZE + 1),
            indices: (0..count).collect(),
        };
        if count > 0 {
            tree.build_recursive(0, count);
        }
        tree
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn visit_within<F>(&self, query: Point, radius: f64, mut visitor: F)
    where
        F: FnMut(usize, Point),
    {
        if let Some(root) = self.root() {
            self.within_recursive(root, &query, radius, &mut visitor);
        }
    }

    fn nearest(&self, query: Point) -> Result<(usize, Point), GraphError> {
        let root = self.root().ok_or(GraphError::EmptyIndex)?;
        check_query(&query)?;
        let mut best = NearestCandidate::none();
        self.nearest_recursive(root, &query, &mut best);
        best.resolve(&self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lattice(side: usize) -> Vec<Point> {
        let mut points = Vec::new();
        for i in 0..side {
            for j in 0..side {
                points.push(Point::new(i as f64, j as f64));
            }
        }
        points
    }

    #[test]
    fn test_kdtree_splits_large_sets() {
        let tree = KdTree::build(lattice(10));
        assert_eq!(tree.len(), 100);
        assert!(tree.nodes.len() > 1);
        let root = tree.nodes[tree.root().unwrap() as usize];
        assert!(!root.is_leaf());
        assert_eq!(root.bounds.max, [9.0, 9.0]);
    }

    #[test]
    fn test_kdtree_within_lattice() {
        let tree = KdTree::build(lattice(10));
        let mut hits = Vec::new();
        tree.visit_within(Point::new(5.0, 5.0), 1.0, |i, _| hits.push(i));
        hits.sort_unstable();
        // (4,5), (5,4), (5,5), (5,6), (6,5)
        assert_eq!(hits, vec![45, 54, 55, 56, 65]);

        // Unit lattice has 2 * side * (side - 1) axis-aligned neighbour pairs
        assert_eq!(tree.radius_pairs(1.0).unwrap().len(), 2 * 10 * 9);
    }

    #[test]
    fn test_kdtree_nearest() {
        let tree = KdTree::build(lattice(10));
        assert_eq!(tree.nearest(Point::new(3.2, 6.9)).unwrap(), (37, Point::new(3.0, 7.0)));
        // Far outside the points
        assert_eq!(tree.nearest(Point::new(-50.0, -50.0)).unwrap().0, 0);
        // Equidistant from (0,0), (0,1), (1,0), (1,1): lowest index wins
        assert_eq!(tree.nearest(Point::new(0.5, 0.5)).unwrap().0, 0);
    }

    #[test]
    fn test_kdtree_empty() {
        let tree = KdTree::build(Vec::new());
        assert!(tree.is_empty());
        assert_eq!(tree.nearest(Point::new(0.0, 0.0)), Err(GraphError::EmptyIndex));
        assert!(tree.radius_pairs(1.0).unwrap().is_empty());
    }
}
