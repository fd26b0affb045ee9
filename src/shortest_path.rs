//! Dijkstra over the weighted adjacency lists of a [`GeometricGraph`](crate::GeometricGraph).
//!
//! Edge weights are Euclidean distances and therefore never negative. Adjacency lists are
//! iterated in stored (ascending neighbour) order and the heap breaks cost ties by push
//! order, so every run over the same graph visits nodes identically and returns the same path.

use crate::error::GraphError;
use crate::graph::Neighbor;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A walk through the graph together with its total weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Path {
    /// Node identifiers from source to target; consecutive ids share an edge.
    pub nodes: Vec<usize>,
    /// Left-to-right sum of the traversed edge weights.
    pub cost: f64,
}

impl Path {
    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn source(&self) -> Option<usize> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<usize> {
        self.nodes.last().copied()
    }
}

#[derive(Clone, Copy, Debug)]
struct HeapEntry {
    cost: f64,
    seq: u64,
    node: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    // BinaryHeap is a max-heap: reverse so the cheapest, then earliest pushed, entry is on top.
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost).then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Tentative distances and predecessor links of one Dijkstra run.
#[derive(Clone, Debug)]
struct Relaxation {
    dist: Vec<f64>,
    // (predecessor, weight of the edge from it)
    pred: Vec<Option<(usize, f64)>>,
}

fn check_node(adjacency: &[Vec<Neighbor>], node: usize, role: &str) -> Result<(), GraphError> {
    if node < adjacency.len() {
        Ok(())
    } else {
        Err(GraphError::invalid(format!(
            "{role} node {node} out of range for a graph with {} nodes",
            adjacency.len()
        )))
    }
}

/// Run Dijkstra from `source`, stopping as soon as `target` is settled when one is given.
fn relax_from(adjacency: &[Vec<Neighbor>], source: usize, target: Option<usize>) -> Relaxation {
    let n = adjacency.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut pred = vec![None; n];
    let mut settled = vec![false; n];
    let mut heap = BinaryHeap::new();
    let mut seq = 0u64;

    dist[source] = 0.0;
    heap.push(HeapEntry { cost: 0.0, seq, node: source });

    while let Some(HeapEntry { node: v, .. }) = heap.pop() {
        if settled[v] {
            continue;
        }
        settled[v] = true;
        if Some(v) == target {
            break;
        }

        for link in &adjacency[v] {
            let u = link.node;
            if settled[u] {
                continue;
            }
            let alt = dist[v] + link.weight;
            if alt < dist[u] {
                dist[u] = alt;
                pred[u] = Some((v, link.weight));
                seq += 1;
                heap.push(HeapEntry { cost: alt, seq, node: u });
            }
        }
    }

    Relaxation { dist, pred }
}

impl Relaxation {
    fn path_to(&self, source: usize, target: usize) -> Result<Path, GraphError> {
        if !self.dist[target].is_finite() {
            return Err(GraphError::NoPath { from: source, to: target });
        }

        let mut nodes = vec![target];
        let mut weights = Vec::new();
        let mut current = target;
        while current != source {
            match self.pred[current] {
                Some((prev, weight)) => {
                    nodes.push(prev);
                    weights.push(weight);
                    current = prev;
                }
                None => return Err(GraphError::NoPath { from: source, to: target }),
            }
        }
        nodes.reverse();

        // Summed source to target, the same order Dijkstra accumulated it in.
        let cost = weights.iter().rev().fold(0.0, |acc, w| acc + w);
        Ok(Path { nodes, cost })
    }
}

/// Minimum-weight path from `source` to `target`.
///
/// # Errors
///
/// Returns [`GraphError::InvalidParameter`] if either id is not a node.
/// Returns [`GraphError::NoPath`] if `target` is unreachable from `source`.
pub fn solve(adjacency: &[Vec<Neighbor>], source: usize, target: usize) -> Result<Path, GraphError> {
    check_node(adjacency, source, "source")?;
    check_node(adjacency, target, "target")?;
    relax_from(adjacency, source, Some(target)).path_to(source, target)
}

/// Shortest distances from one source to every node.
#[derive(Clone, Debug)]
pub struct ShortestPathTree {
    source: usize,
    relaxation: Relaxation,
}

impl ShortestPathTree {
    /// Run Dijkstra from `source` until the frontier is exhausted.
    pub fn new(adjacency: &[Vec<Neighbor>], source: usize) -> Result<Self, GraphError> {
        check_node(adjacency, source, "source")?;
        Ok(Self {
            source,
            relaxation: relax_from(adjacency, source, None),
        })
    }

    pub fn source(&self) -> usize {
        self.source
    }

    /// Graph distance to `node`, `None` when unreachable or out of range.
    pub fn distance(&self, node: usize) -> Option<f64> {
        self.relaxation.dist.get(node).copied().filter(|d| d.is_finite())
    }

    pub fn has_path(&self, node: usize) -> bool {
        self.distance(node).is_some()
    }

    pub fn path_to(&self, node: usize) -> Result<Path, GraphError> {
        if node >= self.relaxation.dist.len() {
            return Err(GraphError::invalid(format!("target node {node} out of range")));
        }
        self.relaxation.path_to(self.source, node)
    }
}
