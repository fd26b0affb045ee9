//! # rggpath
//!
//! `rggpath` is a Rust library for studying shortest paths on random geometric graphs,
//! designed to be used in Rust as well as compiled to WebAssembly (WASM). Points are sampled
//! uniformly in a rectangle, joined whenever they lie within a threshold `eps`, and the
//! cheapest route between two fixed locations is measured over many trials.
//!
//! ## Features
//!
//! - **Spatial Indexing**: A k-d tree and a configurable uniform grid, both exact, for
//!   fixed-radius pair enumeration and nearest-neighbour lookup.
//! - **Deterministic Dijkstra**: Ascending adjacency order and first-discovered tie-breaking,
//!   so repeated queries return identical paths.
//! - **Trial Sweeps**: Sequential or rayon-parallel sweeps that record disconnected trials
//!   instead of aborting.
//! - **Path Statistics**: Access distance, hop count and deviation from the straight line.
//!
//! ## Main Interface
//!
//! The primary entry points are [`GeometricGraph`] for single graphs and
//! [`ExperimentDriver`] for repeated trials.

mod algorithm;
mod bounds;
mod error;
mod experiment;
mod graph;
mod point;
mod sampler;
mod shortest_path;
mod statistics;
mod wasm;

pub use algorithm::LinearScan;
pub use algorithm::SpatialIndex;
pub use algorithm::grid::UniformGrid;
pub use algorithm::kdtree::KdTree;
pub use bounds::BoundingBox;
pub use error::GraphError;
pub use experiment::ExperimentDriver;
pub use experiment::GrowthRecord;
pub use experiment::SweepConfig;
pub use experiment::TrialResult;
pub use graph::GeometricGraph;
pub use graph::Neighbor;
pub use point::Point;
pub use sampler::PointSampler;
pub use sampler::sample;
pub use shortest_path::Path;
pub use shortest_path::ShortestPathTree;
pub use shortest_path::solve;
pub use statistics::LineDistance;
pub use statistics::PathStatistics;
pub use statistics::ball;
