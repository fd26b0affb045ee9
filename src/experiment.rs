//! Repeated trials over freshly sampled graphs.
//!
//! Every trial samples new points, builds a [`GeometricGraph`] and asks for the cheapest path
//! between two fixed locations. Disconnected trials are routine for small thresholds; they are
//! recorded as [`TrialResult::NoPath`] and the sweep moves on. Any other error aborts the sweep.

use crate::algorithm::SpatialIndex;
use crate::algorithm::kdtree::KdTree;
use crate::bounds::BoundingBox;
use crate::error::{GraphError, check_radius};
use crate::graph::GeometricGraph;
use crate::point::Point;
use crate::sampler::PointSampler;
use crate::statistics::PathStatistics;
use rand::prelude::*;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use tracing::{debug, info};

/// Outcome of one trial.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrialResult {
    /// Coordinates of the path nodes from start to end, and the path cost.
    Found { path: Vec<Point>, cost: f64 },
    /// The query locations resolved to different components.
    NoPath,
}

impl TrialResult {
    pub fn is_found(&self) -> bool {
        matches!(self, TrialResult::Found { .. })
    }

    pub fn cost(&self) -> Option<f64> {
        match self {
            TrialResult::Found { cost, .. } => Some(*cost),
            TrialResult::NoPath => None,
        }
    }
}

/// Parameters of a multi-sweep, in the form downstream tooling keeps them on disk.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Region the points are sampled from.
    pub bounds: BoundingBox,
    pub start: Point,
    pub end: Point,
    /// Trials per value of n.
    pub iterations: usize,
    /// Point counts to sweep over, in order.
    pub n_values: Vec<usize>,
    /// Threshold exponent: each sweep uses `eps = n^power`.
    pub power: f64,
    /// Fixed seed for reproducible runs; fresh entropy when absent.
    pub seed: Option<u64>,
    /// Spread the trials of each sweep over the rayon pool.
    pub parallel: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            bounds: BoundingBox::unit(),
            start: Point::new(0.0, 0.0),
            end: Point::new(1.0, 1.0),
            iterations: 10,
            n_values: vec![100, 200, 400, 800, 1600],
            power: -0.4,
            seed: None,
            parallel: false,
        }
    }
}

/// One checkpoint of a growth sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrowthRecord {
    pub n: usize,
    pub eps: f64,
    /// `None` when the query locations were disconnected at this checkpoint.
    pub stats: Option<PathStatistics>,
}

/// Sample, build and query once.
fn run_trial<I, R>(sampler: &PointSampler, rng: &mut R, start: Point, end: Point, n: usize, eps: f64) -> Result<TrialResult, GraphError>
where
    I: SpatialIndex,
    R: Rng + ?Sized,
{
    let points = sampler.sample(rng, n)?;
    let graph = GeometricGraph::<I>::build(points, eps)?;
    match graph.shortest_path(start, end) {
        Ok(path) => Ok(TrialResult::Found {
            path: graph.path_positions(&path),
            cost: path.cost,
        }),
        Err(e) if e.is_no_path() => Ok(TrialResult::NoPath),
        Err(e) => Err(e),
    }
}

fn check_sweep(iterations: usize, n: usize, eps: f64) -> Result<(), GraphError> {
    if iterations == 0 {
        return Err(GraphError::invalid("iterations must be positive"));
    }
    if n == 0 {
        return Err(GraphError::invalid("number of points must be positive"));
    }
    check_radius("eps", eps)
}

fn log_summary(n: usize, eps: f64, results: &[TrialResult]) {
    let found = results.iter().filter(|r| r.is_found()).count();
    debug!(n, eps, found, skipped = results.len() - found, "sweep finished");
}

/// Drives trial sweeps with its own random source.
///
/// `I` selects the spatial index each trial graph is built on.
#[derive(Debug)]
pub struct ExperimentDriver<I: SpatialIndex = KdTree, R: Rng = StdRng> {
    sampler: PointSampler,
    rng: R,
    _index: PhantomData<fn() -> I>,
}

impl<I: SpatialIndex> ExperimentDriver<I, StdRng> {
    /// Driver over the unit square with a reproducible seed.
    pub fn from_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    /// Driver over the unit square seeded from system entropy.
    pub fn from_entropy() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Default for ExperimentDriver {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<I: SpatialIndex, R: Rng> ExperimentDriver<I, R> {
    /// Driver over the unit square drawing from `rng`.
    pub fn with_rng(rng: R) -> Self {
        Self {
            sampler: PointSampler::unit(),
            rng,
            _index: PhantomData,
        }
    }

    /// Sample from `bounds` instead of the unit square.
    pub fn with_bounds(mut self, bounds: BoundingBox) -> Result<Self, GraphError> {
        self.sampler = PointSampler::new(bounds)?;
        Ok(self)
    }

    pub fn bounds(&self) -> &BoundingBox {
        self.sampler.bounds()
    }

    /// Run a single trial with `n` points and threshold `eps`.
    pub fn trial(&mut self, start: Point, end: Point, n: usize, eps: f64) -> Result<TrialResult, GraphError> {
        run_trial::<I, _>(&self.sampler, &mut self.rng, start, end, n, eps)
    }

    /// Run `iterations` trials with `n` points and threshold `eps`, one after the other.
    ///
    /// # Errors
    ///
    /// Disconnected trials never fail the sweep. Returns [`GraphError::InvalidParameter`] for
    /// zero iterations, zero points or a bad threshold.
    pub fn single_sweep(&mut self, start: Point, end: Point, iterations: usize, n: usize, eps: f64) -> Result<Vec<TrialResult>, GraphError> {
        check_sweep(iterations, n, eps)?;
        let mut results = Vec::with_capacity(iterations);
        for t in 0..iterations {
            let result = self.trial(start, end, n, eps)?;
            if !result.is_found() {
                debug!(trial = t, n, eps, "no path, skipping");
            }
            results.push(result);
        }
        log_summary(n, eps, &results);
        Ok(results)
    }

    /// Like [`single_sweep`](Self::single_sweep), with trials spread over the rayon pool.
    ///
    /// A base seed is drawn from the driver's generator and trial `t` samples from
    /// `StdRng::seed_from_u64(base + t)`, so the results depend on the driver seed only,
    /// never on the number of threads. Results come back in trial order.
    pub fn par_single_sweep(&mut self, start: Point, end: Point, iterations: usize, n: usize, eps: f64) -> Result<Vec<TrialResult>, GraphError> {
        check_sweep(iterations, n, eps)?;
        let base: u64 = self.rng.r#gen();
        let sampler = self.sampler;
        let results = (0..iterations)
            .into_par_iter()
            .map(|t| {
                let mut rng = StdRng::seed_from_u64(base.wrapping_add(t as u64));
                let result = run_trial::<I, _>(&sampler, &mut rng, start, end, n, eps)?;
                if !result.is_found() {
                    debug!(trial = t, n, eps, "no path, skipping");
                }
                Ok::<_, GraphError>(result)
            })
            .collect::<Result<Vec<_>, _>>()?;
        log_summary(n, eps, &results);
        Ok(results)
    }

    /// Sweep every n in `n_values` with `eps = n^power`, keeping the costs of found paths only.
    ///
    /// Disconnected trials contribute nothing, so each list may be shorter than `iterations`.
    /// A value of n that appears twice accumulates the costs of both sweeps.
    pub fn multi_sweep(&mut self, n_values: &[usize], start: Point, end: Point, iterations: usize, power: f64) -> Result<BTreeMap<usize, Vec<f64>>, GraphError> {
        self.multi_sweep_with_progress(n_values, start, end, iterations, power, |_| {})
    }

    /// [`multi_sweep`](Self::multi_sweep), calling `progress` with each n before its sweep starts.
    pub fn multi_sweep_with_progress<F>(&mut self, n_values: &[usize], start: Point, end: Point, iterations: usize, power: f64, progress: F) -> Result<BTreeMap<usize, Vec<f64>>, GraphError>
    where
        F: FnMut(usize),
    {
        self.sweep_costs(n_values, start, end, iterations, power, false, progress)
    }

    /// Execute a multi-sweep described by `config`.
    ///
    /// The driver's own generator and bounds are replaced by the ones in `config` first.
    pub fn run(&mut self, config: &SweepConfig) -> Result<BTreeMap<usize, Vec<f64>>, GraphError>
    where
        R: SeedableRng,
    {
        self.sampler = PointSampler::new(config.bounds)?;
        self.rng = match config.seed {
            Some(seed) => R::seed_from_u64(seed),
            None => R::from_entropy(),
        };
        self.sweep_costs(&config.n_values, config.start, config.end, config.iterations, config.power, config.parallel, |_| {})
    }

    #[allow(clippy::too_many_arguments)]
    fn sweep_costs<F>(&mut self, n_values: &[usize], start: Point, end: Point, iterations: usize, power: f64, parallel: bool, mut progress: F) -> Result<BTreeMap<usize, Vec<f64>>, GraphError>
    where
        F: FnMut(usize),
    {
        if n_values.is_empty() {
            return Err(GraphError::invalid("n_values must not be empty"));
        }
        if !power.is_finite() {
            return Err(GraphError::invalid(format!("power must be finite, got {power}")));
        }

        let mut costs: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
        for &n in n_values {
            let eps = (n as f64).powf(power);
            progress(n);
            info!(n, eps, "processing sweep");

            let results = if parallel {
                self.par_single_sweep(start, end, iterations, n, eps)?
            } else {
                self.single_sweep(start, end, iterations, n, eps)?
            };
            costs.entry(n).or_default().extend(results.iter().filter_map(TrialResult::cost));
        }
        Ok(costs)
    }

    /// Grow one sample and measure the route at regular checkpoints.
    ///
    /// Draws `n_max` points once. At every `n = initial + k * interval` (k >= 1, n <= n_max)
    /// a fresh graph is built over the first n points with `eps = n^power`.
    pub fn growth_sweep(&mut self, start: Point, end: Point, n_max: usize, initial: usize, interval: usize, power: f64) -> Result<Vec<GrowthRecord>, GraphError> {
        if initial == 0 || interval == 0 {
            return Err(GraphError::invalid("initial and interval must be positive"));
        }
        if n_max <= initial {
            return Err(GraphError::invalid(format!("n_max ({n_max}) must exceed initial ({initial})")));
        }
        if !power.is_finite() {
            return Err(GraphError::invalid(format!("power must be finite, got {power}")));
        }

        let points = self.sampler.sample(&mut self.rng, n_max)?;
        let mut records = Vec::new();
        for n in (initial + interval..=n_max).step_by(interval) {
            let eps = (n as f64).powf(power);
            let graph = GeometricGraph::<I>::build(points[..n].to_vec(), eps)?;
            let stats = match PathStatistics::measure(&graph, start, end) {
                Ok(stats) => Some(stats),
                Err(e) if e.is_no_path() => None,
                Err(e) => return Err(e),
            };
            if let Some(s) = &stats {
                debug!(n, eps, distance = s.path_length, nn_distance = s.nn_distance, wander = s.wander, "growth checkpoint");
            }
            records.push(GrowthRecord { n, eps, stats });
        }
        Ok(records)
    }
}
