use crate::algorithm::kdtree::KdTree;
use crate::graph::GeometricGraph;
use crate::point::Point;
use crate::sampler::PointSampler;
use crate::shortest_path::Path;
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen_rayon::init_thread_pool;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn init_threads(n: usize) -> js_sys::Promise {
    init_thread_pool(n)
}

fn to_js_error(e: crate::GraphError) -> JsError {
    JsError::new(&e.to_string())
}

fn flatten(points: &[Point]) -> Vec<f64> {
    points.iter().flat_map(|p| [p.x, p.y]).collect()
}

// --- Path ---

/// A shortest path as seen from JavaScript.
#[wasm_bindgen(js_name = Path)]
pub struct PathWASM {
    nodes: Vec<u32>,
    positions: Vec<f64>,
    cost: f64,
}

#[wasm_bindgen(js_class = Path)]
impl PathWASM {
    /// Node ids from start to end.
    #[wasm_bindgen(getter)]
    pub fn nodes(&self) -> Vec<u32> { self.nodes.clone() }
    /// Flat coordinates `[x, y, x, y, ...]` of the path nodes.
    #[wasm_bindgen(getter)]
    pub fn positions(&self) -> Vec<f64> { self.positions.clone() }
    #[wasm_bindgen(getter)]
    pub fn cost(&self) -> f64 { self.cost }
}

impl PathWASM {
    fn new(graph: &GeometricGraph<KdTree>, path: &Path) -> Self {
        PathWASM {
            nodes: path.nodes.iter().map(|&i| i as u32).collect(),
            positions: flatten(&graph.path_positions(path)),
            cost: path.cost,
        }
    }
}

// --- Graph ---

/// Random geometric graph wrapper for JavaScript plotting front-ends.
#[wasm_bindgen(js_name = GeometricGraph)]
pub struct GeometricGraphWASM {
    inner: GeometricGraph<KdTree>,
}

#[wasm_bindgen(js_class = GeometricGraph)]
impl GeometricGraphWASM {
    /// Build from flat coordinates `[x, y, x, y, ...]`; a trailing odd value is ignored.
    #[wasm_bindgen(constructor)]
    pub fn new(points: &[f64], eps: f64) -> Result<GeometricGraphWASM, JsError> {
        let points = points.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect();
        let inner = GeometricGraph::build(points, eps).map_err(to_js_error)?;
        Ok(GeometricGraphWASM { inner })
    }

    /// Sample `n` points from `[0, width) x [0, height)` with the given seed.
    pub fn random(n: usize, width: f64, height: f64, eps: f64, seed: u64) -> Result<GeometricGraphWASM, JsError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let points = PointSampler::rect(width, height)
            .and_then(|s| s.sample(&mut rng, n))
            .map_err(to_js_error)?;
        let inner = GeometricGraph::build(points, eps).map_err(to_js_error)?;
        Ok(GeometricGraphWASM { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn eps(&self) -> f64 { self.inner.eps() }
    #[wasm_bindgen(getter)]
    pub fn node_count(&self) -> usize { self.inner.node_count() }
    #[wasm_bindgen(getter)]
    pub fn edge_count(&self) -> usize { self.inner.edge_count() }
    #[wasm_bindgen(getter)]
    pub fn points(&self) -> Vec<f64> { flatten(self.inner.points()) }

    /// Flat endpoint pairs `[i, j, i, j, ...]` of every edge.
    pub fn edges(&self) -> Vec<u32> {
        self.inner.edges().flat_map(|(i, j, _)| [i as u32, j as u32]).collect()
    }

    pub fn nearest_node(&self, x: f64, y: f64) -> Result<usize, JsError> {
        self.inner.nearest_node(Point::new(x, y)).map_err(to_js_error)
    }

    /// Shortest path between the nodes nearest to the two locations, `undefined` if disconnected.
    pub fn shortest_path(&self, sx: f64, sy: f64, ex: f64, ey: f64) -> Result<Option<PathWASM>, JsError> {
        match self.inner.shortest_path(Point::new(sx, sy), Point::new(ex, ey)) {
            Ok(path) => Ok(Some(PathWASM::new(&self.inner, &path))),
            Err(e) if e.is_no_path() => Ok(None),
            Err(e) => Err(to_js_error(e)),
        }
    }
}
