use crate::point::Point;

/// Errors raised while sampling, indexing, building graphs or running sweeps.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Malformed sampling, graph or sweep arguments.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Nearest-neighbour query against an index holding no points.
    #[error("spatial index is empty")]
    EmptyIndex,

    /// The two nodes lie in different connected components.
    ///
    /// Expected for sparse graphs. Sweeps record it and carry on.
    #[error("no path between node {from} and node {to}")]
    NoPath { from: usize, to: usize },
}

impl GraphError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        GraphError::InvalidParameter(msg.into())
    }

    /// Whether this is the recoverable disconnected-graph outcome.
    pub fn is_no_path(&self) -> bool {
        matches!(self, GraphError::NoPath { .. })
    }
}

/// Reject query locations with a NaN or infinite coordinate.
pub(crate) fn check_query(query: &Point) -> Result<(), GraphError> {
    if query.is_finite() {
        Ok(())
    } else {
        Err(GraphError::invalid(format!("query location must be finite, got ({}, {})", query.x, query.y)))
    }
}

/// Reject negative, NaN and infinite distance thresholds.
pub(crate) fn check_radius(name: &str, value: f64) -> Result<(), GraphError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GraphError::invalid(format!("{name} must be a finite non-negative number, got {value}")))
    }
}
