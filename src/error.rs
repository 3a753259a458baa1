use thiserror::Error;

/// Top-level error type for path splines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    #[error(transparent)]
    Node(#[from] NodeError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Errors raised while adding, inserting, removing or editing nodes.
///
/// A mutation that fails leaves the spline untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    #[error("node capacity of {capacity} reached")]
    CapacityExceeded { capacity: usize },

    #[error("node index {index} is out of range for {len} nodes")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("insertion index {index} is before the tail of {len} nodes")]
    InsertBeforeTail { index: usize, len: usize },

    #[error("spline has no nodes")]
    Empty,
}

/// Errors raised by tangent passes and position queries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("spline has {count} nodes, at least {required} are needed")]
    TooFewNodes { count: usize, required: usize },

    #[error("tangents are stale, rebuild the spline before querying")]
    NotBuilt,

    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Errors related to tessellation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TessellationError {
    #[error("invalid tessellation parameters: {0}")]
    InvalidParameters(String),
}

/// Convenience type alias for results using [`SplineError`].
pub type Result<T> = std::result::Result<T, SplineError>;
