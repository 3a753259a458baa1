/// Default maximum number of nodes a spline accepts.
pub const MAX_SPLINE_NODES: usize = 128;

/// Construction parameters shared by every spline variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplineConfig {
    /// Maximum number of nodes; appends beyond this are rejected.
    pub max_nodes: usize,
}

impl SplineConfig {
    /// Creates a configuration with the given node capacity.
    #[must_use]
    pub fn with_max_nodes(max_nodes: usize) -> Self {
        Self { max_nodes }
    }
}

impl Default for SplineConfig {
    fn default() -> Self {
        Self {
            max_nodes: MAX_SPLINE_NODES,
        }
    }
}
