use crate::math::{Point3, Vector3};

/// A control point on a path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// World-space position of the control point.
    pub position: Point3,
    /// Tangent at this node. Its magnitude matters as well as its direction.
    pub velocity: Vector3,
    /// Distance or duration to the next node. Zero on the last node.
    pub interval: f64,
}

impl Node {
    /// Creates a node with zero velocity and zero interval.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            velocity: Vector3::zeros(),
            interval: 0.0,
        }
    }
}
