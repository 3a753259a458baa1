mod config;
mod distance;
mod node;
mod store;
mod tangent;
mod time;

pub use config::{SplineConfig, MAX_SPLINE_NODES};
pub use distance::{DistanceSpline, SmoothedSpline};
pub use node::Node;
pub use store::NodeStore;
pub use tangent::{Bisector, Smoothed, TangentStrategy};
pub use time::TimeSpline;

use crate::error::Result;
use crate::math::{Point3, Vector3};

/// Parameter domain for a curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveDomain {
    /// Start of the parameter range.
    pub t_min: f64,
    /// End of the parameter range.
    pub t_max: f64,
}

impl CurveDomain {
    /// The normalized domain every spline is queried over.
    pub const UNIT: Self = Self {
        t_min: 0.0,
        t_max: 1.0,
    };

    /// Creates a new curve domain.
    #[must_use]
    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }
}

/// A parametric path in 3D space.
pub trait Curve {
    /// Evaluates the curve at parameter `t`, returning the 3D point.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated at `t`.
    fn evaluate(&self, t: f64) -> Result<Point3>;

    /// Computes the derivative of the curve with respect to `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if the curve cannot be evaluated at `t`.
    fn tangent(&self, t: f64) -> Result<Vector3>;

    /// Returns the parameter domain of the curve.
    fn domain(&self) -> CurveDomain {
        CurveDomain::UNIT
    }

    /// Returns the accumulated length (or duration) the domain maps onto.
    fn length(&self) -> f64;
}

impl Curve for NodeStore {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.query(t)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        NodeStore::tangent(self, t)
    }

    fn length(&self) -> f64 {
        self.total_length()
    }
}
