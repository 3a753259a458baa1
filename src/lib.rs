//! Piecewise cubic Hermite splines for moving objects along 3D paths.
//!
//! Three spline flavours share one node store and one position query:
//!
//! - [`DistanceSpline`]: segments weighted by chord length, bisector tangents.
//! - [`SmoothedSpline`]: a distance spline with re-blended interior tangents.
//! - [`TimeSpline`]: segments weighted by caller-supplied durations, editable
//!   after construction, with an optional tangent constraint pass.
//!
//! Nodes are added first, `build` computes tangents, and `query(t)` then
//! returns points for `t ∈ [0, 1]`.

pub mod error;
pub mod math;
pub mod spline;
pub mod tessellation;

pub use error::{Result, SplineError};
pub use spline::{Curve, DistanceSpline, SmoothedSpline, SplineConfig, TimeSpline};
