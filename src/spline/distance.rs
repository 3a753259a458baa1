use tracing::debug;

use crate::error::Result;
use crate::math::{Point3, Vector3};

use super::tangent::smooth_tangents;
use super::{Bisector, Curve, Node, NodeStore, Smoothed, SplineConfig, TangentStrategy};

/// A spline parameterized by the straight-line distance between nodes.
///
/// Nodes are appended with [`add_node`](Self::add_node); each append records
/// the chord length to the previous node. After [`build`](Self::build), the
/// spline is queried with `t ∈ [0, 1]`, where `t` maps linearly onto the
/// accumulated chord length.
///
/// ```
/// use pathspline::math::Point3;
/// use pathspline::spline::DistanceSpline;
///
/// let mut spline: DistanceSpline = DistanceSpline::new();
/// spline.add_node(Point3::new(0.0, 0.0, 0.0))?;
/// spline.add_node(Point3::new(10.0, 0.0, 0.0))?;
/// spline.add_node(Point3::new(20.0, 0.0, 0.0))?;
/// spline.build()?;
///
/// let mid = spline.query(0.5)?;
/// assert!((mid.x - 10.0).abs() < 1e-9);
/// # Ok::<(), pathspline::SplineError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct DistanceSpline<S: TangentStrategy = Bisector> {
    store: NodeStore,
    strategy: S,
}

/// A distance spline whose interior tangents can be re-blended by [`smooth`](DistanceSpline::smooth).
///
/// `build` computes bisector tangents plus any passes the [`Smoothed`]
/// strategy asks for (none by default); each `smooth` call runs one pass.
pub type SmoothedSpline = DistanceSpline<Smoothed>;

impl<S: TangentStrategy> DistanceSpline<S> {
    /// Creates an empty spline with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SplineConfig::default())
    }

    /// Creates an empty spline with the given configuration.
    #[must_use]
    pub fn with_config(config: SplineConfig) -> Self {
        Self::with_strategy(config, S::default())
    }

    /// Creates an empty spline with an explicit tangent strategy.
    #[must_use]
    pub fn with_strategy(config: SplineConfig, strategy: S) -> Self {
        Self {
            store: NodeStore::new(config),
            strategy,
        }
    }

    /// Creates a built spline through `points`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points exceed the default capacity or fewer
    /// than two are given.
    pub fn from_points(points: impl IntoIterator<Item = Point3>) -> Result<Self> {
        let mut spline = Self::new();
        for p in points {
            spline.add_node(p)?;
        }
        spline.build()?;
        Ok(spline)
    }

    /// Appends a node at `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline is at capacity; the spline is unchanged.
    pub fn add_node(&mut self, position: Point3) -> Result<()> {
        let interval = self
            .store
            .last()
            .map_or(0.0, |last| (last.position - position).norm());
        self.store.push(position, interval)
    }

    /// Computes node tangents. Must run after the last node edit and before any query.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline has fewer than two nodes; nothing is changed.
    pub fn build(&mut self) -> Result<()> {
        self.store.require(2)?;
        self.strategy.build(&mut self.store);
        self.store.mark_built();
        debug!(
            nodes = self.store.len(),
            length = self.store.total_length(),
            "distance spline built"
        );
        Ok(())
    }

    /// Returns the point at `t`, with `t` clamped to `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two nodes exist, the spline has not been
    /// built since the last edit, or `t` is NaN.
    pub fn query(&self, t: f64) -> Result<Point3> {
        self.store.query(t)
    }

    /// Returns the point at `t`, or the origin when the spline cannot be queried.
    #[must_use]
    pub fn position(&self, t: f64) -> Point3 {
        self.store.position(t)
    }

    /// Returns the derivative of the path with respect to `t`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`query`](Self::query).
    pub fn tangent(&self, t: f64) -> Result<Vector3> {
        self.store.tangent(t)
    }

    /// Returns the nodes in path order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        self.store.nodes()
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the spline has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns the accumulated chord length.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.store.total_length()
    }

    /// Returns `true` if tangents are current.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.store.is_built()
    }

    /// Returns the underlying node store.
    #[must_use]
    pub fn store(&self) -> &NodeStore {
        &self.store
    }
}

impl DistanceSpline<Smoothed> {
    /// Runs one smoothing pass over the built tangents.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline has fewer than three nodes or has not
    /// been built; nothing is changed.
    pub fn smooth(&mut self) -> Result<()> {
        self.store.require_built(3)?;
        smooth_tangents(&mut self.store);
        Ok(())
    }
}

impl<S: TangentStrategy> Curve for DistanceSpline<S> {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.query(t)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        DistanceSpline::tangent(self, t)
    }

    fn length(&self) -> f64 {
        self.total_length()
    }
}
