use tracing::{debug, instrument, trace};

use crate::error::{NodeError, Result};
use crate::math::{Point3, Vector3};

use super::tangent::{constrain_tangents, smooth_tangents};
use super::{Bisector, Curve, Node, NodeStore, SplineConfig, TangentStrategy};

/// A spline whose segments are given explicit durations.
///
/// Each node is added with the time it takes to reach it from the previous
/// node, and `t ∈ [0, 1]` maps linearly onto the total duration. Unlike
/// [`DistanceSpline`](super::DistanceSpline), nodes can be removed and edited
/// after the spline has been built. Every edit invalidates the tangents, so
/// [`build`](Self::build) (and [`constrain`](Self::constrain), if used) must
/// run again before the next query.
#[derive(Debug, Clone, Default)]
pub struct TimeSpline<S: TangentStrategy = Bisector> {
    store: NodeStore,
    strategy: S,
}

impl<S: TangentStrategy> TimeSpline<S> {
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

    /// Appends a node reached `interval` time units after the previous one.
    ///
    /// The interval of the first node is ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline is at capacity; the spline is unchanged.
    pub fn add_node(&mut self, position: Point3, interval: f64) -> Result<()> {
        self.store.push(position, interval)
    }

    /// Appends a node at an explicit index.
    ///
    /// Only the tail index (`index == len`) is accepted; this is an append that
    /// states where the node lands, not a general insertion.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is before the tail or past it, or if the
    /// spline is at capacity; the spline is unchanged.
    #[instrument(level = "debug", skip(self))]
    pub fn insert_node(&mut self, index: usize, position: Point3, interval: f64) -> Result<()> {
        let len = self.store.len();
        if index < len {
            trace!(index, len, "insert before tail rejected");
            return Err(NodeError::InsertBeforeTail { index, len }.into());
        }
        if index > len {
            trace!(index, len, "insert index out of range");
            return Err(NodeError::IndexOutOfRange { index, len }.into());
        }
        self.store.push(position, interval)
    }

    /// Removes the node at `index`, returning it.
    ///
    /// The durations of both segments touching the node are subtracted from
    /// the total and the preceding node's interval is zeroed. Follow up with
    /// [`update_node_time`](Self::update_node_time) on `index - 1` to give the
    /// bridging segment a duration.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline is empty or `index` is out of range.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_node(&mut self, index: usize) -> Result<Node> {
        let node = self.store.remove(index)?;
        debug!(
            nodes = self.store.len(),
            duration = self.store.total_length(),
            "node removed"
        );
        Ok(node)
    }

    /// Sets the interval from node `index` to the next node.
    ///
    /// The total duration is not recomputed.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline is empty or `index` is out of range.
    pub fn update_node_time(&mut self, index: usize, interval: f64) -> Result<()> {
        self.store.node_mut(index)?.interval = interval;
        Ok(())
    }

    /// Moves node `index` to `position`.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline is empty or `index` is out of range.
    pub fn update_node_pos(&mut self, index: usize, position: Point3) -> Result<()> {
        self.store.node_mut(index)?.position = position;
        Ok(())
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
            duration = self.store.total_length(),
            "time spline built"
        );
        Ok(())
    }

    /// Runs a smoothing pass over the built tangents.
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

    /// Damps interior tangents where neighbouring segments imply different speeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the spline has fewer than three nodes or has not
    /// been built; nothing is changed.
    pub fn constrain(&mut self) -> Result<()> {
        self.store.require_built(3)?;
        constrain_tangents(&mut self.store);
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

    /// Returns the accumulated duration.
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

impl<S: TangentStrategy> Curve for TimeSpline<S> {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.query(t)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        TimeSpline::tangent(self, t)
    }

    fn length(&self) -> f64 {
        self.total_length()
    }
}
