use tracing::trace;

use crate::error::{EvaluationError, NodeError, Result};
use crate::math::{hermite, Point3, Vector3, TOLERANCE};

use super::{Node, SplineConfig};

/// Ordered, capacity-bounded sequence of spline nodes.
///
/// The store owns the node list and the accumulated length (or duration) of
/// the path, and answers position queries once tangents have been built.
/// Tangent computation itself lives in the spline variants that own a store.
///
/// Every mutation marks the store as unbuilt; queries on an unbuilt store
/// fail with [`EvaluationError::NotBuilt`].
#[derive(Debug, Clone)]
pub struct NodeStore {
    nodes: Vec<Node>,
    total_length: f64,
    max_nodes: usize,
    built: bool,
}

impl NodeStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: SplineConfig) -> Self {
        Self {
            nodes: Vec::with_capacity(config.max_nodes.min(super::MAX_SPLINE_NODES)),
            total_length: 0.0,
            max_nodes: config.max_nodes,
            built: false,
        }
    }

    /// Returns the nodes in path order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the store holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the maximum number of nodes the store accepts.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_nodes
    }

    /// Returns the accumulated interval over all segments.
    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    /// Returns `true` if tangents are current.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Returns the last node, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Node> {
        self.nodes.last()
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub(crate) fn mark_built(&mut self) {
        self.built = true;
    }

    /// Appends a node, assigning `interval` to the segment that now ends at it.
    pub(crate) fn push(&mut self, position: Point3, interval: f64) -> Result<()> {
        if self.nodes.len() >= self.max_nodes {
            trace!(capacity = self.max_nodes, "node rejected, store is full");
            return Err(NodeError::CapacityExceeded {
                capacity: self.max_nodes,
            }
            .into());
        }
        match self.nodes.last_mut() {
            Some(last) => {
                last.interval = interval;
                self.total_length += interval;
            }
            None => self.total_length = 0.0,
        }
        self.nodes.push(Node::new(position));
        self.built = false;
        Ok(())
    }

    /// Removes the node at `index`.
    ///
    /// Both the removed node's interval and its predecessor's interval are
    /// subtracted from the total, and the predecessor's interval is zeroed.
    /// The segment that bridges the gap therefore has no length until the
    /// caller assigns one.
    pub(crate) fn remove(&mut self, index: usize) -> Result<Node> {
        self.check_index(index)?;
        self.total_length -= self.nodes[index].interval;
        if index > 0 {
            let prev = &mut self.nodes[index - 1];
            self.total_length -= prev.interval;
            prev.interval = 0.0;
        }
        self.built = false;
        Ok(self.nodes.remove(index))
    }

    /// Returns a mutable node for a direct field edit, invalidating tangents.
    pub(crate) fn node_mut(&mut self, index: usize) -> Result<&mut Node> {
        self.check_index(index)?;
        self.built = false;
        Ok(&mut self.nodes[index])
    }

    fn check_index(&self, index: usize) -> Result<()> {
        let len = self.nodes.len();
        if len == 0 {
            trace!(index, "node edit rejected, store is empty");
            return Err(NodeError::Empty.into());
        }
        if index >= len {
            trace!(index, len, "node edit rejected, index out of range");
            return Err(NodeError::IndexOutOfRange { index, len }.into());
        }
        Ok(())
    }

    /// Fails unless the store holds at least `required` nodes.
    pub(crate) fn require(&self, required: usize) -> Result<()> {
        let count = self.nodes.len();
        if count < required {
            return Err(EvaluationError::TooFewNodes { count, required }.into());
        }
        Ok(())
    }

    /// Fails unless the store holds at least `required` nodes with current tangents.
    pub(crate) fn require_built(&self, required: usize) -> Result<()> {
        self.require(required)?;
        if !self.built {
            return Err(EvaluationError::NotBuilt.into());
        }
        Ok(())
    }

    /// Tangent leaving node `index`, derived from the following node's tangent.
    ///
    /// Returns the zero vector when `index` has no successor or the segment is
    /// degenerate.
    #[must_use]
    pub(crate) fn start_velocity(&self, index: usize) -> Vector3 {
        if index + 1 >= self.nodes.len() {
            return Vector3::zeros();
        }
        let (cur, next) = (&self.nodes[index], &self.nodes[index + 1]);
        if cur.interval < TOLERANCE {
            return Vector3::zeros();
        }
        let chord = (next.position - cur.position) * (3.0 / cur.interval);
        (chord - next.velocity) * 0.5
    }

    /// Tangent arriving at node `index`, derived from the preceding node's tangent.
    ///
    /// Returns the zero vector when `index` has no predecessor or the segment is
    /// degenerate.
    #[must_use]
    pub(crate) fn end_velocity(&self, index: usize) -> Vector3 {
        if index == 0 || index >= self.nodes.len() {
            return Vector3::zeros();
        }
        let (prev, cur) = (&self.nodes[index - 1], &self.nodes[index]);
        if prev.interval < TOLERANCE {
            return Vector3::zeros();
        }
        let chord = (cur.position - prev.position) * (3.0 / prev.interval);
        (chord - prev.velocity) * 0.5
    }

    /// Maps a path parameter to a segment index and a local segment parameter.
    ///
    /// `t` is clamped to `[0, 1]`. A zero-length segment maps to its start.
    fn locate(&self, t: f64) -> Result<(usize, f64)> {
        self.require_built(2)?;
        if t.is_nan() {
            return Err(EvaluationError::ParameterOutOfRange {
                parameter: "t",
                value: t,
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        let target = t.clamp(0.0, 1.0) * self.total_length;
        let last_segment = self.nodes.len() - 2;
        let mut accumulated = 0.0;
        let mut i = 0;
        while i < last_segment && accumulated + self.nodes[i].interval < target {
            accumulated += self.nodes[i].interval;
            i += 1;
        }
        debug_assert!(i + 1 < self.nodes.len(), "segment search ran past the path end");

        let interval = self.nodes[i].interval;
        let local = if interval < TOLERANCE {
            0.0
        } else {
            (target - accumulated) / interval
        };
        Ok((i, local))
    }

    /// Returns the point at path parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than two nodes exist, tangents have not been
    /// built since the last mutation, or `t` is NaN.
    pub fn query(&self, t: f64) -> Result<Point3> {
        let (i, local) = self.locate(t)?;
        let (a, b) = (&self.nodes[i], &self.nodes[i + 1]);
        // Stored tangents are per unit interval; the Hermite basis wants them
        // per unit of the local [0, 1] segment parameter.
        let v0 = a.velocity * a.interval;
        let v1 = b.velocity * a.interval;
        Ok(hermite::evaluate(&a.position, &v0, &b.position, &v1, local))
    }

    /// Returns the point at `t`, or the origin if the query fails.
    #[must_use]
    pub fn position(&self, t: f64) -> Point3 {
        self.query(t).unwrap_or_else(|_| Point3::origin())
    }

    /// Returns the derivative of the path with respect to `t`.
    ///
    /// # Errors
    ///
    /// Same conditions as [`NodeStore::query`].
    pub fn tangent(&self, t: f64) -> Result<Vector3> {
        let (i, local) = self.locate(t)?;
        let (a, b) = (&self.nodes[i], &self.nodes[i + 1]);
        if a.interval < TOLERANCE {
            return Ok(Vector3::zeros());
        }
        let v0 = a.velocity * a.interval;
        let v1 = b.velocity * a.interval;
        let local_derivative = hermite::derivative(&a.position, &v0, &b.position, &v1, local);
        Ok(local_derivative * (self.total_length / a.interval))
    }
}

impl Default for NodeStore {
    fn default() -> Self {
        Self::new(SplineConfig::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::SplineError;
    use approx::assert_relative_eq;

    /// Builds a store along the x axis with chord-aligned unit tangents.
    fn straight_store(xs: &[f64]) -> NodeStore {
        let mut store = NodeStore::default();
        for &x in xs {
            let interval = store.last().map_or(0.0, |n| (x - n.position.x).abs());
            store.push(Point3::new(x, 0.0, 0.0), interval).unwrap();
        }
        for node in store.nodes_mut() {
            node.velocity = Vector3::x();
        }
        store.mark_built();
        store
    }

    #[test]
    fn first_push_resets_total() {
        let mut store = NodeStore::default();
        store.push(Point3::origin(), 42.0).unwrap();
        assert_eq!(store.len(), 1);
        assert_relative_eq!(store.total_length(), 0.0);
    }

    #[test]
    fn push_assigns_interval_to_previous_node() {
        let mut store = NodeStore::default();
        store.push(Point3::origin(), 0.0).unwrap();
        store.push(Point3::new(1.0, 0.0, 0.0), 2.5).unwrap();
        store.push(Point3::new(2.0, 0.0, 0.0), 1.5).unwrap();
        assert_relative_eq!(store.nodes()[0].interval, 2.5);
        assert_relative_eq!(store.nodes()[1].interval, 1.5);
        assert_relative_eq!(store.nodes()[2].interval, 0.0);
        assert_relative_eq!(store.total_length(), 4.0);
    }

    #[test]
    fn push_beyond_capacity_is_rejected() {
        let mut store = NodeStore::new(SplineConfig::with_max_nodes(2));
        store.push(Point3::origin(), 0.0).unwrap();
        store.push(Point3::new(1.0, 0.0, 0.0), 1.0).unwrap();
        let err = store.push(Point3::new(2.0, 0.0, 0.0), 1.0).unwrap_err();
        assert!(matches!(
            err,
            SplineError::Node(NodeError::CapacityExceeded { capacity: 2 })
        ));
        assert_eq!(store.len(), 2);
        assert_relative_eq!(store.total_length(), 1.0);
    }

    #[test]
    fn query_needs_two_nodes() {
        let mut store = NodeStore::default();
        store.push(Point3::new(5.0, 5.0, 5.0), 0.0).unwrap();
        store.mark_built();
        let err = store.query(0.0).unwrap_err();
        assert!(matches!(
            err,
            SplineError::Evaluation(EvaluationError::TooFewNodes { count: 1, required: 2 })
        ));
        assert_eq!(store.position(0.0), Point3::origin());
    }

    #[test]
    fn query_before_build_is_rejected() {
        let mut store = NodeStore::default();
        store.push(Point3::new(1.0, 1.0, 1.0), 0.0).unwrap();
        store.push(Point3::new(2.0, 1.0, 1.0), 1.0).unwrap();
        assert!(matches!(
            store.query(0.0),
            Err(SplineError::Evaluation(EvaluationError::NotBuilt))
        ));
        assert_eq!(store.position(0.0), Point3::origin());
    }

    #[test]
    fn query_rejects_nan() {
        let store = straight_store(&[0.0, 1.0]);
        assert!(matches!(
            store.query(f64::NAN),
            Err(SplineError::Evaluation(
                EvaluationError::ParameterOutOfRange { .. }
            ))
        ));
    }

    #[test]
    fn query_clamps_parameter() {
        let store = straight_store(&[0.0, 4.0, 10.0]);
        assert_relative_eq!(store.query(-0.5).unwrap(), Point3::origin(), epsilon = 1e-12);
        assert_relative_eq!(
            store.query(3.0).unwrap(),
            Point3::new(10.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn query_locates_segment_by_distance() {
        let store = straight_store(&[0.0, 4.0, 10.0]);
        // 0.5 of 10 units lands 1 unit into the second segment.
        assert_relative_eq!(
            store.query(0.5).unwrap(),
            Point3::new(5.0, 0.0, 0.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            store.query(0.2).unwrap(),
            Point3::new(2.0, 0.0, 0.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn tangent_is_scaled_to_path_parameter() {
        let store = straight_store(&[0.0, 4.0, 10.0]);
        // Moving t from 0 to 1 covers 10 units at constant speed.
        assert_relative_eq!(
            store.tangent(0.3).unwrap(),
            Vector3::new(10.0, 0.0, 0.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn zero_length_segment_maps_to_its_start() {
        let store = straight_store(&[0.0, 0.0, 3.0]);
        assert_relative_eq!(store.nodes()[0].interval, 0.0);
        assert_relative_eq!(store.query(0.0).unwrap(), Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn remove_subtracts_both_adjacent_intervals() {
        let mut store = straight_store(&[0.0, 1.0, 3.0, 6.0]);
        let removed = store.remove(2).unwrap();
        assert_relative_eq!(removed.position.x, 3.0);
        assert_eq!(store.len(), 3);
        assert_relative_eq!(store.nodes()[1].interval, 0.0);
        assert_relative_eq!(store.total_length(), 1.0);
        assert!(!store.is_built());
    }

    #[test]
    fn remove_first_node_has_no_predecessor() {
        let mut store = straight_store(&[0.0, 1.0, 3.0]);
        store.remove(0).unwrap();
        assert_relative_eq!(store.total_length(), 2.0);
        assert_relative_eq!(store.nodes()[0].position.x, 1.0);
    }

    #[test]
    fn remove_checks_bounds() {
        let mut store = NodeStore::default();
        assert!(matches!(
            store.remove(0),
            Err(SplineError::Node(NodeError::Empty))
        ));
        store.push(Point3::origin(), 0.0).unwrap();
        assert!(matches!(
            store.remove(1),
            Err(SplineError::Node(NodeError::IndexOutOfRange { index: 1, len: 1 }))
        ));
    }

    #[test]
    fn boundary_velocities_follow_neighbour_tangents() {
        let mut store = NodeStore::default();
        store.push(Point3::origin(), 0.0).unwrap();
        store.push(Point3::new(2.0, 0.0, 0.0), 2.0).unwrap();
        store.nodes_mut()[1].velocity = Vector3::new(1.0, 0.0, 0.0);
        // 0.5 * (3 / 2 * (2, 0, 0) - (1, 0, 0)) = (1, 0, 0)
        assert_relative_eq!(store.start_velocity(0), Vector3::new(1.0, 0.0, 0.0));
        store.nodes_mut()[0].velocity = Vector3::new(0.0, 1.0, 0.0);
        assert_relative_eq!(store.end_velocity(1), Vector3::new(1.5, -0.5, 0.0));
        assert_eq!(store.start_velocity(1), Vector3::zeros());
        assert_eq!(store.end_velocity(0), Vector3::zeros());
    }
}
