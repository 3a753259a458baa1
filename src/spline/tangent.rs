//! Tangent passes over a [`NodeStore`].
//!
//! A [`TangentStrategy`] decides which passes a spline's `build` runs. The
//! passes themselves are free functions so every spline variant can reuse
//! them.

use std::fmt::Debug;

use tracing::debug;

use crate::math::{normalize_or_zero, TOLERANCE};

use super::NodeStore;

/// Computes node tangents for a store.
///
/// Strategies are small value types; splines are generic over them so the
/// choice is resolved at compile time.
pub trait TangentStrategy: Debug + Clone + Copy + Default {
    /// Fills in the tangent of every node. The store holds at least two nodes.
    fn build(&self, store: &mut NodeStore);
}

/// Angle-bisector tangents with Hermite boundary conditions at both ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bisector;

impl TangentStrategy for Bisector {
    fn build(&self, store: &mut NodeStore) {
        bisector_tangents(store);
    }
}

/// Bisector tangents, optionally followed by smoothing passes at build time.
///
/// The default runs none, leaving smoothing to an explicit `smooth()` call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Smoothed {
    /// Number of smoothing passes run after the bisector pass.
    pub passes: u32,
}

impl TangentStrategy for Smoothed {
    fn build(&self, store: &mut NodeStore) {
        bisector_tangents(store);
        if store.len() >= 3 {
            for _ in 0..self.passes {
                smooth_tangents(store);
            }
        }
    }
}

/// Assigns bisector tangents to interior nodes and boundary tangents to the ends.
///
/// Interior tangents are the unit bisector of the incoming and outgoing chord
/// directions. The end tangents depend on their neighbour's tangent, so they
/// are computed last.
pub(crate) fn bisector_tangents(store: &mut NodeStore) {
    let n = store.len();
    if n < 2 {
        return;
    }
    let nodes = store.nodes_mut();
    for node in nodes.iter_mut() {
        node.velocity.fill(0.0);
    }
    for i in 1..n - 1 {
        let next = normalize_or_zero(&(nodes[i + 1].position - nodes[i].position));
        let prev = normalize_or_zero(&(nodes[i - 1].position - nodes[i].position));
        nodes[i].velocity = normalize_or_zero(&(next - prev));
    }

    let start = store.start_velocity(0);
    store.nodes_mut()[0].velocity = start;
    let end = store.end_velocity(n - 1);
    store.nodes_mut()[n - 1].velocity = end;
    debug!(nodes = n, "bisector tangents built");
}

/// Replaces each interior tangent with the interval-weighted blend of the
/// arriving and leaving boundary tangents.
///
/// Writes trail the reads by one node, so every blend is computed from the
/// tangents as they were before the pass.
pub(crate) fn smooth_tangents(store: &mut NodeStore) {
    let n = store.len();
    if n < 3 {
        return;
    }
    let mut carried = store.start_velocity(0);
    for i in 1..n - 1 {
        let before = store.nodes()[i - 1].interval;
        let after = store.nodes()[i].interval;
        let span = before + after;
        let blended = if span < TOLERANCE {
            store.nodes()[i].velocity
        } else {
            (store.end_velocity(i) * after + store.start_velocity(i) * before) / span
        };
        store.nodes_mut()[i - 1].velocity = carried;
        carried = blended;
    }
    let end = store.end_velocity(n - 1);
    let nodes = store.nodes_mut();
    nodes[n - 1].velocity = end;
    nodes[n - 2].velocity = carried;
    debug!(nodes = n, "tangents smoothed");
}

/// Damps interior tangents where the speed entering a node differs from the
/// speed leaving it.
///
/// Each tangent is scaled by `4·r0·r1 / (r0 + r1)²`, where `r0` and `r1` are
/// chord length per interval on either side. The factor is 1 for matching
/// speeds and falls toward 0 as they diverge.
pub(crate) fn constrain_tangents(store: &mut NodeStore) {
    let n = store.len();
    if n < 3 {
        return;
    }
    let nodes = store.nodes_mut();
    for i in 1..n - 1 {
        let (before, after) = (nodes[i - 1].interval, nodes[i].interval);
        if before < TOLERANCE || after < TOLERANCE {
            continue;
        }
        let r0 = (nodes[i].position - nodes[i - 1].position).norm() / before;
        let r1 = (nodes[i + 1].position - nodes[i].position).norm() / after;
        let sum = r0 + r1;
        if sum < TOLERANCE {
            continue;
        }
        nodes[i].velocity *= 4.0 * r0 * r1 / (sum * sum);
    }
    debug!(nodes = n, "tangents constrained");
}
