//! Cubic Hermite segment evaluation.
//!
//! A segment is defined by two endpoint positions `p0`, `p1` and two
//! endpoint tangents `v0`, `v1`. For a parameter `t`:
//!
//! ```text
//! P(t) = h00(t)·p0 + h10(t)·v0 + h01(t)·p1 + h11(t)·v1
//! ```
//!
//! with `h00 = 2t³ − 3t² + 1`, `h10 = t³ − 2t² + t`, `h01 = −2t³ + 3t²` and
//! `h11 = t³ − t²`. The functions are total over `t`; values outside `[0, 1]`
//! extrapolate the cubic.

use super::{Matrix4, Point3, Vector3, Vector4};

/// Coefficients of the Hermite basis, one row per basis function
/// (`h00`, `h10`, `h01`, `h11`), columns matching `[t³, t², t, 1]`.
fn basis_matrix() -> Matrix4 {
    Matrix4::new(
        2.0, -3.0, 0.0, 1.0, //
        1.0, -2.0, 1.0, 0.0, //
        -2.0, 3.0, 0.0, 0.0, //
        1.0, -1.0, 0.0, 0.0,
    )
}

/// Returns the four Hermite weights `[h00, h10, h01, h11]` at `t`.
#[must_use]
pub fn basis(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let monomial = Vector4::new(t2 * t, t2, t, 1.0);
    weights(&monomial)
}

/// Returns the derivatives of the four Hermite weights at `t`.
#[must_use]
pub fn basis_derivative(t: f64) -> [f64; 4] {
    let monomial = Vector4::new(3.0 * t * t, 2.0 * t, 1.0, 0.0);
    weights(&monomial)
}

fn weights(monomial: &Vector4) -> [f64; 4] {
    let w = basis_matrix() * monomial;
    [w[0], w[1], w[2], w[3]]
}

/// Evaluates the cubic Hermite segment at `t`.
#[must_use]
pub fn evaluate(p0: &Point3, v0: &Vector3, p1: &Point3, v1: &Vector3, t: f64) -> Point3 {
    let [h00, h10, h01, h11] = basis(t);
    Point3::from(p0.coords * h00 + v0 * h10 + p1.coords * h01 + v1 * h11)
}

/// Evaluates the first derivative of the cubic Hermite segment at `t`.
///
/// The result is expressed per unit of `t`, so `derivative(.., 0.0) == v0`
/// and `derivative(.., 1.0) == v1`.
#[must_use]
pub fn derivative(p0: &Point3, v0: &Vector3, p1: &Point3, v1: &Vector3, t: f64) -> Vector3 {
    let [d00, d10, d01, d11] = basis_derivative(t);
    p0.coords * d00 + v0 * d10 + p1.coords * d01 + v1 * d11
}
