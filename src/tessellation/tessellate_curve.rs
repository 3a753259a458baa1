use tracing::trace;

use crate::error::{Result, TessellationError};
use crate::math::Point3;
use crate::spline::Curve;

use super::{Polyline, TessellationParams};

/// Deepest bisection applied to a single starting step.
const MAX_DEPTH: u32 = 16;

/// Tessellates a curve into a polyline.
///
/// Sampling starts from `min_segments` uniform steps over the curve's domain.
/// A step is bisected while the curve at its parameter midpoint lies further
/// than `tolerance` from the chord midpoint, until `max_segments` is reached.
pub struct TessellateCurve {
    params: TessellationParams,
}

impl TessellateCurve {
    /// Creates a new `TessellateCurve` operation.
    #[must_use]
    pub fn new(params: TessellationParams) -> Self {
        Self { params }
    }

    /// Executes the tessellation, returning a polyline.
    ///
    /// The first and last vertices are the curve evaluated at the ends of its
    /// domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters are invalid or the curve cannot be
    /// evaluated.
    pub fn execute<C: Curve + ?Sized>(&self, curve: &C) -> Result<Polyline> {
        self.validate()?;
        let domain = curve.domain();
        let steps = self.params.min_segments;
        let mut budget = self.params.max_segments - steps;

        let mut points = Vec::with_capacity(steps + 1);
        let mut t0 = domain.t_min;
        let mut p0 = curve.evaluate(t0)?;
        points.push(p0);
        for i in 1..=steps {
            let t1 = if i == steps {
                domain.t_max
            } else {
                #[allow(clippy::cast_precision_loss)]
                let f = i as f64 / steps as f64;
                domain.t_min + (domain.t_max - domain.t_min) * f
            };
            let p1 = curve.evaluate(t1)?;
            self.refine(curve, (t0, p0), (t1, p1), 0, &mut budget, &mut points)?;
            t0 = t1;
            p0 = p1;
        }
        trace!(segments = points.len() - 1, "curve tessellated");
        Ok(Polyline { points })
    }

    /// Pushes the end of the step `start..end`, bisecting first if needed.
    fn refine<C: Curve + ?Sized>(
        &self,
        curve: &C,
        start: (f64, Point3),
        end: (f64, Point3),
        depth: u32,
        budget: &mut usize,
        points: &mut Vec<Point3>,
    ) -> Result<()> {
        if *budget > 0 && depth < MAX_DEPTH {
            let tm = 0.5 * (start.0 + end.0);
            let pm = curve.evaluate(tm)?;
            let chord_mid = nalgebra::center(&start.1, &end.1);
            if (pm - chord_mid).norm() > self.params.tolerance {
                *budget -= 1;
                self.refine(curve, start, (tm, pm), depth + 1, budget, points)?;
                return self.refine(curve, (tm, pm), end, depth + 1, budget, points);
            }
        }
        points.push(end.1);
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let p = &self.params;
        if !(p.tolerance.is_finite() && p.tolerance > 0.0) {
            return Err(TessellationError::InvalidParameters(format!(
                "tolerance must be positive, got {}",
                p.tolerance
            ))
            .into());
        }
        if p.min_segments == 0 {
            return Err(
                TessellationError::InvalidParameters("min_segments must be at least 1".into())
                    .into(),
            );
        }
        if p.max_segments < p.min_segments {
            return Err(TessellationError::InvalidParameters(format!(
                "max_segments ({}) is below min_segments ({})",
                p.max_segments, p.min_segments
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::{EvaluationError, SplineError};
    use crate::math::Vector3;
    use crate::spline::{CurveDomain, DistanceSpline, TimeSpline};
    use approx::assert_relative_eq;

    /// Straight line from the origin along x, parameterized over `[2, 4]`.
    struct Ramp;

    impl Curve for Ramp {
        fn evaluate(&self, t: f64) -> Result<Point3> {
            let domain = self.domain();
            if !(domain.t_min..=domain.t_max).contains(&t) {
                return Err(EvaluationError::ParameterOutOfRange {
                    parameter: "t",
                    value: t,
                    min: domain.t_min,
                    max: domain.t_max,
                }
                .into());
            }
            Ok(Point3::new(3.0 * (t - 2.0), 0.0, 0.0))
        }

        fn tangent(&self, _t: f64) -> Result<Vector3> {
            Ok(Vector3::new(3.0, 0.0, 0.0))
        }

        fn domain(&self) -> CurveDomain {
            CurveDomain::new(2.0, 4.0)
        }

        fn length(&self) -> f64 {
            6.0
        }
    }

    fn bend() -> DistanceSpline {
        DistanceSpline::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
            Point3::new(10.0, 10.0, 0.0),
            Point3::new(20.0, 10.0, 5.0),
        ])
        .unwrap()
    }

    #[test]
    fn polyline_starts_and_ends_on_curve() {
        let spline = bend();
        let line = TessellateCurve::new(TessellationParams::default())
            .execute(&spline)
            .unwrap();
        assert_relative_eq!(line.points[0], Point3::new(0.0, 0.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(
            *line.points.last().unwrap(),
            Point3::new(20.0, 10.0, 5.0),
            epsilon = 1e-9
        );
    }

    #[test]
    fn straight_path_keeps_minimum_segments() {
        let spline: DistanceSpline = DistanceSpline::from_points([
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(10.0, 0.0, 0.0),
        ])
        .unwrap();
        let line = TessellateCurve::new(TessellationParams::default())
            .execute(&spline)
            .unwrap();
        assert_eq!(line.segment_count(), 4);
        assert_relative_eq!(line.length(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn tighter_tolerance_adds_segments() {
        let spline = bend();
        let coarse = TessellateCurve::new(TessellationParams {
            tolerance: 1.0,
            ..TessellationParams::default()
        })
        .execute(&spline)
        .unwrap();
        let fine = TessellateCurve::new(TessellationParams {
            tolerance: 1e-3,
            ..TessellationParams::default()
        })
        .execute(&spline)
        .unwrap();
        assert!(fine.segment_count() > coarse.segment_count());
        assert!(fine.segment_count() <= 256);
    }

    #[test]
    fn segment_budget_is_respected() {
        let spline = bend();
        let line = TessellateCurve::new(TessellationParams {
            tolerance: 1e-9,
            min_segments: 2,
            max_segments: 10,
        })
        .execute(&spline)
        .unwrap();
        assert_eq!(line.segment_count(), 10);
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let spline = bend();
        for params in [
            TessellationParams {
                tolerance: 0.0,
                ..TessellationParams::default()
            },
            TessellationParams {
                min_segments: 0,
                ..TessellationParams::default()
            },
            TessellationParams {
                min_segments: 8,
                max_segments: 4,
                ..TessellationParams::default()
            },
        ] {
            assert!(matches!(
                TessellateCurve::new(params).execute(&spline),
                Err(SplineError::Tessellation(TessellationError::InvalidParameters(_)))
            ));
        }
    }

    #[test]
    fn node_store_tessellates_like_its_spline() {
        let spline = bend();
        let op = TessellateCurve::new(TessellationParams::default());
        let from_spline = op.execute(&spline).unwrap();
        let from_store = op.execute(spline.store()).unwrap();
        assert_eq!(from_store.points, from_spline.points);
        assert_relative_eq!(spline.store().length(), spline.total_length());
    }

    #[test]
    fn custom_domain_is_sampled_end_to_end() {
        let line = TessellateCurve::new(TessellationParams::default())
            .execute(&Ramp as &dyn Curve)
            .unwrap();
        assert_eq!(line.segment_count(), 4);
        assert_relative_eq!(line.points[0], Point3::origin());
        assert_relative_eq!(line.points[2], Point3::new(3.0, 0.0, 0.0), epsilon = 1e-12);
        assert_relative_eq!(*line.points.last().unwrap(), Point3::new(6.0, 0.0, 0.0));
        assert_relative_eq!(line.length(), Ramp.length(), epsilon = 1e-12);
    }

    #[test]
    fn unbuilt_curve_propagates_error() {
        let mut spline: TimeSpline = TimeSpline::new();
        spline.add_node(Point3::origin(), 0.0).unwrap();
        spline.add_node(Point3::new(1.0, 0.0, 0.0), 1.0).unwrap();
        assert!(matches!(
            TessellateCurve::new(TessellationParams::default()).execute(&spline),
            Err(SplineError::Evaluation(EvaluationError::NotBuilt))
        ));
    }
}
