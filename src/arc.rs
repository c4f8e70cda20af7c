//! Conversion of elliptical arcs into cubic Bézier curves.
//!
//! SVG path data specifies elliptical arcs in terms of their endpoints.  To draw one, we
//! compute the center parameterization of the ellipse, and then approximate the arc with
//! cubic Bézier segments that each span less than 90 degrees.
//!
//! See [the SVG implementation notes on elliptical
//! arcs](https://www.w3.org/TR/SVG2/implnote.html#ArcImplementationNotes).

use std::f64::consts::{FRAC_PI_2, PI};

use crate::float_eq::ApproxEqFixed;
use crate::path_builder::{CubicBezierCurve, PathBuilder, Point};

/// Radii below this turn the arc into a straight line.
const MIN_RADIUS: f64 = 0.5;

/// Whether an arc's sweep should be >= 180 degrees, or smaller.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LargeArc(pub bool);

/// Angular direction in which an arc is drawn.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Sweep {
    Negative,
    Positive,
}

/// Result of converting an arc from endpoint to center parameterization.
///
/// Out of range parameters may see an arc omitted or treated as a line.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ArcParameterization {
    /// Center parameterization of the arc.
    CenterParameters {
        /// Center of the ellipse.
        center: Point,
        /// Radii of the ellipse (corrected).
        radii: (f64, f64),
        /// Angle of the start point, in radians.
        theta1: f64,
        /// Angle from the start point to the end point, in radians.  Positive for
        /// `Sweep::Positive` and negative for `Sweep::Negative`.
        delta_theta: f64,
    },
    /// Treat the arc as a line to the end point.
    LineTo,
    /// Omit the arc.
    Omit,
}

/// "a" command for paths; describes an elliptical arc in terms of its endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipticalArc {
    /// The (x-axis, y-axis) radii for the ellipse.
    pub r: (f64, f64),
    /// The rotation angle in degrees for the ellipse's x-axis
    /// relative to the x-axis of the user coordinate system.
    pub x_axis_rotation: f64,
    /// Flag indicating whether the arc sweep should be
    /// greater than or equal to 180 degrees, or smaller than 180 degrees.
    pub large_arc: LargeArc,
    /// Flag indicating the angular direction in which the arc is drawn.
    pub sweep: Sweep,
    /// Start point of this path segment.
    pub from: Point,
    /// End point of this path segment.
    pub to: Point,
}

impl EllipticalArc {
    /// Calculates a center parameterization from the endpoint parameterization.
    ///
    /// Radii may be adjusted if there is no solution.
    pub fn center_parameterization(&self) -> ArcParameterization {
        let Self {
            r: (rx, ry),
            x_axis_rotation,
            large_arc,
            sweep,
            from,
            to,
        } = *self;

        // Coincident endpoints draw nothing.
        if from.approx_eq_fixed(to) {
            return ArcParameterization::Omit;
        }

        // Ensure radii are positive, and large enough to be worth an ellipse.
        let mut rx = rx.abs();
        let mut ry = ry.abs();
        if rx < MIN_RADIUS || ry < MIN_RADIUS {
            return ArcParameterization::LineTo;
        }

        let is_large_arc = large_arc.0;
        let is_positive_sweep = sweep == Sweep::Positive;

        let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();

        // The equations simplify after a translation which places the origin at the
        // midpoint of the line joining the endpoints, followed by a rotation to line up
        // the coordinate axes with the axes of the ellipse.  All transformed coordinates
        // are written with a trailing underscore.
        let mid_x = (from.x - to.x) / 2.0;
        let mid_y = (from.y - to.y) / 2.0;
        let x1_ = cos_phi * mid_x + sin_phi * mid_y;
        let y1_ = cos_phi * mid_y - sin_phi * mid_x;

        let x1_2 = x1_ * x1_;
        let y1_2 = y1_ * y1_;

        // If the radii are not large enough to span the endpoints, scale up the ellipse
        // uniformly until there is exactly one solution.
        let lambda = x1_2 / (rx * rx) + y1_2 / (ry * ry);
        if lambda > 1.0 {
            let lambda_root = lambda.sqrt();
            rx *= lambda_root;
            ry *= lambda_root;
        }

        let rx2 = rx * rx;
        let ry2 = ry * ry;

        // Compute the transformed center (cx', cy').
        let c = rx2 * ry2 - rx2 * y1_2 - ry2 * x1_2;

        let (cx_, cy_) = if c < 0.0 {
            // Only possible through rounding after the scaling above.  Scale the radii
            // again so that c == 0, which puts the center at the midpoint.
            let scale = (1.0 - c / (rx2 * ry2)).sqrt();
            rx *= scale;
            ry *= scale;

            (0.0, 0.0)
        } else {
            let mut k = (c / (rx2 * y1_2 + ry2 * x1_2)).sqrt();
            if is_large_arc == is_positive_sweep {
                k = -k;
            }

            (k * rx * y1_ / ry, -k * ry * x1_ / rx)
        };

        // Compute the center (cx, cy).
        let center = Point::new(
            cos_phi * cx_ - sin_phi * cy_ + (from.x + to.x) / 2.0,
            sin_phi * cx_ + cos_phi * cy_ + (from.y + to.y) / 2.0,
        );

        // Start angle θ1, in [0, 2π).
        let start_angle = ((y1_ - cy_) / ry).atan2((x1_ - cx_) / rx);
        let theta1 = if start_angle < 0.0 {
            start_angle + 2.0 * PI
        } else {
            start_angle
        };

        // Total delta angle Δθ, with the sign given by the sweep direction.
        let end_angle = ((-y1_ - cy_) / ry).atan2((-x1_ - cx_) / rx);
        let mut delta_theta = if end_angle < start_angle {
            2.0 * PI - start_angle + end_angle
        } else {
            end_angle - start_angle
        };

        if is_positive_sweep {
            if delta_theta < 0.0 {
                delta_theta += 2.0 * PI;
            }
        } else if delta_theta > 0.0 {
            delta_theta -= 2.0 * PI;
        }

        ArcParameterization::CenterParameters {
            center,
            radii: (rx, ry),
            theta1,
            delta_theta,
        }
    }

    /// Approximates the arc with cubic Bézier segments of less than 90 degrees each.
    ///
    /// Returns an empty vector if the arc has to be omitted or drawn as a line; use
    /// [`EllipticalArc::center_parameterization`] to tell those cases apart.
    pub fn to_curves(&self) -> Vec<CubicBezierCurve> {
        match self.center_parameterization() {
            ArcParameterization::CenterParameters {
                center,
                radii,
                theta1,
                delta_theta,
            } => arc_segments(self.from, center, radii, self.x_axis_rotation, theta1, delta_theta),

            ArcParameterization::LineTo | ArcParameterization::Omit => Vec::new(),
        }
    }

    /// Appends the commands that draw this arc to `builder`.
    ///
    /// Returns the second control point of the last curve, if any curves were added.
    pub fn append_to(&self, builder: &mut PathBuilder) -> Option<Point> {
        match self.center_parameterization() {
            ArcParameterization::CenterParameters {
                center,
                radii,
                theta1,
                delta_theta,
            } => {
                let curves = arc_segments(
                    self.from,
                    center,
                    radii,
                    self.x_axis_rotation,
                    theta1,
                    delta_theta,
                );
                for curve in &curves {
                    builder.curve_to(curve.pt1, curve.pt2, curve.to);
                }
                curves.last().map(|curve| curve.pt2)
            }

            ArcParameterization::LineTo => {
                builder.line_to(self.to);
                None
            }

            ArcParameterization::Omit => None,
        }
    }
}

/// Splits an arc given by its center parameterization into cubic Bézier curves.
///
/// The number of segments is one more than the number of whole quarter turns in
/// `delta_theta`, so no segment spans 90 degrees or more.  Each segment's control
/// points lie along the tangents at its ends, at a distance of
/// `4/3 · (1 − cos(δ/2)) / sin(δ/2)` times the radius.
///
/// The first segment starts exactly at `from`; each following segment starts at the
/// end point of the previous one.
fn arc_segments(
    from: Point,
    center: Point,
    radii: (f64, f64),
    x_axis_rotation: f64,
    theta1: f64,
    delta_theta: f64,
) -> Vec<CubicBezierCurve> {
    let (rx, ry) = radii;
    let (sin_phi, cos_phi) = x_axis_rotation.to_radians().sin_cos();

    // A NaN delta gives 0 here, and NaN points below.
    let n_segs = (delta_theta / FRAC_PI_2).abs() as u32 + 1;
    let d_theta = delta_theta / f64::from(n_segs);

    let bcp = 4.0 / 3.0 * (1.0 - (d_theta / 2.0).cos()) / (d_theta / 2.0).sin();

    let cos_phi_rx = cos_phi * rx;
    let cos_phi_ry = cos_phi * ry;
    let sin_phi_rx = sin_phi * rx;
    let sin_phi_ry = sin_phi * ry;

    let mut start = from;
    let mut theta = theta1;
    let (mut sin_th0, mut cos_th0) = theta.sin_cos();

    let mut curves = Vec::with_capacity(n_segs as usize);

    for _ in 0..n_segs {
        let theta2 = theta + d_theta;
        let (sin_th1, cos_th1) = theta2.sin_cos();

        let pt1 = Point::new(
            start.x - bcp * (cos_phi_rx * sin_th0 + sin_phi_ry * cos_th0),
            start.y + bcp * (cos_phi_ry * cos_th0 - sin_phi_rx * sin_th0),
        );

        let to = Point::new(
            center.x + cos_phi_rx * cos_th1 - sin_phi_ry * sin_th1,
            center.y + sin_phi_rx * cos_th1 + cos_phi_ry * sin_th1,
        );

        let pt2 = Point::new(
            to.x + bcp * (cos_phi_rx * sin_th1 + sin_phi_ry * cos_th1),
            to.y + bcp * (sin_phi_rx * sin_th1 - cos_phi_ry * cos_th1),
        );

        curves.push(CubicBezierCurve { pt1, pt2, to });

        start = to;
        theta = theta2;
        sin_th0 = sin_th1;
        cos_th0 = cos_th1;
    }

    curves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assert_approx_eq_fixed;

    fn arc(rx: f64, ry: f64, rotation: f64, large: bool, positive: bool, from: (f64, f64), to: (f64, f64)) -> EllipticalArc {
        EllipticalArc {
            r: (rx, ry),
            x_axis_rotation: rotation,
            large_arc: LargeArc(large),
            sweep: if positive { Sweep::Positive } else { Sweep::Negative },
            from: from.into(),
            to: to.into(),
        }
    }

    fn assert_point(p: Point, x: f64, y: f64) {
        assert_approx_eq_fixed!(p.x, x);
        assert_approx_eq_fixed!(p.y, y);
    }

    // Evaluates the curve at t.
    fn curve_point(from: Point, c: &CubicBezierCurve, t: f64) -> Point {
        let mt = 1.0 - t;
        let a = mt * mt * mt;
        let b = 3.0 * mt * mt * t;
        let cc = 3.0 * mt * t * t;
        let d = t * t * t;
        Point::new(
            a * from.x + b * c.pt1.x + cc * c.pt2.x + d * c.to.x,
            a * from.y + b * c.pt1.y + cc * c.pt2.y + d * c.to.y,
        )
    }

    #[test]
    fn coincident_endpoints_are_omitted() {
        let a = arc(5.0, 5.0, 0.0, false, true, (0.0, 0.0), (0.0, 0.0));
        assert_eq!(a.center_parameterization(), ArcParameterization::Omit);

        let a = arc(5.0, 5.0, 0.0, false, true, (0.0, 0.0), (0.001, -0.001));
        assert_eq!(a.center_parameterization(), ArcParameterization::Omit);

        let mut builder = PathBuilder::default();
        assert_eq!(a.append_to(&mut builder), None);
        assert!(builder.is_empty());
    }

    #[test]
    fn small_radii_become_a_line() {
        let a = arc(0.1, 0.1, 0.0, false, true, (0.0, 0.0), (10.0, 10.0));
        assert_eq!(a.center_parameterization(), ArcParameterization::LineTo);

        let a = arc(20.0, 0.4, 0.0, false, true, (0.0, 0.0), (10.0, 10.0));
        assert_eq!(a.center_parameterization(), ArcParameterization::LineTo);

        let mut builder = PathBuilder::default();
        assert_eq!(a.append_to(&mut builder), None);
        let program = builder.into_program();
        assert_eq!(program.points(), &[Point::new(10.0, 10.0)]);
    }

    #[test]
    fn semicircle() {
        let a = arc(5.0, 5.0, 0.0, false, true, (0.0, 0.0), (10.0, 0.0));

        match a.center_parameterization() {
            ArcParameterization::CenterParameters { center, radii, theta1, delta_theta } => {
                assert_point(center, 5.0, 0.0);
                assert_eq!(radii, (5.0, 5.0));
                assert_approx_eq_fixed!(theta1, PI);
                assert_approx_eq_fixed!(delta_theta, PI);
            }
            p => panic!("unexpected parameterization {p:?}"),
        }

        // Exactly two quarter turns, so one extra segment keeps each below 90 degrees.
        let curves = a.to_curves();
        assert_eq!(curves.len(), 3);
        assert_point(curves[0].to, 2.5, -4.330127);
        assert_point(curves[1].to, 7.5, -4.330127);
        assert_point(curves[2].to, 10.0, 0.0);
    }

    #[test]
    fn negative_sweep_goes_the_other_way() {
        let a = arc(5.0, 5.0, 0.0, false, false, (0.0, 0.0), (10.0, 0.0));

        match a.center_parameterization() {
            ArcParameterization::CenterParameters { delta_theta, .. } => {
                assert_approx_eq_fixed!(delta_theta, -PI);
            }
            p => panic!("unexpected parameterization {p:?}"),
        }

        let curves = a.to_curves();
        assert_eq!(curves.len(), 3);
        assert_point(curves[0].to, 2.5, 4.330127);
        assert_point(curves[2].to, 10.0, 0.0);
    }

    #[test]
    fn negative_radii_are_mirrored() {
        let a = arc(-5.0, -5.0, 0.0, false, true, (0.0, 0.0), (10.0, 0.0));
        let b = arc(5.0, 5.0, 0.0, false, true, (0.0, 0.0), (10.0, 0.0));
        assert_eq!(a.to_curves(), b.to_curves());
    }

    #[test]
    fn radii_too_small_are_scaled_up() {
        let a = arc(1.0, 1.0, 0.0, false, true, (0.0, 0.0), (10.0, 0.0));

        match a.center_parameterization() {
            ArcParameterization::CenterParameters { center, radii, .. } => {
                assert_point(center, 5.0, 0.0);
                assert_approx_eq_fixed!(radii.0, 5.0);
                assert_approx_eq_fixed!(radii.1, 5.0);
            }
            p => panic!("unexpected parameterization {p:?}"),
        }
    }

    #[test]
    fn large_arc_picks_the_other_center() {
        // Both endpoints are on the circle of radius 10 around the origin.
        let small = arc(10.0, 10.0, 0.0, false, true, (10.0, 0.0), (6.0, 8.0));
        let large = arc(10.0, 10.0, 0.0, true, true, (10.0, 0.0), (6.0, 8.0));

        match (small.center_parameterization(), large.center_parameterization()) {
            (
                ArcParameterization::CenterParameters { center: c1, delta_theta: d1, .. },
                ArcParameterization::CenterParameters { center: c2, delta_theta: d2, .. },
            ) => {
                assert_point(c1, 0.0, 0.0);
                assert_point(c2, 16.0, 8.0);
                assert_approx_eq_fixed!(d1, 0.9272952);
                assert_approx_eq_fixed!(d2, 2.0 * PI - 0.9272952);
            }
            p => panic!("unexpected parameterizations {p:?}"),
        }

        assert_eq!(small.to_curves().len(), 1);
        assert_eq!(large.to_curves().len(), 4);
    }

    #[test]
    fn rounding_after_scaling_puts_center_at_midpoint() {
        // The radii get scaled up to span the endpoints exactly, and rounding then
        // leaves the discriminant slightly below zero.
        let a = arc(0.6, 0.6, 30.0, false, true, (0.0, 0.0), (1.3, 0.7));

        match a.center_parameterization() {
            ArcParameterization::CenterParameters { center, radii, delta_theta, .. } => {
                assert_point(center, 0.65, 0.35);

                let half_chord = (0.65_f64 * 0.65 + 0.35 * 0.35).sqrt();
                assert_approx_eq_fixed!(radii.0, half_chord);
                assert_approx_eq_fixed!(radii.1, half_chord);
                assert_approx_eq_fixed!(delta_theta, PI);
            }
            p => panic!("unexpected parameterization {p:?}"),
        }

        let curves = a.to_curves();
        assert!(!curves.is_empty());
        assert_point(curves[curves.len() - 1].to, 1.3, 0.7);
    }

    #[test]
    fn nearly_full_circle_needs_four_segments() {
        let a = arc(5.0, 5.0, 0.0, true, true, (0.0, 0.0), (0.1, 0.0));
        let curves = a.to_curves();
        assert_eq!(curves.len(), 4);
        assert_point(curves[3].to, 0.1, 0.0);
    }

    #[test]
    fn curves_stay_on_the_ellipse() {
        let a = arc(20.0, 10.0, 30.0, false, true, (0.0, 0.0), (25.0, 15.0));

        let (center, radii) = match a.center_parameterization() {
            ArcParameterization::CenterParameters { center, radii, .. } => (center, radii),
            p => panic!("unexpected parameterization {p:?}"),
        };

        let (sin_phi, cos_phi) = 30.0_f64.to_radians().sin_cos();

        let mut start = a.from;
        for curve in a.to_curves() {
            for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
                let p = curve_point(start, &curve, t);

                // Back into the ellipse's frame, where it is a unit circle.
                let dx = p.x - center.x;
                let dy = p.y - center.y;
                let u = (cos_phi * dx + sin_phi * dy) / radii.0;
                let v = (cos_phi * dy - sin_phi * dx) / radii.1;

                assert!(((u * u + v * v).sqrt() - 1.0).abs() < 0.001);
            }
            start = curve.to;
        }

        assert_point(start, 25.0, 15.0);
    }

    #[test]
    fn appends_curves_and_returns_last_control_point() {
        let a = arc(5.0, 5.0, 0.0, false, true, (0.0, 0.0), (10.0, 0.0));
        let curves = a.to_curves();

        let mut builder = PathBuilder::default();
        let last_control = a.append_to(&mut builder);

        assert_eq!(last_control, Some(curves[2].pt2));
        assert_eq!(builder.len(), 3);
    }
}
