// Curve normalizer: canvas-space line segments -> physical-space depth profile
// for the ray-traced renderer. Pure and order-preserving; overlapping input
// segments pass through unchanged.

use crate::curve::{CanvasBounds, CurveData, PhysicalSegment};

/// Physical y range is [-PHYSICAL_HALF_HEIGHT, +PHYSICAL_HALF_HEIGHT].
pub const PHYSICAL_HALF_HEIGHT: f64 = 2.0;

/// Depth of a canvas point one full centerline-width away from the centerline.
pub const PHYSICAL_MAX_DEPTH: f64 = 1.0;

/// What the renderer gets when there is no curve: a flat mirror.
pub const FLAT_MIRROR: PhysicalSegment = PhysicalSegment { y_min: -0.4, y_max: 0.4, z0: 0.0, z1: 0.0, z2: 0.0 };

/// Convert the curve into physical segments, one per input segment.
/// No curve, or a curve with no segments, yields `[FLAT_MIRROR]`.
/// Bounds are not checked: `bounds.x == 0` gives non-finite depths.
pub fn normalize(curve: Option<&CurveData>) -> Vec<PhysicalSegment> {
    let Some(curve) = curve.filter(|c| !c.is_empty()) else {
        return vec![FLAT_MIRROR];
    };
    let b = &curve.bounds;

    curve
        .line_segments
        .iter()
        .map(|s| {
            let (y1, y2) = (physical_y(b, s.y1), physical_y(b, s.y2));
            let (d1, d2) = (depth(b, s.x1), depth(b, s.x2));
            // z0 belongs to whichever endpoint ends up at y_min
            let (y_min, y_max, z0, z2) = if y1 > y2 { (y2, y1, d2, d1) } else { (y1, y2, d1, d2) };
            PhysicalSegment { y_min, y_max, z0, z1: (z0 + z2) / 2.0, z2 }
        })
        .collect()
}

/// Linear map of [yTop, yBottom] onto [-H, +H].
#[inline]
fn physical_y(b: &CanvasBounds, y: f64) -> f64 {
    (y - b.y_top) / (b.y_bottom - b.y_top) * (2.0 * PHYSICAL_HALF_HEIGHT) - PHYSICAL_HALF_HEIGHT
}

/// Left of the centerline is negative (toward the viewer).
#[inline]
fn depth(b: &CanvasBounds, x: f64) -> f64 {
    -((b.x - x) / b.x) * PHYSICAL_MAX_DEPTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::LineSegment;

    fn bounds() -> CanvasBounds {
        CanvasBounds { x: 400.0, y_top: 50.0, y_bottom: 550.0 }
    }

    fn seg(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
        LineSegment { x1, y1, x2, y2 }
    }

    #[test]
    fn missing_or_empty_curve_is_flat_mirror() {
        let empty = CurveData { bounds: bounds(), line_segments: vec![] };
        assert_eq!(normalize(None), vec![FLAT_MIRROR]);
        assert_eq!(normalize(Some(&empty)), normalize(None));
        assert_eq!(
            FLAT_MIRROR,
            PhysicalSegment { y_min: -0.4, y_max: 0.4, z0: 0.0, z1: 0.0, z2: 0.0 }
        );
    }

    #[test]
    fn full_height_slanted_segment() {
        let curve = CurveData { bounds: bounds(), line_segments: vec![seg(400.0, 50.0, 300.0, 550.0)] };
        let out = normalize(Some(&curve));
        assert_eq!(out.len(), 1);
        let p = out[0];
        assert_eq!(p.y_min, -2.0);
        assert_eq!(p.y_max, 2.0);
        assert_eq!(p.z0, 0.0);
        assert_eq!(p.z1, -0.125);
        assert_eq!(p.z2, -0.25);
    }

    #[test]
    fn upside_down_segment_swaps_depths() {
        let curve = CurveData { bounds: bounds(), line_segments: vec![seg(300.0, 550.0, 400.0, 50.0)] };
        let p = normalize(Some(&curve))[0];
        assert_eq!((p.y_min, p.y_max), (-2.0, 2.0));
        assert_eq!((p.z0, p.z2), (0.0, -0.25));
    }

    #[test]
    fn right_of_centerline_is_positive_depth() {
        let curve = CurveData { bounds: bounds(), line_segments: vec![seg(500.0, 300.0, 600.0, 300.0)] };
        let p = normalize(Some(&curve))[0];
        assert_eq!((p.y_min, p.y_max), (0.0, 0.0));
        assert_eq!((p.z0, p.z1, p.z2), (0.25, 0.375, 0.5));
    }

    #[test]
    fn order_midpoint_and_interval_invariants() {
        let segments = vec![
            seg(120.0, 500.0, 380.0, 90.0),
            seg(410.0, 90.0, 433.0, 91.0),
            seg(77.0, 300.0, 640.0, 300.0),
            seg(400.0, 50.0, 390.0, 200.0),
            seg(10.0, 549.0, 790.0, 51.0),
        ];
        let curve = CurveData { bounds: bounds(), line_segments: segments.clone() };
        let out = normalize(Some(&curve));
        assert_eq!(out.len(), segments.len());
        for (p, s) in out.iter().zip(&segments) {
            assert!(p.y_min <= p.y_max);
            assert_eq!(p.z1, (p.z0 + p.z2) / 2.0);
            // order preserved: the segment's own y interval maps onto this one
            let (lo, hi) = s.y_interval();
            assert_eq!(p.y_min, physical_y(&bounds(), lo));
            assert_eq!(p.y_max, physical_y(&bounds(), hi));
        }
    }

    #[test]
    fn zero_centerline_is_not_an_error() {
        let curve = CurveData {
            bounds: CanvasBounds { x: 0.0, y_top: 0.0, y_bottom: 10.0 },
            line_segments: vec![seg(5.0, 0.0, 0.0, 10.0)],
        };
        let p = normalize(Some(&curve))[0];
        assert!(!p.z0.is_finite());
        assert!(p.z2.is_nan());
    }
}
