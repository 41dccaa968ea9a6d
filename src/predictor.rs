// Candidate prediction: which target is the pointer heading toward?
// Triangle per target: A = motion start, B = latest sample, C = target.
// alpha is the angle at C; small alpha means C sits on the extension of A->B.

use crate::error::GeometryError;
use crate::registry::TargetPosition;
use crate::types::{MotionAnchor, Point, PredictorSettings};

/// Triangle geometry between the motion vector and one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleMetrics {
    /// Distance from the latest sample to the target.
    pub a: f64,
    /// Distance from the motion start to the target.
    pub b: f64,
    /// Length of the motion vector.
    pub c: f64,
    /// Angle at the target, in degrees.
    pub alpha: f64,
    pub start: Point,
    pub last: Point,
    pub target: Point,
}

impl TriangleMetrics {
    pub fn measure(start: Point, last: Point, target: Point) -> Result<Self, GeometryError> {
        if !(start.is_finite() && last.is_finite() && target.is_finite()) {
            return Err(GeometryError::NonFinite);
        }

        let a = last.distance(&target);
        let b = start.distance(&target);
        let c = start.distance(&last);
        if a == 0.0 || b == 0.0 {
            return Err(GeometryError::Degenerate);
        }

        // Law of cosines; rounding can push the ratio just past +/-1.
        let cos_alpha = ((a * a + b * b - c * c) / (2.0 * a * b)).clamp(-1.0, 1.0);
        let alpha = cos_alpha.acos().to_degrees();

        Ok(TriangleMetrics {
            a,
            b,
            c,
            alpha,
            start,
            last,
            target,
        })
    }

    /// Pointer got strictly closer and moves within `max_alignment_deg` of the target line.
    pub fn is_heading_toward(&self, max_alignment_deg: f64) -> bool {
        self.a < self.b && self.alpha < max_alignment_deg
    }
}

/// A target currently satisfying the alignment filter.
#[derive(Debug, Clone)]
pub struct Candidate<'a, T> {
    pub target: &'a T,
    /// Position of the target in registry order.
    pub index: usize,
    pub metrics: TriangleMetrics,
}

/// Endpoints of the motion vector for a window, per anchor mode.
pub fn motion_endpoints(window: &[Point], anchor: MotionAnchor) -> Option<(Point, Point)> {
    let last = *window.last()?;
    let start = match anchor {
        MotionAnchor::Window => window[0],
        MotionAnchor::RecentPair => window[window.len().saturating_sub(2)],
    };
    Some((start, last))
}

/// Rank targets by alignment with the pointer's motion. Best candidate first.
pub fn predict<'a, T>(
    window: &[Point],
    positions: &'a [TargetPosition<T>],
    settings: &PredictorSettings,
) -> Vec<Candidate<'a, T>> {
    let Some((start, last)) = motion_endpoints(window, settings.anchor) else {
        return Vec::new();
    };

    let mut candidates: Vec<Candidate<'a, T>> = positions
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let metrics = TriangleMetrics::measure(start, last, entry.position).ok()?;
            metrics
                .is_heading_toward(settings.max_alignment_deg)
                .then_some(Candidate {
                    target: &entry.target,
                    index,
                    metrics,
                })
        })
        .collect();

    // Stable: equal angles keep registry order.
    candidates.sort_by(|x, y| x.metrics.alpha.total_cmp(&y.metrics.alpha));
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn positions(points: &[(f64, f64)]) -> Vec<TargetPosition<usize>> {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| TargetPosition {
                target: i,
                position: Point::new(x, y),
            })
            .collect()
    }

    #[test]
    fn aligned_motion_selects_target() {
        let window = [Point::new(0.0, 0.0), Point::new(50.0, 0.0)];
        let targets = positions(&[(100.0, 0.0)]);

        let candidates = predict(&window, &targets, &PredictorSettings::default());
        assert_eq!(candidates.len(), 1);
        let m = candidates[0].metrics;
        assert_eq!(m.a, 50.0);
        assert_eq!(m.b, 100.0);
        assert_eq!(m.c, 50.0);
        assert!(m.alpha.abs() < 1e-9);
        assert_eq!(*candidates[0].target, 0);
    }

    #[test]
    fn perpendicular_motion_excluded() {
        let window = [Point::new(0.0, 0.0), Point::new(0.0, 50.0)];
        let targets = positions(&[(100.0, 0.0)]);

        let m = TriangleMetrics::measure(window[0], window[1], targets[0].position).unwrap();
        assert!(m.alpha > 25.0);
        assert!(predict(&window, &targets, &PredictorSettings::default()).is_empty());
    }

    #[test]
    fn receding_motion_excluded() {
        let window = [Point::new(50.0, 0.0), Point::new(0.0, 0.0)];
        let targets = positions(&[(-100.0, 0.0), (100.0, 0.0)]);

        let candidates = predict(&window, &targets, &PredictorSettings::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].index, 0);
    }

    #[test]
    fn ranks_by_alignment() {
        let window = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        // Slightly off-axis target first in registry order, exact one second.
        let targets = positions(&[(200.0, 8.0), (200.0, 0.0), (0.0, 200.0)]);

        let candidates = predict(&window, &targets, &PredictorSettings::default());
        let order: Vec<usize> = candidates.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![1, 0]);
    }

    #[test]
    fn equal_angles_keep_registry_order() {
        let window = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let targets = positions(&[(300.0, 0.0), (100.0, 0.0), (200.0, 0.0)]);

        let candidates = predict(&window, &targets, &PredictorSettings::default());
        let order: Vec<usize> = candidates.iter().map(|c| c.index).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn target_under_pointer_is_degenerate() {
        let start = Point::new(0.0, 0.0);
        let last = Point::new(10.0, 0.0);
        assert_eq!(
            TriangleMetrics::measure(start, last, last),
            Err(GeometryError::Degenerate)
        );
        assert_eq!(
            TriangleMetrics::measure(start, last, start),
            Err(GeometryError::Degenerate)
        );
    }

    #[test]
    fn non_finite_position_excluded() {
        let window = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let targets = positions(&[(f64::NAN, 0.0), (100.0, 0.0)]);

        let candidates = predict(&window, &targets, &PredictorSettings::default());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].index, 1);
    }

    #[test]
    fn empty_window_yields_nothing() {
        let targets = positions(&[(100.0, 0.0)]);
        assert!(predict(&[], &targets, &PredictorSettings::default()).is_empty());
    }

    #[test]
    fn recent_pair_anchor_uses_latest_segment() {
        // Long drift upward, then a final segment straight toward the target.
        let window = [
            Point::new(0.0, -100.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        ];
        let targets = positions(&[(100.0, 0.0)]);

        let whole = predict(&window, &targets, &PredictorSettings::default());
        assert!(whole.is_empty());

        let settings = PredictorSettings {
            anchor: MotionAnchor::RecentPair,
            ..Default::default()
        };
        let recent = predict(&window, &targets, &settings);
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn wider_alignment_admits_more() {
        let window = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
        let targets = positions(&[(20.0, 20.0)]);
        assert!(predict(&window, &targets, &PredictorSettings::default()).is_empty());

        let settings = PredictorSettings {
            max_alignment_deg: 30.0,
            ..Default::default()
        };
        assert_eq!(predict(&window, &targets, &settings).len(), 1);
    }

    fn coord() -> impl Strategy<Value = f64> {
        -1000.0f64..1000.0
    }

    fn point() -> impl Strategy<Value = Point> {
        (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
    }

    proptest! {
        /// A pointer that did not move cannot be heading anywhere.
        #[test]
        fn stationary_window_has_no_candidates(
            p in point(),
            extra in 0usize..5,
            targets in prop::collection::vec((coord(), coord()), 0..10)
        ) {
            let window = vec![p; extra + 1];
            let targets = positions(&targets);
            prop_assert!(predict(&window, &targets, &PredictorSettings::default()).is_empty());
        }

        /// alpha is always a real angle in [0, 180] for measurable triangles.
        #[test]
        fn alpha_stays_in_range(start in point(), last in point(), target in point()) {
            if let Ok(m) = TriangleMetrics::measure(start, last, target) {
                prop_assert!(!m.alpha.is_nan());
                prop_assert!((0.0..=180.0).contains(&m.alpha));
            }
        }

        /// Candidates come out sorted by alpha, ties in registry order.
        #[test]
        fn candidates_sorted_by_alpha(
            start in point(),
            last in point(),
            targets in prop::collection::vec((coord(), coord()), 0..20)
        ) {
            let window = [start, last];
            let targets = positions(&targets);
            let settings = PredictorSettings { max_alignment_deg: 180.0, ..Default::default() };
            let candidates = predict(&window, &targets, &settings);

            for pair in candidates.windows(2) {
                let (x, y) = (&pair[0], &pair[1]);
                prop_assert!(x.metrics.alpha <= y.metrics.alpha);
                if x.metrics.alpha == y.metrics.alpha {
                    prop_assert!(x.index < y.index);
                }
            }
            for c in &candidates {
                prop_assert!(c.metrics.a < c.metrics.b);
            }
        }
    }
}
