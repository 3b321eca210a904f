//! Pure geometry helpers for arrow fans and ellipse attachment.

pub type Unit = euclid::UnknownUnit;

pub type Point = euclid::Point2D<f64, Unit>;
pub type Size = euclid::Size2D<f64, Unit>;

pub fn point(x: f64, y: f64) -> Point {
    euclid::point2(x, y)
}

/// Fan-outs above this collapse to a `first few … last few` summary.
pub const ELLIPSIS_THRESHOLD: usize = 8;

/// Arrows kept on each side of a collapsed fan.
const ELLIPSIS_KEEP: usize = 2;

/// Preferred intra-cluster spacing for a collapsed fan, in pixels.
const CLUSTER_GAP: f64 = 14.0;

/// Fraction of an edge reserved for arrow attachment when corners must stay
/// clear.
const CENTRAL_BAND: f64 = 0.6;

/// Distributes `n` x-positions across `[left, right]`: none, the midpoint,
/// the two endpoints, or an even spread.
pub fn distribute_points(n: usize, left: f64, right: f64) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![(left + right) / 2.0],
        2 => vec![left, right],
        _ => {
            let step = (right - left) / (n - 1) as f64;
            (0..n).map(|i| left + step * i as f64).collect()
        }
    }
}

/// Shrinks `[left, right]` to its central band.
pub fn central_band(left: f64, right: f64) -> (f64, f64) {
    let margin = (right - left) * (1.0 - CENTRAL_BAND) / 2.0;
    (left + margin, right - margin)
}

/// Distributes `n` positions inside the central band of `[left, right]`,
/// keeping arrows away from box corners.
pub fn distribute_in_band(n: usize, left: f64, right: f64) -> Vec<f64> {
    let (l, r) = central_band(left, right);
    distribute_points(n, l, r)
}

/// A possibly collapsed arrow fan. `full_count` is always the true
/// cardinality; `positions` is what gets rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFan {
    pub positions: Vec<f64>,
    pub ellipsis_at: Option<f64>,
    pub full_count: usize,
}

impl ArrowFan {
    pub fn rendered(&self) -> usize {
        self.positions.len()
    }
}

/// Splits a fan of `n` arrows over the central band of `[left, right]`.
/// Small fans keep every arrow; larger fans keep two per side with a single
/// ellipsis glyph centered between the clusters. Cluster members sit
/// `CLUSTER_GAP` apart when the half-band allows it, else spread
/// proportionally.
pub fn ellipsis_split(n: usize, left: f64, right: f64) -> ArrowFan {
    let (l, r) = central_band(left, right);
    if n <= ELLIPSIS_THRESHOLD {
        return ArrowFan {
            positions: distribute_points(n, l, r),
            ellipsis_at: None,
            full_count: n,
        };
    }

    let mid = (l + r) / 2.0;
    let half = (mid - l).max(0.0);
    let wanted = CLUSTER_GAP * (ELLIPSIS_KEEP - 1) as f64;
    // Leave the quarter of the half-band next to the glyph empty.
    let gap = if wanted <= half * 0.75 {
        CLUSTER_GAP
    } else {
        half * 0.75 / (ELLIPSIS_KEEP - 1).max(1) as f64
    };

    let mut positions = Vec::with_capacity(ELLIPSIS_KEEP * 2);
    for i in 0..ELLIPSIS_KEEP {
        positions.push(l + gap * i as f64);
    }
    for i in (0..ELLIPSIS_KEEP).rev() {
        positions.push(r - gap * i as f64);
    }

    ArrowFan {
        positions,
        ellipsis_at: Some(mid),
        full_count: n,
    }
}

/// Where the ray from `from` toward the center of an ellipse crosses its
/// boundary. Derived from the implicit equation: scaling the center-relative
/// vector by `1/sqrt((dx/a)^2 + (dy/b)^2)` lands on the boundary.
pub fn ellipse_edge_intersection(from: Point, center: Point, width: f64, height: f64) -> Point {
    let a = width / 2.0;
    let b = height / 2.0;
    if a <= 0.0 || b <= 0.0 {
        return center;
    }
    let dx = from.x - center.x;
    let dy = from.y - center.y;
    let k = (dx / a).powi(2) + (dy / b).powi(2);
    if k <= f64::EPSILON {
        return center;
    }
    let scale = 1.0 / k.sqrt();
    point(center.x + dx * scale, center.y + dy * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distributes_edge_cases() {
        assert!(distribute_points(0, 0.0, 100.0).is_empty());
        assert_eq!(distribute_points(1, 0.0, 100.0), vec![50.0]);
        assert_eq!(distribute_points(2, 0.0, 100.0), vec![0.0, 100.0]);
        assert_eq!(
            distribute_points(5, 0.0, 100.0),
            vec![0.0, 25.0, 50.0, 75.0, 100.0]
        );
    }

    #[test]
    fn central_band_trims_both_sides() {
        let (l, r) = central_band(0.0, 200.0);
        assert_eq!(l, 40.0);
        assert_eq!(r, 160.0);
    }

    #[test]
    fn small_fans_do_not_collapse() {
        let fan = ellipsis_split(8, 0.0, 200.0);
        assert_eq!(fan.rendered(), 8);
        assert_eq!(fan.full_count, 8);
        assert!(fan.ellipsis_at.is_none());
    }

    #[test]
    fn large_fans_keep_two_per_side() {
        let fan = ellipsis_split(40, 0.0, 200.0);
        assert_eq!(fan.rendered(), 4);
        assert_eq!(fan.full_count, 40);
        let mid = fan.ellipsis_at.expect("glyph position");
        assert!(fan.positions[1] < mid && mid < fan.positions[2]);
        let gap = fan.positions[1] - fan.positions[0];
        assert!((gap - 14.0).abs() < 1e-9);
    }

    #[test]
    fn narrow_fans_fall_back_to_proportional_gaps() {
        let fan = ellipsis_split(20, 0.0, 20.0);
        assert_eq!(fan.rendered(), 4);
        let gap = fan.positions[1] - fan.positions[0];
        assert!(gap > 0.0 && gap < 14.0);
    }

    #[test]
    fn ellipse_intersections_on_axes() {
        let center = point(0.0, 0.0);
        let hit = ellipse_edge_intersection(point(0.0, -100.0), center, 80.0, 40.0);
        assert!((hit.x - 0.0).abs() < 1e-9);
        assert!((hit.y + 20.0).abs() < 1e-9);

        let hit = ellipse_edge_intersection(point(200.0, 0.0), center, 80.0, 40.0);
        assert!((hit.x - 40.0).abs() < 1e-9);
        assert!((hit.y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn ellipse_intersection_degenerates_to_center() {
        let center = point(10.0, 10.0);
        assert_eq!(
            ellipse_edge_intersection(center, center, 80.0, 40.0),
            center
        );
    }
}
