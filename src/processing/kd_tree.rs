use kiddo::KdTree;
use kiddo::SquaredEuclidean;

/// Nearest-point lookup for chart hover readouts.
///
/// Time and value axes differ by orders of magnitude, so points are scaled
/// into the unit square of their bounding box before insertion.
pub struct HoverTree {
    tree: KdTree<f64, 2>,
    x_range: (f64, f64),
    y_range: (f64, f64),
    len: usize,
}

impl HoverTree {
    /// Build from `[x, y]` points; non-finite points are skipped. The item
    /// stored for each point is its index in `points`.
    pub fn build(points: &[[f64; 2]]) -> Self {
        let finite = || points.iter().filter(|p| p[0].is_finite() && p[1].is_finite());
        let x_range = bounds(finite().map(|p| p[0]));
        let y_range = bounds(finite().map(|p| p[1]));

        let mut tree: KdTree<f64, 2> = KdTree::new();
        let mut len = 0;
        for (i, p) in points.iter().enumerate() {
            if p[0].is_finite() && p[1].is_finite() {
                tree.add(&[scale(p[0], x_range), scale(p[1], y_range)], i as u64);
                len += 1;
            }
        }

        Self {
            tree,
            x_range,
            y_range,
            len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Index of the point nearest to `(qx, qy)` in the scaled space.
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<usize> {
        if self.is_empty() || !qx.is_finite() || !qy.is_finite() {
            return None;
        }
        let q = [scale(qx, self.x_range), scale(qy, self.y_range)];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&q);
        Some(result.item as usize)
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if lo.is_finite() {
        (lo, hi)
    } else {
        (0.0, 1.0)
    }
}

fn scale(v: f64, (lo, hi): (f64, f64)) -> f64 {
    let span = hi - lo;
    if span > 0.0 {
        (v - lo) / span
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_uses_scaled_distance() {
        // x spans a day in seconds, y a few units.
        let points = [[0.0, 0.0], [43_200.0, 5.0], [86_400.0, 0.0]];
        let tree = HoverTree::build(&points);
        assert_eq!(tree.nearest(40_000.0, 4.0), Some(1));
        assert_eq!(tree.nearest(86_000.0, 0.5), Some(2));
    }

    #[test]
    fn skips_non_finite_points() {
        let points = [[f64::NAN, 1.0], [2.0, 2.0]];
        let tree = HoverTree::build(&points);
        assert_eq!(tree.nearest(0.0, 0.0), Some(1));
    }

    #[test]
    fn empty_tree_has_no_nearest() {
        let tree = HoverTree::build(&[]);
        assert!(tree.is_empty());
        assert_eq!(tree.nearest(1.0, 1.0), None);
    }
}
