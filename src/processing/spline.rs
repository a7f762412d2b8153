use crate::error::AnalysisError;

/// Fewest points a cubic interpolating spline can be fitted through.
pub const MIN_SPLINE_POINTS: usize = 4;

/// Interpolating cubic spline through `(i, y[i])` for `i = 0..n`, with
/// not-a-knot end conditions (the third derivative is continuous at the
/// second and second-to-last knots). Reproduces any cubic polynomial exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    y: Vec<f64>,
    /// Second derivative at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    pub fn fit(y: &[f64]) -> Result<Self, AnalysisError> {
        let n = y.len();
        if n < MIN_SPLINE_POINTS {
            return Err(AnalysisError::InsufficientPoints {
                found: n,
                required: MIN_SPLINE_POINTS,
            });
        }

        // Unit knot spacing: m[i-1] + 4 m[i] + m[i+1] = d[i] for interior knots.
        let d: Vec<f64> = (0..n)
            .map(|i| {
                if i == 0 || i == n - 1 {
                    0.0
                } else {
                    6.0 * (y[i + 1] - 2.0 * y[i] + y[i - 1])
                }
            })
            .collect();

        // Substituting the not-a-knot rows (m0 = 2 m1 - m2 and its mirror)
        // leaves 6 m1 = d1 and 6 m[n-2] = d[n-2].
        let mut m = vec![0.0; n];
        m[1] = d[1] / 6.0;
        m[n - 2] = d[n - 2] / 6.0;

        // Tridiagonal solve (Thomas) for m[2..=n-3].
        if n > 4 {
            let lo = 2;
            let hi = n - 3;
            let len = hi - lo + 1;
            let mut c_prime = vec![0.0; len];
            let mut r_prime = vec![0.0; len];
            for k in 0..len {
                let i = lo + k;
                let mut rhs = d[i];
                if i == lo {
                    rhs -= m[1];
                }
                if i == hi {
                    rhs -= m[n - 2];
                }
                let (denom, prev_r) = if k == 0 {
                    (4.0, 0.0)
                } else {
                    (4.0 - c_prime[k - 1], r_prime[k - 1])
                };
                c_prime[k] = 1.0 / denom;
                r_prime[k] = (rhs - prev_r) / denom;
            }
            for k in (0..len).rev() {
                let next = if k + 1 < len { m[lo + k + 1] } else { 0.0 };
                m[lo + k] = r_prime[k] - c_prime[k] * next;
            }
        }

        m[0] = 2.0 * m[1] - m[2];
        m[n - 1] = 2.0 * m[n - 2] - m[n - 3];

        Ok(Self { y: y.to_vec(), m })
    }

    /// Evaluate at `x`, clamped to `[0, n - 1]`. Exact at the knots.
    pub fn eval(&self, x: f64) -> f64 {
        let last = (self.y.len() - 1) as f64;
        let x = x.clamp(0.0, last);
        let i = (x.floor() as usize).min(self.y.len() - 2);
        let t = x - i as f64;
        let s = 1.0 - t;
        self.y[i] * s
            + self.y[i + 1] * t
            + (s * s * s - s) * self.m[i] / 6.0
            + (t * t * t - t) * self.m[i + 1] / 6.0
    }

    /// `count` evenly spaced `[x, y]` samples spanning `[0, n - 1]`.
    pub fn sample(&self, count: usize) -> Vec<[f64; 2]> {
        let last = (self.y.len() - 1) as f64;
        (0..count)
            .map(|k| {
                let x = if k + 1 == count {
                    last
                } else if count > 1 {
                    last * k as f64 / (count - 1) as f64
                } else {
                    0.0
                };
                [x, self.eval(x)]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_through_every_knot() {
        let y = [3.0, -1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let spline = CubicSpline::fit(&y).unwrap();
        for (i, &v) in y.iter().enumerate() {
            assert_eq!(spline.eval(i as f64), v);
        }
    }

    #[test]
    fn reproduces_a_cubic() {
        let f = |x: f64| x * x * x - 2.0 * x * x + 0.5 * x + 1.0;
        for n in [4usize, 5, 6, 9] {
            let y: Vec<f64> = (0..n).map(|i| f(i as f64)).collect();
            let spline = CubicSpline::fit(&y).unwrap();
            for x in [0.25, 1.5, 2.75, (n - 1) as f64 - 0.5] {
                assert!((spline.eval(x) - f(x)).abs() < 1e-9, "n={n} x={x}");
            }
        }
    }

    #[test]
    fn sample_spans_the_index_range() {
        let spline = CubicSpline::fit(&[10.0, 20.0, 15.0, 25.0]).unwrap();
        let curve = spline.sample(300);
        assert_eq!(curve.len(), 300);
        assert_eq!(curve[0], [0.0, 10.0]);
        assert_eq!(curve[299], [3.0, 25.0]);
        assert!(curve.windows(2).all(|w| w[0][0] < w[1][0]));
    }

    #[test]
    fn too_few_points() {
        assert_eq!(
            CubicSpline::fit(&[1.0, 2.0, 3.0]),
            Err(AnalysisError::InsufficientPoints { found: 3, required: 4 })
        );
    }
}
