/// Summary statistics of one measurement column.
///
/// Non-finite values are treated as missing and dropped before anything is
/// computed. `std_dev` is the sample standard deviation (n - 1 denominator);
/// a single value has a spread of 0.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
}

impl SeriesStats {
    pub fn compute(values: &[f64]) -> Option<Self> {
        let mut vals: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if vals.is_empty() {
            return None;
        }

        let count = vals.len();
        let min = vals.iter().copied().fold(f64::INFINITY, f64::min);
        let max = vals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mean = vals.iter().sum::<f64>() / count as f64;
        let std_dev = sample_std_dev(&vals, mean);

        vals.sort_by(f64::total_cmp);
        let median = if count % 2 == 0 {
            (vals[count / 2 - 1] + vals[count / 2]) / 2.0
        } else {
            vals[count / 2]
        };

        Some(SeriesStats {
            count,
            min,
            max,
            mean,
            median,
            std_dev,
        })
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str, unit: &str) -> String {
        format!(
            "{label}:\n  Count: {}\n  Min: {:.3} {unit}\n  Max: {:.3} {unit}\n  Mean: {:.3} {unit}\n  Median: {:.3} {unit}\n  Std Dev: {:.3} {unit}\n",
            self.count, self.min, self.max, self.mean, self.median, self.std_dev
        )
    }
}

fn sample_std_dev(vals: &[f64], mean: f64) -> f64 {
    if vals.len() < 2 {
        return 0.0;
    }
    let ss: f64 = vals.iter().map(|v| (v - mean).powi(2)).sum();
    (ss / (vals.len() - 1) as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_standard_deviation() {
        let stats = SeriesStats::compute(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.mean, 5.0);
        assert_eq!(stats.median, 4.5);
        // Population sd is 2; the sample sd is sqrt(32 / 7).
        assert!((stats.std_dev - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn missing_values_are_dropped() {
        let stats = SeriesStats::compute(&[f64::NAN, 1.0, 3.0, f64::INFINITY]).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 2.0);
        assert_eq!((stats.min, stats.max), (1.0, 3.0));
    }

    #[test]
    fn single_value_has_no_spread() {
        let stats = SeriesStats::compute(&[42.0]).unwrap();
        assert_eq!(stats.std_dev, 0.0);
        assert!(SeriesStats::compute(&[f64::NAN]).is_none());
    }
}
