use chrono::NaiveDateTime;

use crate::config::AnalysisConfig;
use crate::data::datetime::to_plot_seconds;
use crate::data::model::{Dataset, Measurement, MeasurementSelection};
use crate::error::AnalysisError;
use crate::processing::rolling::rolling_mean;
use crate::processing::statistics::SeriesStats;

/// One reading projected onto the analysed column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Position of the reading in the dataset.
    pub row: usize,
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl Sample {
    /// Plot x coordinate (seconds since epoch).
    pub fn x(&self) -> f64 {
        to_plot_seconds(self.timestamp)
    }
}

/// Trailing moving average over the inlier sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct RollingAverage {
    pub window: usize,
    /// Aligned with `DerivedMetrics::inliers`.
    pub values: Vec<Option<f64>>,
}

impl RollingAverage {
    pub fn name(&self) -> String {
        window_name(self.window)
    }
}

/// Legend name of a rolling window. Windows are in samples, which the meter
/// logs once a second.
pub fn window_name(window: usize) -> String {
    if window % 60 == 0 {
        format!("{} min average", window / 60)
    } else {
        format!("{window} sample average")
    }
}

/// Everything the charts need for one measurement column.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub selection: MeasurementSelection,
    pub mean: f64,
    pub std_dev: f64,
    /// `mean + sigma * std_dev`; values strictly above it are outliers.
    pub threshold: f64,
    /// One flag per dataset row; rows with a missing value are never outliers.
    pub outlier_flags: Vec<bool>,
    pub inliers: Vec<Sample>,
    pub outliers: Vec<Sample>,
    /// Inliers strictly inside the night window.
    pub sleep: Vec<Sample>,
    /// Inliers outside the night window.
    pub awake: Vec<Sample>,
    pub rolling: Vec<RollingAverage>,
    pub sleep_start: NaiveDateTime,
    pub wake_start: NaiveDateTime,
    pub spike_cutoff: NaiveDateTime,
}

impl DerivedMetrics {
    pub fn rolling(&self, window: usize) -> Option<&RollingAverage> {
        self.rolling.iter().find(|r| r.window == window)
    }

    pub fn safe_threshold(&self) -> Option<f64> {
        self.selection.safe_threshold()
    }

    pub fn is_sleeping(&self, timestamp: NaiveDateTime) -> bool {
        self.sleep_start < timestamp && timestamp < self.wake_start
    }
}

/// Compute the derived metrics of `selection`'s column.
///
/// Missing values are excluded from the statistics and from both partitions.
/// Rolling windows run over consecutive inliers, so an outlier between two
/// inliers is skipped rather than filled.
pub fn compute(
    dataset: &Dataset,
    selection: &MeasurementSelection,
    config: &AnalysisConfig,
) -> Result<DerivedMetrics, AnalysisError> {
    let measurement = selection.measurement;
    let values: Vec<f64> = dataset
        .readings()
        .iter()
        .map(|r| r.value(measurement))
        .collect();

    let stats = SeriesStats::compute(&values).ok_or(AnalysisError::EmptyDataset)?;
    let reference_date = config
        .reference_date
        .or_else(|| dataset.reference_date())
        .ok_or(AnalysisError::EmptyDataset)?;

    let threshold = stats.mean + config.outlier_sigma * stats.std_dev;
    let (sleep_start, wake_start) = config.sleep_window(reference_date);

    let mut outlier_flags = Vec::with_capacity(values.len());
    let mut inliers = Vec::new();
    let mut outliers = Vec::new();
    for (row, (reading, &value)) in dataset.readings().iter().zip(&values).enumerate() {
        let is_outlier = value.is_finite() && value > threshold;
        outlier_flags.push(is_outlier);
        if !value.is_finite() {
            continue;
        }
        let sample = Sample {
            row,
            timestamp: reading.timestamp,
            value,
        };
        if is_outlier {
            outliers.push(sample);
        } else {
            inliers.push(sample);
        }
    }

    let (sleep, awake): (Vec<Sample>, Vec<Sample>) = inliers
        .iter()
        .copied()
        .partition(|s| sleep_start < s.timestamp && s.timestamp < wake_start);

    let inlier_values: Vec<f64> = inliers.iter().map(|s| s.value).collect();
    let rolling = config
        .rolling_windows
        .iter()
        .map(|&window| RollingAverage {
            window,
            values: rolling_mean(&inlier_values, window),
        })
        .collect();

    tracing::debug!(
        column = %measurement,
        mean = stats.mean,
        std_dev = stats.std_dev,
        threshold,
        inliers = inliers.len(),
        outliers = outliers.len(),
        sleep = sleep.len(),
        "computed derived metrics"
    );

    Ok(DerivedMetrics {
        selection: selection.clone(),
        mean: stats.mean,
        std_dev: stats.std_dev,
        threshold,
        outlier_flags,
        inliers,
        outliers,
        sleep,
        awake,
        rolling,
        sleep_start,
        wake_start,
        spike_cutoff: config.spike_cutoff_on(reference_date),
    })
}

/// [`compute`] addressed by column name, e.g. `"power_density"`.
pub fn compute_column(
    dataset: &Dataset,
    column: &str,
    config: &AnalysisConfig,
) -> Result<DerivedMetrics, AnalysisError> {
    let measurement: Measurement = column.parse()?;
    compute(dataset, &MeasurementSelection::new(measurement), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Reading;
    use chrono::{NaiveDate, TimeDelta};

    fn at(hour: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2023, 1, 6)
            .unwrap()
            .and_hms_opt(hour, min, 0)
            .unwrap()
    }

    fn dataset(start: NaiveDateTime, step_secs: i64, values: &[f64]) -> Dataset {
        Dataset::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Reading {
                    timestamp: start + TimeDelta::seconds(step_secs * i as i64),
                    magnetic_field: v / 10.0,
                    electric_field: 1.0,
                    power_density: v,
                    source: "meter".to_string(),
                })
                .collect(),
        )
    }

    fn power() -> MeasurementSelection {
        MeasurementSelection::new(Measurement::PowerDensity)
    }

    #[test]
    fn single_spike_is_the_only_outlier() {
        let mut values = vec![10.0; 20];
        values[7] = 1000.0;
        let ds = dataset(at(12, 0), 1, &values);
        let m = compute(&ds, &power(), &AnalysisConfig::default()).unwrap();

        assert_eq!(m.outliers.len(), 1);
        assert_eq!(m.outliers[0].row, 7);
        assert_eq!(m.inliers.len(), 19);
        assert!(m.outlier_flags[7]);
        assert_eq!(m.outlier_flags.iter().filter(|&&f| f).count(), 1);
        assert!(m.outliers[0].value > m.threshold);
    }

    #[test]
    fn value_equal_to_threshold_is_an_inlier() {
        // Constant data: std_dev = 0, threshold = mean.
        let ds = dataset(at(12, 0), 1, &[5.0; 6]);
        let m = compute(&ds, &power(), &AnalysisConfig::default()).unwrap();
        assert_eq!(m.threshold, 5.0);
        assert!(m.outliers.is_empty());
        assert_eq!(m.inliers.len(), 6);
    }

    #[test]
    fn low_values_are_never_flagged() {
        let mut values = vec![100.0; 30];
        values[3] = -10_000.0;
        let ds = dataset(at(12, 0), 1, &values);
        let m = compute(&ds, &power(), &AnalysisConfig::default()).unwrap();
        assert!(m.outliers.is_empty());
    }

    #[test]
    fn night_window_is_exclusive() {
        // Readings at 22:00, 23:00, 00:00, ... 06:00 on the hour.
        let ds = dataset(at(22, 0), 3600, &[1.0; 9]);
        let m = compute(&ds, &power(), &AnalysisConfig::default()).unwrap();

        let sleep_hours: Vec<String> = m
            .sleep
            .iter()
            .map(|s| s.timestamp.format("%H:%M").to_string())
            .collect();
        assert_eq!(sleep_hours, vec!["00:00", "01:00", "02:00", "03:00", "04:00", "05:00"]);
        // 22:00 and the 23:00 boundary itself are awake, as is 06:00.
        assert_eq!(m.awake.len(), 3);
        assert_eq!(m.sleep.len() + m.awake.len(), m.inliers.len());
    }

    #[test]
    fn rolling_windows_skip_outliers() {
        let config = AnalysisConfig {
            rolling_windows: vec![2],
            ..Default::default()
        };
        let mut values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        values.insert(2, 10_000.0);
        let ds = dataset(at(12, 0), 1, &values);
        let m = compute(&ds, &power(), &config).unwrap();

        assert_eq!(m.outliers.len(), 1);
        let ma = &m.rolling(2).unwrap().values;
        assert_eq!(ma[0], None);
        // 2.0 and 3.0 are adjacent inliers even though the spike sat between them.
        assert_eq!(ma[2], Some(2.5));
    }

    #[test]
    fn missing_values_are_excluded() {
        let ds = dataset(at(12, 0), 1, &[1.0, f64::NAN, 3.0]);
        let m = compute(&ds, &power(), &AnalysisConfig::default()).unwrap();
        assert_eq!(m.mean, 2.0);
        assert_eq!(m.inliers.len(), 2);
        assert_eq!(m.outlier_flags, vec![false, false, false]);
    }

    #[test]
    fn empty_inputs_fail() {
        let config = AnalysisConfig::default();
        assert_eq!(
            compute(&Dataset::default(), &power(), &config),
            Err(AnalysisError::EmptyDataset)
        );
        let all_missing = dataset(at(12, 0), 1, &[f64::NAN, f64::NAN]);
        assert_eq!(
            compute(&all_missing, &power(), &config),
            Err(AnalysisError::EmptyDataset)
        );
    }

    #[test]
    fn unknown_column_is_invalid() {
        let ds = dataset(at(12, 0), 1, &[1.0, 2.0]);
        let err = compute_column(&ds, "source", &AnalysisConfig::default()).unwrap_err();
        assert_eq!(err, AnalysisError::InvalidColumn("source".to_string()));
        assert!(compute_column(&ds, "magnetic_field", &AnalysisConfig::default()).is_ok());
    }

    #[test]
    fn recomputation_is_bit_identical() {
        let values: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64 * 1.7).collect();
        let ds = dataset(at(21, 0), 60, &values);
        let config = AnalysisConfig::default();
        let a = compute(&ds, &power(), &config).unwrap();
        let b = compute(&ds, &power(), &config).unwrap();
        assert_eq!(a.mean.to_bits(), b.mean.to_bits());
        assert_eq!(a.std_dev.to_bits(), b.std_dev.to_bits());
        assert_eq!(a, b);
    }

    #[test]
    fn rolling_names() {
        let ma = RollingAverage { window: 180, values: Vec::new() };
        assert_eq!(ma.name(), "3 min average");
        let ma = RollingAverage { window: 45, values: Vec::new() };
        assert_eq!(ma.name(), "45 sample average");
    }
}
