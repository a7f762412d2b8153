use chrono::NaiveDateTime;

use crate::error::AnalysisError;
use crate::processing::metrics::Sample;
use crate::processing::spline::CubicSpline;

/// Outliers before the cutoff, re-indexed `0..n`, with a smoothed curve for
/// the close-up chart.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeWindow {
    pub samples: Vec<Sample>,
    /// `[index, value]` pairs evenly spaced over `[0, n - 1]`.
    pub curve: Vec<[f64; 2]>,
}

impl SpikeWindow {
    /// Index and clock label of every `step`-th sample, for axis ticks.
    pub fn tick_labels(&self, step: usize) -> Vec<(f64, String)> {
        self.samples
            .iter()
            .enumerate()
            .step_by(step.max(1))
            .map(|(i, s)| (i as f64, s.timestamp.format("%I:%M:%S %p").to_string()))
            .collect()
    }

    pub fn start(&self) -> Option<NaiveDateTime> {
        self.samples.first().map(|s| s.timestamp)
    }

    pub fn end(&self) -> Option<NaiveDateTime> {
        self.samples.last().map(|s| s.timestamp)
    }
}

/// Keep the outliers strictly before `cutoff` and fit a cubic spline through
/// them, sampled at `samples` positions.
pub fn extract_spike(
    outliers: &[Sample],
    cutoff: NaiveDateTime,
    samples: usize,
) -> Result<SpikeWindow, AnalysisError> {
    let window: Vec<Sample> = outliers
        .iter()
        .filter(|s| s.timestamp < cutoff)
        .copied()
        .collect();

    let values: Vec<f64> = window.iter().map(|s| s.value).collect();
    let spline = CubicSpline::fit(&values)?;

    Ok(SpikeWindow {
        curve: spline.sample(samples),
        samples: window,
    })
}
