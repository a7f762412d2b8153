use crate::config::AnalysisConfig;
use crate::data::datetime::to_plot_seconds;
use crate::data::model::{Dataset, MeasurementSelection};
use crate::error::AnalysisError;
use crate::processing::downsampling::{lttb_downsample, stride};
use crate::processing::histogram::{histogram, Bin};
use crate::processing::kd_tree::HoverTree;
use crate::processing::metrics::{self, DerivedMetrics, Sample};
use crate::processing::rolling::rolling_mean;
use crate::processing::selection::{reduce, BrushRegion, SelectedPoint};
use crate::processing::spike::{extract_spike, SpikeWindow};
use crate::processing::statistics::SeriesStats;

/// Upper bound on points handed to a scatter chart.
pub const MAX_PLOT_POINTS: usize = 4_000;

fn to_points(samples: &[Sample]) -> Vec<[f64; 2]> {
    samples.iter().map(|s| [s.x(), s.value]).collect()
}

/// Pair each defined rolling value with its inlier's x, then decimate.
fn rolling_points(inliers: &[Sample], values: &[Option<f64>], step: usize) -> Vec<[f64; 2]> {
    let points: Vec<[f64; 2]> = inliers
        .iter()
        .zip(values)
        .filter_map(|(s, v)| v.map(|v| [s.x(), v]))
        .collect();
    stride(&points, step)
}

/// A named line for the chart legend.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedLine {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

/// Chart-ready data for an analysis page.
pub struct AnalysisView {
    pub metrics: DerivedMetrics,
    pub stats: SeriesStats,
    /// Recoverable: the close-up chart is skipped when this is an error.
    pub spike: Result<SpikeWindow, AnalysisError>,
    /// Every finite reading, full resolution, with its dataset row.
    pub raw: Vec<[f64; 2]>,
    pub raw_rows: Vec<usize>,
    pub raw_display: Vec<[f64; 2]>,
    pub hover: HoverTree,
    pub sleep_points: Vec<[f64; 2]>,
    pub sleep_trend: Vec<[f64; 2]>,
    pub awake_histogram: Vec<Bin>,
    pub sleep_histogram: Vec<Bin>,
    pub inlier_points: Vec<[f64; 2]>,
    pub outlier_points: Vec<[f64; 2]>,
    pub rolling_lines: Vec<NamedLine>,
}

impl AnalysisView {
    pub fn build(
        dataset: &Dataset,
        selection: &MeasurementSelection,
        config: &AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        let metrics = metrics::compute(dataset, selection, config)?;

        let (raw_rows, raw): (Vec<usize>, Vec<[f64; 2]>) = dataset
            .readings()
            .iter()
            .enumerate()
            .map(|(row, r)| (row, [to_plot_seconds(r.timestamp), r.value(selection.measurement)]))
            .filter(|(_, p)| p[1].is_finite())
            .unzip();
        let values: Vec<f64> = raw.iter().map(|p| p[1]).collect();
        let stats = SeriesStats::compute(&values).ok_or(AnalysisError::EmptyDataset)?;

        let spike = extract_spike(&metrics.outliers, metrics.spike_cutoff, config.spline_samples);
        if let Err(e) = &spike {
            tracing::warn!("Skipping spike close-up for {}: {e}", selection.measurement);
        }

        let sleep_values: Vec<f64> = metrics.sleep.iter().map(|s| s.value).collect();
        let awake_values: Vec<f64> = metrics.awake.iter().map(|s| s.value).collect();
        let sleep_trend = rolling_points(
            &metrics.sleep,
            &rolling_mean(&sleep_values, config.sleep_trend_window),
            1,
        );

        let rolling_lines = metrics
            .rolling
            .iter()
            .map(|ma| NamedLine {
                name: ma.name(),
                points: rolling_points(&metrics.inliers, &ma.values, config.chart_stride),
            })
            .collect();

        Ok(Self {
            stats,
            spike,
            raw_display: lttb_downsample(&raw, MAX_PLOT_POINTS),
            hover: HoverTree::build(&raw),
            sleep_points: lttb_downsample(&to_points(&metrics.sleep), MAX_PLOT_POINTS),
            sleep_trend: lttb_downsample(&sleep_trend, MAX_PLOT_POINTS),
            awake_histogram: histogram(&awake_values, config.histogram_bins),
            sleep_histogram: histogram(&sleep_values, config.histogram_bins),
            inlier_points: lttb_downsample(&to_points(&metrics.inliers), MAX_PLOT_POINTS),
            outlier_points: to_points(&metrics.outliers),
            rolling_lines,
            raw,
            raw_rows,
            metrics,
        })
    }

    /// Dataset row of the reading nearest to a plot position.
    pub fn nearest_row(&self, x: f64, y: f64) -> Option<usize> {
        self.hover.nearest(x, y).and_then(|i| self.raw_rows.get(i).copied())
    }
}

/// Chart-ready data and brush state for the rolling-average selection page.
pub struct SelectionView {
    pub metrics: DerivedMetrics,
    pub window: usize,
    /// Decimated rolling-average points that can be selected.
    pub points: Vec<[f64; 2]>,
    /// Plot position where the current drag started.
    pub drag_start: Option<[f64; 2]>,
    pub brush: Option<BrushRegion>,
    pub selected: Vec<SelectedPoint>,
}

impl SelectionView {
    pub fn build(
        dataset: &Dataset,
        selection: &MeasurementSelection,
        config: &AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        let metrics = metrics::compute(dataset, selection, config)?;
        let window = config.selection_window;
        let values = match metrics.rolling(window) {
            Some(ma) => ma.values.clone(),
            None => {
                let inlier_values: Vec<f64> = metrics.inliers.iter().map(|s| s.value).collect();
                rolling_mean(&inlier_values, window)
            }
        };
        let points = rolling_points(&metrics.inliers, &values, config.selection_stride);

        Ok(Self {
            metrics,
            window,
            points,
            drag_start: None,
            brush: None,
            selected: Vec::new(),
        })
    }

    pub fn apply_brush(&mut self, brush: BrushRegion) {
        self.selected = brush.select(&self.points);
        self.brush = Some(brush);
        tracing::debug!("Brush selected {} points", self.selected.len());
    }

    pub fn clear_selection(&mut self) {
        self.brush = None;
        self.drag_start = None;
        self.selected.clear();
    }

    /// Mean of the selected points, 0 when nothing is selected.
    pub fn selection_mean(&self) -> f64 {
        reduce(Some(&self.selected[..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Measurement, Reading};
    use chrono::{NaiveDate, TimeDelta};

    fn day(values: &[f64]) -> Dataset {
        let start = NaiveDate::from_ymd_opt(2023, 1, 6)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Dataset::new(
            values
                .iter()
                .enumerate()
                .map(|(i, &v)| Reading {
                    timestamp: start + TimeDelta::seconds(i as i64),
                    magnetic_field: 0.1,
                    electric_field: 1.0,
                    power_density: v,
                    source: "meter".into(),
                })
                .collect(),
        )
    }

    fn small_config() -> AnalysisConfig {
        AnalysisConfig {
            rolling_windows: vec![2, 4],
            selection_window: 2,
            selection_stride: 1,
            chart_stride: 1,
            sleep_trend_window: 2,
            ..Default::default()
        }
    }

    #[test]
    fn analysis_view_without_spike() {
        let values: Vec<f64> = (0..40).map(|i| (i % 5) as f64).collect();
        let selection = MeasurementSelection::new(Measurement::PowerDensity);
        let view = AnalysisView::build(&day(&values), &selection, &small_config()).unwrap();

        assert!(matches!(view.spike, Err(AnalysisError::InsufficientPoints { .. })));
        assert_eq!(view.raw.len(), 40);
        assert_eq!(view.rolling_lines.len(), 2);
        assert_eq!(view.rolling_lines[0].points.len(), 39);
        assert_eq!(view.nearest_row(view.raw[7][0], view.raw[7][1]), Some(7));
    }

    #[test]
    fn brush_then_clear() {
        let values = [1.0, 3.0, 5.0, 7.0, 9.0, 11.0];
        let selection = MeasurementSelection::new(Measurement::PowerDensity);
        let mut view = SelectionView::build(&day(&values), &selection, &small_config()).unwrap();
        // Window-2 averages: 2, 4, 6, 8, 10.
        assert_eq!(view.points.len(), 5);
        assert_eq!(view.selection_mean(), 0.0);

        let x0 = view.points[1][0];
        let x1 = view.points[3][0];
        view.apply_brush(BrushRegion::from_corners([x0, 0.0], [x1, 100.0]));
        assert_eq!(view.selected.len(), 3);
        assert_eq!(view.selection_mean(), 6.0);

        view.clear_selection();
        assert_eq!(view.selection_mean(), 0.0);
    }

    #[test]
    fn selection_window_outside_configured_set() {
        let config = AnalysisConfig {
            rolling_windows: vec![60],
            selection_window: 3,
            selection_stride: 1,
            ..Default::default()
        };
        let selection = MeasurementSelection::new(Measurement::PowerDensity);
        let view = SelectionView::build(&day(&[3.0, 3.0, 3.0, 3.0]), &selection, &config).unwrap();
        assert_eq!(view.points.len(), 2);
        assert!(view.points.iter().all(|p| p[1] == 3.0));
    }
}
