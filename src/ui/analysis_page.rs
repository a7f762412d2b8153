use egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{PlotPoints, Points};

use crate::data::datetime::to_plot_seconds;
use crate::data::model::Dataset;
use crate::processing::metrics::Sample;
use crate::state::page_view::AnalysisView;
use crate::state::theme::Theme;
use crate::ui::charts::{self, chart_title};

/// Render every chart of an analysis page, top to bottom.
pub fn show(ui: &mut Ui, view: &AnalysisView, dataset: &Dataset, theme: Theme) {
    let metrics = &view.metrics;
    let selection = &metrics.selection;
    let symbol = selection.symbol.as_str();
    let label = selection.label.as_str();

    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        ui.heading(format!("{label} Analysis"));
        summary(ui, view);

        // Raw series with the night interval.
        chart_title(ui, format!("{label} over the day"));
        let (y_min, y_max) = charts::y_extent(&view.raw_display, selection.safe_threshold());
        let response = charts::time_plot("raw_series", selection).show(ui, |plot_ui| {
            charts::sleep_band(plot_ui, metrics, y_min, y_max, theme);
            charts::line(plot_ui, label, &view.raw_display, theme.raw_series(), 1.2);
            charts::safe_hline(plot_ui, selection, theme);

            let hovered = plot_ui
                .pointer_coordinate()
                .and_then(|p| view.nearest_row(p.x, p.y));
            if let Some(r) = hovered.and_then(|row| dataset.readings().get(row)) {
                let x = to_plot_seconds(r.timestamp);
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[x, r.value(selection.measurement)]]))
                        .radius(5.0)
                        .color(theme.outlier()),
                );
            }
            hovered
        });
        match response.inner.and_then(|row| dataset.readings().get(row)) {
            Some(r) => ui.label(
                RichText::new(format!(
                    "{}  |  {:.3} {symbol}  |  source: {}",
                    r.timestamp.format("%Y-%m-%d %I:%M:%S %p"),
                    r.value(selection.measurement),
                    r.source
                ))
                .monospace(),
            ),
            None => ui.label(RichText::new("Hover the chart to inspect a reading.").weak()),
        };

        chart_title(ui, format!("{label} while asleep"));
        charts::time_plot("sleep_scatter", selection).show(ui, |plot_ui| {
            charts::scatter(plot_ui, "Asleep", &view.sleep_points, theme.sleep(), 1.5);
            charts::line(plot_ui, "Trend", &view.sleep_trend, theme.rolling(1), 2.0);
        });

        chart_title(ui, format!("Distribution of {label} readings"));
        ui.columns(2, |cols| {
            cols[0].label("Awake");
            charts::value_plot("awake_histogram", selection.axis_title(), "Count")
                .show(&mut cols[0], |plot_ui| {
                    charts::histogram_chart(plot_ui, "Awake", &view.awake_histogram, theme.inlier());
                    charts::safe_vline(plot_ui, selection, theme);
                });
            cols[1].label("Asleep");
            charts::value_plot("sleep_histogram", selection.axis_title(), "Count")
                .show(&mut cols[1], |plot_ui| {
                    charts::histogram_chart(plot_ui, "Asleep", &view.sleep_histogram, theme.sleep());
                    charts::safe_vline(plot_ui, selection, theme);
                });
        });

        chart_title(ui, "Outliers");
        charts::time_plot("outlier_scatter", selection).show(ui, |plot_ui| {
            charts::scatter(plot_ui, "Normal", &view.inlier_points, theme.inlier(), 1.5);
            charts::scatter(plot_ui, "Outlier", &view.outlier_points, theme.outlier(), 2.5);
        });

        spike_chart(ui, view, theme);

        chart_title(ui, format!("{label} without outliers"));
        charts::time_plot("inlier_scatter", selection).show(ui, |plot_ui| {
            charts::scatter(plot_ui, label, &view.inlier_points, theme.inlier(), 1.5);
            charts::mean_hline(plot_ui, metrics.mean, symbol, theme);
            charts::safe_hline(plot_ui, selection, theme);
        });

        chart_title(ui, "Rolling averages");
        charts::time_plot("rolling_averages", selection).show(ui, |plot_ui| {
            for (i, named) in view.rolling_lines.iter().enumerate() {
                charts::line(plot_ui, &named.name, &named.points, theme.rolling(i), 1.5);
            }
            charts::safe_hline(plot_ui, selection, theme);
        });

        chart_title(ui, format!("Outlier readings ({})", metrics.outliers.len()));
        outlier_table(ui, &metrics.outliers, dataset, symbol);
    });
}

fn summary(ui: &mut Ui, view: &AnalysisView) {
    let m = &view.metrics;
    let symbol = &m.selection.symbol;
    ui.horizontal_wrapped(|ui| {
        ui.label(format!("Mean: {:.3} {symbol}", m.mean));
        ui.separator();
        ui.label(format!("Std dev: {:.3}", m.std_dev));
        ui.separator();
        ui.label(format!("Outlier threshold: {:.3} {symbol}", m.threshold));
        ui.separator();
        ui.label(format!(
            "{} inliers, {} outliers, {} asleep",
            m.inliers.len(),
            m.outliers.len(),
            m.sleep.len()
        ));
    });
    ui.label(RichText::new(view.stats.report(&m.selection.label, symbol)).small().weak());
}

fn spike_chart(ui: &mut Ui, view: &AnalysisView, theme: Theme) {
    let selection = &view.metrics.selection;
    let spike = match &view.spike {
        Ok(spike) => spike,
        Err(e) => {
            chart_title(ui, "Spike close-up");
            ui.label(RichText::new(format!("No spike chart: {e}")).weak());
            return;
        }
    };
    match (spike.start(), spike.end()) {
        (Some(start), Some(end)) => chart_title(
            ui,
            format!(
                "Spike close-up, {} to {}",
                start.format("%I:%M:%S %p"),
                end.format("%I:%M:%S %p")
            ),
        ),
        _ => chart_title(ui, "Spike close-up"),
    }

    let ticks = spike.tick_labels((spike.samples.len() / 8).max(1));
    let knots: Vec<[f64; 2]> = spike
        .samples
        .iter()
        .enumerate()
        .map(|(i, s)| [i as f64, s.value])
        .collect();

    charts::value_plot("spike_closeup", "Time", selection.axis_title())
        .x_axis_formatter(move |mark, _range| {
            ticks
                .iter()
                .find(|(x, _)| (x - mark.value).abs() < 0.5)
                .map(|(_, label)| label.clone())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            charts::line(plot_ui, "Smoothed", &spike.curve, theme.outlier(), 2.0);
            charts::scatter(plot_ui, "Outlier", &knots, theme.outlier(), 3.0);
            charts::safe_hline(plot_ui, selection, theme);
        });
}

fn outlier_table(ui: &mut Ui, outliers: &[Sample], dataset: &Dataset, symbol: &str) {
    if outliers.is_empty() {
        ui.label(RichText::new("No readings above the outlier threshold.").weak());
        return;
    }
    TableBuilder::new(ui)
        .id_salt("outlier_table")
        .striped(true)
        .column(Column::auto().at_least(90.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .max_scroll_height(240.0)
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Time");
            });
            header.col(|ui| {
                ui.strong(format!("Value ({symbol})"));
            });
            header.col(|ui| {
                ui.strong("Source");
            });
        })
        .body(|body| {
            body.rows(18.0, outliers.len(), |mut row| {
                let s = &outliers[row.index()];
                row.col(|ui| {
                    ui.label(s.timestamp.format("%I:%M:%S %p").to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.3}", s.value));
                });
                row.col(|ui| {
                    let source = dataset.readings().get(s.row).map_or("", |r| r.source.as_str());
                    ui.label(source);
                });
            });
        });
}
