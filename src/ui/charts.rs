use egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, HLine, Legend, Line, Plot, PlotPoints, PlotUi, Points, Polygon, VLine};

use crate::data::datetime::{format_clock, format_timestamp, to_plot_seconds};
use crate::data::model::MeasurementSelection;
use crate::processing::histogram::Bin;
use crate::processing::metrics::DerivedMetrics;
use crate::state::theme::Theme;

pub const CHART_HEIGHT: f32 = 300.0;

/// Chart with a clock-formatted time axis.
pub fn time_plot(id: &str, selection: &MeasurementSelection) -> Plot<'static> {
    Plot::new(id.to_owned())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Time")
        .y_axis_label(selection.axis_title())
        .x_axis_formatter(|mark, _range| format_clock(mark.value))
        .label_formatter(|name, value| {
            let time = format_timestamp(value.x);
            if name.is_empty() {
                format!("{time}\n{:.3}", value.y)
            } else {
                format!("{name}\n{time}\n{:.3}", value.y)
            }
        })
}

/// Chart with a plain numeric x axis, for histograms and index plots.
pub fn value_plot(id: &str, x_label: impl Into<String>, y_label: impl Into<String>) -> Plot<'static> {
    Plot::new(id.to_owned())
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label(x_label.into())
        .y_axis_label(y_label.into())
}

pub fn line(plot_ui: &mut PlotUi, name: &str, points: &[[f64; 2]], color: Color32, width: f32) {
    plot_ui.line(
        Line::new(PlotPoints::from(points.to_vec()))
            .name(name)
            .color(color)
            .width(width),
    );
}

pub fn scatter(plot_ui: &mut PlotUi, name: &str, points: &[[f64; 2]], color: Color32, radius: f32) {
    plot_ui.points(
        Points::new(PlotPoints::from(points.to_vec()))
            .name(name)
            .color(color)
            .radius(radius),
    );
}

/// Dashed horizontal line at the selection's safe level, if it has one.
pub fn safe_hline(plot_ui: &mut PlotUi, selection: &MeasurementSelection, theme: Theme) {
    if let Some(level) = selection.safe_threshold() {
        plot_ui.hline(
            HLine::new(level)
                .name(format!("Safe Level ({level} {})", selection.symbol))
                .color(theme.safe_line())
                .style(egui_plot::LineStyle::dashed_loose())
                .width(2.0),
        );
    }
}

/// Same as [`safe_hline`] but vertical, for histograms over the value axis.
pub fn safe_vline(plot_ui: &mut PlotUi, selection: &MeasurementSelection, theme: Theme) {
    if let Some(level) = selection.safe_threshold() {
        plot_ui.vline(
            VLine::new(level)
                .name(format!("Safe Level ({level} {})", selection.symbol))
                .color(theme.safe_line())
                .style(egui_plot::LineStyle::dashed_loose())
                .width(2.0),
        );
    }
}

pub fn mean_hline(plot_ui: &mut PlotUi, mean: f64, symbol: &str, theme: Theme) {
    plot_ui.hline(
        HLine::new(mean)
            .name(format!("Mean ({mean:.2} {symbol})"))
            .color(theme.mean_line())
            .style(egui_plot::LineStyle::dashed_dense())
            .width(1.5),
    );
}

/// Shaded night interval with its boundary lines, spanning `[y_min, y_max]`.
pub fn sleep_band(plot_ui: &mut PlotUi, metrics: &DerivedMetrics, y_min: f64, y_max: f64, theme: Theme) {
    let x0 = to_plot_seconds(metrics.sleep_start);
    let x1 = to_plot_seconds(metrics.wake_start);
    plot_ui.polygon(
        Polygon::new(PlotPoints::from(vec![[x0, y_min], [x1, y_min], [x1, y_max], [x0, y_max]]))
            .name("Sleep")
            .fill_color(theme.sleep_band())
            .stroke(Stroke::NONE),
    );
    for (x, name) in [(x0, "Sleep start"), (x1, "Wake up")] {
        plot_ui.vline(
            VLine::new(x)
                .name(name)
                .color(theme.boundary_line())
                .style(egui_plot::LineStyle::dashed_dense())
                .width(1.5),
        );
    }
}

pub fn histogram_chart(plot_ui: &mut PlotUi, name: &str, bins: &[Bin], color: Color32) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| Bar::new(b.center(), b.count as f64).width(b.width()))
        .collect();
    plot_ui.bar_chart(BarChart::new(bars).name(name).color(color));
}

/// Heading shown above each chart.
pub fn chart_title(ui: &mut Ui, title: impl Into<String>) {
    ui.add_space(12.0);
    ui.label(egui::RichText::new(title.into()).strong().size(16.0));
    ui.add_space(4.0);
}

/// Y range of a set of points with a little headroom, used to size the band.
pub fn y_extent(points: &[[f64; 2]], floor: Option<f64>) -> (f64, f64) {
    let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p[1]), hi.max(p[1]))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let hi = floor.map_or(hi, |f| hi.max(f));
    let pad = ((hi - lo) * 0.05).max(f64::EPSILON);
    (lo - pad, hi + pad)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_extent_pads_and_includes_floor() {
        let (lo, hi) = y_extent(&[[0.0, 10.0], [1.0, 20.0]], Some(100.0));
        assert!(lo < 10.0);
        assert!(hi > 100.0);
    }

    #[test]
    fn y_extent_of_nothing() {
        assert_eq!(y_extent(&[], None), (0.0, 1.0));
    }
}
