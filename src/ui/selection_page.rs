use egui::{RichText, Stroke, Ui};
use egui_plot::{PlotPoints, Polygon};

use crate::processing::metrics::window_name;
use crate::processing::selection::BrushRegion;
use crate::state::page_view::SelectionView;
use crate::state::theme::Theme;
use crate::ui::charts::{self, chart_title};

/// Rolling-average chart where dragging draws a selection box.
/// Double-click clears the selection.
pub fn show(ui: &mut Ui, view: &mut SelectionView, theme: Theme) {
    let selection = view.metrics.selection.clone();

    ui.heading(format!("{} Graph", selection.label));
    ui.label(
        RichText::new("Drag across the chart to select points. Double-click to clear.").weak(),
    );

    let mean = view.selection_mean();
    ui.horizontal(|ui| {
        ui.label(RichText::new("Average").size(14.0));
        ui.label(
            RichText::new(format!("{mean:.2} {}", selection.symbol))
                .size(28.0)
                .strong(),
        );
        ui.separator();
        ui.label(format!("{} points selected", view.selected.len()));
        if !view.selected.is_empty() && ui.button("Clear").clicked() {
            view.clear_selection();
        }
    });

    let legend = window_name(view.window);
    chart_title(ui, format!("{} rolling average", selection.label));

    let response = charts::time_plot("selection_chart", &selection)
        .height(ui.available_height().max(charts::CHART_HEIGHT))
        .allow_drag(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            charts::scatter(plot_ui, &legend, &view.points, theme.rolling(0), 2.0);
            if !view.selected.is_empty() {
                let picked: Vec<[f64; 2]> = view.selected.iter().map(|p| [p.x, p.y]).collect();
                charts::scatter(plot_ui, "Selected", &picked, theme.outlier(), 3.0);
            }
            if let Some(brush) = &view.brush {
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(brush.corners().to_vec()))
                        .fill_color(theme.brush())
                        .stroke(Stroke::new(1.0, theme.rolling(0))),
                );
            }
            charts::safe_hline(plot_ui, &selection, theme);
        });

    let plot_response = &response.response;
    let to_plot = |pos: egui::Pos2| {
        let p = response.transform.value_from_position(pos);
        [p.x, p.y]
    };

    if plot_response.double_clicked() {
        view.clear_selection();
    } else if plot_response.drag_started() {
        view.drag_start = plot_response.interact_pointer_pos().map(to_plot);
    } else if plot_response.dragged() {
        if let (Some(start), Some(pos)) = (view.drag_start, plot_response.interact_pointer_pos()) {
            view.brush = Some(BrushRegion::from_corners(start, to_plot(pos)));
        }
    } else if plot_response.drag_stopped() {
        if let Some(brush) = view.brush {
            view.apply_brush(brush);
        }
        view.drag_start = None;
    }
}
