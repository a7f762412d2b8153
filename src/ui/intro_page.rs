use egui::{RichText, Ui};

use crate::config::AnalysisConfig;
use crate::data::model::{Measurement, MeasurementSelection};

pub fn show(ui: &mut Ui, config: &AnalysisConfig, has_data: bool) {
    egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
        ui.heading("EMF Radiation Monitoring");
        ui.add_space(8.0);
        ui.label(
            "This viewer summarises a 24-hour log from an EMF meter that records \
             the magnetic field, the electric field and the radiation power density \
             about once a second.",
        );
        ui.add_space(8.0);

        ui.label(RichText::new("Measurements").strong());
        egui::Grid::new("measurement_grid")
            .num_columns(3)
            .striped(true)
            .show(ui, |ui| {
                ui.strong("Page");
                ui.strong("Unit");
                ui.strong("Safe level");
                ui.end_row();
                for m in Measurement::ALL {
                    let selection = MeasurementSelection::new(m);
                    ui.label(selection.label.as_str());
                    ui.label(selection.symbol.as_str());
                    match selection.safe_threshold() {
                        Some(level) => ui.label(format!("{level} {}", selection.symbol)),
                        None => ui.label(RichText::new("not defined").weak()),
                    };
                    ui.end_row();
                }
            });

        ui.add_space(8.0);
        ui.label(RichText::new("How readings are grouped").strong());
        ui.label(format!(
            "Readings more than {} standard deviations above the mean are outliers. \
             The remaining readings are split into asleep ({} to {} the next morning) \
             and awake. Outliers before {} make up the spike close-up.",
            config.outlier_sigma,
            config.sleep_start.format("%H:%M"),
            config.wake_start.format("%H:%M"),
            config.spike_cutoff.format("%H:%M"),
        ));
        let windows: Vec<String> = config.rolling_windows.iter().map(|w| w.to_string()).collect();
        ui.label(format!(
            "Rolling averages use windows of {} readings, skipping outliers.",
            windows.join(", ")
        ));

        ui.add_space(12.0);
        if !has_data {
            ui.label(
                RichText::new("Open a .csv or .xlsx export, or drop one on the window, to begin.")
                    .weak(),
            );
        }
    });
}
