use chrono::{NaiveDate, NaiveTime, Timelike};

use crate::config::AnalysisConfig;

/// Persistent state for the settings dialog, created when the user opens it.
/// Edits go to a draft until Apply is pressed.
pub struct SettingsDialogState {
    pub draft: AnalysisConfig,
    pub windows_text: String,
    pub override_date: bool,
    pub reference_date: NaiveDate,
    pub error: String,
}

impl SettingsDialogState {
    pub fn new(config: &AnalysisConfig, fallback_date: NaiveDate) -> Self {
        Self {
            draft: config.clone(),
            windows_text: format_windows(&config.rolling_windows),
            override_date: config.reference_date.is_some(),
            reference_date: config.reference_date.unwrap_or(fallback_date),
            error: String::new(),
        }
    }

    /// Fold the text fields into the draft and validate it.
    pub fn finish(&mut self) -> Result<AnalysisConfig, String> {
        let mut config = self.draft.clone();
        config.rolling_windows = parse_windows(&self.windows_text)?;
        config.reference_date = self.override_date.then_some(self.reference_date);
        config.validate().map_err(|e| e.to_string())?;
        Ok(config)
    }

    fn reset_from(&mut self, config: AnalysisConfig) {
        let fallback = self.reference_date;
        *self = Self::new(&config, fallback);
    }
}

pub enum DialogResult {
    Apply(AnalysisConfig),
    Close,
}

pub fn format_windows(windows: &[usize]) -> String {
    windows.iter().map(|w| w.to_string()).collect::<Vec<_>>().join(", ")
}

/// Parse a comma or space separated list of window sizes.
pub fn parse_windows(text: &str) -> Result<Vec<usize>, String> {
    let windows = text
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(|t| t.parse::<usize>().map_err(|_| format!("'{t}' is not a window size")))
        .collect::<Result<Vec<_>, _>>()?;
    if windows.is_empty() {
        return Err("at least one rolling window is required".to_string());
    }
    Ok(windows)
}

fn time_edit(ui: &mut egui::Ui, time: &mut NaiveTime) {
    let mut hour = time.hour();
    let mut minute = time.minute();
    ui.horizontal(|ui| {
        ui.add(egui::DragValue::new(&mut hour).range(0..=23).suffix(" h"));
        ui.add(egui::DragValue::new(&mut minute).range(0..=59).suffix(" min"));
    });
    if let Some(t) = NaiveTime::from_hms_opt(hour, minute, 0) {
        *time = t;
    }
}

/// Show the settings window. Returns `None` while it stays open without a
/// decision.
pub fn show_settings_dialog(
    ctx: &egui::Context,
    state: &mut SettingsDialogState,
) -> Option<DialogResult> {
    let mut open = true;
    let mut result = None;

    egui::Window::new("Analysis Settings")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(420.0)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new("Day partition").strong().size(15.0));
            egui::Grid::new("partition_grid")
                .num_columns(2)
                .spacing([10.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Sleep start:");
                    time_edit(ui, &mut state.draft.sleep_start);
                    ui.end_row();

                    ui.label("Wake up:");
                    time_edit(ui, &mut state.draft.wake_start);
                    ui.end_row();

                    ui.label("Spike cutoff:");
                    time_edit(ui, &mut state.draft.spike_cutoff);
                    ui.end_row();

                    ui.checkbox(&mut state.override_date, "Reference date:");
                    ui.add_enabled_ui(state.override_date, |ui| {
                        ui.add(
                            egui_extras::DatePickerButton::new(&mut state.reference_date)
                                .id_salt("reference_date"),
                        );
                    });
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.label(egui::RichText::new("Statistics").strong().size(15.0));
            egui::Grid::new("stats_grid")
                .num_columns(2)
                .spacing([10.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Outlier sigma:");
                    ui.add(egui::DragValue::new(&mut state.draft.outlier_sigma).speed(0.1).range(0.0..=10.0));
                    ui.end_row();

                    ui.label("Rolling windows:");
                    ui.add(egui::TextEdit::singleline(&mut state.windows_text).desired_width(150.0));
                    ui.end_row();

                    ui.label("Graph page window:");
                    ui.add(egui::DragValue::new(&mut state.draft.selection_window).range(1..=10_000));
                    ui.end_row();

                    ui.label("Night trend window:");
                    ui.add(egui::DragValue::new(&mut state.draft.sleep_trend_window).range(1..=10_000));
                    ui.end_row();

                    ui.label("Spline samples:");
                    ui.add(egui::DragValue::new(&mut state.draft.spline_samples).range(2..=5_000));
                    ui.end_row();
                });

            ui.add_space(8.0);
            ui.label(egui::RichText::new("Charts").strong().size(15.0));
            egui::Grid::new("chart_grid")
                .num_columns(2)
                .spacing([10.0, 6.0])
                .show(ui, |ui| {
                    ui.label("Rolling chart stride:");
                    ui.add(egui::DragValue::new(&mut state.draft.chart_stride).range(1..=1_000));
                    ui.end_row();

                    ui.label("Graph page stride:");
                    ui.add(egui::DragValue::new(&mut state.draft.selection_stride).range(1..=1_000));
                    ui.end_row();

                    ui.label("Histogram bins:");
                    ui.add(egui::DragValue::new(&mut state.draft.histogram_bins).range(1..=1_000));
                    ui.end_row();
                });

            if !state.error.is_empty() {
                ui.add_space(4.0);
                ui.colored_label(egui::Color32::from_rgb(255, 80, 80), state.error.as_str());
            }

            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.add(egui::Button::new("Apply").min_size(egui::vec2(80.0, 28.0))).clicked() {
                    match state.finish() {
                        Ok(config) => result = Some(DialogResult::Apply(config)),
                        Err(e) => state.error = e,
                    }
                }
                if ui.add(egui::Button::new("Defaults").min_size(egui::vec2(80.0, 28.0))).clicked() {
                    state.reset_from(AnalysisConfig::default());
                }
                ui.separator();
                if ui.button("Load JSON...").clicked() {
                    load_json(state);
                }
                if ui.button("Save JSON...").clicked() {
                    save_json(state);
                }
            });
        });

    if !open {
        result = Some(DialogResult::Close);
    }
    result
}

fn load_json(state: &mut SettingsDialogState) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Analysis Config", &["json"])
        .pick_file()
    else {
        return;
    };
    match AnalysisConfig::load(&path) {
        Ok(config) => {
            tracing::info!("Loaded analysis config from {:?}", path);
            state.reset_from(config);
        }
        Err(e) => state.error = e.to_string(),
    }
}

fn save_json(state: &mut SettingsDialogState) {
    let config = match state.finish() {
        Ok(config) => config,
        Err(e) => {
            state.error = e;
            return;
        }
    };
    if let Some(path) = rfd::FileDialog::new()
        .set_file_name(crate::config::CONFIG_FILE)
        .add_filter("Analysis Config", &["json"])
        .save_file()
    {
        match config.save(&path) {
            Ok(()) => {
                tracing::info!("Saved analysis config to {:?}", path);
                state.error.clear();
            }
            Err(e) => state.error = e.to_string(),
        }
    }
}
