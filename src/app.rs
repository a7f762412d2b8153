use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::config::AnalysisConfig;
use crate::data::loader;
use crate::data::model::{Dataset, Measurement};
use crate::error::LoadError;
use crate::state::app_state::{AppState, PageView, VERSION};
use crate::state::page::Page;
use crate::state::theme::Theme;
use crate::ui::settings_dialog::{show_settings_dialog, DialogResult, SettingsDialogState};
use crate::ui::sidebar::{self, SidebarAction};
use crate::ui::{analysis_page, intro_page, selection_page};

type LoadSlot = Arc<Mutex<Option<Result<Dataset, LoadError>>>>;

/// File being parsed on a worker thread.
struct PendingLoad {
    name: String,
    result: LoadSlot,
}

/// The radscope desktop viewer.
pub struct RadscopeApp {
    pub state: AppState,
    pub settings_dialog: Option<SettingsDialogState>,
    /// Shown in the footer until dismissed.
    pub error_message: Option<String>,
    pub show_about: bool,
    pending_load: Option<PendingLoad>,
}

impl RadscopeApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: AnalysisConfig,
        initial_file: Option<PathBuf>,
    ) -> Self {
        let state = AppState::new(config);

        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.text_styles.insert(egui::TextStyle::Body, egui::FontId::proportional(15.0));
        style.text_styles.insert(egui::TextStyle::Button, egui::FontId::proportional(14.5));
        style.text_styles.insert(egui::TextStyle::Heading, egui::FontId::proportional(22.0));
        style.text_styles.insert(egui::TextStyle::Small, egui::FontId::proportional(12.0));
        style.text_styles.insert(egui::TextStyle::Monospace, egui::FontId::monospace(13.5));
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.window_margin = egui::Margin::same(12);
        ctx.set_style(style);
        ctx.set_visuals(styled_visuals(state.theme));

        let mut app = Self {
            state,
            settings_dialog: None,
            error_message: None,
            show_about: false,
            pending_load: None,
        };
        if let Some(path) = initial_file {
            app.load_file(&path);
        }
        app
    }

    fn open_file_dialog(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Sensor Logs", loader::SUPPORTED_EXTENSIONS)
            .add_filter("All Files", &["*"])
            .pick_file()
        {
            self.load_file(&path);
        }
    }

    /// Parse a sensor log on a worker thread so the UI stays responsive.
    fn load_file(&mut self, path: &Path) {
        let path_buf = path.to_path_buf();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let result: LoadSlot = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&result);

        tracing::info!("Loading {:?}", path_buf);
        std::thread::spawn(move || {
            let loaded = loader::load_file(&path_buf);
            if let Ok(mut guard) = slot.lock() {
                *guard = Some(loaded);
            }
        });

        self.pending_load = Some(PendingLoad { name, result });
    }

    fn poll_pending_load(&mut self) {
        let Some(pending) = &self.pending_load else {
            return;
        };
        let finished = match pending.result.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => Some(Err(LoadError::Workbook("loader thread panicked".into()))),
        };
        let Some(result) = finished else {
            return;
        };
        let name = pending.name.clone();
        self.pending_load = None;

        match result {
            Ok(dataset) => {
                self.state.set_dataset(dataset, name);
                self.error_message = None;
                if self.state.page == Page::Introduction {
                    self.state.page = Page::Analysis(Measurement::PowerDensity);
                }
            }
            Err(e) => {
                tracing::error!("Failed to load {name}: {e}");
                self.error_message = Some(format!("Failed to load {name}: {e}"));
            }
        }
    }

    fn open_settings(&mut self) {
        let fallback = self
            .state
            .dataset()
            .and_then(Dataset::reference_date)
            .unwrap_or_else(|| chrono::Local::now().date_naive());
        self.settings_dialog = Some(SettingsDialogState::new(self.state.config(), fallback));
    }
}

/// Theme visuals with the app's rounding applied.
fn styled_visuals(theme: Theme) -> egui::Visuals {
    let mut vis = theme.visuals();
    vis.window_corner_radius = egui::CornerRadius::same(8);
    vis.widgets.noninteractive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.inactive.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.hovered.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.active.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.open.corner_radius = egui::CornerRadius::same(6);
    vis.widgets.hovered.bg_stroke = egui::Stroke::new(1.5, egui::Color32::from_gray(160));
    vis
}

impl eframe::App for RadscopeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ctx.set_visuals(styled_visuals(self.state.theme));

        // ------------------------------------------------------------------
        // 1. Dropped files
        // ------------------------------------------------------------------
        let dropped: Option<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .find(|p| loader::is_supported(p))
        });
        if let Some(path) = dropped {
            self.load_file(&path);
        }

        self.poll_pending_load();

        // ------------------------------------------------------------------
        // 2. Header
        // ------------------------------------------------------------------
        let mut open_file = false;
        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let heading = ui.heading("radscope");
                    heading.context_menu(|ui| {
                        if ui.button("About radscope").clicked() {
                            self.show_about = true;
                            ui.close_menu();
                        }
                    });

                    ui.separator();
                    if ui.button("Open File").clicked() {
                        open_file = true;
                    }

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button(self.state.theme.toggle_label()).clicked() {
                            self.state.theme = self.state.theme.toggle();
                        }
                        ui.separator();
                        ui.small(format!("v{VERSION}"));
                    });
                });
            });

        // ------------------------------------------------------------------
        // 3. Footer
        // ------------------------------------------------------------------
        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let status = match self.state.dataset_name() {
                        Some(name) => format!("{} | {}", name, self.state.page.label()),
                        None => "No dataset".to_string(),
                    };
                    ui.label(egui::RichText::new(status).weak());

                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg.as_str());
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        // ------------------------------------------------------------------
        // 4. Sidebar and page
        // ------------------------------------------------------------------
        let sidebar_action = egui::SidePanel::left("topics")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| sidebar::show(ui, &mut self.state))
            .inner;
        match sidebar_action {
            SidebarAction::OpenFile => open_file = true,
            SidebarAction::OpenSettings => self.open_settings(),
            SidebarAction::None => {}
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            let theme = self.state.theme;
            let has_data = self.state.dataset().is_some();
            let config = self.state.config().clone();
            match self.state.view_and_dataset() {
                (PageView::Introduction, _) => intro_page::show(ui, &config, has_data),
                (PageView::NoData, _) => {
                    ui.centered_and_justified(|ui| {
                        ui.heading("Open a sensor log to view this page  (Open File or drag and drop)");
                    });
                }
                (PageView::Analysis(view), Some(dataset)) => {
                    analysis_page::show(ui, view, dataset, theme)
                }
                (PageView::Selection(view), _) => selection_page::show(ui, view, theme),
                (PageView::Failed(reason), _) => {
                    ui.centered_and_justified(|ui| {
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), reason.as_str());
                    });
                }
                (PageView::Analysis(_), None) => {}
            }
        });

        if open_file {
            self.open_file_dialog();
        }

        // ------------------------------------------------------------------
        // 5. Loading indicator
        // ------------------------------------------------------------------
        if let Some(pending) = &self.pending_load {
            egui::Window::new("Loading")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                .show(ctx, |ui| {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(format!("Loading {}...", pending.name));
                    });
                });
            ctx.request_repaint();
        }

        // ------------------------------------------------------------------
        // 6. Settings dialog
        // ------------------------------------------------------------------
        if let Some(dialog) = &mut self.settings_dialog {
            match show_settings_dialog(ctx, dialog) {
                Some(DialogResult::Apply(config)) => {
                    tracing::info!("Applying analysis settings");
                    self.state.set_config(config);
                    self.settings_dialog = None;
                }
                Some(DialogResult::Close) => self.settings_dialog = None,
                None => {}
            }
        }

        if self.show_about {
            egui::Window::new("About radscope")
                .open(&mut self.show_about)
                .collapsible(false)
                .resizable(false)
                .default_width(320.0)
                .show(ctx, |ui| {
                    ui.heading("radscope");
                    ui.label(format!("Version: {VERSION}"));
                    ui.add_space(4.0);
                    ui.label("Statistics and charts for 24-hour EMF sensor logs.");
                    ui.add_space(10.0);
                    ui.label("Right-click the title for this menu.");
                });
        }
    }
}
