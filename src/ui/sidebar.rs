use egui::{RichText, Ui};

use crate::state::app_state::AppState;
use crate::state::page::Page;

/// Requests the sidebar hands back to the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarAction {
    None,
    OpenFile,
    OpenSettings,
}

/// Render the page list and dataset summary.
pub fn show(ui: &mut Ui, state: &mut AppState) -> SidebarAction {
    let mut action = SidebarAction::None;

    ui.heading("Topics");
    ui.separator();
    for page in Page::ALL {
        if ui.radio(state.page == page, page.label()).clicked() && state.page != page {
            tracing::debug!("Switching to page {}", page.label());
            state.page = page;
        }
    }

    ui.add_space(16.0);
    ui.heading("Dataset");
    ui.separator();
    match (state.dataset(), state.dataset_name()) {
        (Some(dataset), name) => {
            ui.label(RichText::new(name.unwrap_or("untitled")).strong());
            ui.label(format!("{} readings", dataset.len()));
            if let Some((first, last)) = dataset.time_span() {
                ui.label(RichText::new(format!("From {}", first.format("%Y-%m-%d %H:%M"))).small());
                ui.label(RichText::new(format!("To {}", last.format("%Y-%m-%d %H:%M"))).small());
            }
            let sources = dataset.sources();
            if !sources.is_empty() {
                ui.label(RichText::new(format!("Sources: {}", sources.join(", "))).small().weak());
            }
        }
        (None, _) => {
            ui.label(RichText::new("No dataset loaded.").weak());
        }
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui.button("Open File...").clicked() {
            action = SidebarAction::OpenFile;
        }
        if ui.button("Settings").clicked() {
            action = SidebarAction::OpenSettings;
        }
    });

    action
}
