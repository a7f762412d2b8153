pub mod analysis_page;
pub mod charts;
pub mod intro_page;
pub mod selection_page;
pub mod settings_dialog;
pub mod sidebar;
