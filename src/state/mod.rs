//! Viewer state: the loaded dataset, the active page and its cached view.

pub mod app_state;
pub mod page;
pub mod page_view;
pub mod theme;
