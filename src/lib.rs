//! Descriptive statistics and charts for 24-hour EMF radiation sensor logs.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod processing;
pub mod state;
pub mod ui;
