use egui::{Color32, Visuals};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Theme {
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn visuals(&self) -> Visuals {
        match self {
            Theme::Dark => Visuals::dark(),
            Theme::Light => Visuals::light(),
        }
    }

    /// Label for the button that switches to the other theme.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Theme::Dark => "Light Mode",
            Theme::Light => "Dark Mode",
        }
    }

    pub fn raw_series(&self) -> Color32 {
        Color32::from_rgb(60, 110, 230)
    }

    pub fn inlier(&self) -> Color32 {
        Color32::from_rgb(40, 90, 220)
    }

    pub fn outlier(&self) -> Color32 {
        Color32::from_rgb(230, 50, 50)
    }

    /// Night-time scatter and histogram.
    pub fn sleep(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(150),
            Theme::Light => Color32::from_gray(90),
        }
    }

    /// Translucent shading over the night interval.
    pub fn sleep_band(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_rgba_unmultiplied(0, 0, 0, 110),
            Theme::Light => Color32::from_rgba_unmultiplied(0, 0, 0, 60),
        }
    }

    pub fn boundary_line(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(220),
            Theme::Light => Color32::BLACK,
        }
    }

    pub fn mean_line(&self) -> Color32 {
        match self {
            Theme::Dark => Color32::from_gray(230),
            Theme::Light => Color32::from_gray(30),
        }
    }

    pub fn safe_line(&self) -> Color32 {
        Color32::from_rgb(50, 205, 50)
    }

    pub fn brush(&self) -> Color32 {
        Color32::from_rgba_unmultiplied(80, 140, 255, 50)
    }

    /// Colors for the rolling-average lines, by position.
    pub fn rolling(&self, index: usize) -> Color32 {
        const PALETTE: [Color32; 4] = [
            Color32::from_rgb(99, 110, 250),
            Color32::from_rgb(239, 85, 59),
            Color32::from_rgb(0, 204, 150),
            Color32::from_rgb(171, 99, 250),
        ];
        PALETTE[index % PALETTE.len()]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::Dark
    }
}
