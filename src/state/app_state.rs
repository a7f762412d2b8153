use crate::config::AnalysisConfig;
use crate::data::model::{Dataset, MeasurementSelection};
use crate::state::page::Page;
use crate::state::page_view::{AnalysisView, SelectionView};
use crate::state::theme::Theme;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What the central panel shows for the current page.
pub enum PageView {
    Introduction,
    NoData,
    Analysis(Box<AnalysisView>),
    Selection(Box<SelectionView>),
    Failed(String),
}

/// Inputs a page view was built from. A view is rebuilt whenever any of
/// them changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ViewKey {
    page: Page,
    dataset_generation: u64,
    config_revision: u64,
}

pub struct AppState {
    pub page: Page,
    pub theme: Theme,
    dataset: Option<Dataset>,
    dataset_name: Option<String>,
    dataset_generation: u64,
    config: AnalysisConfig,
    config_revision: u64,
    view: Option<(ViewKey, PageView)>,
}

impl AppState {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            page: Page::default(),
            theme: Theme::default(),
            dataset: None,
            dataset_name: None,
            dataset_generation: 0,
            config,
            config_revision: 0,
            view: None,
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn dataset_name(&self) -> Option<&str> {
        self.dataset_name.as_deref()
    }

    pub fn set_dataset(&mut self, dataset: Dataset, name: impl Into<String>) {
        self.dataset = Some(dataset);
        self.dataset_name = Some(name.into());
        self.dataset_generation += 1;
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AnalysisConfig) {
        if config != self.config {
            self.config = config;
            self.config_revision += 1;
        }
    }

    fn current_key(&self) -> ViewKey {
        ViewKey {
            page: self.page,
            dataset_generation: self.dataset_generation,
            config_revision: self.config_revision,
        }
    }

    /// View for the current page, recomputed from the dataset when the page,
    /// dataset or config changed since it was last built.
    pub fn view(&mut self) -> &mut PageView {
        self.view_and_dataset().0
    }

    /// Like [`AppState::view`], also lending the dataset the view was built from.
    pub fn view_and_dataset(&mut self) -> (&mut PageView, Option<&Dataset>) {
        let key = self.current_key();
        let dataset = self.dataset.as_ref();
        let entry = match self.view.take() {
            Some((k, view)) if k == key => self.view.insert((k, view)),
            _ => {
                let view = build_view(self.page, dataset, &self.config);
                self.view.insert((key, view))
            }
        };
        (&mut entry.1, dataset)
    }
}

fn build_view(page: Page, dataset: Option<&Dataset>, config: &AnalysisConfig) -> PageView {
    let Some(measurement) = page.measurement() else {
        return PageView::Introduction;
    };
    let Some(dataset) = dataset else {
        return PageView::NoData;
    };
    let selection = MeasurementSelection::new(measurement);
    let built = match page {
        Page::AverageGraph => SelectionView::build(dataset, &selection, config)
            .map(|v| PageView::Selection(Box::new(v))),
        _ => AnalysisView::build(dataset, &selection, config)
            .map(|v| PageView::Analysis(Box::new(v))),
    };
    built.unwrap_or_else(|e| {
        tracing::error!("Analysis of {measurement} failed: {e}");
        PageView::Failed(e.to_string())
    })
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Measurement, Reading};
    use chrono::NaiveDate;

    fn tiny_dataset(value: f64) -> Dataset {
        let ts = NaiveDate::from_ymd_opt(2023, 1, 6)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        Dataset::new(vec![Reading {
            timestamp: ts,
            magnetic_field: value,
            electric_field: value,
            power_density: value,
            source: "meter".into(),
        }])
    }

    #[test]
    fn pages_without_data() {
        let mut state = AppState::default();
        assert!(matches!(state.view(), PageView::Introduction));
        state.page = Page::Analysis(Measurement::ElectricField);
        assert!(matches!(state.view(), PageView::NoData));
    }

    #[test]
    fn view_rebuilds_when_dataset_changes() {
        let mut state = AppState::default();
        state.page = Page::AverageGraph;
        state.set_dataset(tiny_dataset(1.0), "a.csv");
        let first = match state.view() {
            PageView::Selection(v) => v.metrics.mean,
            _ => panic!("expected selection view"),
        };
        state.set_dataset(tiny_dataset(5.0), "b.csv");
        let second = match state.view() {
            PageView::Selection(v) => v.metrics.mean,
            _ => panic!("expected selection view"),
        };
        assert_eq!((first, second), (1.0, 5.0));
        assert_eq!(state.dataset_name(), Some("b.csv"));
    }

    #[test]
    fn failed_analysis_is_reported() {
        let mut state = AppState::default();
        state.page = Page::Analysis(Measurement::PowerDensity);
        state.set_dataset(tiny_dataset(f64::NAN), "empty.csv");
        assert!(matches!(state.view(), PageView::Failed(_)));
    }

    #[test]
    fn unchanged_config_keeps_revision() {
        let mut state = AppState::default();
        state.set_config(AnalysisConfig::default());
        assert_eq!(state.config_revision, 0);
        state.set_config(AnalysisConfig {
            outlier_sigma: 3.0,
            ..Default::default()
        });
        assert_eq!(state.config_revision, 1);
    }
}
