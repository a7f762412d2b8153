use std::path::{Path, PathBuf};

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "RADSCOPE_CONFIG";
/// Config file looked up in the working directory when the env var is unset.
pub const CONFIG_FILE: &str = "radscope.json";

/// Tunables of the statistics pipeline and the charts built on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub sleep_start: NaiveTime,
    pub wake_start: NaiveTime,
    /// Outliers strictly before this time of day form the spike window.
    pub spike_cutoff: NaiveTime,
    pub rolling_windows: Vec<usize>,
    /// Window of the trend line drawn over the night-time scatter.
    pub sleep_trend_window: usize,
    /// Rolling window plotted on the selection page.
    pub selection_window: usize,
    /// Readings above `mean + outlier_sigma * std_dev` are outliers.
    pub outlier_sigma: f64,
    pub spline_samples: usize,
    /// Overrides the calendar day taken from the first reading.
    pub reference_date: Option<NaiveDate>,
    pub chart_stride: usize,
    pub selection_stride: usize,
    pub histogram_bins: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sleep_start: hms(23, 0),
            wake_start: hms(5, 40),
            spike_cutoff: hms(20, 30),
            rolling_windows: vec![60, 180, 300],
            sleep_trend_window: 600,
            selection_window: 180,
            outlier_sigma: 2.0,
            spline_samples: 300,
            reference_date: None,
            chart_stride: 10,
            selection_stride: 30,
            histogram_bins: 200,
        }
    }
}

fn hms(hour: u32, min: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, min, 0).unwrap_or(NaiveTime::MIN)
}

impl AnalysisConfig {
    /// Read and validate a JSON config file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AnalysisConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config from `RADSCOPE_CONFIG` or `./radscope.json`.
    /// Returns defaults when neither exists.
    pub fn discover() -> Result<Self, ConfigError> {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => {
                let local = PathBuf::from(CONFIG_FILE);
                if !local.exists() {
                    return Ok(Self::default());
                }
                local
            }
        };
        tracing::info!("Loading analysis config from {:?}", path);
        Self::load(&path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rolling_windows.iter().any(|&w| w == 0)
            || self.sleep_trend_window == 0
            || self.selection_window == 0
        {
            return Err(ConfigError::Invalid("rolling windows must be at least 1".into()));
        }
        if !self.outlier_sigma.is_finite() || self.outlier_sigma < 0.0 {
            return Err(ConfigError::Invalid("outlier_sigma must be a non-negative number".into()));
        }
        if self.spline_samples < 2 {
            return Err(ConfigError::Invalid("spline_samples must be at least 2".into()));
        }
        if self.chart_stride == 0 || self.selection_stride == 0 {
            return Err(ConfigError::Invalid("chart strides must be at least 1".into()));
        }
        if self.histogram_bins == 0 {
            return Err(ConfigError::Invalid("histogram_bins must be at least 1".into()));
        }
        Ok(())
    }

    /// Sleep interval for the night that starts on `date`. When the wake time is
    /// not later than the sleep time on the clock it falls on the next day.
    pub fn sleep_window(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        let start = date.and_time(self.sleep_start);
        let wake_date = if self.wake_start <= self.sleep_start {
            date.checked_add_days(Days::new(1)).unwrap_or(date)
        } else {
            date
        };
        (start, wake_date.and_time(self.wake_start))
    }

    pub fn spike_cutoff_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(self.spike_cutoff)
    }
}
