use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// One sensor sample. Missing numeric cells are stored as NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: NaiveDateTime,
    /// mG
    pub magnetic_field: f64,
    /// V/m
    pub electric_field: f64,
    /// µW/m²
    pub power_density: f64,
    pub source: String,
}

impl Reading {
    pub fn value(&self, measurement: Measurement) -> f64 {
        match measurement {
            Measurement::MagneticField => self.magnetic_field,
            Measurement::ElectricField => self.electric_field,
            Measurement::PowerDensity => self.power_density,
        }
    }
}

/// An ordered, immutable day of readings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    readings: Vec<Reading>,
}

impl Dataset {
    pub fn new(readings: Vec<Reading>) -> Self {
        Self { readings }
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Calendar day of the first reading. The daily sleep window and the
    /// spike cutoff are anchored to this date.
    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.readings.first().map(|r| r.timestamp.date())
    }

    /// First and last timestamp in source order.
    pub fn time_span(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let first = self.readings.first()?;
        let last = self.readings.last()?;
        Some((first.timestamp, last.timestamp))
    }

    /// Distinct source labels in order of first appearance.
    pub fn sources(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for r in &self.readings {
            if !seen.contains(&r.source.as_str()) {
                seen.push(&r.source);
            }
        }
        seen
    }
}

/// The three numeric columns the pipeline can analyse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Measurement {
    MagneticField,
    ElectricField,
    PowerDensity,
}

impl Measurement {
    pub const ALL: [Measurement; 3] = [
        Measurement::PowerDensity,
        Measurement::ElectricField,
        Measurement::MagneticField,
    ];

    pub fn column_name(&self) -> &'static str {
        match self {
            Measurement::MagneticField => "magnetic_field",
            Measurement::ElectricField => "electric_field",
            Measurement::PowerDensity => "power_density",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Measurement::MagneticField => "mG",
            Measurement::ElectricField => "V/m",
            Measurement::PowerDensity => "\u{00B5}W/m\u{00B2}",
        }
    }

    /// Short axis title.
    pub fn label(&self) -> &'static str {
        match self {
            Measurement::MagneticField => "MF",
            Measurement::ElectricField => "EF",
            Measurement::PowerDensity => "EMF Radiation",
        }
    }

    /// Safe exposure level, 0 when none is defined for this quantity.
    pub fn safe_level(&self) -> f64 {
        match self {
            Measurement::PowerDensity => 1000.0,
            Measurement::MagneticField | Measurement::ElectricField => 0.0,
        }
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

impl FromStr for Measurement {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "magnetic_field" | "mg" => Ok(Measurement::MagneticField),
            "electric_field" | "v/m" => Ok(Measurement::ElectricField),
            "power_density" | "microw/m2" => Ok(Measurement::PowerDensity),
            _ => Err(AnalysisError::InvalidColumn(s.to_string())),
        }
    }
}

/// Which column an analysis run targets, together with its display metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementSelection {
    pub measurement: Measurement,
    pub symbol: String,
    pub label: String,
    /// 0 means "no defined safe threshold".
    pub safe_level: f64,
}

impl MeasurementSelection {
    pub fn new(measurement: Measurement) -> Self {
        Self {
            measurement,
            symbol: measurement.symbol().to_string(),
            label: measurement.label().to_string(),
            safe_level: measurement.safe_level(),
        }
    }

    /// The safe level as an option; the 0 sentinel maps to `None`.
    pub fn safe_threshold(&self) -> Option<f64> {
        if self.safe_level == 0.0 {
            None
        } else {
            Some(self.safe_level)
        }
    }

    /// Axis title such as `EMF Radiation (µW/m²)`.
    pub fn axis_title(&self) -> String {
        format!("{} ({})", self.label, self.symbol)
    }
}

impl From<Measurement> for MeasurementSelection {
    fn from(measurement: Measurement) -> Self {
        Self::new(measurement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_power_density_has_a_safe_threshold() {
        assert_eq!(
            MeasurementSelection::new(Measurement::PowerDensity).safe_threshold(),
            Some(1000.0)
        );
        assert_eq!(MeasurementSelection::new(Measurement::ElectricField).safe_threshold(), None);
        assert_eq!(MeasurementSelection::new(Measurement::MagneticField).safe_threshold(), None);
    }

    #[test]
    fn parses_column_identifiers() {
        assert_eq!("power_density".parse::<Measurement>(), Ok(Measurement::PowerDensity));
        assert_eq!(" mG ".parse::<Measurement>(), Ok(Measurement::MagneticField));
        assert_eq!(
            "source".parse::<Measurement>(),
            Err(AnalysisError::InvalidColumn("source".to_string()))
        );
    }
}
