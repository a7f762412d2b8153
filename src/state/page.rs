use serde::{Deserialize, Serialize};

use crate::data::model::Measurement;

/// Sidebar topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Page {
    Introduction,
    /// Full chart sequence for one measurement column.
    Analysis(Measurement),
    /// Rolling-average chart with brush selection.
    AverageGraph,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Introduction,
        Page::Analysis(Measurement::PowerDensity),
        Page::AverageGraph,
        Page::Analysis(Measurement::ElectricField),
        Page::Analysis(Measurement::MagneticField),
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Page::Introduction => "Introduction",
            Page::Analysis(Measurement::PowerDensity) => "EMF Analysis",
            Page::Analysis(Measurement::ElectricField) => "EF Analysis",
            Page::Analysis(Measurement::MagneticField) => "MF Analysis",
            Page::AverageGraph => "EMF Graph",
        }
    }

    /// Column the page analyses; the graph page works on power density.
    pub fn measurement(&self) -> Option<Measurement> {
        match self {
            Page::Introduction => None,
            Page::Analysis(m) => Some(*m),
            Page::AverageGraph => Some(Measurement::PowerDensity),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::Introduction
    }
}
