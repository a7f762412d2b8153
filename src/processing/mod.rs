//! Derived datasets behind every chart.
//!
//! ```text
//!  Dataset + MeasurementSelection
//!        │
//!        ▼
//!   metrics::compute ──► DerivedMetrics (mean, std, inlier/outlier,
//!        │                sleep/awake, rolling averages)
//!        ▼
//!   spike::extract_spike ──► SpikeWindow (+ spline curve)
//!
//!   chart selection ──► selection::reduce ──► mean of selected y
//! ```

pub mod downsampling;
pub mod histogram;
pub mod kd_tree;
pub mod metrics;
pub mod rolling;
pub mod selection;
pub mod spike;
pub mod spline;
pub mod statistics;
