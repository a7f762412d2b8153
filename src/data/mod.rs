//! Loading a sensor export into a [`model::Dataset`].
//!
//! ```text
//!  .xlsx / .csv ──► loader (rows of text) ──► parser (header row)
//!                                         ──► schema (column roles)
//!                                         ──► datetime (timestamps)
//!                                         ──► Dataset
//! ```

pub mod datetime;
pub mod loader;
pub mod model;
pub mod parser;
pub mod schema;
