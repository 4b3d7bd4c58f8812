//! Data ingestion: raw records, schema resolution and dense datasets.
//!
//! - [`RawRecord`] / [`RawCell`]: loosely typed rows as delivered by the host
//! - [`DatasetSchema`]: which columns are read and how features are derived
//! - [`TrainingMode`]: per-day rates or whole-window totals
//! - [`Dataset`]: dense, fixed-schema matrix consumed by the trainers
//! - [`read_records`] / [`load_records`]: headed CSV input

mod csv_input;
mod dataset;
mod record;
mod schema;

pub use csv_input::{load_records, read_records};
pub use dataset::Dataset;
pub use record::{RawCell, RawRecord};
pub use schema::{per_day, DatasetSchema, TrainingMode};
