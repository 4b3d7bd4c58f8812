//! Seeded synthetic data for tests and benchmarks.

mod data;

pub use data::{split_indices, synthetic_linear, synthetic_records};
