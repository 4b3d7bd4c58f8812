//! Canonical in-memory representations of fitted models.
//!
//! These types carry no training logic; trainers in [`crate::training`]
//! produce them and [`crate::persist`] maps them to the stored format.

pub mod forest;
pub mod ridge;
pub mod scaler;
pub mod tree;

pub use forest::Forest;
pub use ridge::{PredictionInterval, RidgeModel, INTERVAL_Z};
pub use scaler::Scaler;
pub use tree::{Node, Tree};
