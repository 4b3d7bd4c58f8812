//! Post-hoc clamp of ensemble output to a robustly estimated range.
//!
//! [`BaselineCoefficients`] are estimated once at training time from the raw
//! target and two driver counters. At prediction time the baseline
//! `(k_a·count_a + k_b·count_b) / 2` defines a band, and
//! [`apply_guardrail`] snaps out-of-band predictions to the nearer bound.

mod baseline;
mod clamp;

pub use baseline::BaselineCoefficients;
pub use clamp::{apply_guardrail, predict_with_guardrail, GuardedPrediction, GuardrailConfig};
