//! Verbosity-gated training output.
//!
//! Messages go through the `log` facade; the host decides where they end up.
//! [`Verbosity`] is an additional per-run gate so a caller can silence a
//! training run without touching the global logger.

use std::time::Instant;

use serde::{Deserialize, Serialize};

/// Verbosity level for training output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// No output.
    Silent,
    /// Warnings only.
    #[default]
    Warning,
    /// Per-round progress.
    Info,
    /// Everything, including per-split detail.
    Debug,
}

/// Structured logger for one training run.
#[derive(Debug)]
pub struct TrainingLogger {
    verbosity: Verbosity,
    model: &'static str,
    started: Option<Instant>,
}

impl TrainingLogger {
    /// Create a logger for a model family (e.g. `"ridge"`).
    pub fn new(model: &'static str, verbosity: Verbosity) -> Self {
        Self { verbosity, model, started: None }
    }

    /// Configured verbosity.
    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    /// Mark the start of training.
    pub fn start_training(&mut self, n_samples: usize, n_features: usize) {
        self.started = Some(Instant::now());
        if self.verbosity >= Verbosity::Info {
            log::info!(
                "[{}] training on {n_samples} rows x {n_features} features",
                self.model
            );
        }
    }

    /// Report the training loss after a boosting round.
    pub fn log_round(&self, round: usize, sse: f64) {
        if self.verbosity >= Verbosity::Info {
            log::info!("[{}] round {round}: train-sse {sse:.6}", self.model);
        }
    }

    /// Report a detail line.
    pub fn debug(&self, message: impl AsRef<str>) {
        if self.verbosity >= Verbosity::Debug {
            log::debug!("[{}] {}", self.model, message.as_ref());
        }
    }

    /// Report a recoverable problem.
    pub fn warn(&self, message: impl AsRef<str>) {
        if self.verbosity >= Verbosity::Warning {
            log::warn!("[{}] {}", self.model, message.as_ref());
        }
    }

    /// Mark the end of training.
    pub fn finish_training(&self, residual_std: f64) {
        if self.verbosity >= Verbosity::Info {
            let elapsed = self.started.map(|t| t.elapsed().as_secs_f64()).unwrap_or(0.0);
            log::info!(
                "[{}] finished in {elapsed:.3}s, residual std {residual_std:.6}",
                self.model
            );
        }
    }
}
