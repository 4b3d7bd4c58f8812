//! Batch training pipeline: parse, derive features, fit, persist.
//!
//! The run is atomic from the caller's point of view. Nothing is handed to the
//! [`ArtifactStore`] until fitting has succeeded, so a failed or abandoned run
//! leaves the previously stored artifact authoritative.

use crate::data::{Dataset, RawRecord};
use crate::error::{ModelError, ParamValidationError};
use crate::model::{BoostedForecaster, ForecastConfig, ModelKind, RidgeForecaster};
use crate::persist::{Artifact, ArtifactStore, WriteError};
use crate::training::{EvalReport, Phase, PhaseEvent, ProgressSink};

/// Failure of a pipeline run.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ParamValidationError),

    /// Fitting failed.
    #[error("training failed: {0}")]
    Model(#[from] ModelError),

    /// The store rejected the artifact.
    #[error("persisting artifact failed: {0}")]
    Persist(#[from] WriteError),
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    /// The artifact that was stored.
    pub artifact: Artifact,
    /// In-sample accuracy of the artifact.
    pub report: EvalReport,
}

/// Runs the training phases for one [`ForecastConfig`].
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    config: ForecastConfig,
}

impl TrainingPipeline {
    /// Create a pipeline.
    ///
    /// # Errors
    ///
    /// If the configuration fails validation.
    pub fn new(config: ForecastConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Fit the configured model family on a resolved dataset.
    ///
    /// # Errors
    ///
    /// Any training error.
    pub fn fit(&self, dataset: &Dataset) -> Result<Artifact, ModelError> {
        Ok(match self.config.model {
            ModelKind::Ridge => RidgeForecaster::train(dataset, &self.config.ridge_params())?.into(),
            ModelKind::Boosted => {
                BoostedForecaster::train(dataset, &self.config.boost_params())?.into()
            }
        })
    }

    /// Execute every phase, emitting start and completion events to `sink`.
    ///
    /// # Errors
    ///
    /// The first failing phase. Phases after it are not started.
    pub fn run<I, S, P>(&self, records: I, store: &mut S, sink: &mut P) -> Result<TrainingOutcome, PipelineError>
    where
        I: IntoIterator<Item = RawRecord>,
        S: ArtifactStore + ?Sized,
        P: ProgressSink + ?Sized,
    {
        sink.emit(PhaseEvent::started(Phase::Parse));
        let records: Vec<RawRecord> = records.into_iter().collect();
        sink.emit(PhaseEvent::completed(Phase::Parse, format!("{} records", records.len())));

        sink.emit(PhaseEvent::started(Phase::DeriveFeatures));
        let dataset = self.config.schema.resolve(&records, self.config.mode);
        sink.emit(PhaseEvent::completed(
            Phase::DeriveFeatures,
            format!("{} rows x {} features ({})", dataset.n_samples(), dataset.n_features(), dataset.mode()),
        ));

        sink.emit(PhaseEvent::started(Phase::Fit));
        let artifact = self.fit(&dataset)?;
        let report = artifact.evaluate(&dataset)?;
        sink.emit(PhaseEvent::completed(Phase::Fit, format!("{} model, {report}", artifact.kind().as_str())));

        sink.emit(PhaseEvent::started(Phase::Persist));
        store.save(&artifact)?;
        sink.emit(PhaseEvent::completed(Phase::Persist, "artifact saved"));

        log::info!("trained {} model: {report}", artifact.kind().as_str());
        Ok(TrainingOutcome { artifact, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryStore;
    use crate::training::{NoProgress, PhaseStatus};
    use crate::testing::synthetic_records;

    #[test]
    fn emits_every_phase_in_order() {
        let pipeline = TrainingPipeline::default();
        let mut events = Vec::new();
        let mut store = MemoryStore::new();
        pipeline
            .run(synthetic_records(30, 3), &mut store, &mut |e: PhaseEvent| events.push(e))
            .unwrap();

        let expected: Vec<(Phase, PhaseStatus)> = Phase::ALL
            .iter()
            .flat_map(|&p| [(p, PhaseStatus::Started), (p, PhaseStatus::Completed)])
            .collect();
        let seen: Vec<(Phase, PhaseStatus)> = events.iter().map(|e| (e.phase, e.status)).collect();
        assert_eq!(seen, expected);
        assert!(store.artifact().is_some());
    }

    #[test]
    fn failed_fit_leaves_store_untouched() {
        let pipeline = TrainingPipeline::default();
        let mut store = MemoryStore::new();
        let first = pipeline.run(synthetic_records(30, 3), &mut store, &mut NoProgress).unwrap();

        let err = pipeline.run(Vec::new(), &mut store, &mut NoProgress).unwrap_err();
        assert!(matches!(err, PipelineError::Model(ModelError::EmptyDataset)));
        assert_eq!(store.artifact(), Some(&first.artifact));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut config = ForecastConfig::default();
        config.guardrail.low_percent = -5.0;
        assert!(matches!(TrainingPipeline::new(config), Err(PipelineError::Config(_))));
    }
}
