//! Coarse phase events for hosts that report training progress.
//!
//! Training is a batch operation. The only observable boundaries are the four
//! [`Phase`]s; sinks receive a [`PhaseEvent`] when each starts and completes.
//! Events carry no cancellation semantics.

use crossbeam_channel::Sender;

/// Training phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Reading raw records.
    Parse,
    /// Resolving records into a dense dataset.
    DeriveFeatures,
    /// Fitting the model.
    Fit,
    /// Handing the artifact to the store.
    Persist,
}

impl Phase {
    /// All phases in execution order.
    pub const ALL: [Phase; 4] = [Phase::Parse, Phase::DeriveFeatures, Phase::Fit, Phase::Persist];

    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Parse => "parse",
            Phase::DeriveFeatures => "derive_features",
            Phase::Fit => "fit",
            Phase::Persist => "persist",
        }
    }
}

/// Whether a phase is starting or finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Started,
    Completed,
}

/// A phase boundary notification.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseEvent {
    pub phase: Phase,
    pub status: PhaseStatus,
    /// Short human-readable note, e.g. the number of rows parsed.
    pub detail: Option<String>,
}

impl PhaseEvent {
    /// Start event without detail.
    pub fn started(phase: Phase) -> Self {
        Self { phase, status: PhaseStatus::Started, detail: None }
    }

    /// Completion event with a detail line.
    pub fn completed(phase: Phase, detail: impl Into<String>) -> Self {
        Self { phase, status: PhaseStatus::Completed, detail: Some(detail.into()) }
    }
}

impl std::fmt::Display for PhaseEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self.status {
            PhaseStatus::Started => "started",
            PhaseStatus::Completed => "completed",
        };
        write!(f, "{} {status}", self.phase.as_str())?;
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

/// Receiver of phase events.
pub trait ProgressSink {
    /// Receive one event. Sinks must not fail the run.
    fn emit(&mut self, event: PhaseEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    #[inline]
    fn emit(&mut self, _event: PhaseEvent) {}
}

impl ProgressSink for Sender<PhaseEvent> {
    fn emit(&mut self, event: PhaseEvent) {
        // A dropped receiver means nobody is listening any more.
        let _ = self.send(event);
    }
}

impl<F: FnMut(PhaseEvent)> ProgressSink for F {
    fn emit(&mut self, event: PhaseEvent) {
        self(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closure_sink_collects_events() {
        let mut seen = Vec::new();
        {
            let mut sink = |e: PhaseEvent| seen.push(e);
            sink.emit(PhaseEvent::started(Phase::Parse));
            sink.emit(PhaseEvent::completed(Phase::Parse, "3 rows"));
        }
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[1].to_string(), "parse completed: 3 rows");
    }

    #[test]
    fn channel_sink_ignores_dropped_receiver() {
        let (mut tx, rx) = crossbeam_channel::unbounded();
        tx.emit(PhaseEvent::started(Phase::Fit));
        assert_eq!(rx.recv().unwrap(), PhaseEvent::started(Phase::Fit));
        drop(rx);
        tx.emit(PhaseEvent::started(Phase::Persist));
    }
}
