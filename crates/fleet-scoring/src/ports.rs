//! Outbound (driven) ports for the scorer adapter.

use fleet_types::AnomalyVerdict;

/// Where finished verdicts go.
///
/// The production implementation publishes onto the anomaly topic
/// (see [`crate::adapters::BusVerdictSink`]); tests record instead.
pub trait VerdictSink: Send + Sync {
    /// Emit one verdict, best-effort.
    fn publish(&self, verdict: &AnomalyVerdict);
}

/// Recording sink for tests.
#[cfg(test)]
pub(crate) struct RecordingVerdictSink {
    pub verdicts: parking_lot::Mutex<Vec<AnomalyVerdict>>,
}

#[cfg(test)]
impl RecordingVerdictSink {
    pub fn new() -> Self {
        Self {
            verdicts: parking_lot::Mutex::new(Vec::new()),
        }
    }
}

#[cfg(test)]
impl VerdictSink for RecordingVerdictSink {
    fn publish(&self, verdict: &AnomalyVerdict) {
        self.verdicts.lock().push(verdict.clone());
    }
}
