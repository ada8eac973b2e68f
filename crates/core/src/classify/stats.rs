use canopy_api::models::ClassificationResult;
use canopy_api::models::Language;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Snapshot of classifier activity, for operational observability only.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassifierStats {
    pub total: u64,
    pub by_language: BTreeMap<String, u64>,
    pub by_kind: BTreeMap<String, u64>,
    pub by_method: BTreeMap<String, u64>,
    pub average_confidence: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_hit_ratio: f64,
}

#[derive(Default)]
struct StatsState {
    total: u64,
    by_language: BTreeMap<String, u64>,
    by_kind: BTreeMap<String, u64>,
    by_method: BTreeMap<String, u64>,
    confidence_sum: f64,
}

#[derive(Default)]
pub(crate) struct StatsRecorder {
    state: Mutex<StatsState>,
}

impl StatsRecorder {
    pub fn record(&self, language: &Language, result: &ClassificationResult) {
        let mut state = self.state.lock().expect("classifier stats lock poisoned");
        state.total += 1;
        *state.by_language.entry(language.to_string()).or_default() += 1;
        *state.by_kind.entry(result.kind.as_str().to_string()).or_default() += 1;
        *state
            .by_method
            .entry(result.method.as_str().to_string())
            .or_default() += 1;
        state.confidence_sum += f64::from(result.confidence);
    }

    pub fn snapshot(&self, cache_hits: u64, cache_misses: u64, cache_hit_ratio: f64) -> ClassifierStats {
        let state = self.state.lock().expect("classifier stats lock poisoned");
        ClassifierStats {
            total: state.total,
            by_language: state.by_language.clone(),
            by_kind: state.by_kind.clone(),
            by_method: state.by_method.clone(),
            average_confidence: if state.total == 0 {
                0.0
            } else {
                state.confidence_sum / state.total as f64
            },
            cache_hits,
            cache_misses,
            cache_hit_ratio,
        }
    }

    pub fn reset(&self) {
        *self.state.lock().expect("classifier stats lock poisoned") = StatsState::default();
    }
}
