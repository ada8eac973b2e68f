use canopy_api::models::NodeIdentity;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::warn;

#[derive(Default)]
struct TrackerState {
    /// digest -> distinct identities that produced it.
    producers: HashMap<String, Vec<NodeIdentity>>,
    /// Insertion order of digests, for oldest-first eviction.
    order: VecDeque<String>,
}

/// Capacity-bounded map from digest to the distinct identities that
/// produced it.
///
/// Structural equality against known producers distinguishes idempotent
/// regeneration (the common case when reprocessing unchanged files) from a
/// genuine hash collision.
pub struct CollisionTracker {
    state: Mutex<TrackerState>,
    capacity: usize,
    genuine: AtomicU64,
}

impl CollisionTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(TrackerState::default()),
            capacity: capacity.max(1),
            genuine: AtomicU64::new(0),
        }
    }

    pub fn record(&self, digest: &str, identity: &NodeIdentity) {
        let mut state = self.state.lock().expect("collision tracker lock poisoned");
        if let Some(known) = state.producers.get_mut(digest) {
            if known.iter().any(|k| k == identity) {
                return;
            }
            known.push(identity.clone());
            self.genuine.fetch_add(1, Ordering::Relaxed);
            warn!(digest, producers = known.len(), "genuine digest collision recorded");
            return;
        }

        while state.order.len() >= self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.producers.remove(&oldest);
            }
        }
        state.producers.insert(digest.to_string(), vec![identity.clone()]);
        state.order.push_back(digest.to_string());
    }

    pub fn producers_of(&self, digest: &str) -> Vec<NodeIdentity> {
        let state = self.state.lock().expect("collision tracker lock poisoned");
        state.producers.get(digest).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        let state = self.state.lock().expect("collision tracker lock poisoned");
        state.producers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn genuine_collisions(&self) -> u64 {
        self.genuine.load(Ordering::Relaxed)
    }

    pub fn clear(&self) {
        let mut state = self.state.lock().expect("collision tracker lock poisoned");
        state.producers.clear();
        state.order.clear();
        self.genuine.store(0, Ordering::Relaxed);
    }
}
