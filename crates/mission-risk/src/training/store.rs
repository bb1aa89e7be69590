use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};

use crate::risk::RiskEstimator;

/// Immutable estimator state handed to scorers.
#[derive(Debug, Clone, PartialEq)]
pub struct EstimatorSnapshot {
    pub estimator: RiskEstimator,
    pub trained: bool,
    pub trained_at: Option<DateTime<Utc>>,
    pub sample_count: usize,
    /// Incremented on every install; 0 for the initial untrained network.
    pub version: u64,
}

impl EstimatorSnapshot {
    pub fn untrained(estimator: RiskEstimator) -> Self {
        Self {
            estimator,
            trained: false,
            trained_at: None,
            sample_count: 0,
            version: 0,
        }
    }
}

/// Holder for the current estimator snapshot.
///
/// Readers clone an `Arc` to the current snapshot; training installs a replacement in one
/// write, so a reader always sees either the old or the new parameters in full.
#[derive(Debug, Default)]
pub struct EstimatorStore {
    current: RwLock<Option<Arc<EstimatorSnapshot>>>,
}

impl EstimatorStore {
    pub fn new(estimator: RiskEstimator) -> Self {
        Self {
            current: RwLock::new(Some(Arc::new(EstimatorSnapshot::untrained(estimator)))),
        }
    }

    /// Randomly initialised store; a fixed seed gives reproducible scores.
    pub fn seeded(seed: Option<u64>) -> Self {
        Self::new(RiskEstimator::seeded(seed))
    }

    /// Store with no estimator; scoring degrades until training installs one.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Option<Arc<EstimatorSnapshot>> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.snapshot().is_some()
    }

    pub fn version(&self) -> Option<u64> {
        self.snapshot().map(|snapshot| snapshot.version)
    }

    /// Replace the current snapshot.
    pub fn install(&self, snapshot: EstimatorSnapshot) -> Arc<EstimatorSnapshot> {
        let snapshot = Arc::new(snapshot);
        *self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(snapshot.clone());
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readers_keep_their_snapshot_across_installs() {
        let store = EstimatorStore::seeded(Some(1));
        let before = store.snapshot().expect("initialised");

        let mut next = (*before).clone();
        next.version = 1;
        next.trained = true;
        store.install(next);

        assert_eq!(before.version, 0);
        assert_eq!(store.version(), Some(1));
    }

    #[test]
    fn empty_store_reports_uninitialised() {
        let store = EstimatorStore::empty();
        assert!(!store.is_initialized());
        assert!(store.snapshot().is_none());
    }
}
