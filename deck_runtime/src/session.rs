//! Session — a tracker bound to a blob store.
//!
//! Load order:
//!   1. current key, else the legacy key
//!   2. nothing stored → fresh tracker
//!   3. blob fails to decode → fresh tracker, warning logged
//!
//! Loading and saving replace the whole blob at once. Log mutations
//! stay in memory until `save`.

use tracing::{info, instrument, warn};

use deck_engine::scoring::ScoreWeights;
use deck_engine::tracker::Tracker;

use crate::blob_store::BlobStore;
use crate::replay::inspect_log;
use crate::save_codec::{decode_save, encode_save, SaveError, LEGACY_STORAGE_KEY, STORAGE_KEY};

/// How the last load went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Restored from the given key.
    Loaded { key: &'static str },
    /// Nothing stored under either key.
    Empty,
    /// A blob was found but could not be decoded; defaults were used.
    Malformed { key: &'static str },
}

pub struct Session<S: BlobStore> {
    tracker: Tracker,
    store: S,
    weights: ScoreWeights,
}

impl<S: BlobStore> Session<S> {
    /// Open a session over `store` and load whatever it holds.
    pub fn open(store: S, weights: ScoreWeights) -> Result<(Self, LoadOutcome), SaveError> {
        let mut session = Self {
            tracker: Tracker::new(weights.clone()),
            store,
            weights,
        };
        let outcome = session.load()?;
        Ok((session, outcome))
    }

    /// Replace the in-memory tracker with the stored one.
    ///
    /// Only store I/O errors are returned; a malformed blob resets to a
    /// fresh tracker instead.
    #[instrument(skip(self))]
    pub fn load(&mut self) -> Result<LoadOutcome, SaveError> {
        let found = match self.store.get(STORAGE_KEY)? {
            Some(raw) => Some((STORAGE_KEY, raw)),
            None => self
                .store
                .get(LEGACY_STORAGE_KEY)?
                .map(|raw| (LEGACY_STORAGE_KEY, raw)),
        };

        let Some((key, raw)) = found else {
            info!("no save found");
            self.tracker = Tracker::new(self.weights.clone());
            return Ok(LoadOutcome::Empty);
        };

        match decode_save(&raw) {
            Ok(data) => {
                self.tracker = data.into_tracker(self.weights.clone());
                let report = inspect_log(self.tracker.events(), &self.weights);
                if let Some(at) = report.rejected {
                    warn!(%at, "stored log fails validation; showing clamped counts");
                }
                info!(key, events = report.events, hash = %report.hash, "save loaded");
                Ok(LoadOutcome::Loaded { key })
            }
            Err(e) => {
                warn!(key, error = %e, "save is malformed; starting fresh");
                self.tracker = Tracker::new(self.weights.clone());
                Ok(LoadOutcome::Malformed { key })
            }
        }
    }

    /// Write the tracker under the current key.
    #[instrument(skip(self))]
    pub fn save(&mut self) -> Result<(), SaveError> {
        let json = encode_save(&self.tracker)?;
        self.store.put(STORAGE_KEY, &json)?;
        info!(events = self.tracker.events().len(), "save written");
        Ok(())
    }

    /// Delete the stored blob under both keys. The in-memory tracker is
    /// left alone.
    pub fn clear_save(&mut self) -> Result<(), SaveError> {
        self.store.remove(STORAGE_KEY)?;
        self.store.remove(LEGACY_STORAGE_KEY)?;
        info!("save cleared");
        Ok(())
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob_store::MemoryBlobStore;
    use deck_engine::selection::Selection;
    use deck_engine::taxonomy::{Category, Condition, EventType, RoleId};

    #[test]
    fn test_empty_store_opens_fresh() {
        let (session, outcome) =
            Session::open(MemoryBlobStore::new(), ScoreWeights::default()).unwrap();
        assert_eq!(outcome, LoadOutcome::Empty);
        assert!(session.tracker().events().is_empty());
        assert_eq!(session.tracker().current_role(), RoleId::Char1);
    }

    #[test]
    fn test_save_then_reload() {
        let (mut session, _) =
            Session::open(MemoryBlobStore::new(), ScoreWeights::default()).unwrap();
        session
            .tracker_mut()
            .submit(&Selection::new(EventType::Gain, Category::Neutral, Condition::Normal))
            .unwrap();
        session.save().unwrap();

        let store = session.store().clone();
        let (reopened, outcome) = Session::open(store, ScoreWeights::default()).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded { key: STORAGE_KEY });
        assert_eq!(reopened.tracker(), session.tracker());
    }

    #[test]
    fn test_malformed_blob_falls_back_to_default() {
        let mut store = MemoryBlobStore::new();
        store.put(STORAGE_KEY, "{ truncated").unwrap();
        let (session, outcome) = Session::open(store, ScoreWeights::default()).unwrap();
        assert_eq!(outcome, LoadOutcome::Malformed { key: STORAGE_KEY });
        assert_eq!(session.tracker(), &Tracker::default());
    }
}
