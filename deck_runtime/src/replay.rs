//! Replay orchestrator — rebuild and verify derived state from a log.
//!
//! Delegates all domain logic to the engine. No shortcuts, no cached
//! state.

use deck_engine::events::EventRecord;
use deck_engine::hashing::canonical_hash;
use deck_engine::replay::{validate_log, RejectedAt};
use deck_engine::scoring::ScoreWeights;

/// Two replays of the same log disagreed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("DETERMINISM FAILURE: run 1 {first}, run 2 {second}")]
pub struct DeterminismError {
    pub first: String,
    pub second: String,
}

/// Health of a stored log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogReport {
    pub events: usize,
    pub hash: String,
    /// First event that would drive a slot negative, if any. Such logs
    /// still render through clamped replay.
    pub rejected: Option<RejectedAt>,
}

impl LogReport {
    pub fn is_valid(&self) -> bool {
        self.rejected.is_none()
    }
}

/// Replay twice and require identical hashes. Returns the hash.
pub fn verify_determinism(
    events: &[EventRecord],
    weights: &ScoreWeights,
) -> Result<String, DeterminismError> {
    let first = canonical_hash(events, weights);
    let second = canonical_hash(events, weights);
    if first != second {
        return Err(DeterminismError { first, second });
    }
    Ok(first)
}

/// Validate and hash a log in one pass over the engine.
pub fn inspect_log(events: &[EventRecord], weights: &ScoreWeights) -> LogReport {
    LogReport {
        events: events.len(),
        hash: canonical_hash(events, weights),
        rejected: validate_log(events).err(),
    }
}
