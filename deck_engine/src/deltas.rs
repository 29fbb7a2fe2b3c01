/// Deck Engine — Per-Event Score Deltas
///
/// For every event of one role, the change in that role's total score
/// it caused. A private incremental replay: each delta equals
/// `score(prefix[..=i]) - score(prefix[..i])` over the same clamped
/// replay the read side uses. Display only; never feeds back into state.

use crate::domain::{EventStatistics, ScoreResult};
use crate::events::EventRecord;
use crate::scoring::{score, ScoreWeights};
use crate::state::base_inventory;
use crate::taxonomy::RoleId;
use crate::transitions::{apply_event, record_event, ReplayMode};

/// Score deltas for `role`'s events, in log order.
pub fn per_role_deltas(
    role: RoleId,
    events: &[EventRecord],
    weights: &ScoreWeights,
) -> Vec<i64> {
    let mut inv = base_inventory();
    let mut stats = EventStatistics::default();
    let mut pre: ScoreResult = score(&inv, &stats, weights);
    let mut deltas = Vec::new();

    for event in events.iter().filter(|e| e.role == role) {
        // Clamp mode cannot underflow.
        let _ = apply_event(&mut inv, event, ReplayMode::Clamp);
        record_event(&mut stats, event);

        let post = score(&inv, &stats, weights);
        deltas.push(post.total - pre.total);
        pre = post;
    }

    deltas
}

/// Sign class of a delta, for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaSign {
    Positive,
    Negative,
    Zero,
}

impl DeltaSign {
    pub fn of(delta: i64) -> Self {
        match delta {
            d if d > 0 => DeltaSign::Positive,
            d if d < 0 => DeltaSign::Negative,
            _ => DeltaSign::Zero,
        }
    }
}

/// `+N`, `-N` or `0`.
pub fn format_delta(delta: i64) -> String {
    match DeltaSign::of(delta) {
        DeltaSign::Positive => format!("+{delta}"),
        DeltaSign::Negative => delta.to_string(),
        DeltaSign::Zero => "0".to_string(),
    }
}
