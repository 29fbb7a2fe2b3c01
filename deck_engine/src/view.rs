/// Deck Engine — Ledger View
///
/// Everything a renderer needs, rebuilt from the log after every
/// mutation. Inventories come from clamped replay so a stored log that
/// fails validation still renders without negative counts.

use serde::Serialize;

use crate::deltas::per_role_deltas;
use crate::domain::{EventStatistics, InventoryState, RoleMap, ScoreResult};
use crate::events::EventRecord;
use crate::replay::{aggregate, replay_clamped};
use crate::scoring::{progress, score_all};
use crate::taxonomy::RoleId;
use crate::tracker::Tracker;

/// One row of a role's log, annotated with the score change it caused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRow {
    /// 1-based position within the role's own events.
    pub number: usize,
    pub record: EventRecord,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleView {
    pub role: RoleId,
    pub name: String,
    pub inventory: InventoryState,
    pub statistics: EventStatistics,
    pub score: ScoreResult,
    pub over_cap: bool,
    /// Progress bar fill in basis points.
    pub progress_bp: i64,
    /// Rows in log order.
    pub rows: Vec<LogRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LedgerView {
    /// Score cap; 0 means roles are compared against each other.
    pub cap: i64,
    pub current_role: RoleId,
    pub roles: RoleMap<RoleView>,
}

impl LedgerView {
    pub fn build(tracker: &Tracker) -> Self {
        let events = tracker.events();
        let weights = tracker.weights();
        let tier = tracker.tier();

        let inventories = replay_clamped(events);
        let statistics = aggregate(events);
        let scores = score_all(&inventories, &statistics, weights);
        let fills = progress(&scores, tier);

        let roles = RoleId::ALL
            .into_iter()
            .map(|role| {
                let score = scores.get(&role).copied().unwrap_or_default();
                let deltas = per_role_deltas(role, events, weights);
                let rows = events
                    .iter()
                    .filter(|e| e.role == role)
                    .zip(deltas)
                    .enumerate()
                    .map(|(i, (record, delta))| LogRow {
                        number: i + 1,
                        record: *record,
                        delta,
                    })
                    .collect();

                let view = RoleView {
                    role,
                    name: tracker.role_name(role).to_string(),
                    inventory: inventories.get(&role).cloned().unwrap_or_default(),
                    statistics: statistics.get(&role).cloned().unwrap_or_default(),
                    score,
                    over_cap: tier.is_over_cap(score.total),
                    progress_bp: fills.get(&role).copied().unwrap_or(0),
                    rows,
                };
                (role, view)
            })
            .collect();

        Self {
            cap: tier.cap(),
            current_role: tracker.current_role(),
            roles,
        }
    }

    pub fn role(&self, role: RoleId) -> Option<&RoleView> {
        self.roles.get(&role)
    }

    pub fn scores(&self) -> RoleMap<ScoreResult> {
        self.roles.iter().map(|(r, v)| (*r, v.score)).collect()
    }
}
