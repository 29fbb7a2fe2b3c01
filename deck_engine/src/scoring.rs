/// Deck Engine — Scoring
///
/// Pure functions from (inventory, statistics) to a score, plus the
/// tier cap and fixed-point progress used to compare roles.

use serde::{Deserialize, Serialize};

use crate::arithmetic::capped_ratio;
use crate::domain::{EventStatistics, InventoryState, RoleMap, ScoreResult};
use crate::taxonomy::EventType;

/// Highest selectable tier.
pub const MAX_TIER: u8 = 15;

// ---------------------------------------------------------------------------
// Weights
// ---------------------------------------------------------------------------

/// Score weights. Injected so the canonical table is not baked into
/// every call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreWeights {
    /// Per-card weight, indexed `[category][condition]`.
    pub cards: [[i64; 4]; 4],
    /// Flat weight per occurrence, indexed by event type.
    pub per_event: [i64; 5],
    /// Weight of the n-th occurrence (1-indexed) of a combo event.
    /// Occurrences past the end use the last tier.
    pub combo_steps: [i64; 5],
    /// Event types scored with `combo_steps`.
    pub combo_events: [EventType; 2],
    /// Bonus per delete of a character card.
    pub delete_character_bonus: i64,
}

impl ScoreWeights {
    pub const CANONICAL: ScoreWeights = ScoreWeights {
        //         normal foil godfoil removed
        cards: [
            [0, 0, 20, 0],    // character
            [20, 30, 50, 0],  // neutral
            [80, 80, 100, 0], // monster
            [20, 30, 50, 0],  // forbidden
        ],
        //          gain flash transform delete copy
        per_event: [0, 10, 0, 0, 0],
        combo_steps: [0, 10, 30, 50, 70],
        combo_events: [EventType::Delete, EventType::Copy],
        delete_character_bonus: 20,
    };

    /// Score contributed by the n-th occurrence of a combo event.
    pub fn combo_step(&self, n: u32) -> i64 {
        if n == 0 {
            return 0;
        }
        let last = self.combo_steps.len() - 1;
        let idx = (n as usize - 1).min(last);
        self.combo_steps[idx]
    }

    /// Sum of the first `count` combo steps.
    pub fn combo_total(&self, count: u32) -> i64 {
        (1..=count).map(|n| self.combo_step(n)).sum()
    }
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self::CANONICAL
    }
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Weighted card total. The removed condition always weighs 0 in the
/// canonical table.
pub fn inventory_score(inv: &InventoryState, weights: &ScoreWeights) -> i64 {
    inv.iter()
        .map(|(slot, n)| {
            weights.cards[slot.category.index()][slot.condition.index()] * i64::from(n)
        })
        .sum()
}

/// Flat per-event weights, combo steps and the character-delete bonus.
pub fn event_score(stats: &EventStatistics, weights: &ScoreWeights) -> i64 {
    let flat: i64 = EventType::ALL
        .into_iter()
        .map(|e| weights.per_event[e.index()] * i64::from(stats.get(e)))
        .sum();

    let combo: i64 = weights
        .combo_events
        .iter()
        .map(|e| weights.combo_total(stats.get(*e)))
        .sum();

    flat + combo + weights.delete_character_bonus * i64::from(stats.delete_character)
}

/// Full score for one role.
pub fn score(
    inv: &InventoryState,
    stats: &EventStatistics,
    weights: &ScoreWeights,
) -> ScoreResult {
    ScoreResult::new(inventory_score(inv, weights), event_score(stats, weights))
}

/// Score every role present in `inventories`. Missing statistics count
/// as empty.
pub fn score_all(
    inventories: &RoleMap<InventoryState>,
    statistics: &RoleMap<EventStatistics>,
    weights: &ScoreWeights,
) -> RoleMap<ScoreResult> {
    let empty = EventStatistics::default();
    inventories
        .iter()
        .map(|(role, inv)| {
            let stats = statistics.get(role).unwrap_or(&empty);
            (*role, score(inv, stats, weights))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tier cap & progress
// ---------------------------------------------------------------------------

/// Tier setting, always within `0..=MAX_TIER`. Tier 0 means uncapped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct Tier(u8);

impl Tier {
    /// Clamp any integer into the valid range.
    pub fn clamped(value: i64) -> Self {
        Tier(value.clamp(0, i64::from(MAX_TIER)) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Score cap: 0 for tier 0, otherwise `30 + 10 * (tier - 1)`.
    pub fn cap(self) -> i64 {
        match self.0 {
            0 => 0,
            t => 30 + 10 * (i64::from(t) - 1),
        }
    }

    pub fn is_over_cap(self, total: i64) -> bool {
        let cap = self.cap();
        cap > 0 && total > cap
    }
}

impl From<u8> for Tier {
    fn from(v: u8) -> Self {
        Tier::clamped(i64::from(v))
    }
}

impl From<Tier> for u8 {
    fn from(t: Tier) -> Self {
        t.0
    }
}

/// Progress of each role in basis points.
///
/// Capped: share of the cap, saturating at `SCALE`.
/// Uncapped: share of the best role's total (at least 1).
pub fn progress(scores: &RoleMap<ScoreResult>, tier: Tier) -> RoleMap<i64> {
    let cap = tier.cap();
    let whole = if cap > 0 {
        cap
    } else {
        scores.values().map(|s| s.total).max().unwrap_or(0).max(1)
    };
    scores
        .iter()
        .map(|(role, s)| (*role, capped_ratio(s.total, whole)))
        .collect()
}
