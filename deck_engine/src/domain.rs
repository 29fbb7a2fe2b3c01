/// Deck Engine — Core Domain Types
///
/// Pure data. No replay logic lives here.
/// Every projection is rebuilt from the log on demand.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::taxonomy::{Category, Condition, EventType, RoleId, Slot};

/// Per-role projection, keyed in role display order.
pub type RoleMap<T> = BTreeMap<RoleId, T>;

// ── Inventory ──────────────────────────────────────────────────────

/// Card counts for one role, indexed `[category][condition]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryState {
    counts: [[u32; 4]; 4],
}

impl InventoryState {
    pub fn get(&self, slot: Slot) -> u32 {
        self.counts[slot.category.index()][slot.condition.index()]
    }

    pub fn set(&mut self, slot: Slot, count: u32) {
        self.counts[slot.category.index()][slot.condition.index()] = count;
    }

    /// Count for a `(category, condition)` pair.
    pub fn count(&self, category: Category, condition: Condition) -> u32 {
        self.get(Slot::new(category, condition))
    }

    /// All sixteen slots with their counts, category-major.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, u32)> + '_ {
        Slot::all().map(move |slot| (slot, self.get(slot)))
    }

    /// Slots holding at least one card.
    pub fn nonzero(&self) -> impl Iterator<Item = (Slot, u32)> + '_ {
        self.iter().filter(|(_, n)| *n > 0)
    }

    /// Row of counts for one category, in condition display order.
    pub fn row(&self, category: Category) -> [u32; 4] {
        self.counts[category.index()]
    }
}

// ── Event statistics ───────────────────────────────────────────────

/// Event-type occurrence counts for one role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventStatistics {
    by_type: [u32; 5],
    /// Delete events whose destination category is `Character`.
    pub delete_character: u32,
}

impl EventStatistics {
    pub fn get(&self, event_type: EventType) -> u32 {
        self.by_type[event_type.index()]
    }

    pub(crate) fn bump(&mut self, event_type: EventType) {
        self.by_type[event_type.index()] += 1;
    }

    /// Counts in event-type display order.
    pub fn counts(&self) -> [u32; 5] {
        self.by_type
    }

    /// Total events recorded for the role.
    pub fn total(&self) -> u32 {
        self.by_type.iter().sum()
    }
}

// ── Scores ─────────────────────────────────────────────────────────

/// Score split for one role. Derived, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub inventory_score: i64,
    pub event_score: i64,
    pub total: i64,
}

impl ScoreResult {
    pub fn new(inventory_score: i64, event_score: i64) -> Self {
        Self {
            inventory_score,
            event_score,
            total: inventory_score + event_score,
        }
    }
}
