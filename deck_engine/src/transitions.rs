/// Deck Engine — Centralized Transition Logic
///
/// ALL inventory and statistics mutation lives here.
/// Each event becomes one or two signed unit deltas on slots:
///
/// | event     | deltas                               |
/// |-----------|--------------------------------------|
/// | gain      | dst +1                               |
/// | flash     | (dst.category, normal) −1; dst +1    |
/// | transform | src −1; dst +1                       |
/// | delete    | dst −1                               |
/// | copy      | dst +1                               |

use crate::arithmetic::{apply_delta, apply_delta_clamped};
use crate::domain::{EventStatistics, InventoryState};
use crate::events::{EventKind, EventRecord};
use crate::taxonomy::{Category, Condition, EventType, Slot};

/// A signed unit change to one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotDelta {
    pub slot: Slot,
    pub delta: i32,
}

/// How replay treats a delta that would drive a slot negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayMode {
    /// Stop and report the offending slot.
    Validate,
    /// Floor the slot at zero and continue. Display only.
    Clamp,
}

/// A slot that could not absorb a decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotUnderflow {
    pub slot: Slot,
    /// Count held by the slot when the decrement was attempted.
    pub count: u32,
}

// ---------------------------------------------------------------------------
// Effects
// ---------------------------------------------------------------------------

/// Slot deltas for an event, in application order.
pub fn effects(kind: &EventKind) -> impl Iterator<Item = SlotDelta> {
    let dec = |slot| SlotDelta { slot, delta: -1 };
    let inc = |slot| SlotDelta { slot, delta: 1 };

    let (first, second) = match *kind {
        EventKind::Gain { dst } | EventKind::Copy { dst } => (inc(dst), None),
        EventKind::Flash { dst } => (
            dec(Slot::new(dst.category, Condition::Normal)),
            Some(inc(dst)),
        ),
        EventKind::Transform { src, dst } => (dec(src), Some(inc(dst))),
        EventKind::Delete { dst } => (dec(dst), None),
    };
    std::iter::once(first).chain(second)
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// Apply one event to a single role's inventory.
///
/// In `Validate` mode the inventory is left untouched when any delta
/// would underflow. In `Clamp` mode this never fails.
pub fn apply_event(
    inv: &mut InventoryState,
    event: &EventRecord,
    mode: ReplayMode,
) -> Result<(), SlotUnderflow> {
    let mut next = inv.clone();

    for SlotDelta { slot, delta } in effects(&event.kind) {
        let count = next.get(slot);
        let updated = match mode {
            ReplayMode::Validate => {
                apply_delta(count, delta).ok_or(SlotUnderflow { slot, count })?
            }
            ReplayMode::Clamp => apply_delta_clamped(count, delta),
        };
        next.set(slot, updated);
    }

    *inv = next;
    Ok(())
}

// ---------------------------------------------------------------------------
// Statistics
// ---------------------------------------------------------------------------

/// Count one event against a role's statistics. Never fails.
pub fn record_event(stats: &mut EventStatistics, event: &EventRecord) {
    let event_type = event.event_type();
    stats.bump(event_type);
    if event_type == EventType::Delete && event.dst().category == Category::Character {
        stats.delete_character += 1;
    }
}
