/// Deck Engine — Replay
///
/// Deterministic recomputation of per-role projections from the log.
/// Log order is replay order; nothing is ever reordered.

use tracing::debug;

use crate::domain::{EventStatistics, InventoryState, RoleMap};
use crate::events::EventRecord;
use crate::state::{base_inventories, base_statistics};
use crate::taxonomy::{RoleId, Slot};
use crate::transitions::{apply_event, record_event, ReplayMode};

/// Replay stopped: the event at `index` would drive a slot negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("event #{index} (id {event_id}) would drive {role} {slot} below zero (has {count})")]
pub struct RejectedAt {
    /// Position of the offending event in the replayed log.
    pub index: usize,
    pub event_id: u64,
    pub role: RoleId,
    pub slot: Slot,
    pub count: u32,
}

/// Replay every event against the base inventory.
///
/// `Clamp` mode never returns `Err`.
pub fn replay(
    events: &[EventRecord],
    mode: ReplayMode,
) -> Result<RoleMap<InventoryState>, RejectedAt> {
    let mut inventories = base_inventories();

    for (index, event) in events.iter().enumerate() {
        let inv = inventories.entry(event.role).or_default();
        apply_event(inv, event, mode).map_err(|underflow| {
            debug!(index, event_id = event.id, slot = %underflow.slot, "replay rejected event");
            RejectedAt {
                index,
                event_id: event.id,
                role: event.role,
                slot: underflow.slot,
                count: underflow.count,
            }
        })?;
    }

    Ok(inventories)
}

/// Clamped replay for display. Never fails.
pub fn replay_clamped(events: &[EventRecord]) -> RoleMap<InventoryState> {
    let mut inventories = base_inventories();
    for event in events {
        let inv = inventories.entry(event.role).or_default();
        // Clamp mode cannot underflow.
        let _ = apply_event(inv, event, ReplayMode::Clamp);
    }
    inventories
}

/// Check that a whole log replays without any slot going negative.
pub fn validate_log(events: &[EventRecord]) -> Result<(), RejectedAt> {
    replay(events, ReplayMode::Validate).map(|_| ())
}

/// Count event types per role in a single pass. No validation.
pub fn aggregate(events: &[EventRecord]) -> RoleMap<EventStatistics> {
    let mut stats = base_statistics();
    for event in events {
        record_event(stats.entry(event.role).or_default(), event);
    }
    stats
}
