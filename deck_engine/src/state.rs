/// Deck Engine — Base State Construction
///
/// Every replay starts from the same fixed base: four normal
/// character cards per role, no events recorded.

use crate::domain::{EventStatistics, InventoryState, RoleMap};
use crate::taxonomy::{Category, Condition, RoleId, Slot};

/// Normal character cards each role starts with.
pub const STARTING_CHARACTER_CARDS: u32 = 4;

/// Fresh inventory for a single role.
pub fn base_inventory() -> InventoryState {
    let mut inv = InventoryState::default();
    inv.set(
        Slot::new(Category::Character, Condition::Normal),
        STARTING_CHARACTER_CARDS,
    );
    inv
}

/// Fresh inventory for every role.
pub fn base_inventories() -> RoleMap<InventoryState> {
    RoleId::ALL.into_iter().map(|r| (r, base_inventory())).collect()
}

/// Empty statistics for every role.
pub fn base_statistics() -> RoleMap<EventStatistics> {
    RoleId::ALL
        .into_iter()
        .map(|r| (r, EventStatistics::default()))
        .collect()
}
