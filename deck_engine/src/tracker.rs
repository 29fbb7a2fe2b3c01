/// Deck Engine — Tracker
///
/// One explicit context object holding the log, the current role, the
/// tier and custom role names. Every operation goes through it; nothing
/// lives in globals.

use std::collections::BTreeMap;

use tracing::debug;

use crate::engine::LogStore;
use crate::events::{EventKind, EventRecord};
use crate::replay::{replay_clamped, RejectedAt};
use crate::scoring::{ScoreWeights, Tier};
use crate::selection::{build_event, Selection, SelectionError};
use crate::taxonomy::{RoleId, Slot};
use crate::view::LedgerView;

/// Why a submitted selection did not reach the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error("nothing to copy: {role} holds no {slot} card")]
    NothingToCopy { role: RoleId, slot: Slot },
    #[error(transparent)]
    Rejected(#[from] RejectedAt),
    /// The log already holds the largest representable id.
    #[error("event ids exhausted")]
    IdsExhausted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tracker {
    log: LogStore,
    current_role: RoleId,
    tier: Tier,
    role_names: BTreeMap<RoleId, String>,
    weights: ScoreWeights,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::new(ScoreWeights::default())
    }
}

impl Tracker {
    pub fn new(weights: ScoreWeights) -> Self {
        Self {
            log: LogStore::new(),
            current_role: RoleId::Char1,
            tier: Tier::default(),
            role_names: BTreeMap::new(),
            weights,
        }
    }

    /// Rebuild a tracker from persisted parts. The log is taken as is.
    pub fn from_parts(
        events: Vec<EventRecord>,
        current_role: RoleId,
        tier: Tier,
        role_names: BTreeMap<RoleId, String>,
        weights: ScoreWeights,
    ) -> Self {
        let mut tracker = Self {
            log: LogStore::from_events(events),
            current_role,
            tier,
            role_names: BTreeMap::new(),
            weights,
        };
        for (role, name) in role_names {
            tracker.rename_role(role, &name);
        }
        tracker
    }

    // ── Accessors ──────────────────────────────────────────────────

    pub fn events(&self) -> &[EventRecord] {
        self.log.events()
    }

    pub fn current_role(&self) -> RoleId {
        self.current_role
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Custom names only.
    pub fn role_names(&self) -> &BTreeMap<RoleId, String> {
        &self.role_names
    }

    /// Custom name if set, else the default label.
    pub fn role_name(&self, role: RoleId) -> &str {
        self.role_names
            .get(&role)
            .map_or(role.label(), String::as_str)
    }

    // ── Log mutations ──────────────────────────────────────────────

    /// Build an event for the current role from `selection` and append it.
    ///
    /// Copies additionally require at least one card in the target slot.
    pub fn submit(&mut self, selection: &Selection) -> Result<EventRecord, SubmitError> {
        let id = self.log.next_id().ok_or(SubmitError::IdsExhausted)?;
        let event = build_event(id, self.current_role, selection)?;

        if let EventKind::Copy { dst } = event.kind {
            let held = replay_clamped(self.log.events())
                .get(&event.role)
                .map_or(0, |inv| inv.get(dst));
            if held == 0 {
                debug!(role = %event.role, slot = %dst, "copy rejected, slot empty");
                return Err(SubmitError::NothingToCopy { role: event.role, slot: dst });
            }
        }

        self.log.append(event)?;
        Ok(event)
    }

    /// Append a fully-formed record.
    pub fn append(&mut self, candidate: EventRecord) -> Result<(), RejectedAt> {
        self.log.append(candidate)
    }

    pub fn undo_last(&mut self) -> Option<EventRecord> {
        self.log.undo_last()
    }

    pub fn clear(&mut self) {
        self.log.clear();
    }

    // ── Settings ───────────────────────────────────────────────────

    pub fn select_role(&mut self, role: RoleId) {
        self.current_role = role;
    }

    pub fn set_tier(&mut self, tier: Tier) {
        self.tier = tier;
    }

    /// Set a custom name. Surrounding whitespace is trimmed; a blank
    /// name is ignored and `false` returned.
    pub fn rename_role(&mut self, role: RoleId, name: &str) -> bool {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.role_names.insert(role, trimmed.to_string());
        true
    }

    // ── Read side ──────────────────────────────────────────────────

    /// Recompute every projection from the log.
    pub fn view(&self) -> LedgerView {
        LedgerView::build(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::MissingField;
    use crate::taxonomy::{Category, Condition, EventType};

    #[test]
    fn test_submit_targets_current_role_with_fresh_ids() {
        let mut t = Tracker::default();
        t.select_role(RoleId::Char3);
        let sel = Selection::new(EventType::Gain, Category::Neutral, Condition::Normal);
        let a = t.submit(&sel).unwrap();
        let b = t.submit(&sel).unwrap();
        assert_eq!(a.role, RoleId::Char3);
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(t.events().len(), 2);
    }

    #[test]
    fn test_copy_requires_a_held_card() {
        let mut t = Tracker::default();
        let sel = Selection::new(EventType::Copy, Category::Monster, Condition::Foil);
        let err = t.submit(&sel).unwrap_err();
        assert_eq!(
            err,
            SubmitError::NothingToCopy {
                role: RoleId::Char1,
                slot: Slot::new(Category::Monster, Condition::Foil),
            }
        );
        assert!(t.events().is_empty());

        let starter = Selection::new(EventType::Copy, Category::Character, Condition::Normal);
        assert!(t.submit(&starter).is_ok());
    }

    #[test]
    fn test_incomplete_selection_never_reaches_log() {
        let mut t = Tracker::default();
        let sel = Selection::new(EventType::Transform, Category::Monster, Condition::Normal);
        assert_eq!(
            t.submit(&sel),
            Err(SubmitError::Selection(SelectionError::Incomplete(MissingField::Source)))
        );
        assert!(t.events().is_empty());
    }

    #[test]
    fn test_rejected_submit_leaves_log() {
        let mut t = Tracker::default();
        let sel = Selection::new(EventType::Delete, Category::Monster, Condition::Normal);
        assert!(matches!(t.submit(&sel), Err(SubmitError::Rejected(_))));
        assert!(t.events().is_empty());
    }

    #[test]
    fn test_submit_after_max_id_is_an_error() {
        let gain = EventRecord::new(
            u64::MAX,
            RoleId::Char1,
            EventKind::Gain { dst: Slot::new(Category::Neutral, Condition::Normal) },
        );
        let mut t = Tracker::from_parts(
            vec![gain],
            RoleId::Char1,
            Tier::default(),
            BTreeMap::new(),
            ScoreWeights::default(),
        );
        let sel = Selection::new(EventType::Gain, Category::Neutral, Condition::Normal);
        assert_eq!(t.submit(&sel), Err(SubmitError::IdsExhausted));
        assert_eq!(t.events(), &[gain]);
    }

    #[test]
    fn test_rename_trims_and_ignores_blank() {
        let mut t = Tracker::default();
        assert!(t.rename_role(RoleId::Char2, "  Lucas "));
        assert_eq!(t.role_name(RoleId::Char2), "Lucas");
        assert!(!t.rename_role(RoleId::Char2, "   "));
        assert_eq!(t.role_name(RoleId::Char2), "Lucas");
        assert_eq!(t.role_name(RoleId::Char1), "Role 1");
    }
}
