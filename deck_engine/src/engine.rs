/// Deck Engine — Log Store
///
/// Sole owner of the ordered event log. The only structural mutations
/// are append-at-end (after validation) and truncate-from-end.

use tracing::debug;

use crate::events::EventRecord;
use crate::replay::{validate_log, RejectedAt};

/// Append-only event log with undo-by-truncation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogStore {
    events: Vec<EventRecord>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already-persisted log without validating it.
    ///
    /// Stored logs may have been edited externally; readers fall back to
    /// clamped replay for those.
    pub fn from_events(events: Vec<EventRecord>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Id for the next appended event: one past the largest id in the log.
    ///
    /// `None` once a stored log already holds `u64::MAX`.
    pub fn next_id(&self) -> Option<u64> {
        match self.events.iter().map(|e| e.id).max() {
            Some(id) => id.checked_add(1),
            None => Some(1),
        }
    }

    /// Validate `log + [candidate]` and commit on success.
    ///
    /// On rejection the log is unchanged.
    pub fn append(&mut self, candidate: EventRecord) -> Result<(), RejectedAt> {
        let mut next = Vec::with_capacity(self.events.len() + 1);
        next.extend_from_slice(&self.events);
        next.push(candidate);

        validate_log(&next)?;

        debug!(
            event_id = candidate.id,
            role = %candidate.role,
            event_type = %candidate.event_type(),
            slot = %candidate.dst(),
            "event committed"
        );
        self.events = next;
        Ok(())
    }

    /// Drop the last event. No-op on an empty log.
    pub fn undo_last(&mut self) -> Option<EventRecord> {
        let popped = self.events.pop();
        if let Some(e) = &popped {
            debug!(event_id = e.id, "event undone");
        }
        popped
    }

    /// Drop every event. Callers confirm with the user first.
    pub fn clear(&mut self) {
        debug!(dropped = self.events.len(), "log cleared");
        self.events.clear();
    }
}
