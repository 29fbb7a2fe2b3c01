/// Deck Engine — Event Definitions
///
/// Events are pure data: intent and payload only, no transition logic.
/// Only `Transform` carries a source slot; the type system enforces it.
///
/// On the wire a record keeps the legacy flat shape
/// (`targetRole`, `eventType`, `cardType`, `foilType`,
/// `srcCardType?`, `srcFoilType?`) so older saves still load.

use serde::{Deserialize, Serialize};

use crate::taxonomy::{Category, Condition, EventType, RoleId, Slot};

/// What an event does, keyed by event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Gain { dst: Slot },
    Flash { dst: Slot },
    Transform { src: Slot, dst: Slot },
    Delete { dst: Slot },
    Copy { dst: Slot },
}

impl EventKind {
    /// Build a kind from its type and destination. `src` is read only
    /// for `Transform`, where a missing source defaults to
    /// `(Character, dst.condition)`.
    pub fn new(event_type: EventType, dst: Slot, src: Option<Slot>) -> Self {
        match event_type {
            EventType::Gain => EventKind::Gain { dst },
            EventType::Flash => EventKind::Flash { dst },
            EventType::Transform => EventKind::Transform {
                src: src.unwrap_or(Slot::new(Category::Character, dst.condition)),
                dst,
            },
            EventType::Delete => EventKind::Delete { dst },
            EventType::Copy => EventKind::Copy { dst },
        }
    }

    pub fn event_type(&self) -> EventType {
        match self {
            EventKind::Gain { .. } => EventType::Gain,
            EventKind::Flash { .. } => EventType::Flash,
            EventKind::Transform { .. } => EventType::Transform,
            EventKind::Delete { .. } => EventType::Delete,
            EventKind::Copy { .. } => EventType::Copy,
        }
    }

    pub fn dst(&self) -> Slot {
        match *self {
            EventKind::Gain { dst }
            | EventKind::Flash { dst }
            | EventKind::Transform { dst, .. }
            | EventKind::Delete { dst }
            | EventKind::Copy { dst } => dst,
        }
    }

    pub fn src(&self) -> Option<Slot> {
        match *self {
            EventKind::Transform { src, .. } => Some(src),
            _ => None,
        }
    }
}

/// One immutable log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireEventRecord", into = "WireEventRecord")]
pub struct EventRecord {
    pub id: u64,
    pub role: RoleId,
    pub kind: EventKind,
}

impl EventRecord {
    pub fn new(id: u64, role: RoleId, kind: EventKind) -> Self {
        Self { id, role, kind }
    }

    pub fn event_type(&self) -> EventType {
        self.kind.event_type()
    }

    pub fn dst(&self) -> Slot {
        self.kind.dst()
    }
}

/// Flat persisted shape of an `EventRecord`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEventRecord {
    pub id: u64,
    pub target_role: RoleId,
    pub event_type: EventType,
    pub card_type: Category,
    pub foil_type: Condition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_card_type: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_foil_type: Option<Condition>,
}

impl From<WireEventRecord> for EventRecord {
    fn from(w: WireEventRecord) -> Self {
        let dst = Slot::new(w.card_type, w.foil_type);
        let src = match w.event_type {
            EventType::Transform => Some(Slot::new(
                w.src_card_type.unwrap_or(Category::Character),
                w.src_foil_type.unwrap_or(w.foil_type),
            )),
            _ => None,
        };
        EventRecord::new(w.id, w.target_role, EventKind::new(w.event_type, dst, src))
    }
}

impl From<EventRecord> for WireEventRecord {
    fn from(e: EventRecord) -> Self {
        let dst = e.dst();
        let src = e.kind.src();
        Self {
            id: e.id,
            target_role: e.role,
            event_type: e.event_type(),
            card_type: dst.category,
            foil_type: dst.condition,
            src_card_type: src.map(|s| s.category),
            src_foil_type: src.map(|s| s.condition),
        }
    }
}
