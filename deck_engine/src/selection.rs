/// Deck Engine — Selection
///
/// Building an event from the caller's current selection.
///
/// A selection may be partial; it only becomes an `EventRecord` once every
/// field its event type needs is present and the destination condition is
/// one that event type can produce.

use serde::{Deserialize, Serialize};

use crate::events::{EventKind, EventRecord};
use crate::taxonomy::{Category, Condition, EventType, RoleId, Slot};

/// Which part of a selection is missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    EventType,
    Destination,
    Source,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("incomplete selection: missing {0:?}")]
    Incomplete(MissingField),
    #[error("{event_type} cannot produce a {condition} card")]
    ConditionNotAllowed {
        event_type: EventType,
        condition: Condition,
    },
}

/// Options picked by the caller. Source fields matter only for transform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub event_type: Option<EventType>,
    pub category: Option<Category>,
    pub condition: Option<Condition>,
    pub src_category: Option<Category>,
    pub src_condition: Option<Condition>,
}

impl Selection {
    /// A selection with event type and destination filled in.
    pub fn new(event_type: EventType, category: Category, condition: Condition) -> Self {
        Self {
            event_type: Some(event_type),
            category: Some(category),
            condition: Some(condition),
            ..Self::default()
        }
    }

    pub fn with_source(mut self, category: Category, condition: Condition) -> Self {
        self.src_category = Some(category);
        self.src_condition = Some(condition);
        self
    }
}

/// Whether `event_type` may target a card in `condition`.
///
/// Gains and transforms produce normal or removed cards, flashes produce
/// foil or godfoil cards, deletes and copies accept anything.
pub fn allows_condition(event_type: EventType, condition: Condition) -> bool {
    use Condition::*;
    match event_type {
        EventType::Gain | EventType::Transform => matches!(condition, Normal | Removed),
        EventType::Flash => matches!(condition, Foil | Godfoil),
        EventType::Delete | EventType::Copy => true,
    }
}

/// Conditions selectable for an event type, in display order.
pub fn allowed_conditions(event_type: EventType) -> Vec<Condition> {
    Condition::ALL
        .into_iter()
        .filter(|c| allows_condition(event_type, *c))
        .collect()
}

/// Turn a selection into a record for `role`.
pub fn build_event(
    id: u64,
    role: RoleId,
    selection: &Selection,
) -> Result<EventRecord, SelectionError> {
    let event_type = selection
        .event_type
        .ok_or(SelectionError::Incomplete(MissingField::EventType))?;

    let dst = match (selection.category, selection.condition) {
        (Some(category), Some(condition)) => Slot::new(category, condition),
        _ => return Err(SelectionError::Incomplete(MissingField::Destination)),
    };

    if !allows_condition(event_type, dst.condition) {
        return Err(SelectionError::ConditionNotAllowed {
            event_type,
            condition: dst.condition,
        });
    }

    let src = match event_type {
        EventType::Transform => match (selection.src_category, selection.src_condition) {
            (Some(category), Some(condition)) => Some(Slot::new(category, condition)),
            _ => return Err(SelectionError::Incomplete(MissingField::Source)),
        },
        _ => None,
    };

    Ok(EventRecord::new(id, role, EventKind::new(event_type, dst, src)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_event_type() {
        let sel = Selection::default();
        assert_eq!(
            build_event(1, RoleId::Char1, &sel),
            Err(SelectionError::Incomplete(MissingField::EventType))
        );
    }

    #[test]
    fn test_missing_destination() {
        let sel = Selection {
            event_type: Some(EventType::Gain),
            category: Some(Category::Neutral),
            ..Selection::default()
        };
        assert_eq!(
            build_event(1, RoleId::Char1, &sel),
            Err(SelectionError::Incomplete(MissingField::Destination))
        );
    }

    #[test]
    fn test_transform_requires_source() {
        let sel = Selection::new(EventType::Transform, Category::Monster, Condition::Normal);
        assert_eq!(
            build_event(1, RoleId::Char1, &sel),
            Err(SelectionError::Incomplete(MissingField::Source))
        );

        let sel = sel.with_source(Category::Character, Condition::Normal);
        let e = build_event(5, RoleId::Char2, &sel).unwrap();
        assert_eq!(e.id, 5);
        assert_eq!(e.role, RoleId::Char2);
        assert_eq!(e.kind.src(), Some(Slot::new(Category::Character, Condition::Normal)));
    }

    #[test]
    fn test_condition_availability() {
        assert_eq!(allowed_conditions(EventType::Gain), vec![Condition::Normal, Condition::Removed]);
        assert_eq!(allowed_conditions(EventType::Flash), vec![Condition::Foil, Condition::Godfoil]);
        assert_eq!(allowed_conditions(EventType::Delete), Condition::ALL.to_vec());

        let sel = Selection::new(EventType::Flash, Category::Neutral, Condition::Normal);
        assert_eq!(
            build_event(1, RoleId::Char1, &sel),
            Err(SelectionError::ConditionNotAllowed {
                event_type: EventType::Flash,
                condition: Condition::Normal,
            })
        );
    }

    #[test]
    fn test_source_ignored_for_non_transform() {
        let sel = Selection::new(EventType::Copy, Category::Monster, Condition::Foil)
            .with_source(Category::Neutral, Condition::Normal);
        let e = build_event(2, RoleId::Char3, &sel).unwrap();
        assert_eq!(e.kind, EventKind::Copy { dst: Slot::new(Category::Monster, Condition::Foil) });
    }
}
