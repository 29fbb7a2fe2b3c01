/// Deck Engine — Taxonomy
///
/// Closed, fixed enumerations. Pure data, no behaviour.
/// `ALL` lists each set in display order; the wire id is the
/// string used in persisted logs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A wire id that does not name any member of its set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} id {value:?}")]
pub struct UnknownId {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    (@count $($t:ident)+) => { 0 $(+ wire_enum!(@one $t))+ };
    (@one $t:ident) => { 1 };
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $id:tt, $label:tt; )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $id)] $variant, )+
        }

        impl $name {
            /// Every member, in display order.
            pub const ALL: [$name; wire_enum!(@count $($variant)+)] = [$($name::$variant),+];

            /// Position in `ALL`.
            pub const fn index(self) -> usize {
                self as usize
            }

            /// Persisted wire id.
            pub const fn id(self) -> &'static str {
                match self {
                    $( $name::$variant => $id, )+
                }
            }

            /// Default display label.
            pub const fn label(self) -> &'static str {
                match self {
                    $( $name::$variant => $label, )+
                }
            }
        }

        impl FromStr for $name {
            type Err = UnknownId;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $id => Ok($name::$variant), )+
                    _ => Err(UnknownId { kind: $kind, value: s.to_string() }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.id())
            }
        }
    };
}

wire_enum! {
    /// One of the three tracked roles.
    RoleId, "role" {
        Char1 => "char1", "Role 1";
        Char2 => "char2", "Role 2";
        Char3 => "char3", "Role 3";
    }
}

wire_enum! {
    /// Kind of card.
    Category, "category" {
        /// Primary category: the role's own cards. Every role starts with four.
        Character => "character", "Character";
        Neutral => "neutral", "Neutral";
        /// Special category, weighted highest.
        Monster => "monster", "Monster";
        /// Restricted category.
        Forbidden => "forbidden", "Forbidden";
    }
}

wire_enum! {
    /// Finish or state of a card.
    Condition, "condition" {
        /// Base condition. Upgrades consume a card in this condition.
        Normal => "normal", "Normal";
        Foil => "foil", "Foil";
        Godfoil => "godfoil", "Godfoil";
        /// Terminal condition. Never scores.
        Removed => "removed", "Removed";
    }
}

wire_enum! {
    /// Event types in their conceptual order:
    /// gain → flash → transform → delete → copy.
    EventType, "event type" {
        /// Acquire a card.
        Gain => "gain", "Gain";
        /// Upgrade a base-condition card in place.
        Flash => "flash", "Flash";
        /// Convert one card into another.
        Transform => "transform", "Transform";
        Delete => "delete", "Delete";
        /// Duplicate an owned card.
        Copy => "copy", "Copy";
    }
}

/// A `(category, condition)` inventory position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Slot {
    pub category: Category,
    pub condition: Condition,
}

impl Slot {
    pub const fn new(category: Category, condition: Condition) -> Self {
        Self { category, condition }
    }

    /// Every slot, category-major in display order.
    pub fn all() -> impl Iterator<Item = Slot> {
        Category::ALL.into_iter().flat_map(|category| {
            Condition::ALL
                .into_iter()
                .map(move |condition| Slot::new(category, condition))
        })
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category, self.condition)
    }
}
