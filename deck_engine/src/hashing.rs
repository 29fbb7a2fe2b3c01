/// Deck Engine — Canonical Hashing
///
/// Deterministic canonical serialization + SHA-256 of the derived
/// projections (inventory, statistics, score) of every role.
///
/// Rules:
///   - engine_version first, then roles in display order
///   - inventory as rows per category, conditions in display order
///   - statistics in event-type display order, then delete_character
///   - UTF-8 JSON, no whitespace, integers only
///
/// Names, tier and current role are settings, not derived state, and
/// are not hashed.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::domain::{EventStatistics, InventoryState, RoleMap, ScoreResult};
use crate::replay::{aggregate, replay_clamped};
use crate::scoring::{score_all, ScoreWeights};
use crate::events::EventRecord;
use crate::taxonomy::{Category, RoleId};
use crate::ENGINE_VERSION;

/// Canonical bytes of the projections derived from `events`.
pub fn canonical_serialize(events: &[EventRecord], weights: &ScoreWeights) -> Vec<u8> {
    let inventories = replay_clamped(events);
    let statistics = aggregate(events);
    let scores = score_all(&inventories, &statistics, weights);
    build_canonical_value(&inventories, &statistics, &scores)
        .to_string()
        .into_bytes()
}

/// SHA-256 of `canonical_serialize`. Lowercase hex.
pub fn canonical_hash(events: &[EventRecord], weights: &ScoreWeights) -> String {
    let digest = Sha256::digest(canonical_serialize(events, weights));
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

fn build_canonical_value(
    inventories: &RoleMap<InventoryState>,
    statistics: &RoleMap<EventStatistics>,
    scores: &RoleMap<ScoreResult>,
) -> Value {
    let empty_inv = InventoryState::default();
    let empty_stats = EventStatistics::default();
    let empty_score = ScoreResult::default();

    let mut roles_list = Vec::new();
    for role in RoleId::ALL {
        let inv = inventories.get(&role).unwrap_or(&empty_inv);
        let stats = statistics.get(&role).unwrap_or(&empty_stats);
        let score = scores.get(&role).unwrap_or(&empty_score);

        let rows: Vec<Value> = Category::ALL
            .into_iter()
            .map(|c| Value::from(inv.row(c).to_vec()))
            .collect();

        let mut stats_map = Map::new();
        stats_map.insert("counts".to_string(), Value::from(stats.counts().to_vec()));
        stats_map.insert(
            "delete_character".to_string(),
            Value::from(stats.delete_character),
        );

        let mut score_map = Map::new();
        score_map.insert("inventory".to_string(), Value::from(score.inventory_score));
        score_map.insert("event".to_string(), Value::from(score.event_score));
        score_map.insert("total".to_string(), Value::from(score.total));

        let mut role_map = Map::new();
        role_map.insert("id".to_string(), Value::from(role.id()));
        role_map.insert("inventory".to_string(), Value::Array(rows));
        role_map.insert("statistics".to_string(), Value::Object(stats_map));
        role_map.insert("score".to_string(), Value::Object(score_map));
        roles_list.push(Value::Object(role_map));
    }

    // engine_version MUST be first.
    let mut root = Map::new();
    root.insert("engine_version".to_string(), Value::from(ENGINE_VERSION));
    root.insert("roles".to_string(), Value::Array(roles_list));
    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::taxonomy::{Condition, Slot};

    #[test]
    fn test_empty_log_canonical_form() {
        let json = String::from_utf8(canonical_serialize(&[], &ScoreWeights::CANONICAL)).unwrap();
        assert!(json.starts_with(r#"{"engine_version":1,"roles":[{"id":"char1","inventory":[[4,0,0,0],"#));
        assert!(!json.contains(' '));
    }

    #[test]
    fn test_hash_is_stable_and_order_sensitive() {
        let w = ScoreWeights::CANONICAL;
        let gain = EventRecord::new(
            1,
            RoleId::Char1,
            EventKind::Gain { dst: Slot::new(Category::Neutral, Condition::Normal) },
        );
        let flash = EventRecord::new(
            2,
            RoleId::Char1,
            EventKind::Flash { dst: Slot::new(Category::Neutral, Condition::Foil) },
        );
        let h1 = canonical_hash(&[gain, flash], &w);
        assert_eq!(h1, canonical_hash(&[gain, flash], &w));
        assert_eq!(h1.len(), 64);
        // Clamped replay of the reversed log leaves a stray normal card.
        assert_ne!(h1, canonical_hash(&[flash, gain], &w));
    }
}
