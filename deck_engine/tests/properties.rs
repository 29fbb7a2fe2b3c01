//! Property tests over random event sequences.
//!
//! Random candidates are pushed through `LogStore::append`; whatever the
//! store accepts forms a valid log.

use proptest::prelude::*;

use deck_engine::deltas::per_role_deltas;
use deck_engine::domain::EventStatistics;
use deck_engine::engine::LogStore;
use deck_engine::events::{EventKind, EventRecord};
use deck_engine::hashing::canonical_hash;
use deck_engine::replay::{aggregate, replay, replay_clamped};
use deck_engine::scoring::{score, ScoreWeights};
use deck_engine::state::base_inventory;
use deck_engine::taxonomy::{Category, Condition, EventType, RoleId, Slot};
use deck_engine::transitions::ReplayMode;

type RawEvent = (usize, usize, usize, usize, usize, usize);

fn raw_event() -> impl Strategy<Value = RawEvent> {
    (0..3usize, 0..5usize, 0..4usize, 0..4usize, 0..4usize, 0..4usize)
}

fn to_record(id: u64, raw: RawEvent) -> EventRecord {
    let (role, event_type, cat, cond, src_cat, src_cond) = raw;
    let dst = Slot::new(Category::ALL[cat], Condition::ALL[cond]);
    let src = Slot::new(Category::ALL[src_cat], Condition::ALL[src_cond]);
    EventRecord::new(
        id,
        RoleId::ALL[role],
        EventKind::new(EventType::ALL[event_type], dst, Some(src)),
    )
}

/// Build a valid log by offering every candidate to the store.
fn valid_log(raws: &[RawEvent]) -> LogStore {
    let mut store = LogStore::new();
    for raw in raws {
        let candidate = to_record(store.next_id().unwrap(), *raw);
        let _ = store.append(candidate);
    }
    store
}

proptest! {
    #[test]
    fn valid_logs_never_need_clamping(raws in prop::collection::vec(raw_event(), 0..60)) {
        let store = valid_log(&raws);
        let validated = replay(store.events(), ReplayMode::Validate);
        prop_assert!(validated.is_ok());
        prop_assert_eq!(validated.unwrap(), replay_clamped(store.events()));
    }

    #[test]
    fn delta_sum_equals_score_change(raws in prop::collection::vec(raw_event(), 0..60)) {
        let w = ScoreWeights::CANONICAL;
        let store = valid_log(&raws);
        let inventories = replay_clamped(store.events());
        let statistics = aggregate(store.events());
        let base = score(&base_inventory(), &EventStatistics::default(), &w).total;

        for role in RoleId::ALL {
            let sum: i64 = per_role_deltas(role, store.events(), &w).iter().sum();
            let fin = score(&inventories[&role], &statistics[&role], &w).total;
            prop_assert_eq!(sum, fin - base);
        }
    }

    #[test]
    fn deltas_match_prefix_rescoring(raws in prop::collection::vec(raw_event(), 0..30)) {
        // Arbitrary (possibly infeasible) logs: the incremental deltas must
        // equal scoring each clamped prefix from scratch.
        let w = ScoreWeights::CANONICAL;
        let events: Vec<EventRecord> = raws
            .iter()
            .enumerate()
            .map(|(i, raw)| to_record(i as u64 + 1, *raw))
            .collect();

        for role in RoleId::ALL {
            let deltas = per_role_deltas(role, &events, &w);
            let mut expected = Vec::new();
            for (i, e) in events.iter().enumerate() {
                if e.role != role {
                    continue;
                }
                let total = |prefix: &[EventRecord]| {
                    score(&replay_clamped(prefix)[&role], &aggregate(prefix)[&role], &w).total
                };
                expected.push(total(&events[..=i]) - total(&events[..i]));
            }
            prop_assert_eq!(deltas, expected);
        }
    }

    #[test]
    fn append_then_undo_restores_state(
        raws in prop::collection::vec(raw_event(), 0..40),
        extra in raw_event(),
    ) {
        let w = ScoreWeights::CANONICAL;
        let mut store = valid_log(&raws);
        let before = store.clone();
        let hash_before = canonical_hash(store.events(), &w);

        let candidate = to_record(store.next_id().unwrap(), extra);
        if store.append(candidate).is_ok() {
            store.undo_last();
        }

        prop_assert_eq!(&store, &before);
        prop_assert_eq!(canonical_hash(store.events(), &w), hash_before);
    }
}
