#![forbid(unsafe_code)]

//! Deck Engine — deterministic replay and scoring kernel.
//!
//! Turns an append-only log of card events into per-role inventory,
//! event statistics, scores and per-event score deltas. Pure: no I/O,
//! no clocks, no global state.

/// Engine v1. Bumped whenever replay or scoring semantics change.
pub const ENGINE_VERSION: u32 = 1;

pub mod arithmetic;
pub mod taxonomy;
pub mod domain;
pub mod events;
pub mod state;
pub mod transitions;
pub mod replay;
pub mod scoring;
pub mod deltas;
pub mod selection;
pub mod engine;
pub mod tracker;
pub mod view;
pub mod hashing;
