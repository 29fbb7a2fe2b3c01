#![forbid(unsafe_code)]

//! Deck Engine — Runtime
//!
//! Wraps the pure engine with blob persistence, save/load with legacy
//! fallback, sessions and replay verification.
//!
//! No scoring or replay rules live here; all of that is delegated to
//! the engine.

pub mod blob_store;
pub mod save_codec;
pub mod replay;
pub mod session;
