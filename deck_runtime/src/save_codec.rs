//! Save Codec — tracker ⇄ persisted JSON blob.
//!
//! Pure codec layer. No I/O; the session decides where blobs live.
//!
//! - `encode_save`: Tracker → JSON string (current schema)
//! - `decode_save`: JSON string → SaveData (lenient on missing fields)
//! - `SaveData::into_tracker`: SaveData → Tracker
//!
//! Blob shape: `{ logs, currentRole, tier, roleNames? }`. The previous
//! schema has the same shape under an older key; older writers stored
//! `tier` as the text of an input box, so strings are accepted too.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use deck_engine::events::EventRecord;
use deck_engine::scoring::{ScoreWeights, Tier};
use deck_engine::taxonomy::RoleId;
use deck_engine::tracker::Tracker;

/// Key of the current save schema.
pub const STORAGE_KEY: &str = "chaosSave_v3";
/// Key of the previous schema; read as a fallback, never written.
pub const LEGACY_STORAGE_KEY: &str = "chaosSave_v2";

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// All possible save/load failures.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    /// Blob is not valid JSON or has fields of the wrong shape.
    #[error("malformed save: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Blob store I/O failed.
    #[error("save I/O: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Persisted session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub logs: Vec<EventRecord>,
    pub current_role: RoleId,
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_names: Option<BTreeMap<RoleId, String>>,
}

/// What actually arrives from storage: every field optional.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSave {
    #[serde(default)]
    logs: Option<Vec<EventRecord>>,
    #[serde(default)]
    current_role: Option<RoleId>,
    #[serde(default)]
    tier: Option<Value>,
    #[serde(default)]
    role_names: Option<BTreeMap<RoleId, String>>,
}

impl From<RawSave> for SaveData {
    fn from(raw: RawSave) -> Self {
        Self {
            logs: raw.logs.unwrap_or_default(),
            current_role: raw.current_role.unwrap_or(RoleId::Char1),
            tier: raw.tier.as_ref().map_or(Tier::default(), parse_tier),
            role_names: raw.role_names,
        }
    }
}

/// Number, or numeric text; anything else is tier 0. Clamped to range.
fn parse_tier(v: &Value) -> Tier {
    let n = match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
        }
        _ => None,
    };
    Tier::clamped(n.unwrap_or(0))
}

impl SaveData {
    pub fn from_tracker(tracker: &Tracker) -> Self {
        let names = tracker.role_names();
        Self {
            logs: tracker.events().to_vec(),
            current_role: tracker.current_role(),
            tier: tracker.tier(),
            role_names: if names.is_empty() {
                None
            } else {
                Some(names.clone())
            },
        }
    }

    /// Rebuild a tracker. The log is taken as stored, without validation.
    pub fn into_tracker(self, weights: ScoreWeights) -> Tracker {
        Tracker::from_parts(
            self.logs,
            self.current_role,
            self.tier,
            self.role_names.unwrap_or_default(),
            weights,
        )
    }
}

// ---------------------------------------------------------------------------
// Encoder / decoder
// ---------------------------------------------------------------------------

/// Encode a tracker to a save blob.
pub fn encode_save(tracker: &Tracker) -> Result<String, SaveError> {
    Ok(serde_json::to_string(&SaveData::from_tracker(tracker))?)
}

/// Decode a save blob. Missing fields fall back to defaults; wrong
/// shapes and unknown ids are errors.
pub fn decode_save(json: &str) -> Result<SaveData, SaveError> {
    let raw: RawSave = serde_json::from_str(json)?;
    Ok(raw.into())
}
