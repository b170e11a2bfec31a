use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

mod encoder;

pub use encoder::{encode_event, EncodeError};

/// Sentinel state: the hub has no value for the entity yet.
pub const STATE_UNKNOWN: &str = "unknown";

/// Sentinel state: the entity's integration is offline.
pub const STATE_UNAVAILABLE: &str = "unavailable";

/// Snapshot of one entity's state as reported by the hub.
///
/// Serializes to the wire payload: a flat JSON object with timestamps as
/// ISO-8601 text. Treated as read-only; the hub owns the data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    pub entity_id: String,
    pub state: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttrValue>,
    pub last_changed: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

/// Attribute value as carried in a state record.
///
/// Date/time values are kept typed so they serialize as ISO-8601 strings
/// rather than epoch numbers; everything else is plain JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Timestamp(DateTime<Utc>),
    Json(Value),
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttrValue::Timestamp(value)
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::Json(value)
    }
}

/// Notification that an entity's state was created, updated, or removed.
///
/// `new_state` is absent when the entity was removed from the hub.
#[derive(Clone, Debug)]
pub struct StateChangedEvent {
    pub entity_id: String,
    pub new_state: Option<StateRecord>,
}

impl StateChangedEvent {
    /// Event for a state create/update.
    pub fn updated(state: StateRecord) -> Self {
        Self {
            entity_id: state.entity_id.clone(),
            new_state: Some(state),
        }
    }

    /// Event for an entity removal.
    pub fn removed(entity_id: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            new_state: None,
        }
    }
}
