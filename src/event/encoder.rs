use super::{StateChangedEvent, STATE_UNAVAILABLE, STATE_UNKNOWN};
use crate::filter::EntityFilter;
use std::fmt;

/// An attribute value could not be represented in the JSON payload.
#[derive(Debug)]
pub struct EncodeError {
    entity_id: String,
    source: serde_json::Error,
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to encode state of '{}': {}",
            self.entity_id, self.source
        )
    }
}

impl std::error::Error for EncodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Translate a state-change event into the wire payload for one route.
///
/// Returns `Ok(None)` when the event carries nothing publishable: the entity
/// was removed, its state is empty or a sentinel, or either the global or the
/// route's filter rejects the entity id. Otherwise returns UTF-8 JSON bytes
/// of the full state record, with date/time values as ISO-8601 text.
pub fn encode_event(
    event: &StateChangedEvent,
    global_filter: &EntityFilter,
    topic_filter: &EntityFilter,
) -> Result<Option<Vec<u8>>, EncodeError> {
    let Some(state) = &event.new_state else {
        return Ok(None);
    };

    if matches!(state.state.as_str(), "" | STATE_UNKNOWN | STATE_UNAVAILABLE) {
        return Ok(None);
    }
    if !global_filter.matches(&state.entity_id) || !topic_filter.matches(&state.entity_id) {
        return Ok(None);
    }

    serde_json::to_vec(state).map(Some).map_err(|source| EncodeError {
        entity_id: state.entity_id.clone(),
        source,
    })
}
