//! Event Envelope
//!
//! The wire-level message shape used for every push notification.
//! Whether an event originates from a bridged stream or an ad-hoc
//! raise, it is wrapped in the same envelope and delivered through the
//! same fixed client method, so the client needs only one
//! demultiplexing routine.
//!
//! # Wire Format
//!
//! ```json
//! { "EventName": "Updates", "Type": "onNext", "Data": "hi" }
//! ```
//!
//! `Data` is omitted for `onCompleted` envelopes.

use serde::{Deserialize, Serialize};

/// The fixed client-invocable method every envelope is delivered
/// through. Part of the wire protocol; the generated proxy script
/// exposes a function of this name per hub.
pub const PUSH_METHOD: &str = "subjectOnNext";

// =============================================================================
// Event Kind
// =============================================================================

/// The kind of stream event an envelope carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A value produced by the stream.
    #[serde(rename = "onNext")]
    Next,
    /// The stream terminated with an error.
    #[serde(rename = "onError")]
    Error,
    /// The stream completed normally.
    #[serde(rename = "onCompleted")]
    Completed,
}

impl EventKind {
    /// The wire tag for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Next => "onNext",
            Self::Error => "onError",
            Self::Completed => "onCompleted",
        }
    }

    /// Whether this kind ends the stream.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Error | Self::Completed)
    }
}

// =============================================================================
// Envelope
// =============================================================================

/// One stream event wrapped for transport to a remote client.
///
/// Constructed immediately before each delivery attempt and never
/// persisted. Invariants: the event name is non-empty (enforced by the
/// bridge and raiser entry points) and `onCompleted` envelopes carry
/// no data (enforced by construction).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Logical stream/event name; the client matches it case-insensitively.
    #[serde(rename = "EventName")]
    event_name: String,

    /// Event kind tag.
    #[serde(rename = "Type")]
    kind: EventKind,

    /// Payload, present only for `onNext` and `onError`.
    #[serde(rename = "Data", default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl Envelope {
    /// Create an `onNext` envelope carrying a value.
    #[must_use]
    pub fn next(event_name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_name: event_name.into(),
            kind: EventKind::Next,
            data: Some(data),
        }
    }

    /// Create a terminal `onError` envelope carrying the error payload.
    #[must_use]
    pub fn error(event_name: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            event_name: event_name.into(),
            kind: EventKind::Error,
            data: Some(data),
        }
    }

    /// Create a terminal `onCompleted` envelope. Carries no data.
    #[must_use]
    pub fn completed(event_name: impl Into<String>) -> Self {
        Self {
            event_name: event_name.into(),
            kind: EventKind::Completed,
            data: None,
        }
    }

    /// The logical event name.
    #[must_use]
    pub fn event_name(&self) -> &str {
        &self.event_name
    }

    /// The event kind.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        self.kind
    }

    /// The payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&serde_json::Value> {
        self.data.as_ref()
    }

    /// Whether this envelope ends its stream.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.kind.is_terminal()
    }

    /// Convert into the JSON payload handed to the delivery port.
    ///
    /// Infallible by construction, unlike generic serialization.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        let mut map = serde_json::Map::with_capacity(3);
        map.insert(
            "EventName".to_string(),
            serde_json::Value::String(self.event_name),
        );
        map.insert(
            "Type".to_string(),
            serde_json::Value::String(self.kind.as_str().to_string()),
        );
        if let Some(data) = self.data {
            map.insert("Data".to_string(), data);
        }
        serde_json::Value::Object(map)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn next_envelope_serializes_with_pascal_case_fields() {
        let envelope = Envelope::next("Updates", json!("hi"));
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            value,
            json!({ "EventName": "Updates", "Type": "onNext", "Data": "hi" })
        );
    }

    #[test]
    fn error_envelope_carries_data() {
        let envelope = Envelope::error("Updates", json!("boom"));
        let value = envelope.into_value();

        assert_eq!(value["Type"], "onError");
        assert_eq!(value["Data"], "boom");
    }

    #[test]
    fn completed_envelope_has_no_data_field() {
        let envelope = Envelope::completed("Updates");
        let value = serde_json::to_value(&envelope).unwrap();

        assert_eq!(value["Type"], "onCompleted");
        assert!(value.get("Data").is_none());
    }

    #[test]
    fn into_value_matches_serde_output() {
        let envelope = Envelope::next("Updates", json!({ "n": 1 }));
        let via_serde = serde_json::to_value(&envelope).unwrap();

        assert_eq!(envelope.into_value(), via_serde);
    }

    #[test]
    fn terminal_kinds() {
        assert!(!EventKind::Next.is_terminal());
        assert!(EventKind::Error.is_terminal());
        assert!(EventKind::Completed.is_terminal());
    }

    #[test]
    fn envelope_round_trips_from_wire_json() {
        let envelope: Envelope =
            serde_json::from_value(json!({ "EventName": "Updates", "Type": "onNext", "Data": 7 }))
                .unwrap();

        assert_eq!(envelope.event_name(), "Updates");
        assert_eq!(envelope.kind(), EventKind::Next);
        assert_eq!(envelope.data(), Some(&json!(7)));
    }
}
