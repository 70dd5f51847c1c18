//! Fire-and-forget analytics hooks.
//!
//! Behavior components emit named events with a flat key/value payload to an
//! [`AnalyticsSink`]. Delivery is fire-and-forget: sinks cannot fail, block,
//! or feed anything back into the interactivity layer.

use std::fmt;

use serde_json::Value;

/// A flat, ordered key/value payload attached to an analytics event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPayload {
    entries: Vec<(String, Value)>,
}

impl EventPayload {
    /// Create an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key/value pair, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Iterate over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for EventPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{key}={value}")?;
            first = false;
        }
        Ok(())
    }
}

/// A sink for analytics events.
///
/// Implementations must never panic; a sink that cannot deliver should drop
/// the event.
pub trait AnalyticsSink {
    /// Record an event.
    fn track(&self, event: &str, payload: &EventPayload);
}

/// A sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl AnalyticsSink for NullSink {
    fn track(&self, _event: &str, _payload: &EventPayload) {}
}

/// A sink that logs events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn track(&self, event: &str, payload: &EventPayload) {
        tracing::info!(target: "vitrine::analytics", event, %payload, "analytics event");
    }
}

#[cfg(test)]
pub(crate) mod tests_support {
    use super::*;
    use std::cell::RefCell;

    /// Test sink collecting events in memory.
    #[derive(Default)]
    pub struct RecordingSink {
        pub events: RefCell<Vec<(String, EventPayload)>>,
    }

    impl AnalyticsSink for RecordingSink {
        fn track(&self, event: &str, payload: &EventPayload) {
            self.events
                .borrow_mut()
                .push((event.to_string(), payload.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::tests_support::RecordingSink;
    use super::*;

    #[test]
    fn test_payload_builder() {
        let payload = EventPayload::new()
            .with("direction", "next")
            .with("index", 2);
        assert_eq!(payload.len(), 2);
        assert_eq!(payload.get("direction"), Some(&Value::from("next")));
        assert_eq!(payload.get("index"), Some(&Value::from(2)));
        assert_eq!(payload.get("missing"), None);
    }

    #[test]
    fn test_payload_display() {
        let payload = EventPayload::new().with("a", 1).with("b", "two");
        assert_eq!(payload.to_string(), "a=1 b=\"two\"");
    }

    #[test]
    fn test_recording_sink() {
        let sink = RecordingSink::default();
        sink.track("Carousel Moved", &EventPayload::new().with("index", 1));
        let events = sink.events.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "Carousel Moved");
    }
}
