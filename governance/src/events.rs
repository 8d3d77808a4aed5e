//! Event sink that forwards membership events to `tracing`.

use civic_store::{EventSink, MembershipEvent};

/// Logs every event at `info` with its JSON body.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: MembershipEvent) {
        match serde_json::to_string(&event) {
            Ok(body) => tracing::info!(event = event.name(), %body, "membership event"),
            Err(e) => tracing::warn!(event = event.name(), error = %e, "failed to encode membership event"),
        }
    }
}
