//! Nullable event sink: records every event for later assertions.

use civic_store::{EventSink, MembershipEvent};
use std::sync::Mutex;

#[derive(Default)]
pub struct NullEventSink {
    events: Mutex<Vec<MembershipEvent>>,
}

impl NullEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything emitted so far, oldest first.
    pub fn events(&self) -> Vec<MembershipEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Names of the emitted events, oldest first.
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(MembershipEvent::name).collect()
    }

    pub fn clear(&self) {
        match self.events.lock() {
            Ok(mut events) => events.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl EventSink for NullEventSink {
    fn emit(&self, event: MembershipEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
