use std::sync::{Arc, Mutex};

use crate::subscription::subscribe::lock;

/// A signal as seen by a labelled demo subscriber, rendered to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalEvent {
    Value(String),
    Failure(String),
    Completed,
}

/// Receives every signal observed by the playground's subscribers.
pub trait SignalSink: Send + Sync + 'static {
    fn record(&self, label: &str, event: SignalEvent);
}

/// Logs every signal through `tracing` at `info` level, failures at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl SignalSink for TracingSink {
    fn record(&self, label: &str, event: SignalEvent) {
        match event {
            SignalEvent::Value(v) => tracing::info!(subscriber = label, value = %v, "received value"),
            SignalEvent::Failure(e) => tracing::warn!(subscriber = label, error = %e, "failed"),
            SignalEvent::Completed => tracing::info!(subscriber = label, "completed"),
        }
    }
}

/// Keeps every signal in memory, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<(String, SignalEvent)>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded `(label, event)` pairs.
    pub fn events(&self) -> Vec<(String, SignalEvent)> {
        lock(&self.events).clone()
    }

    /// The events recorded for one label.
    pub fn events_for(&self, label: &str) -> Vec<SignalEvent> {
        lock(&self.events)
            .iter()
            .filter(|(l, _)| l == label)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

impl SignalSink for MemorySink {
    fn record(&self, label: &str, event: SignalEvent) {
        lock(&self.events).push((label.to_string(), event));
    }
}
