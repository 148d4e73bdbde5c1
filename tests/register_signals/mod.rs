#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rxplay::{Signal, Subscriber};

pub type Recorded<V, E> = Arc<Mutex<Vec<Signal<V, E>>>>;
pub type Log<V, E> = Arc<Mutex<Vec<(&'static str, Signal<V, E>)>>>;

/// A subscriber that stores every signal it receives.
pub fn recording_subscriber<V, E>() -> (Subscriber<V, E>, Recorded<V, E>)
where
    V: Send + 'static,
    E: Send + 'static,
{
    let signals = Arc::new(Mutex::new(Vec::new()));
    let signals_c = Arc::clone(&signals);

    let subscriber = Subscriber::from_fn(move |signal| {
        // Track every signal in arrival order.
        signals_c.lock().unwrap().push(signal);
    });
    (subscriber, signals)
}

/// A subscriber that appends its signals, tagged with `label`, to a log shared
/// with other subscribers.
pub fn logging_subscriber<V, E>(log: &Log<V, E>, label: &'static str) -> Subscriber<V, E>
where
    V: Send + 'static,
    E: Send + 'static,
{
    let log = Arc::clone(log);
    Subscriber::from_fn(move |signal| log.lock().unwrap().push((label, signal)))
}

pub fn new_log<V, E>() -> Log<V, E> {
    Arc::new(Mutex::new(Vec::new()))
}

/// The signals of one label, in order.
pub fn signals_of<V: Clone, E: Clone>(log: &Log<V, E>, label: &str) -> Vec<Signal<V, E>> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|(l, _)| *l == label)
        .map(|(_, s)| s.clone())
        .collect()
}

pub fn values(items: &[&str]) -> Vec<Signal<String, rxplay::FeedError>> {
    items
        .iter()
        .map(|i| Signal::Value(i.to_string()))
        .collect()
}
