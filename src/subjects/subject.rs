use std::{
    fmt,
    sync::{Arc, Mutex},
};

use crate::{
    emitter::Emitter,
    subscription::subscribe::{
        lock, Binding, Signal, Subscribeable, Subscriber, Subscription, SubscriptionHandle,
        UnsubscribeLogic,
    },
};

/// A `Subject` is a hot, multi-subscriber broadcast point.
///
/// Values sent to it fan out to every subscriber attached at that moment, in
/// attachment order. It keeps no history: a subscriber attaching late never
/// sees earlier values. Once terminated, it remembers only the terminal signal
/// and hands it to every later subscriber right away.
///
/// Use [`Subject::emitter_receiver`] to obtain a [`SubjectEmitter`] for the
/// single producing owner and a [`SubjectReceiver`] for subscribing.
///
/// # Example
///
/// ```no_run
/// use rxplay::{subjects::Subject, Emitter, Subscribeable, Subscriber};
///
/// let (mut emitter, receiver) = Subject::<u32, String>::emitter_receiver();
///
/// emitter.emit(1); // Nobody is attached yet, dropped.
///
/// receiver.subscribe(Subscriber::on_value(|v| println!("first: {v}")));
/// emitter.emit(2);
///
/// receiver.subscribe(Subscriber::on_value(|v| println!("second: {v}")));
/// emitter.emit(3); // Seen by both.
///
/// emitter.complete();
/// ```
pub struct Subject<V, E> {
    observers: Vec<(u64, Arc<Binding<V, E>>)>,
    next_key: u64,
    terminal: Option<Signal<V, E>>,
}

impl<V, E> Subject<V, E> {
    /// Creates a new pair of `SubjectEmitter` for emitting signals and
    /// `SubjectReceiver` for subscribing to them.
    pub fn emitter_receiver() -> (SubjectEmitter<V, E>, SubjectReceiver<V, E>) {
        let s = Arc::new(Mutex::new(Subject {
            observers: Vec::with_capacity(4),
            next_key: 0,
            terminal: None,
        }));

        (SubjectEmitter(Arc::clone(&s)), SubjectReceiver(s))
    }

    fn detach(&mut self, key: u64) {
        self.observers.retain(|(k, _)| *k != key);
    }

    fn snapshot(&self) -> Vec<Arc<Binding<V, E>>> {
        self.observers.iter().map(|(_, b)| Arc::clone(b)).collect()
    }
}

/// Subscription side of a [`Subject`]. Cloning it is shallow: clones share the
/// same subject.
pub struct SubjectReceiver<V, E>(Arc<Mutex<Subject<V, E>>>);

/// Producing side of a [`Subject`]. Not cloneable: a subject has exactly one
/// producing owner.
pub struct SubjectEmitter<V, E>(Arc<Mutex<Subject<V, E>>>);

impl<V, E> Clone for SubjectReceiver<V, E> {
    fn clone(&self) -> Self {
        SubjectReceiver(Arc::clone(&self.0))
    }
}

impl<V, E> SubjectReceiver<V, E> {
    /// Returns the number of attached subscribers.
    pub fn len(&self) -> usize {
        lock(&self.0).observers.len()
    }

    /// Returns `true` if no subscribers are attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` once the subject has delivered a terminal signal.
    pub fn is_terminated(&self) -> bool {
        lock(&self.0).terminal.is_some()
    }
}

impl<V, E> Subscribeable for SubjectReceiver<V, E>
where
    V: Send + 'static,
    E: Clone + Send + 'static,
{
    type Value = V;
    type Error = E;

    fn subscribe(&self, mut subscriber: Subscriber<V, E>) -> Subscription {
        let mut src = lock(&self.0);

        // A terminated subject replays only its terminal signal.
        if src.terminal.is_some() {
            let failure = match &src.terminal {
                Some(Signal::Failure(e)) => Some(e.clone()),
                _ => None,
            };
            drop(src);
            match failure {
                Some(e) => subscriber.fail(e),
                None => subscriber.complete(),
            }
            return Subscription::empty();
        }

        let key = src.next_key;
        src.next_key += 1;
        let binding = Binding::new(subscriber);
        src.observers.push((key, Arc::clone(&binding)));
        drop(src);

        let source_cloned = Arc::clone(&self.0);
        Subscription::new(
            UnsubscribeLogic::Logic(Box::new(move || {
                binding.dispose();
                lock(&source_cloned).detach(key);
            })),
            SubscriptionHandle::Nil,
        )
    }
}

impl<V, E> SubjectEmitter<V, E>
where
    E: Clone,
{
    fn terminate(&mut self, signal: Signal<V, E>) {
        let observers = {
            let mut src = lock(&self.0);
            if src.terminal.is_some() {
                return;
            }
            src.terminal = Some(match &signal {
                Signal::Failure(e) => Signal::Failure(e.clone()),
                _ => Signal::Completed,
            });
            std::mem::take(&mut src.observers)
        };

        for (_, o) in observers {
            let signal = match &signal {
                Signal::Failure(e) => Signal::Failure(e.clone()),
                _ => Signal::Completed,
            };
            o.deliver(signal);
        }
    }
}

impl<V: Clone, E: Clone> Emitter for SubjectEmitter<V, E> {
    type Value = V;
    type Error = E;

    fn emit(&mut self, value: V) {
        // Deliver from a snapshot so subscribers can attach or dispose from
        // inside their handlers without touching the registry being walked.
        let observers = {
            let src = lock(&self.0);
            if src.terminal.is_some() {
                return;
            }
            src.snapshot()
        };

        for o in observers {
            o.deliver(Signal::Value(value.clone()));
        }
    }

    fn fail(&mut self, error: E) {
        self.terminate(Signal::Failure(error));
    }

    fn complete(&mut self) {
        self.terminate(Signal::Completed);
    }

    fn is_closed(&self) -> bool {
        lock(&self.0).terminal.is_some()
    }
}

impl<V, E> fmt::Debug for SubjectReceiver<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let src = lock(&self.0);
        f.debug_struct("SubjectReceiver")
            .field("observers", &src.observers.len())
            .field("terminated", &src.terminal.is_some())
            .finish()
    }
}

impl<V, E> fmt::Debug for SubjectEmitter<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubjectEmitter")
            .field("closed", &lock(&self.0).terminal.is_some())
            .finish()
    }
}
