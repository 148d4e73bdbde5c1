//! Module for sharing one run of a cold stream among many listeners.
//!
//! A `SharedStream` sits between any number of listeners and a single
//! underlying [`Stream`]. Subscribing only attaches a listener to an internal
//! subject. Nothing runs until `connect()` is called, which subscribes to the
//! wrapped stream exactly once and fans every signal out to the listeners
//! attached at that moment.

use std::{
    fmt,
    sync::{Arc, Mutex, Weak},
};

use crate::{
    emitter::Emitter,
    errors::ConnectError,
    subjects::{SubjectEmitter, SubjectReceiver},
    subscription::subscribe::{
        lock, Signal, Subscribeable, Subscriber, Subscription, UnsubscribeLogic,
    },
    Stream,
};

/// Lifecycle of a [`SharedStream`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SharedState {
    /// Listeners may attach; the source has not been subscribed.
    Idle,
    /// `connect()` subscribed the source and signals are being fanned out.
    Connected,
    /// The source delivered `Failure` or `Completed`.
    Terminated,
}

struct Core<V, E> {
    state: SharedState,
    emitter: Option<SubjectEmitter<V, E>>,
}

struct Shared<V, E> {
    source: Stream<V, E>,
    receiver: SubjectReceiver<V, E>,
    core: Mutex<Core<V, E>>,
}

/// Multicasting stream with an explicit `connect()` step.
///
/// Subscribe every desired listener first, then connect once: all listeners
/// then observe each value at the same emission step, and the wrapped stream's
/// producing routine runs exactly once regardless of the listener count.
///
/// Detaching every listener does not stop the source; only disposing the
/// subscription returned by `connect()` does.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
///
/// use rxplay::{CompanyFeed, Delay, Subscribeable, Subscriber};
///
/// #[tokio::main]
/// async fn main() {
///     let shared = CompanyFeed::with_mock_companies(Delay::Fixed(Duration::from_millis(200)))
///         .into_stream()
///         .share();
///
///     shared.subscribe(Subscriber::on_value(|v| println!("multi1: {v}")));
///     shared.subscribe(Subscriber::on_value(|v| println!("multi2: {v}")));
///
///     let connection = shared.connect().expect("first connect");
///     let _ = connection.join().await;
/// }
/// ```
pub struct SharedStream<V, E> {
    inner: Arc<Shared<V, E>>,
}

impl<V, E> Clone for SharedStream<V, E> {
    fn clone(&self) -> Self {
        SharedStream {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V, E> SharedStream<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    /// Creates a new `SharedStream` over `source`, bridging through the subject
    /// produced by `factory`.
    ///
    /// Usually created with [`Stream::share`] or [`Stream::multicast`].
    pub fn new(
        source: Stream<V, E>,
        factory: impl FnOnce() -> (SubjectEmitter<V, E>, SubjectReceiver<V, E>),
    ) -> Self {
        let (emitter, receiver) = factory();
        SharedStream {
            inner: Arc::new(Shared {
                source,
                receiver,
                core: Mutex::new(Core {
                    state: SharedState::Idle,
                    emitter: Some(emitter),
                }),
            }),
        }
    }

    /// Subscribes the wrapped stream once and starts fanning signals out to
    /// the attached listeners.
    ///
    /// The returned subscription tears the upstream run down when disposed and
    /// can be awaited with `join` until the source finishes.
    ///
    /// # Errors
    ///
    /// [`ConnectError::AlreadyConnected`] while a connection is live, and
    /// [`ConnectError::AlreadyTerminated`] once the source has terminated.
    /// Neither affects existing listeners.
    pub fn connect(&self) -> Result<Subscription, ConnectError> {
        let mut bridge = {
            let mut core = lock(&self.inner.core);
            match core.state {
                SharedState::Connected => return Err(ConnectError::AlreadyConnected),
                SharedState::Terminated => return Err(ConnectError::AlreadyTerminated),
                SharedState::Idle => {}
            }
            core.state = SharedState::Connected;
            match core.emitter.take() {
                Some(emitter) => emitter,
                None => return Err(ConnectError::AlreadyConnected),
            }
        };
        tracing::debug!(listeners = self.inner.receiver.len(), "connecting shared stream");

        let shared: Weak<Shared<V, E>> = Arc::downgrade(&self.inner);
        let upstream = Subscriber::from_fn(move |signal: Signal<V, E>| {
            // Mark the state first so listeners reacting to the terminal signal
            // already see `Terminated`.
            if signal.is_terminal() {
                if let Some(shared) = shared.upgrade() {
                    lock(&shared.core).state = SharedState::Terminated;
                    tracing::debug!("shared stream terminated");
                }
            }
            match signal {
                Signal::Value(v) => bridge.emit(v),
                Signal::Failure(e) => bridge.fail(e),
                Signal::Completed => bridge.complete(),
            }
        });

        let connection = self.inner.source.subscribe(upstream);
        let handle = connection.take_handle();

        Ok(Subscription::new(
            UnsubscribeLogic::Wrapped(Box::new(connection)),
            handle,
        ))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SharedState {
        lock(&self.inner.core).state
    }

    /// Number of listeners currently attached.
    pub fn listener_count(&self) -> usize {
        self.inner.receiver.len()
    }
}

impl<V, E> Subscribeable for SharedStream<V, E>
where
    V: Clone + Send + 'static,
    E: Clone + Send + 'static,
{
    type Value = V;
    type Error = E;

    /// Attaches a listener without starting anything. After termination the
    /// listener immediately receives the terminal signal.
    fn subscribe(&self, subscriber: Subscriber<V, E>) -> Subscription {
        self.inner.receiver.subscribe(subscriber)
    }
}

impl<V, E> fmt::Debug for SharedStream<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedStream")
            .field("state", &lock(&self.inner.core).state)
            .finish_non_exhaustive()
    }
}
