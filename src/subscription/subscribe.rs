use std::{
    fmt,
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError, TryLockError,
    },
};

use tokio::{
    runtime,
    task::{JoinError, JoinHandle},
};

use crate::emitter::Emitter;

/// A tagged notification flowing from a stream to one subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal<V, E> {
    Value(V),
    Failure(E),
    Completed,
}

impl<V, E> Signal<V, E> {
    /// `Failure` and `Completed` end delivery to the receiving subscriber.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Signal::Value(_))
    }
}

/// A trait for types that can be subscribed to, allowing consumers to receive
/// signals emitted by a stream.
pub trait Subscribeable {
    /// The type of values emitted by the stream.
    type Value;
    /// The type of the terminal failure of the stream.
    type Error;

    /// Attaches `subscriber` and returns the `Subscription` controlling it.
    ///
    /// Failures of the producing side are never returned from here; they reach
    /// the subscriber as a terminal `Failure` signal.
    fn subscribe(&self, subscriber: Subscriber<Self::Value, Self::Error>) -> Subscription;
}

/// A trait for handles that stop signal delivery when released.
pub trait Disposable {
    /// Releases the subscription. Calling it more than once has no further
    /// effect and never fails.
    fn dispose(&self);

    /// Returns `true` once `dispose` has been called.
    fn is_disposed(&self) -> bool;
}

type ValueFn<V> = Box<dyn FnMut(V) + Send>;
type FailureFn<E> = Box<dyn FnMut(E) + Send>;
type CompletedFn = Box<dyn FnMut() + Send>;

/// A type that acts as an observer, allowing users to handle emitted values,
/// failures and completion when subscribing to a `Stream`, `Subject` or
/// `SharedStream`.
///
/// A `Subscriber` tracks its own terminal state: once it has observed a
/// `Failure` or `Completed` signal it ignores everything that follows.
pub struct Subscriber<V, E> {
    value_fn: ValueFn<V>,
    failure_fn: Option<FailureFn<E>>,
    completed_fn: Option<CompletedFn>,
    terminated: bool,
}

impl<V, E> Subscriber<V, E> {
    /// Creates a new `Subscriber` with handlers for values, failures and completion.
    pub fn new(
        value_fn: impl FnMut(V) + Send + 'static,
        failure_fn: impl FnMut(E) + Send + 'static,
        completed_fn: impl FnMut() + Send + 'static,
    ) -> Self {
        Subscriber {
            value_fn: Box::new(value_fn),
            failure_fn: Some(Box::new(failure_fn)),
            completed_fn: Some(Box::new(completed_fn)),
            terminated: false,
        }
    }

    /// Creates a new `Subscriber` with only a value handler. Terminal signals
    /// are still tracked, they simply have no handler to call.
    pub fn on_value(value_fn: impl FnMut(V) + Send + 'static) -> Self {
        Subscriber {
            value_fn: Box::new(value_fn),
            failure_fn: None,
            completed_fn: None,
            terminated: false,
        }
    }

    /// Sets the handler called when the stream fails.
    pub fn on_failure(&mut self, failure_fn: impl FnMut(E) + Send + 'static) {
        self.failure_fn = Some(Box::new(failure_fn));
    }

    /// Sets the handler called when the stream completes.
    pub fn on_completed(&mut self, completed_fn: impl FnMut() + Send + 'static) {
        self.completed_fn = Some(Box::new(completed_fn));
    }

    /// Returns `true` after a terminal signal was delivered.
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub(crate) fn deliver(&mut self, signal: Signal<V, E>) {
        match signal {
            Signal::Value(v) => self.emit(v),
            Signal::Failure(e) => self.fail(e),
            Signal::Completed => self.complete(),
        }
    }
}

impl<V: 'static, E: 'static> Subscriber<V, E> {
    /// Creates a `Subscriber` that receives every notification as a [`Signal`].
    pub fn from_fn(signal_fn: impl FnMut(Signal<V, E>) + Send + 'static) -> Self {
        let shared = Arc::new(Mutex::new(signal_fn));
        let shared_f = Arc::clone(&shared);
        let shared_c = Arc::clone(&shared);

        Subscriber::new(
            move |v| {
                let mut f = lock(&shared);
                (*f)(Signal::Value(v));
            },
            move |e| {
                let mut f = lock(&shared_f);
                (*f)(Signal::Failure(e));
            },
            move || {
                let mut f = lock(&shared_c);
                (*f)(Signal::Completed);
            },
        )
    }
}

impl<V, E> fmt::Debug for Subscriber<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}

impl<V, E> Emitter for Subscriber<V, E> {
    type Value = V;
    type Error = E;

    fn emit(&mut self, value: V) {
        if self.terminated {
            return;
        }
        (self.value_fn)(value);
    }

    fn fail(&mut self, error: E) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        if let Some(efn) = &mut self.failure_fn {
            (efn)(error);
        }
    }

    fn complete(&mut self) {
        if self.terminated {
            return;
        }
        self.terminated = true;
        if let Some(cfn) = &mut self.completed_fn {
            (cfn)();
        }
    }

    fn is_closed(&self) -> bool {
        self.terminated
    }
}

/// Record of one attached subscriber, shared between the producing side and
/// the `Subscription` returned to the caller.
///
/// The subscriber is only ever called with `slot` locked and `closed` unset.
/// Disposal never waits on `slot`, so a subscriber may dispose itself from
/// inside one of its own handlers.
///
/// Each binding is fed by a single emitter, so a busy `slot` during delivery
/// means either a disposal in progress or a handler delivering into its own
/// binding again. Such nested signals are dropped instead of blocking.
pub(crate) struct Binding<V, E> {
    slot: Mutex<Option<Subscriber<V, E>>>,
    closed: AtomicBool,
}

impl<V, E> Binding<V, E> {
    pub(crate) fn new(subscriber: Subscriber<V, E>) -> Arc<Self> {
        Arc::new(Binding {
            slot: Mutex::new(Some(subscriber)),
            closed: AtomicBool::new(false),
        })
    }

    /// Offers `signal` to the subscriber. Returns `false` if it was dropped
    /// because the binding is already closed or is busy delivering.
    pub(crate) fn deliver(&self, signal: Signal<V, E>) -> bool {
        if self.is_closed() {
            return false;
        }
        let mut slot = match self.slot.try_lock() {
            Ok(slot) => slot,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                tracing::trace!("nested signal dropped, subscriber is busy");
                return false;
            }
        };

        // Disposed while this signal was waiting for the slot.
        if self.is_closed() {
            slot.take();
            return false;
        }
        let Some(subscriber) = slot.as_mut() else {
            return false;
        };

        subscriber.deliver(signal);

        if subscriber.is_terminated() || self.is_closed() {
            self.closed.store(true, Ordering::Release);
            slot.take();
        }
        true
    }

    pub(crate) fn dispose(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        // A busy slot means a delivery is running; it drops the subscriber
        // itself once it sees the closed flag.
        match self.slot.try_lock() {
            Ok(mut slot) => {
                slot.take();
            }
            Err(TryLockError::Poisoned(poisoned)) => {
                poisoned.into_inner().take();
            }
            Err(TryLockError::WouldBlock) => {}
        }
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

pub(crate) fn lock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle used to await the task running a producing routine.
pub enum SubscriptionHandle {
    /// No task to await.
    Nil,

    /// Holds a join handle for awaiting a producing routine running as a Tokio task.
    JoinTask(JoinHandle<()>),
}

/// Enumerates the teardown run when a subscription is disposed.
pub enum UnsubscribeLogic {
    /// Nothing to tear down.
    Nil,

    /// Disposing this subscription disposes the wrapped one as well.
    Wrapped(Box<Subscription>),

    /// Teardown defined by a function.
    Logic(Box<dyn FnOnce() + Send>),

    /// Asynchronous teardown. Spawned on the Tokio runtime that was current
    /// when the subscription was created.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

impl UnsubscribeLogic {
    fn run(self, runtime: Option<&runtime::Handle>) {
        match self {
            UnsubscribeLogic::Nil => (),
            UnsubscribeLogic::Wrapped(subscription) => subscription.dispose(),
            UnsubscribeLogic::Logic(fnc) => fnc(),
            UnsubscribeLogic::Future(future) => match runtime {
                Some(handle) => {
                    handle.spawn(future);
                }
                None => tracing::warn!(
                    "asynchronous teardown dropped, subscription was created outside a Tokio runtime"
                ),
            },
        }
    }
}

struct SubscriptionInner {
    teardown: Mutex<Option<UnsubscribeLogic>>,
    handle: Mutex<SubscriptionHandle>,
    disposed: AtomicBool,
    runtime: Option<runtime::Handle>,
}

/// Represents an active subscription to a `Stream`, `Subject` or `SharedStream`.
///
/// A `Subscription` is the disposable token returned by every `subscribe` call
/// and by `SharedStream::connect`. Disposing it stops further delivery to the
/// subscriber it controls. Clones share the same state, so disposing any clone
/// disposes them all.
///
/// When the producing routine runs as a Tokio task, the subscription also keeps
/// its join handle so callers can wait for it with [`join`](Self::join).
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Subscription {
    /// Creates a new `Subscription` with the specified teardown and handle.
    #[must_use]
    pub fn new(teardown: UnsubscribeLogic, handle: SubscriptionHandle) -> Self {
        Subscription {
            inner: Arc::new(SubscriptionInner {
                teardown: Mutex::new(Some(teardown)),
                handle: Mutex::new(handle),
                disposed: AtomicBool::new(false),
                runtime: runtime::Handle::try_current().ok(),
            }),
        }
    }

    /// A subscription that owns nothing.
    #[must_use]
    pub fn empty() -> Self {
        Subscription::new(UnsubscribeLogic::Nil, SubscriptionHandle::Nil)
    }

    /// Moves the join handle out, leaving `Nil` behind.
    pub(crate) fn take_handle(&self) -> SubscriptionHandle {
        std::mem::replace(&mut *lock(&self.inner.handle), SubscriptionHandle::Nil)
    }

    /// Waits for the task running the producing routine to finish.
    ///
    /// Resolves immediately when there is no task, when it was already joined
    /// through another clone, or when it was cancelled by disposal.
    ///
    /// # Errors
    ///
    /// Returns the `JoinError` if the producing task panicked.
    pub async fn join(&self) -> Result<(), JoinError> {
        match self.take_handle() {
            SubscriptionHandle::Nil => Ok(()),
            SubscriptionHandle::JoinTask(task_handle) => match task_handle.await {
                Err(e) if e.is_cancelled() => Ok(()),
                r => r,
            },
        }
    }
}

impl Disposable for Subscription {
    fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let teardown = lock(&self.inner.teardown).take();
        if let Some(teardown) = teardown {
            teardown.run(self.inner.runtime.as_ref());
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish_non_exhaustive()
    }
}
