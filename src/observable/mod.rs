//! The `observable` module provides the cold [`Stream`] and its multicast
//! wrapper [`SharedStream`].
//!
//! A `Stream` is a factory: every `subscribe` call runs the producing routine
//! again with a brand-new emitter bound only to that subscriber. Wrapping it in
//! a `SharedStream` runs the routine once for every attached listener, starting
//! only on an explicit `connect`.

mod multicast;

pub use multicast::*;

use std::{
    fmt,
    future::Future,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{
    emitter::Emitter,
    subjects::{Subject, SubjectEmitter, SubjectReceiver},
    subscription::subscribe::{
        Binding, Disposable, Signal, Subscribeable, Subscriber, Subscription, SubscriptionHandle,
        UnsubscribeLogic,
    },
};

type Routine<V, E> = dyn Fn(StreamEmitter<V, E>) -> Subscription + Send + Sync;

/// The `Stream` struct represents a cold source of values.
///
/// # Example: stream driven by a Tokio task
///
/// ```no_run
/// use std::time::Duration;
///
/// use rxplay::{Emitter, Stream, Subscribeable, Subscriber};
///
/// #[tokio::main]
/// async fn main() {
///     let countdown = Stream::<u32, String>::spawn(|mut emitter| async move {
///         for i in (1..=3).rev() {
///             tokio::time::sleep(Duration::from_millis(100)).await;
///             emitter.emit(i);
///         }
///         emitter.complete();
///     });
///
///     // Every subscription runs the routine again.
///     let first = countdown.subscribe(Subscriber::on_value(|v| println!("first {v}")));
///     let second = countdown.subscribe(Subscriber::on_value(|v| println!("second {v}")));
///
///     let _ = first.join().await;
///     let _ = second.join().await;
/// }
/// ```
pub struct Stream<V, E> {
    routine: Arc<Routine<V, E>>,
    runs: Arc<AtomicUsize>,
}

impl<V, E> Clone for Stream<V, E> {
    fn clone(&self) -> Self {
        Stream {
            routine: Arc::clone(&self.routine),
            runs: Arc::clone(&self.runs),
        }
    }
}

impl<V: Send + 'static, E: Send + 'static> Stream<V, E> {
    /// Creates a stream from a synchronous producing routine.
    ///
    /// The routine receives the emitter bound to the new subscriber and returns
    /// a `Subscription` describing how to stop it and, optionally, the task to
    /// await. Disposing the subscriber's subscription disposes that one too.
    pub fn new(routine: impl Fn(StreamEmitter<V, E>) -> Subscription + Send + Sync + 'static) -> Self {
        Stream {
            routine: Arc::new(routine),
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Creates a stream whose producing routine is a future spawned as a Tokio
    /// task for every subscription.
    ///
    /// Disposing the subscription aborts the task at its next suspension point.
    /// The returned subscription can be awaited with `join`.
    ///
    /// Subscribing must happen inside a Tokio runtime.
    pub fn spawn<F, Fut>(routine: F) -> Self
    where
        F: Fn(StreamEmitter<V, E>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self::new(move |emitter| {
            let join_handle = tokio::task::spawn(routine(emitter));
            let abort_handle = join_handle.abort_handle();

            Subscription::new(
                UnsubscribeLogic::Logic(Box::new(move || abort_handle.abort())),
                SubscriptionHandle::JoinTask(join_handle),
            )
        })
    }

    /// Creates a one-shot stream: each subscription calls `make`, awaits the
    /// result and either emits the value and completes, or fails.
    pub fn from_future<F, Fut>(make: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        Self::spawn(move |mut emitter| {
            let pending = make();
            async move {
                match pending.await {
                    Ok(v) => {
                        emitter.emit(v);
                        emitter.complete();
                    }
                    Err(e) => emitter.fail(e),
                }
            }
        })
    }

    /// Number of producing-routine runs started so far, one per subscription.
    pub fn subscription_count(&self) -> usize {
        self.runs.load(Ordering::Acquire)
    }

    /// Wraps this stream in a [`SharedStream`] bridging through the subject
    /// returned by `factory`.
    pub fn multicast(
        self,
        factory: impl FnOnce() -> (SubjectEmitter<V, E>, SubjectReceiver<V, E>),
    ) -> SharedStream<V, E>
    where
        V: Clone,
        E: Clone,
    {
        SharedStream::new(self, factory)
    }

    /// Multicasts through a plain [`Subject`].
    pub fn share(self) -> SharedStream<V, E>
    where
        V: Clone,
        E: Clone,
    {
        self.multicast(Subject::emitter_receiver)
    }
}

impl<V: Send + 'static, E: Send + 'static> Subscribeable for Stream<V, E> {
    type Value = V;
    type Error = E;

    fn subscribe(&self, subscriber: Subscriber<V, E>) -> Subscription {
        let run = self.runs.fetch_add(1, Ordering::AcqRel) + 1;
        tracing::trace!(run, "starting cold stream run");

        let binding = Binding::new(subscriber);
        let upstream = (self.routine)(StreamEmitter {
            binding: Arc::clone(&binding),
        });

        // The caller awaits the routine through the returned subscription.
        let handle = upstream.take_handle();

        Subscription::new(
            UnsubscribeLogic::Logic(Box::new(move || {
                binding.dispose();
                upstream.dispose();
            })),
            handle,
        )
    }
}

impl<V, E> fmt::Debug for Stream<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stream")
            .field("runs", &self.runs.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Emitter handed to a `Stream`'s producing routine, bound to exactly one
/// subscriber.
pub struct StreamEmitter<V, E> {
    binding: Arc<Binding<V, E>>,
}

impl<V, E> Emitter for StreamEmitter<V, E> {
    type Value = V;
    type Error = E;

    fn emit(&mut self, value: V) {
        self.binding.deliver(Signal::Value(value));
    }

    fn fail(&mut self, error: E) {
        self.binding.deliver(Signal::Failure(error));
    }

    fn complete(&mut self) {
        self.binding.deliver(Signal::Completed);
    }

    fn is_closed(&self) -> bool {
        self.binding.is_closed()
    }
}
