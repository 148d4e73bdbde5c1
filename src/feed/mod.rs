//! A simulated slow data source.
//!
//! [`CompanyFeed`] emits a fixed, ordered list of company names one at a time,
//! waiting a configured delay before each item to simulate network latency.
//! It can back a cold [`Stream`] (every subscriber triggers its own fetch) or
//! drive a [`Subject`] once through [`CompanyApi`].

mod delay;

pub use delay::*;

use std::sync::Arc;

use crate::{
    emitter::Emitter,
    errors::{ConnectError, FeedError},
    subjects::{Subject, SubjectEmitter, SubjectReceiver},
    subscription::subscribe::{Subscription, SubscriptionHandle, UnsubscribeLogic},
    Stream,
};

/// The mock database of the playground.
pub const MOCK_COMPANIES: [&str; 7] = [
    "Googz",
    "Macrashaft",
    "Boombatown",
    "mickmack",
    "Crappabble",
    "Masterbonka",
    "Rhinestone",
];

/// Ordered list of names emitted with an artificial delay before each one.
#[derive(Debug, Clone)]
pub struct CompanyFeed {
    names: Arc<[String]>,
    delay: Delay,
    label_with_delay: bool,
}

impl CompanyFeed {
    pub fn new<I, S>(names: I, delay: Delay) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CompanyFeed {
            names: names.into_iter().map(Into::into).collect(),
            delay,
            label_with_delay: false,
        }
    }

    /// A feed over [`MOCK_COMPANIES`].
    pub fn with_mock_companies(delay: Delay) -> Self {
        CompanyFeed::new(MOCK_COMPANIES, delay)
    }

    /// When enabled, every item is suffixed with the delay it waited for,
    /// e.g. `"Googz delay: 1.42"`.
    #[must_use]
    pub fn label_with_delay(mut self, enabled: bool) -> Self {
        self.label_with_delay = enabled;
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn delay(&self) -> Delay {
        self.delay
    }

    /// Drives `emitter` through the whole feed.
    ///
    /// An empty feed fails with [`FeedError::NoItems`] right away, without
    /// waiting. Otherwise each item waits its own delay, drawn fresh when a
    /// range is configured, and is emitted strictly after the previous one.
    /// The last item is followed by `complete`. The run stops early as soon as
    /// the emitter reports it is closed.
    pub async fn run<O>(&self, mut emitter: O)
    where
        O: Emitter<Value = String, Error = FeedError>,
    {
        if self.names.is_empty() {
            tracing::debug!("company feed is empty");
            emitter.fail(FeedError::NoItems);
            return;
        }
        tracing::debug!(items = self.names.len(), "company feed started");

        for (index, name) in self.names.iter().enumerate() {
            let wait = self.delay.next();
            tokio::time::sleep(wait).await;

            if emitter.is_closed() {
                tracing::debug!(index, "company feed stopped, nobody is listening");
                return;
            }
            tracing::trace!(index, name = %name, "emitting company");

            let item = if self.label_with_delay {
                format!("{} delay: {:.2}", name, wait.as_secs_f64())
            } else {
                name.clone()
            };
            emitter.emit(item);
        }
        emitter.complete();
        tracing::debug!("company feed completed");
    }

    /// Cold stream over this feed: every subscription runs the whole feed
    /// again on its own Tokio task.
    pub fn into_stream(self) -> Stream<String, FeedError> {
        Stream::<String, FeedError>::spawn(move |emitter| {
            let feed = self.clone();
            async move { feed.run(emitter).await }
        })
    }
}

/// Hot variant of the feed: a single run drives a [`Subject`] that any
/// number of consumers can subscribe to.
///
/// Consumers attaching after `start` only see the companies emitted after
/// they attached.
#[derive(Debug)]
pub struct CompanyApi {
    feed: CompanyFeed,
    emitter: Option<SubjectEmitter<String, FeedError>>,
    receiver: SubjectReceiver<String, FeedError>,
}

impl CompanyApi {
    pub fn new(feed: CompanyFeed) -> Self {
        let (emitter, receiver) = Subject::emitter_receiver();
        CompanyApi {
            feed,
            emitter: Some(emitter),
            receiver,
        }
    }

    /// The subscription side of the underlying subject.
    pub fn receiver(&self) -> SubjectReceiver<String, FeedError> {
        self.receiver.clone()
    }

    /// Spawns the single run of the feed into the subject.
    ///
    /// Must be called inside a Tokio runtime. Disposing the returned
    /// subscription stops the run.
    ///
    /// # Errors
    ///
    /// [`ConnectError::AlreadyConnected`] if the API was already started.
    pub fn start(&mut self) -> Result<Subscription, ConnectError> {
        let emitter = self.emitter.take().ok_or(ConnectError::AlreadyConnected)?;
        tracing::debug!(listeners = self.receiver.len(), "starting company api");

        let feed = self.feed.clone();
        let join_handle = tokio::task::spawn(async move { feed.run(emitter).await });
        let abort_handle = join_handle.abort_handle();

        Ok(Subscription::new(
            UnsubscribeLogic::Logic(Box::new(move || abort_handle.abort())),
            SubscriptionHandle::JoinTask(join_handle),
        ))
    }
}
