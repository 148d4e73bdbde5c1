//! Orchestration of the publisher demos.
//!
//! A [`Playground`] wires labelled subscribers to one of the stream flavours
//! and forwards every signal they observe to an injected [`SignalSink`]. The
//! stream primitives never report signals themselves; the sink is where they
//! become visible.

mod sink;

pub use sink::*;

use std::{fmt, sync::Arc};

use tokio::task::JoinError;

use crate::{
    errors::{ConnectError, FeedError},
    feed::{CompanyApi, CompanyFeed},
    subscription::subscribe::{Disposable, Subscribeable, Subscriber, Subscription},
    Stream,
};

/// The publisher flavours the playground can demonstrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Demo {
    /// A one-shot future resolving to the whole company list at once.
    Future,
    /// A hot subject driven once by the mock API.
    Passthrough,
    /// A single subscriber on the cold company stream.
    Publisher,
    /// Two subscribers on the cold stream, each triggering its own fetch.
    MultipleSubscribers,
    /// Two listeners sharing one fetch through an explicit connect.
    SharedSubscribers,
}

impl fmt::Display for Demo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Demo::Future => "future",
            Demo::Passthrough => "passthrough",
            Demo::Publisher => "publisher",
            Demo::MultipleSubscribers => "multiple-subscribers",
            Demo::SharedSubscribers => "shared-subscribers",
        };
        f.write_str(name)
    }
}

/// Runs demos against a [`CompanyFeed`], keeping every subscription it
/// creates in a bag until [`finish`](Playground::finish) or
/// [`cancel`](Playground::cancel).
pub struct Playground<S> {
    feed: CompanyFeed,
    sink: Arc<S>,
    bag: Vec<Subscription>,
}

impl<S: SignalSink> Playground<S> {
    pub fn new(feed: CompanyFeed, sink: S) -> Self {
        Playground {
            feed,
            sink: Arc::new(sink),
            bag: Vec::new(),
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Starts `demo`. Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Sequencing errors from connecting a shared stream or starting the
    /// passthrough API.
    pub fn run(&mut self, demo: Demo) -> Result<(), ConnectError> {
        tracing::info!(%demo, companies = self.feed.names().len(), "running demo");
        match demo {
            Demo::Future => self.try_future(),
            Demo::Passthrough => self.try_passthrough()?,
            Demo::Publisher => self.try_publisher(),
            Demo::MultipleSubscribers => self.try_multiple_subscribers(),
            Demo::SharedSubscribers => self.try_shared_subscribers()?,
        }
        Ok(())
    }

    /// Waits for every producing task started by the demos.
    ///
    /// # Errors
    ///
    /// The first `JoinError` of a panicked producing task.
    pub async fn finish(self) -> Result<(), JoinError> {
        for subscription in &self.bag {
            subscription.join().await?;
        }
        Ok(())
    }

    /// Disposes every subscription in the bag.
    pub fn cancel(&self) {
        for subscription in &self.bag {
            subscription.dispose();
        }
    }

    fn observer<V: fmt::Display + 'static>(&self, label: &str) -> Subscriber<V, FeedError> {
        let (sv, sf, sc) = (
            Arc::clone(&self.sink),
            Arc::clone(&self.sink),
            Arc::clone(&self.sink),
        );
        let (lv, lf, lc) = (label.to_string(), label.to_string(), label.to_string());

        Subscriber::new(
            move |v: V| sv.record(&lv, SignalEvent::Value(v.to_string())),
            move |e: FeedError| sf.record(&lf, SignalEvent::Failure(e.to_string())),
            move || sc.record(&lc, SignalEvent::Completed),
        )
    }

    fn try_future(&mut self) {
        let feed = self.feed.clone();
        let fetch_companies = Stream::from_future(move || {
            let feed = feed.clone();
            async move {
                tokio::time::sleep(feed.delay().next()).await;
                if feed.names().is_empty() {
                    return Err(FeedError::NoItems);
                }
                Ok(feed.names().join(", "))
            }
        });

        let observer = self.observer("future");
        self.bag.push(fetch_companies.subscribe(observer));
    }

    fn try_passthrough(&mut self) -> Result<(), ConnectError> {
        let mut api = CompanyApi::new(self.feed.clone());

        let observer = self.observer("passthrough");
        self.bag.push(api.receiver().subscribe(observer));
        self.bag.push(api.start()?);
        Ok(())
    }

    fn try_publisher(&mut self) {
        let companies = self.feed.clone().into_stream();

        let observer = self.observer("publisher");
        self.bag.push(companies.subscribe(observer));
    }

    fn try_multiple_subscribers(&mut self) {
        let companies = self.feed.clone().into_stream();

        for label in ["pub1", "pub2"] {
            let observer = self.observer(label);
            self.bag.push(companies.subscribe(observer));
        }
    }

    fn try_shared_subscribers(&mut self) -> Result<(), ConnectError> {
        let shared = self.feed.clone().into_stream().share();

        for label in ["multi1", "multi2"] {
            let observer = self.observer(label);
            self.bag.push(shared.subscribe(observer));
        }
        self.bag.push(shared.connect()?);
        Ok(())
    }
}
