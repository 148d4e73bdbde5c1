//! `rxplay` is a small reactive-stream toolkit built around a mock company feed.
//!
//! It provides four publisher flavours:
//!
//! - [`Stream`], a cold stream re-running its producing routine for every
//!   subscriber, including one-shot streams built from a future;
//! - [`Subject`], a hot broadcast point driven by a single producing owner;
//! - [`SharedStream`], sharing a single run of a cold stream among listeners
//!   attached before an explicit `connect()`;
//! - [`CompanyFeed`], the simulated slow data source driving any of them.
//!
//! Every `subscribe` returns a [`Subscription`], a disposable token that stops
//! delivery to its subscriber. Signals are delivered in emission order, and a
//! subscriber never receives anything after its first `Failure` or `Completed`.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use rxplay::{CompanyFeed, Delay, Subscribeable, Subscriber};
//!
//! #[tokio::main]
//! async fn main() {
//!     let companies = CompanyFeed::with_mock_companies(Delay::Fixed(Duration::from_millis(300)))
//!         .into_stream();
//!
//!     let subscription = companies.subscribe(Subscriber::new(
//!         |company| println!("received {company}"),
//!         |e| eprintln!("failed: {e}"),
//!         || println!("completed"),
//!     ));
//!
//!     let _ = subscription.join().await;
//! }
//! ```

pub mod config;
mod emitter;
mod errors;
pub mod feed;
mod observable;
pub mod playground;
pub mod subjects;
pub mod subscription;

pub use emitter::Emitter;
pub use errors::*;
pub use feed::{CompanyApi, CompanyFeed, Delay};
pub use observable::*;
pub use subjects::Subject;
pub use subscription::subscribe::{
    Disposable, Signal, Subscribeable, Subscriber, Subscription, SubscriptionHandle,
    UnsubscribeLogic,
};
