//! Provides structures and traits related to subscription management.
//!
//! This module includes `Subscriber` for handling observed values, failures and
//! completion, `Signal` for the notifications themselves, and `Subscription`,
//! the disposable token controlling one attached subscriber.
pub mod subscribe;
