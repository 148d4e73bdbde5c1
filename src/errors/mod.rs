//! Error types surfaced by streams, shared streams and the demo configuration.
//!
//! Producing-routine errors never cross the `subscribe` boundary: they reach
//! subscribers as terminal `Failure` signals. Only sequencing misuse of a
//! `SharedStream` and invalid configuration are reported synchronously.
mod stream_errors;

pub use stream_errors::*;
