//! The `subjects` module provides the hot [`Subject`].
//!
//! A subject is split into a [`SubjectEmitter`], held by the single producing
//! owner and implementing [`Emitter`](crate::Emitter), and a
//! [`SubjectReceiver`], which any number of consumers subscribe to.
mod subject;

pub use subject::*;
