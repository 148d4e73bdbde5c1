#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use rxplay::{Emitter, Stream, Subscription};

/// A synchronous stream emitting `0..end` and completing, counting how many
/// times its producing routine ran.
pub fn generate_u32_stream(end: u32) -> (Stream<u32, String>, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let runs_c = Arc::clone(&runs);

    let stream = Stream::<u32, String>::new(move |mut emitter| {
        runs_c.fetch_add(1, Ordering::SeqCst);
        for i in 0..end {
            if emitter.is_closed() {
                break;
            }
            emitter.emit(i);
        }
        emitter.complete();
        Subscription::empty()
    });
    (stream, runs)
}
