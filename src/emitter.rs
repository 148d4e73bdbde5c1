/// Producer-side handle used by a stream's driving logic to push signals.
///
/// After `fail` or `complete` has been called once, every further call is a
/// silent no-op. The same holds for `emit` after termination.
pub trait Emitter {
    /// The type of values pushed through this emitter.
    type Value;
    /// The type of the failure carried by a terminal `fail`.
    type Error;

    /// Pushes a value to the bound subscriber(s).
    fn emit(&mut self, value: Self::Value);

    /// Terminates the bound subscriber(s) with an error.
    fn fail(&mut self, error: Self::Error);

    /// Terminates the bound subscriber(s) successfully.
    fn complete(&mut self);

    /// Returns `true` once nothing can receive signals from this emitter anymore,
    /// either because it was terminated or because every bound subscriber was
    /// disposed. Producing routines should stop doing work when this turns `true`.
    fn is_closed(&self) -> bool {
        false
    }
}
