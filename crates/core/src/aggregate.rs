//! Command/event execution semantics for domain state.

/// Pure decision + evolution semantics.
///
/// - **Decision logic**: `handle(&self, cmd)` validates and returns events.
/// - **State mutation**: `apply(&mut self, event)` evolves state.
///
/// Every check lives in `handle`, so a rejected command leaves state
/// untouched; `apply` is infallible and must not perform IO. Persisting the
/// resulting events (or the write intents derived from them) is a concern of
/// the layer above.
pub trait Aggregate {
    type Command: Clone + core::fmt::Debug;
    type Event: Clone + core::fmt::Debug;
    type Error: core::fmt::Debug;

    /// Decide which events to emit given the current state and a command.
    ///
    /// This must not mutate state. State evolution is done through `apply`.
    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error>;

    /// Evolve in-memory state from a single event.
    fn apply(&mut self, event: &Self::Event);
}
