//! Subscription interface consumed from the store collaborator.

use serde_json::Value as JsonValue;

/// Callback receiving the full current root value on every change.
pub type SnapshotHandler = Box<dyn FnMut(JsonValue) + Send>;

/// Callback receiving a subscription failure description.
pub type ErrorHandler = Box<dyn FnMut(String) + Send>;

/// Push-based subscription delivering the full value at the store root.
///
/// Deliveries are whole values, not diffs; `Null` means "no data yet" and
/// must be treated as empty defaults. Errors reported through `on_error`
/// must not block the consumer, which proceeds on its current (or empty)
/// state.
pub trait StoreSubscription {
    fn subscribe(&self, on_snapshot: SnapshotHandler, on_error: ErrorHandler);
}
