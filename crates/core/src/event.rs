//! Domain event trait.

use chrono::{DateTime, Utc};

/// A domain event: an immutable fact emitted by a validated command.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - designed to be **append-only**
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "inventory.item.created").
    fn event_type(&self) -> &'static str;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}
