//! `labstock-service` — the operation surface exposed to view layers.
//!
//! [`InventoryService`] mediates every mutation: it resolves the caller's
//! role, validates the command against the current working state, issues the
//! resulting write intents to the store, and only then advances local state.
//! Snapshot deliveries from the store's subscription replace working state
//! wholesale through [`InventoryService::apply_snapshot`].

pub mod service;
pub mod state;

pub use service::{InventoryService, Profile, attach_subscription};
pub use state::AppState;
