//! `labstock-store` — the boundary to the remote realtime document store.
//!
//! The core never talks to the network itself. This crate defines the
//! contract it programs against: typed paths, a write interface with
//! explicit mutation intents, snapshot decoding with a single normalization
//! adapter, a push-subscription trait, and an in-memory store for tests/dev.

pub mod intents;
pub mod memory;
pub mod path;
pub mod snapshot;
pub mod subscription;
pub mod writer;

pub use intents::{ledger_write_ops, roster_write_ops};
pub use memory::MemoryStore;
pub use path::StorePath;
pub use snapshot::{DecodedSnapshot, RemoteSnapshot, decode, normalize_collection};
pub use subscription::StoreSubscription;
pub use writer::{PushKey, StoreError, StoreWriter, WriteOp, apply_writes};
