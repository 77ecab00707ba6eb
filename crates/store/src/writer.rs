//! Write interface consumed from the store collaborator.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::path::StorePath;

/// Store-boundary failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("failed to encode value for {path}: {message}")]
    Encode { path: String, message: String },

    #[error("store write failed at {path}: {message}")]
    Write { path: String, message: String },
}

/// Store-generated key returned by `push`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PushKey(pub String);

/// Write surface of the remote store.
///
/// Implementations perform the actual network I/O and return only once the
/// store confirmed (or rejected) the write; the core reports a mutation as
/// done strictly after that signal.
pub trait StoreWriter {
    /// Idempotent full replace of the value at `path`.
    fn set(&self, path: &StorePath, value: JsonValue) -> Result<(), StoreError>;

    /// Append `value` under a store-generated unique key.
    fn push(&self, path: &StorePath, value: JsonValue) -> Result<PushKey, StoreError>;

    /// Delete the value at `path`.
    fn remove(&self, path: &StorePath) -> Result<(), StoreError>;
}

impl<W: StoreWriter> StoreWriter for std::sync::Arc<W> {
    fn set(&self, path: &StorePath, value: JsonValue) -> Result<(), StoreError> {
        (**self).set(path, value)
    }

    fn push(&self, path: &StorePath, value: JsonValue) -> Result<PushKey, StoreError> {
        (**self).push(path, value)
    }

    fn remove(&self, path: &StorePath) -> Result<(), StoreError> {
        (**self).remove(path)
    }
}

/// A single mutation intent for the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOp {
    Set { path: StorePath, value: JsonValue },
    Push { path: StorePath, value: JsonValue },
    Remove { path: StorePath },
}

impl WriteOp {
    pub fn path(&self) -> &StorePath {
        match self {
            WriteOp::Set { path, .. } | WriteOp::Push { path, .. } | WriteOp::Remove { path } => {
                path
            }
        }
    }
}

/// Issue `ops` in order, stopping at the first failure.
///
/// The store offers no multi-key transactions, so intent builders order
/// their ops deterministically (see [`crate::intents`]) and snapshot
/// reconciliation absorbs a partially-applied sequence.
pub fn apply_writes<W: StoreWriter>(writer: &W, ops: &[WriteOp]) -> Result<(), StoreError> {
    for op in ops {
        match op {
            WriteOp::Set { path, value } => writer.set(path, value.clone())?,
            WriteOp::Push { path, value } => {
                writer.push(path, value.clone())?;
            }
            WriteOp::Remove { path } => writer.remove(path)?,
        }
    }
    Ok(())
}
