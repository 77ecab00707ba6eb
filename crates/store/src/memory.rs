//! In-memory store for tests/dev.

use std::sync::Mutex;

use serde_json::{Map, Value as JsonValue};

use crate::path::StorePath;
use crate::subscription::{ErrorHandler, SnapshotHandler, StoreSubscription};
use crate::writer::{PushKey, StoreError, StoreWriter};

/// In-memory tree store mirroring the remote store's path semantics.
///
/// Intended for tests/dev. Push keys are zero-padded counters, so their
/// lexicographic order matches insertion order like the remote store's keys.
/// Snapshot delivery is explicit: writes do not notify subscribers on their
/// own — call [`MemoryStore::emit`] to deliver the current root, which lets
/// tests control interleaving (and avoids re-entrant delivery while a caller
/// still holds its own locks).
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    root: JsonValue,
    push_counter: u64,
    fail_writes: bool,
    snapshot_handlers: Vec<SnapshotHandler>,
    error_handlers: Vec<ErrorHandler>,
}

impl core::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MemoryStore").finish_non_exhaustive()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value of the whole tree.
    pub fn root(&self) -> JsonValue {
        self.inner
            .lock()
            .map(|inner| inner.root.clone())
            .unwrap_or(JsonValue::Null)
    }

    /// Current value at `path`, `Null` when absent.
    pub fn value_at(&self, path: &StorePath) -> JsonValue {
        let root = self.root();
        let mut node = &root;
        for segment in path.segments() {
            match node {
                JsonValue::Object(map) => match map.get(segment) {
                    Some(child) => node = child,
                    None => return JsonValue::Null,
                },
                _ => return JsonValue::Null,
            }
        }
        node.clone()
    }

    /// Make every subsequent write fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.fail_writes = fail;
        }
    }

    /// Deliver the current root to every subscriber.
    ///
    /// Handlers run with the store unlocked, so they may write back into it
    /// (the remote store behaves the same way: deliveries are async).
    pub fn emit(&self) {
        let (root, mut handlers) = match self.inner.lock() {
            Ok(mut inner) => (
                inner.root.clone(),
                std::mem::take(&mut inner.snapshot_handlers),
            ),
            Err(_) => return,
        };

        for handler in &mut handlers {
            handler(root.clone());
        }

        if let Ok(mut inner) = self.inner.lock() {
            let mut added_meanwhile = std::mem::take(&mut inner.snapshot_handlers);
            handlers.append(&mut added_meanwhile);
            inner.snapshot_handlers = handlers;
        }
    }

    /// Report a subscription failure to every subscriber.
    pub fn emit_error(&self, message: &str) {
        let mut handlers = match self.inner.lock() {
            Ok(mut inner) => std::mem::take(&mut inner.error_handlers),
            Err(_) => return,
        };

        for handler in &mut handlers {
            handler(message.to_string());
        }

        if let Ok(mut inner) = self.inner.lock() {
            let mut added_meanwhile = std::mem::take(&mut inner.error_handlers);
            handlers.append(&mut added_meanwhile);
            inner.error_handlers = handlers;
        }
    }

    fn locked(&self) -> Result<std::sync::MutexGuard<'_, Inner>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::Write {
            path: String::new(),
            message: "store lock poisoned".to_string(),
        })
    }

    fn check_writable(inner: &Inner, path: &StorePath) -> Result<(), StoreError> {
        if inner.fail_writes {
            return Err(StoreError::Write {
                path: path.to_string(),
                message: "simulated write failure".to_string(),
            });
        }
        Ok(())
    }

    fn node_mut<'a>(root: &'a mut JsonValue, path: &StorePath) -> &'a mut JsonValue {
        let mut node = root;
        for segment in path.segments() {
            if !node.is_object() {
                *node = JsonValue::Object(Map::new());
            }
            node = match node {
                JsonValue::Object(map) => {
                    map.entry(segment.to_string()).or_insert(JsonValue::Null)
                }
                _ => unreachable!("node was just initialized as an object"),
            };
        }
        node
    }
}

impl StoreWriter for MemoryStore {
    fn set(&self, path: &StorePath, value: JsonValue) -> Result<(), StoreError> {
        let mut inner = self.locked()?;
        Self::check_writable(&inner, path)?;
        *Self::node_mut(&mut inner.root, path) = value;
        Ok(())
    }

    fn push(&self, path: &StorePath, value: JsonValue) -> Result<PushKey, StoreError> {
        let mut inner = self.locked()?;
        Self::check_writable(&inner, path)?;

        inner.push_counter += 1;
        let key = format!("k{:08}", inner.push_counter);

        let node = Self::node_mut(&mut inner.root, path);
        if !node.is_object() {
            *node = JsonValue::Object(Map::new());
        }
        if let JsonValue::Object(map) = node {
            map.insert(key.clone(), value);
        }

        Ok(PushKey(key))
    }

    fn remove(&self, path: &StorePath) -> Result<(), StoreError> {
        let mut inner = self.locked()?;
        Self::check_writable(&inner, path)?;

        let segments: Vec<String> = path.segments().map(str::to_string).collect();
        let Some((last, parents)) = segments.split_last() else {
            return Ok(());
        };

        let mut node = &mut inner.root;
        for segment in parents {
            match node {
                JsonValue::Object(map) => match map.get_mut(segment) {
                    Some(child) => node = child,
                    // Nothing stored under the path; removal is idempotent.
                    None => return Ok(()),
                },
                _ => return Ok(()),
            }
        }

        if let JsonValue::Object(map) = node {
            map.remove(last);
        }
        Ok(())
    }
}

impl StoreSubscription for MemoryStore {
    /// Registers the handlers and immediately delivers the current root,
    /// matching the remote store's initial-value callback. The delivery
    /// happens with the store unlocked so the handler may write back.
    fn subscribe(&self, mut on_snapshot: SnapshotHandler, on_error: ErrorHandler) {
        on_snapshot(self.root());
        if let Ok(mut inner) = self.inner.lock() {
            inner.snapshot_handlers.push(on_snapshot);
            inner.error_handlers.push(on_error);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;
    use labstock_core::Subject;
    use serde_json::json;

    #[test]
    fn set_creates_intermediate_nodes() {
        let store = MemoryStore::new();
        let path = path::lab_incharges(Subject::Physics);
        store.set(&path, json!([{"name": "A", "email": "a@gmail.com"}])).unwrap();

        assert_eq!(
            store.root()["lab_incharges"]["physics"][0]["name"],
            "A"
        );
        assert_eq!(store.value_at(&path)[0]["email"], "a@gmail.com");
    }

    #[test]
    fn push_keys_preserve_insertion_order() {
        let store = MemoryStore::new();
        let path = path::transactions(Subject::Biology);

        let first = store.push(&path, json!({"n": 1})).unwrap();
        let second = store.push(&path, json!({"n": 2})).unwrap();
        assert!(first.0 < second.0);

        let node = store.value_at(&path);
        let keys: Vec<&String> = node.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec![&first.0, &second.0]);
    }

    #[test]
    fn remove_is_idempotent() {
        let store = MemoryStore::new();
        let path = path::inventory_item(Subject::Chemistry, labstock_core::ItemId::new());

        store.set(&path, json!({"quantity": 1})).unwrap();
        store.remove(&path).unwrap();
        store.remove(&path).unwrap();
        assert!(store.value_at(&path).is_null());
    }

    #[test]
    fn failed_writes_leave_the_tree_untouched() {
        let store = MemoryStore::new();
        let path = path::teachers();
        store.set(&path, json!([1])).unwrap();

        store.fail_writes(true);
        assert!(store.set(&path, json!([2])).is_err());
        assert!(store.push(&path, json!(3)).is_err());

        store.fail_writes(false);
        assert_eq!(store.value_at(&path), json!([1]));
    }

    #[test]
    fn subscribe_delivers_current_value_then_emits() {
        use std::sync::{Arc, Mutex};

        let store = MemoryStore::new();
        store.set(&path::teachers(), json!(["seed"])).unwrap();

        let seen: Arc<Mutex<Vec<JsonValue>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        store.subscribe(
            Box::new(move |root| sink.lock().unwrap().push(root)),
            Box::new(|_| {}),
        );

        store.set(&path::teachers(), json!(["seed", "next"])).unwrap();
        store.emit();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0]["teachers"], json!(["seed"]));
        assert_eq!(seen[1]["teachers"], json!(["seed", "next"]));
    }
}
