//! Typed paths for persisted collections.

use labstock_core::{ItemId, Subject};

/// Logical path under the store root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorePath(String);

impl StorePath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `/`-separated segments, for stores addressed as trees.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/')
    }
}

impl core::fmt::Display for StorePath {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// `teachers` — the admin roster array.
pub fn teachers() -> StorePath {
    StorePath("teachers".to_string())
}

/// `lab_incharges/{subject}` — one subject's in-charge array.
pub fn lab_incharges(subject: Subject) -> StorePath {
    StorePath(format!("lab_incharges/{subject}"))
}

/// `inventory/{subject}/{itemId}` — one item node.
pub fn inventory_item(subject: Subject, item_id: ItemId) -> StorePath {
    StorePath(format!("inventory/{subject}/{item_id}"))
}

/// `transactions/{subject}` — append target for one subject's log.
pub fn transactions(subject: Subject) -> StorePath {
    StorePath(format!("transactions/{subject}"))
}
