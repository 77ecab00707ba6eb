//! Append-only stock transaction records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labstock_core::{Email, ItemId, TransactionId};

/// Kind of stock movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Addition,
    Breakage,
}

/// Who performed a mutation, as recorded on transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub email: Email,
    pub name: String,
}

/// One recorded quantity change.
///
/// Transactions are never mutated or deleted by the core. Deleting an item
/// leaves its transactions in place; the `item_id` on old records may no
/// longer resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub item_id: ItemId,
    pub item_number: String,
    pub particulars: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Signed change: positive for additions, negative for breakage.
    pub quantity_change: i64,
    /// Item quantity after the change was applied.
    pub new_quantity: u32,
    pub reason: String,
    pub performed_by: Email,
    pub performed_by_name: String,
    pub timestamp: DateTime<Utc>,
}
