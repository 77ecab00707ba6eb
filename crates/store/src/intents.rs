//! Translation of domain events into store write intents.
//!
//! Builders take the *post-apply* state alongside the events because some
//! branches are persisted whole (the teacher array) while others are
//! per-node (one item).
//!
//! Ordering rule for stock adjustments: the transaction is pushed **before**
//! the item quantity is set. If the sequence is interrupted between the two,
//! the log holds a transaction whose quantity write never landed — the next
//! snapshot delivery reconciles that — whereas the reverse order could lose
//! audit history.

use serde::Serialize;
use serde_json::Value as JsonValue;

use labstock_auth::{Roster, RosterEvent};
use labstock_core::Subject;
use labstock_inventory::{LedgerEvent, SubjectLedger};

use crate::path::{self, StorePath};
use crate::writer::{StoreError, WriteOp};

fn encode<T: Serialize>(path: &StorePath, value: &T) -> Result<JsonValue, StoreError> {
    serde_json::to_value(value).map_err(|e| StoreError::Encode {
        path: path.to_string(),
        message: e.to_string(),
    })
}

/// Write intents for roster events, given the roster after applying them.
pub fn roster_write_ops(
    next: &Roster,
    events: &[RosterEvent],
) -> Result<Vec<WriteOp>, StoreError> {
    let mut ops = Vec::new();

    for event in events {
        match event {
            // The teacher list is persisted as one array, so both add and
            // remove re-set the whole branch.
            RosterEvent::TeacherAdded(_) | RosterEvent::TeacherRemoved(_) => {
                let path = path::teachers();
                let value = encode(&path, &next.teachers)?;
                ops.push(WriteOp::Set { path, value });
            }
            RosterEvent::InchargesReplaced(e) => {
                let path = path::lab_incharges(e.subject);
                let value = encode(&path, &e.incharges)?;
                ops.push(WriteOp::Set { path, value });
            }
        }
    }

    Ok(ops)
}

/// Write intents for ledger events, given the subject's ledger after
/// applying them.
pub fn ledger_write_ops(
    subject: Subject,
    next: &SubjectLedger,
    events: &[LedgerEvent],
) -> Result<Vec<WriteOp>, StoreError> {
    let mut ops = Vec::new();

    for event in events {
        match event {
            LedgerEvent::ItemCreated(e) => {
                let tx_path = path::transactions(subject);
                let tx_value = encode(&tx_path, &e.transaction)?;
                ops.push(WriteOp::Push {
                    path: tx_path,
                    value: tx_value,
                });

                let item_path = path::inventory_item(subject, e.item.id);
                let item_value = encode(&item_path, &e.item)?;
                ops.push(WriteOp::Set {
                    path: item_path,
                    value: item_value,
                });
            }
            LedgerEvent::ItemUpdated(e) => {
                let item_path = path::inventory_item(subject, e.item.id);
                let item_value = encode(&item_path, &e.item)?;
                ops.push(WriteOp::Set {
                    path: item_path,
                    value: item_value,
                });
            }
            LedgerEvent::ItemDeleted(e) => {
                // The item's transactions stay in the store as history.
                ops.push(WriteOp::Remove {
                    path: path::inventory_item(subject, e.item_id),
                });
            }
            LedgerEvent::StockAdjusted(e) => {
                let tx_path = path::transactions(subject);
                let tx_value = encode(&tx_path, &e.transaction)?;
                ops.push(WriteOp::Push {
                    path: tx_path,
                    value: tx_value,
                });

                let item = next.item(e.item_id).ok_or_else(|| StoreError::Encode {
                    path: path::inventory_item(subject, e.item_id).to_string(),
                    message: "adjusted item missing from next state".to_string(),
                })?;
                let item_path = path::inventory_item(subject, item.id);
                let item_value = encode(&item_path, item)?;
                ops.push(WriteOp::Set {
                    path: item_path,
                    value: item_value,
                });
            }
        }
    }

    Ok(ops)
}
