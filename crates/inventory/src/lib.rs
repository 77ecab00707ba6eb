//! `labstock-inventory` — per-subject item collections and their
//! append-only transaction logs.

pub mod item;
pub mod ledger;
pub mod transaction;

pub use item::{DEFAULT_MIN_STOCK_LEVEL, InventoryItem, ItemFields, StockStatus};
pub use ledger::{
    AdjustStock, CreateItem, DeleteItem, INITIAL_STOCK_REASON, ItemCreated, ItemDeleted,
    ItemUpdated, LedgerCommand, LedgerEvent, StockAction, StockAdjusted, SubjectLedger,
    UpdateItem,
};
pub use transaction::{Actor, Transaction, TransactionKind};
