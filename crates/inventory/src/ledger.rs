//! Per-subject item collection plus its append-only transaction log.
//!
//! `SubjectLedger` is the single place quantities change. Each mutating
//! event carries everything `apply` needs, and the stock-adjustment event
//! carries the new quantity **and** its transaction record together — one
//! event, applied once, keeps item state and log in lockstep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labstock_core::{Aggregate, DomainError, Event, ItemId, TransactionId};

use crate::item::{DEFAULT_MIN_STOCK_LEVEL, InventoryItem, ItemFields};
use crate::transaction::{Actor, Transaction, TransactionKind};

/// Reason recorded on the transaction that accompanies item creation.
pub const INITIAL_STOCK_REASON: &str = "Initial stock";

/// Direction of a stock adjustment.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    Add,
    Breakage,
}

impl From<StockAction> for TransactionKind {
    fn from(value: StockAction) -> Self {
        match value {
            StockAction::Add => TransactionKind::Addition,
            StockAction::Breakage => TransactionKind::Breakage,
        }
    }
}

/// One subject's ledger: items in insertion order plus the transaction log.
///
/// The ledger never sorts or filters; ordering and selection are report
/// concerns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectLedger {
    pub items: Vec<InventoryItem>,
    pub transactions: Vec<Transaction>,
}

impl SubjectLedger {
    pub fn item(&self, id: ItemId) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Command: create an item.
///
/// Also records the opening `addition` transaction equal to the starting
/// quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItem {
    pub item_id: ItemId,
    pub transaction_id: TransactionId,
    pub fields: ItemFields,
    pub actor: Actor,
    pub occurred_at: DateTime<Utc>,
}

/// Command: replace an item's editable fields in place.
///
/// Does **not** append a transaction — stock adjustments are the only logged
/// quantity changes; edits are treated as corrections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItem {
    pub item_id: ItemId,
    pub fields: ItemFields,
    pub occurred_at: DateTime<Utc>,
}

/// Command: delete an item. Its transaction history stays behind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteItem {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: record a stock addition or breakage with a reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustStock {
    pub item_id: ItemId,
    pub transaction_id: TransactionId,
    pub action: StockAction,
    pub amount: u32,
    pub reason: String,
    pub actor: Actor,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerCommand {
    CreateItem(CreateItem),
    UpdateItem(UpdateItem),
    DeleteItem(DeleteItem),
    AdjustStock(AdjustStock),
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCreated {
    pub item: InventoryItem,
    pub transaction: Transaction,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemUpdated {
    pub item: InventoryItem,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDeleted {
    pub item_id: ItemId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAdjusted {
    pub item_id: ItemId,
    pub new_quantity: u32,
    pub transaction: Transaction,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    ItemCreated(ItemCreated),
    ItemUpdated(ItemUpdated),
    ItemDeleted(ItemDeleted),
    StockAdjusted(StockAdjusted),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::ItemCreated(_) => "inventory.item.created",
            LedgerEvent::ItemUpdated(_) => "inventory.item.updated",
            LedgerEvent::ItemDeleted(_) => "inventory.item.deleted",
            LedgerEvent::StockAdjusted(_) => "inventory.item.stock_adjusted",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::ItemCreated(e) => e.occurred_at,
            LedgerEvent::ItemUpdated(e) => e.occurred_at,
            LedgerEvent::ItemDeleted(e) => e.occurred_at,
            LedgerEvent::StockAdjusted(e) => e.occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Aggregate implementation
// ─────────────────────────────────────────────────────────────────────────────

impl Aggregate for SubjectLedger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::CreateItem(cmd) => self.handle_create(cmd),
            LedgerCommand::UpdateItem(cmd) => self.handle_update(cmd),
            LedgerCommand::DeleteItem(cmd) => self.handle_delete(cmd),
            LedgerCommand::AdjustStock(cmd) => self.handle_adjust(cmd),
        }
    }

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::ItemCreated(e) => {
                self.items.push(e.item.clone());
                self.transactions.push(e.transaction.clone());
            }
            LedgerEvent::ItemUpdated(e) => {
                if let Some(item) = self.items.iter_mut().find(|i| i.id == e.item.id) {
                    *item = e.item.clone();
                }
            }
            LedgerEvent::ItemDeleted(e) => {
                // Transactions referencing the item stay behind as history.
                self.items.retain(|i| i.id != e.item_id);
            }
            LedgerEvent::StockAdjusted(e) => {
                if let Some(item) = self.items.iter_mut().find(|i| i.id == e.item_id) {
                    item.quantity = e.new_quantity;
                }
                self.transactions.push(e.transaction.clone());
            }
        }
    }
}

impl SubjectLedger {
    fn validated_fields(fields: &ItemFields) -> Result<(String, String), DomainError> {
        let item_number = fields.item_number.trim();
        let particulars = fields.particulars.trim();

        if item_number.is_empty() {
            return Err(DomainError::validation("item number is required"));
        }
        if particulars.is_empty() {
            return Err(DomainError::validation("particulars are required"));
        }

        Ok((item_number.to_string(), particulars.to_string()))
    }

    fn normalized_remarks(remarks: &Option<String>) -> Option<String> {
        remarks
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    }

    fn handle_create(&self, cmd: &CreateItem) -> Result<Vec<LedgerEvent>, DomainError> {
        let (item_number, particulars) = Self::validated_fields(&cmd.fields)?;

        if self.items.iter().any(|i| i.id == cmd.item_id) {
            return Err(DomainError::invalid_operation(format!(
                "item id {} already in use",
                cmd.item_id
            )));
        }

        let quantity = cmd.fields.quantity.unwrap_or(0);
        let item = InventoryItem {
            id: cmd.item_id,
            item_number,
            particulars,
            quantity,
            price: cmd.fields.price.unwrap_or_default(),
            min_stock_level: cmd.fields.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL),
            remarks: Self::normalized_remarks(&cmd.fields.remarks),
            date_added: cmd.occurred_at.date_naive(),
        };

        let transaction = Transaction {
            id: cmd.transaction_id,
            item_id: item.id,
            item_number: item.item_number.clone(),
            particulars: item.particulars.clone(),
            kind: TransactionKind::Addition,
            quantity_change: i64::from(quantity),
            new_quantity: quantity,
            reason: INITIAL_STOCK_REASON.to_string(),
            performed_by: cmd.actor.email.clone(),
            performed_by_name: cmd.actor.name.clone(),
            timestamp: cmd.occurred_at,
        };

        Ok(vec![LedgerEvent::ItemCreated(ItemCreated {
            item,
            transaction,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_update(&self, cmd: &UpdateItem) -> Result<Vec<LedgerEvent>, DomainError> {
        let current = self
            .item(cmd.item_id)
            .ok_or_else(|| DomainError::not_found(format!("item {}", cmd.item_id)))?;

        let (item_number, particulars) = Self::validated_fields(&cmd.fields)?;

        let item = InventoryItem {
            id: current.id,
            item_number,
            particulars,
            quantity: cmd.fields.quantity.unwrap_or(0),
            price: cmd.fields.price.unwrap_or_default(),
            min_stock_level: cmd.fields.min_stock_level.unwrap_or(DEFAULT_MIN_STOCK_LEVEL),
            remarks: Self::normalized_remarks(&cmd.fields.remarks),
            date_added: current.date_added,
        };

        Ok(vec![LedgerEvent::ItemUpdated(ItemUpdated {
            item,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_delete(&self, cmd: &DeleteItem) -> Result<Vec<LedgerEvent>, DomainError> {
        if self.item(cmd.item_id).is_none() {
            return Err(DomainError::not_found(format!("item {}", cmd.item_id)));
        }

        Ok(vec![LedgerEvent::ItemDeleted(ItemDeleted {
            item_id: cmd.item_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_adjust(&self, cmd: &AdjustStock) -> Result<Vec<LedgerEvent>, DomainError> {
        if cmd.amount == 0 {
            return Err(DomainError::validation("amount must be a positive integer"));
        }

        let reason = cmd.reason.trim();
        if reason.is_empty() {
            return Err(DomainError::validation("a reason is required"));
        }

        let item = self
            .item(cmd.item_id)
            .ok_or_else(|| DomainError::not_found(format!("item {}", cmd.item_id)))?;

        let (new_quantity, quantity_change) = match cmd.action {
            StockAction::Add => {
                let new = item.quantity.checked_add(cmd.amount).ok_or_else(|| {
                    DomainError::invalid_operation("quantity would overflow")
                })?;
                (new, i64::from(cmd.amount))
            }
            StockAction::Breakage => {
                if cmd.amount > item.quantity {
                    return Err(DomainError::invalid_operation(
                        "breakage amount cannot exceed current stock",
                    ));
                }
                (item.quantity - cmd.amount, -i64::from(cmd.amount))
            }
        };

        let transaction = Transaction {
            id: cmd.transaction_id,
            item_id: item.id,
            item_number: item.item_number.clone(),
            particulars: item.particulars.clone(),
            kind: cmd.action.into(),
            quantity_change,
            new_quantity,
            reason: reason.to_string(),
            performed_by: cmd.actor.email.clone(),
            performed_by_name: cmd.actor.name.clone(),
            timestamp: cmd.occurred_at,
        };

        Ok(vec![LedgerEvent::StockAdjusted(StockAdjusted {
            item_id: item.id,
            new_quantity,
            transaction,
            occurred_at: cmd.occurred_at,
        })])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
