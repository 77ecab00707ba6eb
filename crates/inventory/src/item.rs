//! Inventory items and their creation-time defaults.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use labstock_core::ItemId;

/// Minimum stock level applied when none is supplied.
pub const DEFAULT_MIN_STOCK_LEVEL: u32 = 10;

/// A tracked inventory item within one subject's collection.
///
/// Serialized field names match the deployed store's existing data
/// (`itemNumber`, `minStockLevel`, `dateAdded`, …).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    pub item_number: String,
    pub particulars: String,
    pub quantity: u32,
    pub price: Decimal,
    pub min_stock_level: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    pub date_added: NaiveDate,
}

impl InventoryItem {
    /// Stock on hand valued at the recorded unit price.
    pub fn total_value(&self) -> Decimal {
        Decimal::from(self.quantity) * self.price
    }

    /// Stock state relative to the minimum level.
    ///
    /// A zero minimum level means "no level set": such items are never
    /// reported low, though an empty shelf is still out of stock.
    pub fn stock_status(&self) -> StockStatus {
        if self.quantity == 0 {
            StockStatus::OutOfStock
        } else if self.min_stock_level > 0 && self.quantity <= self.min_stock_level {
            StockStatus::Low
        } else {
            StockStatus::Normal
        }
    }
}

/// Stock level classification.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    Normal,
    Low,
    OutOfStock,
}

/// Field set accepted by item create/update operations.
///
/// Numeric fields fall back to their documented defaults when absent:
/// quantity → 0, price → 0, minimum stock level →
/// [`DEFAULT_MIN_STOCK_LEVEL`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemFields {
    pub item_number: String,
    pub particulars: String,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub min_stock_level: Option<u32>,
    #[serde(default)]
    pub remarks: Option<String>,
}
