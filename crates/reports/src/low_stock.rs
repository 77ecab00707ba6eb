//! Low-stock alert report.

use serde::Serialize;

use labstock_core::{Subject, SubjectFilter, SubjectMap};
use labstock_inventory::{StockStatus, SubjectLedger};

/// One flagged item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockRow {
    pub item_number: String,
    pub particulars: String,
    pub quantity: u32,
    pub min_stock_level: u32,
    /// `OutOfStock` when the quantity is zero, `Low` otherwise.
    pub status: StockStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockSection {
    pub subject: Subject,
    pub rows: Vec<LowStockRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LowStockReport {
    pub sections: Vec<LowStockSection>,
}

/// Items at or below their minimum stock level, zero-quantity included.
///
/// Items with no minimum level set (zero) are never flagged. Subjects with
/// nothing flagged are omitted.
pub fn low_stock_report(
    ledgers: &SubjectMap<SubjectLedger>,
    filter: SubjectFilter,
) -> LowStockReport {
    let mut sections = Vec::new();

    for subject in filter.subjects() {
        let rows: Vec<LowStockRow> = ledgers
            .get(subject)
            .items
            .iter()
            .filter(|item| item.min_stock_level > 0 && item.quantity <= item.min_stock_level)
            .map(|item| LowStockRow {
                item_number: item.item_number.clone(),
                particulars: item.particulars.clone(),
                quantity: item.quantity,
                min_stock_level: item.min_stock_level,
                status: item.stock_status(),
                remarks: item.remarks.clone(),
            })
            .collect();

        if rows.is_empty() {
            continue;
        }

        sections.push(LowStockSection { subject, rows });
    }

    LowStockReport { sections }
}
