//! Current-stock valuation report.

use rust_decimal::Decimal;
use serde::Serialize;

use labstock_core::{Subject, SubjectFilter, SubjectMap};
use labstock_inventory::SubjectLedger;

/// One valued line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockRow {
    pub item_number: String,
    pub particulars: String,
    pub quantity: u32,
    pub price: Decimal,
    /// `quantity × price`.
    pub total_value: Decimal,
    pub remarks: Option<String>,
}

/// Per-subject section with a value subtotal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockSection {
    pub subject: Subject,
    pub rows: Vec<StockRow>,
    pub subtotal: Decimal,
}

/// Current stock valued at recorded prices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StockReport {
    pub sections: Vec<StockSection>,
}

/// Project current stock for the selected subjects.
///
/// Rows keep the ledger's insertion order; subjects with no items are
/// omitted.
pub fn stock_report(ledgers: &SubjectMap<SubjectLedger>, filter: SubjectFilter) -> StockReport {
    let mut sections = Vec::new();

    for subject in filter.subjects() {
        let ledger = ledgers.get(subject);
        if ledger.items.is_empty() {
            continue;
        }

        let mut subtotal = Decimal::ZERO;
        let rows = ledger
            .items
            .iter()
            .map(|item| {
                let total_value = item.total_value();
                subtotal += total_value;
                StockRow {
                    item_number: item.item_number.clone(),
                    particulars: item.particulars.clone(),
                    quantity: item.quantity,
                    price: item.price,
                    total_value,
                    remarks: item.remarks.clone(),
                }
            })
            .collect();

        sections.push(StockSection {
            subject,
            rows,
            subtotal,
        });
    }

    StockReport { sections }
}
