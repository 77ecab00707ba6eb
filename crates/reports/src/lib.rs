//! `labstock-reports` — read-only projections over ledger state.
//!
//! Every report is a pure function from `&SubjectMap<SubjectLedger>` to a
//! structured model (sections, rows, totals). Rendering the models to HTML,
//! spreadsheets, or terminal tables is a separate, swappable concern.
//!
//! One rule is shared by all three reports: a subject with nothing to show
//! is omitted from the output entirely, never emitted as an empty section.

pub mod history;
pub mod low_stock;
pub mod stock;

pub use history::{DateRange, TransactionReport, TransactionSection, transaction_report};
pub use low_stock::{LowStockReport, LowStockRow, LowStockSection, low_stock_report};
pub use stock::{StockReport, StockRow, StockSection, stock_report};
