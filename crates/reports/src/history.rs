//! Transaction history report with optional date filtering.

use chrono::NaiveDate;
use serde::Serialize;

use labstock_core::{Subject, SubjectFilter, SubjectMap};
use labstock_inventory::{SubjectLedger, Transaction};

/// Inclusive bounds over a transaction's calendar date.
///
/// Filtering compares the timestamp's date component, so a `to` bound of
/// `2024-01-31` includes everything that happened that day.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(from) = self.from {
            if date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if date > to {
                return false;
            }
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionSection {
    pub subject: Subject,
    /// Matching transactions, most recent first.
    pub rows: Vec<Transaction>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReport {
    pub sections: Vec<TransactionSection>,
}

/// Project transaction history for the selected subjects.
///
/// Subjects with no matching transactions after filtering are omitted.
pub fn transaction_report(
    ledgers: &SubjectMap<SubjectLedger>,
    filter: SubjectFilter,
    range: DateRange,
) -> TransactionReport {
    let mut sections = Vec::new();

    for subject in filter.subjects() {
        let mut rows: Vec<Transaction> = ledgers
            .get(subject)
            .transactions
            .iter()
            .filter(|t| range.contains(t.timestamp.date_naive()))
            .cloned()
            .collect();

        if rows.is_empty() {
            continue;
        }

        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        sections.push(TransactionSection { subject, rows });
    }

    TransactionReport { sections }
}
