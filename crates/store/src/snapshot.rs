//! Snapshot decoding at the store boundary.
//!
//! The remote store returns key-value maps for collections written with
//! `push`, and may return either arrays or maps for branches written by
//! older clients. [`normalize_collection`] is the one place that contract is
//! handled; nothing downstream ever sees the map-or-array ambiguity.

use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use labstock_auth::{LabIncharge, Roster, Teacher};
use labstock_core::{Subject, SubjectMap};
use labstock_inventory::{InventoryItem, SubjectLedger, Transaction};

/// Raw value of the store root as delivered by the subscription.
///
/// `Null` branches mean "no data yet" and decode to empty defaults — they
/// are not errors.
#[derive(Debug, Clone, Default)]
pub struct RemoteSnapshot {
    pub teachers: JsonValue,
    pub lab_incharges: JsonValue,
    pub inventory: JsonValue,
    pub transactions: JsonValue,
}

impl RemoteSnapshot {
    pub fn from_value(root: JsonValue) -> Self {
        match root {
            JsonValue::Object(mut map) => Self {
                teachers: map.remove("teachers").unwrap_or(JsonValue::Null),
                lab_incharges: map.remove("lab_incharges").unwrap_or(JsonValue::Null),
                inventory: map.remove("inventory").unwrap_or(JsonValue::Null),
                transactions: map.remove("transactions").unwrap_or(JsonValue::Null),
            },
            _ => Self::default(),
        }
    }
}

/// Decode a collection that may arrive as null, an array, or a map of store
/// keys to values.
///
/// Entries that fail to decode are skipped with a warning rather than
/// failing the whole snapshot — a malformed record must not block sync.
pub fn normalize_collection<T: DeserializeOwned>(value: &JsonValue) -> Vec<T> {
    let raw: Vec<JsonValue> = match value {
        JsonValue::Null => Vec::new(),
        JsonValue::Array(items) => items.iter().filter(|v| !v.is_null()).cloned().collect(),
        JsonValue::Object(map) => map.values().cloned().collect(),
        _ => Vec::new(),
    };

    raw.into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::warn!(error = %err, "skipping malformed snapshot entry");
                None
            }
        })
        .collect()
}

/// Fully decoded store state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSnapshot {
    pub roster: Roster,
    pub ledgers: SubjectMap<SubjectLedger>,
}

fn subject_branch<'a>(value: &'a JsonValue, subject: Subject) -> &'a JsonValue {
    static NULL: JsonValue = JsonValue::Null;
    match value {
        JsonValue::Object(map) => map.get(subject.as_str()).unwrap_or(&NULL),
        _ => &NULL,
    }
}

/// Decode a full root value into working state.
///
/// Deterministic for a given input: transactions are ordered ascending by
/// timestamp regardless of how the store keyed them, so re-delivering the
/// same snapshot reproduces the same state.
pub fn decode(root: JsonValue) -> DecodedSnapshot {
    let snapshot = RemoteSnapshot::from_value(root);

    let teachers: Vec<Teacher> = normalize_collection(&snapshot.teachers);

    let mut lab_incharges: SubjectMap<Vec<LabIncharge>> = SubjectMap::default();
    for subject in Subject::ALL {
        *lab_incharges.get_mut(subject) =
            normalize_collection(subject_branch(&snapshot.lab_incharges, subject));
    }

    let mut ledgers: SubjectMap<SubjectLedger> = SubjectMap::default();
    for subject in Subject::ALL {
        let items: Vec<InventoryItem> =
            normalize_collection(subject_branch(&snapshot.inventory, subject));
        let mut transactions: Vec<Transaction> =
            normalize_collection(subject_branch(&snapshot.transactions, subject));
        transactions.sort_by_key(|t| t.timestamp);

        *ledgers.get_mut(subject) = SubjectLedger {
            items,
            transactions,
        };
    }

    DecodedSnapshot {
        roster: Roster {
            teachers,
            lab_incharges,
        },
        ledgers,
    }
}
