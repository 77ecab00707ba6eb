//! In-memory working state mirrored from the store.

use labstock_auth::Roster;
use labstock_core::SubjectMap;
use labstock_inventory::SubjectLedger;
use labstock_store::DecodedSnapshot;

/// Working copy of persisted state.
///
/// Replaced wholesale on every snapshot delivery and advanced locally only
/// after a write sequence is confirmed; there is no shared mutable
/// singleton behind it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppState {
    pub roster: Roster,
    pub ledgers: SubjectMap<SubjectLedger>,
}

impl From<DecodedSnapshot> for AppState {
    fn from(snapshot: DecodedSnapshot) -> Self {
        Self {
            roster: snapshot.roster,
            ledgers: snapshot.ledgers,
        }
    }
}
