//! Access levels and the actions they permit.

use serde::{Deserialize, Serialize};

/// Resolved access level for a user.
///
/// The derived ordering is a strict priority: `Admin` outranks
/// `LabIncharge`, which outranks `Guest`.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Guest,
    LabIncharge,
    Admin,
}

/// Operations gated by a role check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Action {
    /// Generate/view any report.
    ViewReports,
    /// Record a stock addition or breakage.
    AdjustStock,
    /// Create, update, or delete inventory items.
    EditItems,
    /// Manage teachers and in-charge lists.
    ManageRoster,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Guest => "GUEST",
            Role::LabIncharge => "LAB_INCHARGE",
            Role::Admin => "ADMIN",
        }
    }

    /// Whether this role may perform `action`.
    ///
    /// Stock adjustment is the only mutation open to in-charges; item
    /// editing and roster management stay admin-only. Reports are open to
    /// everyone, guests included.
    pub fn allows(self, action: Action) -> bool {
        match action {
            Action::ViewReports => true,
            Action::AdjustStock => self >= Role::LabIncharge,
            Action::EditItems | Action::ManageRoster => self == Role::Admin,
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
