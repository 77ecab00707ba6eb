//! Signed-in user identity.

use serde::{Deserialize, Serialize};

use labstock_core::Email;

/// Identity of the signed-in user.
///
/// Supplied by the external auth provider on sign-in; never persisted by the
/// core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub email: Email,
    pub display_name: String,
}

impl Identity {
    pub fn new(email: Email, display_name: impl Into<String>) -> Self {
        Self {
            email,
            display_name: display_name.into(),
        }
    }

    /// Name recorded on audit entries; falls back to the email address when
    /// the provider supplied no display name.
    pub fn audit_name(&self) -> &str {
        let name = self.display_name.trim();
        if name.is_empty() { self.email.as_str() } else { name }
    }
}
