//! Roster of teachers (admins) and per-subject lab in-charges.
//!
//! Roster mutations follow the handle/apply split: `handle` validates a
//! command against the current snapshot and returns events, `apply` evolves
//! state from one event. Persisting the events is the caller's concern.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use labstock_core::{DomainError, DomainResult, Email, Event, Subject, SubjectMap, TeacherId};

/// Display name given to an in-charge entry saved without one.
pub const DEFAULT_INCHARGE_NAME: &str = "Lab Assistant";

// ─────────────────────────────────────────────────────────────────────────────
// Entries
// ─────────────────────────────────────────────────────────────────────────────

/// Admin roster entry. Membership confers [`crate::Role::Admin`] for all
/// subjects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub email: Email,
}

/// In-charge roster entry, scoped to exactly one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabIncharge {
    pub name: String,
    pub email: Email,
}

/// Email domain policy applied to roster entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterPolicy {
    /// When set, roster emails must belong to this domain.
    pub allowed_domain: Option<Cow<'static, str>>,
}

impl Default for RosterPolicy {
    fn default() -> Self {
        Self {
            allowed_domain: Some(Cow::Borrowed("gmail.com")),
        }
    }
}

impl RosterPolicy {
    /// Accept any email domain.
    pub fn open() -> Self {
        Self {
            allowed_domain: None,
        }
    }

    fn check(&self, email: &Email) -> DomainResult<()> {
        if let Some(domain) = &self.allowed_domain {
            if email.domain() != domain.as_ref() {
                return Err(DomainError::validation(format!(
                    "only @{domain} addresses are allowed"
                )));
            }
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Roster state
// ─────────────────────────────────────────────────────────────────────────────

/// Current roster snapshot: teachers plus per-subject in-charge lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub teachers: Vec<Teacher>,
    pub lab_incharges: SubjectMap<Vec<LabIncharge>>,
}

impl Roster {
    pub fn is_teacher(&self, email: &Email) -> bool {
        self.teachers.iter().any(|t| t.email == *email)
    }

    pub fn is_incharge(&self, email: &Email, subject: Subject) -> bool {
        self.lab_incharges
            .get(subject)
            .iter()
            .any(|ic| ic.email == *email)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// Command to add a teacher to the admin roster.
///
/// `name` and `email` are raw form input; the handler trims, normalizes, and
/// falls back to the email local part when no name was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddTeacher {
    pub teacher_id: TeacherId,
    pub name: String,
    pub email: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command to remove a teacher from the admin roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTeacher {
    pub teacher_id: TeacherId,
    pub occurred_at: DateTime<Utc>,
}

/// Raw in-charge form row. Rows with a blank email are skipped entirely; a
/// blank name defaults to [`DEFAULT_INCHARGE_NAME`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InchargeEntry {
    pub name: String,
    pub email: String,
}

/// Command to replace one subject's in-charge list in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceIncharges {
    pub subject: Subject,
    pub entries: Vec<InchargeEntry>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterCommand {
    AddTeacher(AddTeacher),
    RemoveTeacher(RemoveTeacher),
    ReplaceIncharges(ReplaceIncharges),
}

// ─────────────────────────────────────────────────────────────────────────────
// Events
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherAdded {
    pub teacher: Teacher,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherRemoved {
    pub teacher_id: TeacherId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InchargesReplaced {
    pub subject: Subject,
    pub incharges: Vec<LabIncharge>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RosterEvent {
    TeacherAdded(TeacherAdded),
    TeacherRemoved(TeacherRemoved),
    InchargesReplaced(InchargesReplaced),
}

impl Event for RosterEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RosterEvent::TeacherAdded(_) => "roster.teacher.added",
            RosterEvent::TeacherRemoved(_) => "roster.teacher.removed",
            RosterEvent::InchargesReplaced(_) => "roster.incharges.replaced",
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            RosterEvent::TeacherAdded(e) => e.occurred_at,
            RosterEvent::TeacherRemoved(e) => e.occurred_at,
            RosterEvent::InchargesReplaced(e) => e.occurred_at,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Command handling
// ─────────────────────────────────────────────────────────────────────────────

impl Roster {
    /// Decide which events to emit for `command` under `policy`.
    ///
    /// The policy is configuration, not roster data, which is why it rides
    /// alongside the command instead of living in the snapshot.
    pub fn handle(
        &self,
        command: &RosterCommand,
        policy: &RosterPolicy,
    ) -> DomainResult<Vec<RosterEvent>> {
        match command {
            RosterCommand::AddTeacher(cmd) => self.handle_add_teacher(cmd, policy),
            RosterCommand::RemoveTeacher(cmd) => self.handle_remove_teacher(cmd),
            RosterCommand::ReplaceIncharges(cmd) => self.handle_replace_incharges(cmd, policy),
        }
    }

    /// Evolve roster state from a single event.
    pub fn apply(&mut self, event: &RosterEvent) {
        match event {
            RosterEvent::TeacherAdded(e) => {
                self.teachers.push(e.teacher.clone());
            }
            RosterEvent::TeacherRemoved(e) => {
                self.teachers.retain(|t| t.id != e.teacher_id);
            }
            RosterEvent::InchargesReplaced(e) => {
                *self.lab_incharges.get_mut(e.subject) = e.incharges.clone();
            }
        }
    }

    fn handle_add_teacher(
        &self,
        cmd: &AddTeacher,
        policy: &RosterPolicy,
    ) -> DomainResult<Vec<RosterEvent>> {
        let email = Email::parse(&cmd.email)?;
        policy.check(&email)?;

        if self.is_teacher(&email) {
            return Err(DomainError::invalid_operation(format!(
                "teacher {email} is already on the roster"
            )));
        }

        let name = cmd.name.trim();
        let name = if name.is_empty() {
            email.local_part().to_string()
        } else {
            name.to_string()
        };

        Ok(vec![RosterEvent::TeacherAdded(TeacherAdded {
            teacher: Teacher {
                id: cmd.teacher_id,
                name,
                email,
            },
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove_teacher(&self, cmd: &RemoveTeacher) -> DomainResult<Vec<RosterEvent>> {
        if !self.teachers.iter().any(|t| t.id == cmd.teacher_id) {
            return Err(DomainError::not_found(format!(
                "teacher {}",
                cmd.teacher_id
            )));
        }

        Ok(vec![RosterEvent::TeacherRemoved(TeacherRemoved {
            teacher_id: cmd.teacher_id,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_replace_incharges(
        &self,
        cmd: &ReplaceIncharges,
        policy: &RosterPolicy,
    ) -> DomainResult<Vec<RosterEvent>> {
        let mut incharges = Vec::new();

        for entry in &cmd.entries {
            if entry.email.trim().is_empty() {
                continue;
            }

            let email = Email::parse(&entry.email)?;
            policy.check(&email)?;

            let name = entry.name.trim();
            let name = if name.is_empty() {
                DEFAULT_INCHARGE_NAME.to_string()
            } else {
                name.to_string()
            };

            incharges.push(LabIncharge { name, email });
        }

        Ok(vec![RosterEvent::InchargesReplaced(InchargesReplaced {
            subject: cmd.subject,
            incharges,
            occurred_at: cmd.occurred_at,
        })])
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
