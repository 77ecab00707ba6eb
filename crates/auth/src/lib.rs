//! `labstock-auth` — roster membership and role resolution.
//!
//! This crate is intentionally decoupled from rendering and storage: roles
//! are computed from supplied roster snapshots, and roster mutations are
//! pure command handlers whose events a persistence layer applies.

pub mod identity;
pub mod resolver;
pub mod role;
pub mod roster;

pub use identity::Identity;
pub use resolver::{assigned_subjects, resolve_role};
pub use role::{Action, Role};
pub use roster::{
    AddTeacher, InchargeEntry, LabIncharge, RemoveTeacher, ReplaceIncharges, Roster,
    RosterCommand, RosterEvent, RosterPolicy, Teacher,
};
