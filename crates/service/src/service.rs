//! Role-gated operations over the working state.

use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;
use serde_json::Value as JsonValue;

use labstock_auth::{
    Action, AddTeacher, Identity, InchargeEntry, RemoveTeacher, ReplaceIncharges, Role,
    RosterCommand, RosterEvent, RosterPolicy, assigned_subjects, resolve_role,
};
use labstock_core::{
    Aggregate, DomainError, DomainResult, Email, ItemId, Subject, SubjectFilter, TeacherId,
    TransactionId,
};
use labstock_inventory::{
    Actor, AdjustStock, CreateItem, DeleteItem, ItemFields, LedgerCommand, LedgerEvent,
    StockAction, UpdateItem,
};
use labstock_reports::{
    DateRange, LowStockReport, StockReport, TransactionReport, low_stock_report, stock_report,
    transaction_report,
};
use labstock_store::{
    StoreError, StoreSubscription, StoreWriter, apply_writes, decode, ledger_write_ops,
    roster_write_ops,
};

use crate::state::AppState;

/// Signed-in profile summary for display layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Subjects the user is responsible for (all of them for admins).
    pub subjects: Vec<Subject>,
}

/// The operation surface over roster, ledgers, and reports.
///
/// Operations take `&mut self`, so a given service handle processes one
/// operation at a time; cross-instance coordination is the store's
/// last-writer-wins semantics plus wholesale snapshot replacement.
///
/// Every mutation follows the same protocol: permission check, pure
/// validation (`handle`), apply to a cloned next-state, issue the write
/// intents, and swap the next-state in only after the store confirmed. A
/// failed write therefore surfaces [`DomainError::Persistence`] with local
/// state untouched.
pub struct InventoryService<W> {
    writer: W,
    policy: RosterPolicy,
    bootstrap_admins: Vec<Email>,
    identity: Option<Identity>,
    state: AppState,
}

impl<W: StoreWriter> InventoryService<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            policy: RosterPolicy::default(),
            bootstrap_admins: Vec::new(),
            identity: None,
            state: AppState::default(),
        }
    }

    /// Override the roster email-domain policy.
    pub fn with_policy(mut self, policy: RosterPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Emails seeded as teachers when a snapshot arrives with an empty
    /// roster (first-run migration).
    pub fn with_bootstrap_admins(mut self, admins: Vec<Email>) -> Self {
        self.bootstrap_admins = admins;
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    // ─────────────────────────────────────────────────────────────────────
    // Identity & roles
    // ─────────────────────────────────────────────────────────────────────

    pub fn sign_in(&mut self, identity: Identity) {
        tracing::info!(email = %identity.email, "user signed in");
        self.identity = Some(identity);
    }

    pub fn sign_out(&mut self) {
        if let Some(identity) = self.identity.take() {
            tracing::info!(email = %identity.email, "user signed out");
        }
    }

    pub fn current_identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// Resolve the current user's role, globally or for one subject.
    pub fn current_role(&self, subject: Option<Subject>) -> Role {
        resolve_role(self.identity.as_ref(), &self.state.roster, subject)
    }

    /// Profile summary for the signed-in user, if any.
    pub fn profile(&self) -> Option<Profile> {
        let identity = self.identity.as_ref()?;
        Some(Profile {
            name: identity.audit_name().to_string(),
            email: identity.email.as_str().to_string(),
            role: self.current_role(None),
            subjects: assigned_subjects(identity, &self.state.roster),
        })
    }

    fn require(&self, action: Action, subject: Option<Subject>) -> DomainResult<Identity> {
        let role = self.current_role(subject);
        if !role.allows(action) {
            return Err(DomainError::permission(format!(
                "role {role} may not perform this operation"
            )));
        }
        self.identity
            .clone()
            .ok_or_else(|| DomainError::permission("sign-in required"))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Roster operations
    // ─────────────────────────────────────────────────────────────────────

    pub fn add_teacher(&mut self, name: &str, email: &str) -> DomainResult<TeacherId> {
        self.require(Action::ManageRoster, None)?;

        let teacher_id = TeacherId::new();
        self.commit_roster(RosterCommand::AddTeacher(AddTeacher {
            teacher_id,
            name: name.to_string(),
            email: email.to_string(),
            occurred_at: Utc::now(),
        }))?;

        tracing::info!(%teacher_id, "teacher added");
        Ok(teacher_id)
    }

    pub fn remove_teacher(&mut self, teacher_id: TeacherId) -> DomainResult<()> {
        self.require(Action::ManageRoster, None)?;

        self.commit_roster(RosterCommand::RemoveTeacher(RemoveTeacher {
            teacher_id,
            occurred_at: Utc::now(),
        }))?;

        tracing::info!(%teacher_id, "teacher removed");
        Ok(())
    }

    /// Replace one subject's in-charge list in full.
    pub fn replace_incharges(
        &mut self,
        subject: Subject,
        entries: Vec<InchargeEntry>,
    ) -> DomainResult<()> {
        self.require(Action::ManageRoster, None)?;

        self.commit_roster(RosterCommand::ReplaceIncharges(ReplaceIncharges {
            subject,
            entries,
            occurred_at: Utc::now(),
        }))?;

        tracing::info!(%subject, "in-charge list replaced");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Inventory operations
    // ─────────────────────────────────────────────────────────────────────

    pub fn create_item(&mut self, subject: Subject, fields: ItemFields) -> DomainResult<ItemId> {
        let identity = self.require(Action::EditItems, Some(subject))?;

        let item_id = ItemId::new();
        self.commit_ledger(
            subject,
            LedgerCommand::CreateItem(CreateItem {
                item_id,
                transaction_id: TransactionId::new(),
                fields,
                actor: actor_of(&identity),
                occurred_at: Utc::now(),
            }),
        )?;

        tracing::info!(%subject, %item_id, "item created");
        Ok(item_id)
    }

    pub fn update_item(
        &mut self,
        subject: Subject,
        item_id: ItemId,
        fields: ItemFields,
    ) -> DomainResult<()> {
        self.require(Action::EditItems, Some(subject))?;

        self.commit_ledger(
            subject,
            LedgerCommand::UpdateItem(UpdateItem {
                item_id,
                fields,
                occurred_at: Utc::now(),
            }),
        )?;

        tracing::info!(%subject, %item_id, "item updated");
        Ok(())
    }

    pub fn delete_item(&mut self, subject: Subject, item_id: ItemId) -> DomainResult<()> {
        self.require(Action::EditItems, Some(subject))?;

        self.commit_ledger(
            subject,
            LedgerCommand::DeleteItem(DeleteItem {
                item_id,
                occurred_at: Utc::now(),
            }),
        )?;

        tracing::info!(%subject, %item_id, "item deleted");
        Ok(())
    }

    /// Record a stock addition or breakage with a reason.
    pub fn adjust_stock(
        &mut self,
        subject: Subject,
        item_id: ItemId,
        action: StockAction,
        amount: i64,
        reason: &str,
    ) -> DomainResult<()> {
        let identity = self.require(Action::AdjustStock, Some(subject))?;

        let amount = u32::try_from(amount)
            .ok()
            .filter(|a| *a > 0)
            .ok_or_else(|| DomainError::validation("amount must be a positive integer"))?;

        self.commit_ledger(
            subject,
            LedgerCommand::AdjustStock(AdjustStock {
                item_id,
                transaction_id: TransactionId::new(),
                action,
                amount,
                reason: reason.to_string(),
                actor: actor_of(&identity),
                occurred_at: Utc::now(),
            }),
        )?;

        tracing::info!(%subject, %item_id, ?action, amount, "stock adjusted");
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────

    pub fn stock_report(&self, filter: SubjectFilter) -> StockReport {
        stock_report(&self.state.ledgers, filter)
    }

    pub fn low_stock_report(&self, filter: SubjectFilter) -> LowStockReport {
        low_stock_report(&self.state.ledgers, filter)
    }

    pub fn transaction_report(
        &self,
        filter: SubjectFilter,
        range: DateRange,
    ) -> TransactionReport {
        transaction_report(&self.state.ledgers, filter, range)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Reconciliation
    // ─────────────────────────────────────────────────────────────────────

    /// Reconciliation entry point: replace working state with a decoded
    /// store snapshot.
    ///
    /// Decoding is deterministic and replacement is wholesale, so
    /// re-delivering an identical snapshot is a no-op — a partially-applied
    /// write sequence cannot double-apply. A snapshot with no teachers is
    /// seeded from the configured bootstrap admins and written back.
    pub fn apply_snapshot(&mut self, root: JsonValue) {
        self.state = AppState::from(decode(root));

        if self.state.roster.teachers.is_empty() && !self.bootstrap_admins.is_empty() {
            if let Err(err) = self.seed_bootstrap_admins() {
                tracing::warn!(error = %err, "failed to seed bootstrap admins");
            }
        }
    }

    fn seed_bootstrap_admins(&mut self) -> DomainResult<()> {
        // Runs before any admin exists, so it bypasses the role gate.
        for email in self.bootstrap_admins.clone() {
            self.commit_roster(RosterCommand::AddTeacher(AddTeacher {
                teacher_id: TeacherId::new(),
                name: email.local_part().to_string(),
                email: email.as_str().to_string(),
                occurred_at: Utc::now(),
            }))?;
            tracing::info!(%email, "bootstrap admin seeded");
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Commit protocol
    // ─────────────────────────────────────────────────────────────────────

    fn commit_roster(&mut self, command: RosterCommand) -> DomainResult<Vec<RosterEvent>> {
        let events = self.state.roster.handle(&command, &self.policy)?;

        let mut next = self.state.roster.clone();
        for event in &events {
            next.apply(event);
        }

        let ops = roster_write_ops(&next, &events).map_err(persistence)?;
        apply_writes(&self.writer, &ops).map_err(persistence)?;

        self.state.roster = next;
        Ok(events)
    }

    fn commit_ledger(
        &mut self,
        subject: Subject,
        command: LedgerCommand,
    ) -> DomainResult<Vec<LedgerEvent>> {
        let events = self.state.ledgers.get(subject).handle(&command)?;

        let mut next = self.state.ledgers.get(subject).clone();
        for event in &events {
            next.apply(event);
        }

        let ops = ledger_write_ops(subject, &next, &events).map_err(persistence)?;
        apply_writes(&self.writer, &ops).map_err(persistence)?;

        *self.state.ledgers.get_mut(subject) = next;
        Ok(events)
    }
}

fn actor_of(identity: &Identity) -> Actor {
    Actor {
        email: identity.email.clone(),
        name: identity.audit_name().to_string(),
    }
}

fn persistence(err: StoreError) -> DomainError {
    DomainError::persistence(err.to_string())
}

/// Wire a store subscription into a shared service handle.
///
/// Snapshot deliveries replace working state; subscription errors are logged
/// and the current state is kept, so a failing read path never blocks the
/// user.
pub fn attach_subscription<W, S>(service: &Arc<Mutex<InventoryService<W>>>, store: &S)
where
    W: StoreWriter + Send + 'static,
    S: StoreSubscription + ?Sized,
{
    let handle = Arc::clone(service);
    store.subscribe(
        Box::new(move |root| {
            if let Ok(mut service) = handle.lock() {
                service.apply_snapshot(root);
            }
        }),
        Box::new(|message| {
            tracing::warn!(%message, "store subscription error; continuing with current state");
        }),
    );
}
