//! Black-box tests driving the full operation surface against the
//! in-memory store.

use std::sync::{Arc, Mutex};

use rust_decimal::Decimal;
use serde_json::Value as JsonValue;

use labstock_auth::{Identity, InchargeEntry, Role};
use labstock_core::{DomainError, Email, Subject, SubjectFilter};
use labstock_inventory::{ItemFields, StockAction, StockStatus, TransactionKind};
use labstock_reports::DateRange;
use labstock_service::{InventoryService, attach_subscription};
use labstock_store::{MemoryStore, StoreWriter};

const ADMIN_EMAIL: &str = "head@gmail.com";

fn identity(email: &str, name: &str) -> Identity {
    Identity::new(Email::parse(email).unwrap(), name)
}

/// Service seeded with one bootstrap admin, signed in as that admin.
fn admin_service() -> (Arc<MemoryStore>, InventoryService<Arc<MemoryStore>>) {
    labstock_observability::init();

    let store = Arc::new(MemoryStore::new());
    let mut service = InventoryService::new(Arc::clone(&store))
        .with_bootstrap_admins(vec![Email::parse(ADMIN_EMAIL).unwrap()]);

    service.apply_snapshot(JsonValue::Null);
    service.sign_in(identity(ADMIN_EMAIL, "Head Teacher"));

    (store, service)
}

fn beaker_fields(quantity: u32) -> ItemFields {
    ItemFields {
        item_number: "P-1".to_string(),
        particulars: "Beaker".to_string(),
        quantity: Some(quantity),
        price: Some(Decimal::from(20)),
        min_stock_level: Some(10),
        remarks: None,
    }
}

#[test]
fn bootstrap_seeds_admin_and_persists_it() {
    let (store, service) = admin_service();

    assert_eq!(service.current_role(None), Role::Admin);
    assert_eq!(service.state().roster.teachers.len(), 1);

    let stored = store.value_at(&labstock_store::path::teachers());
    assert_eq!(stored.as_array().unwrap().len(), 1);
    assert_eq!(stored[0]["email"], ADMIN_EMAIL);
}

#[test]
fn guest_and_incharge_permissions_are_enforced() {
    let (_store, mut service) = admin_service();

    let item_id = service
        .create_item(Subject::Physics, beaker_fields(5))
        .unwrap();
    service
        .replace_incharges(
            Subject::Physics,
            vec![InchargeEntry {
                name: "Pat".to_string(),
                email: "pat@gmail.com".to_string(),
            }],
        )
        .unwrap();

    // Guest: reports only.
    service.sign_out();
    assert_eq!(service.current_role(None), Role::Guest);
    let err = service
        .adjust_stock(Subject::Physics, item_id, StockAction::Add, 1, "restock")
        .unwrap_err();
    assert!(matches!(err, DomainError::Permission(_)));

    // In-charge: stock adjustment in the assigned subject only, no edits.
    service.sign_in(identity("pat@gmail.com", "Pat"));
    assert_eq!(service.current_role(Some(Subject::Physics)), Role::LabIncharge);
    assert_eq!(service.current_role(Some(Subject::Biology)), Role::Guest);

    service
        .adjust_stock(Subject::Physics, item_id, StockAction::Add, 2, "restock")
        .unwrap();

    let err = service
        .adjust_stock(Subject::Biology, item_id, StockAction::Add, 1, "restock")
        .unwrap_err();
    assert!(matches!(err, DomainError::Permission(_)));

    let err = service
        .create_item(Subject::Physics, beaker_fields(1))
        .unwrap_err();
    assert!(matches!(err, DomainError::Permission(_)));

    let profile = service.profile().unwrap();
    assert_eq!(profile.role, Role::LabIncharge);
    assert_eq!(profile.subjects, vec![Subject::Physics]);
}

#[test]
fn teacher_membership_outranks_incharge_assignment() {
    let (_store, mut service) = admin_service();

    service
        .replace_incharges(
            Subject::Chemistry,
            vec![InchargeEntry {
                name: "Head Teacher".to_string(),
                email: ADMIN_EMAIL.to_string(),
            }],
        )
        .unwrap();

    assert_eq!(service.current_role(Some(Subject::Chemistry)), Role::Admin);
}

#[test]
fn create_item_writes_item_and_opening_transaction() {
    let (store, mut service) = admin_service();

    let item_id = service
        .create_item(Subject::Physics, beaker_fields(5))
        .unwrap();

    let item = store.value_at(&labstock_store::path::inventory_item(
        Subject::Physics,
        item_id,
    ));
    assert_eq!(item["itemNumber"], "P-1");
    assert_eq!(item["quantity"], 5);

    let log = store.value_at(&labstock_store::path::transactions(Subject::Physics));
    let entries: Vec<&JsonValue> = log.as_object().unwrap().values().collect();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["type"], "addition");
    assert_eq!(entries[0]["quantityChange"], 5);
    assert_eq!(entries[0]["reason"], "Initial stock");
    assert_eq!(entries[0]["performedBy"], ADMIN_EMAIL);
}

#[test]
fn breakage_scenario_drives_low_stock_labels() {
    let (_store, mut service) = admin_service();

    let item_id = service
        .create_item(Subject::Physics, beaker_fields(5))
        .unwrap();

    // 5 on hand with a minimum of 10: low, not out of stock.
    let report = service.low_stock_report(SubjectFilter::One(Subject::Physics));
    assert_eq!(report.sections[0].rows[0].status, StockStatus::Low);

    service
        .adjust_stock(
            Subject::Physics,
            item_id,
            StockAction::Breakage,
            5,
            "broke in class",
        )
        .unwrap();

    let ledger = service.state().ledgers.get(Subject::Physics);
    assert_eq!(ledger.item(item_id).unwrap().quantity, 0);

    let last = ledger.transactions.last().unwrap();
    assert_eq!(last.kind, TransactionKind::Breakage);
    assert_eq!(last.quantity_change, -5);
    assert_eq!(last.new_quantity, 0);

    let report = service.low_stock_report(SubjectFilter::One(Subject::Physics));
    assert_eq!(report.sections[0].rows[0].status, StockStatus::OutOfStock);
}

#[test]
fn over_breakage_and_bad_amounts_leave_no_trace() {
    let (_store, mut service) = admin_service();

    let item_id = service
        .create_item(Subject::Physics, beaker_fields(5))
        .unwrap();
    let before = service.state().clone();

    let err = service
        .adjust_stock(Subject::Physics, item_id, StockAction::Breakage, 6, "oops")
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidOperation(_)));

    let err = service
        .adjust_stock(Subject::Physics, item_id, StockAction::Add, 0, "restock")
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = service
        .adjust_stock(Subject::Physics, item_id, StockAction::Add, -3, "restock")
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    assert_eq!(service.state(), &before);
}

#[test]
fn failed_writes_surface_persistence_and_keep_state() {
    let (store, mut service) = admin_service();

    let item_id = service
        .create_item(Subject::Physics, beaker_fields(5))
        .unwrap();
    let before = service.state().clone();

    store.fail_writes(true);
    let err = service
        .adjust_stock(Subject::Physics, item_id, StockAction::Add, 3, "restock")
        .unwrap_err();
    assert!(matches!(err, DomainError::Persistence(_)));
    assert_eq!(service.state(), &before);

    store.fail_writes(false);
    service
        .adjust_stock(Subject::Physics, item_id, StockAction::Add, 3, "restock")
        .unwrap();
    assert_eq!(
        service
            .state()
            .ledgers
            .get(Subject::Physics)
            .item(item_id)
            .unwrap()
            .quantity,
        8
    );
}

#[test]
fn snapshot_redelivery_is_idempotent() {
    let (store, mut service) = admin_service();

    let item_id = service
        .create_item(Subject::Physics, beaker_fields(5))
        .unwrap();
    service
        .adjust_stock(Subject::Physics, item_id, StockAction::Add, 3, "restock")
        .unwrap();

    let root = store.root();
    service.apply_snapshot(root.clone());
    let after_first = service.state().clone();
    service.apply_snapshot(root);

    assert_eq!(service.state(), &after_first);

    let ledger = service.state().ledgers.get(Subject::Physics);
    assert_eq!(ledger.items.len(), 1);
    assert_eq!(ledger.transactions.len(), 2);
    assert_eq!(ledger.item(item_id).unwrap().quantity, 8);
}

#[test]
fn stock_report_totals_and_omits_empty_subjects() {
    let (_store, mut service) = admin_service();

    service
        .create_item(Subject::Physics, beaker_fields(5))
        .unwrap();

    let report = service.stock_report(SubjectFilter::All);
    assert_eq!(report.sections.len(), 1);
    assert_eq!(report.sections[0].subject, Subject::Physics);
    assert_eq!(report.sections[0].subtotal, Decimal::from(100));

    let biology = service.stock_report(SubjectFilter::One(Subject::Biology));
    assert!(biology.sections.is_empty());
}

#[test]
fn transaction_report_filters_and_sorts_descending() {
    let (_store, mut service) = admin_service();

    let item_id = service
        .create_item(Subject::Physics, beaker_fields(5))
        .unwrap();
    service
        .adjust_stock(Subject::Physics, item_id, StockAction::Add, 1, "restock")
        .unwrap();

    let report = service.transaction_report(SubjectFilter::All, DateRange::default());
    let rows = &report.sections[0].rows;
    assert_eq!(rows.len(), 2);
    // Most recent first: the restock precedes the opening transaction.
    assert_eq!(rows[0].reason, "restock");
    assert!(rows[0].timestamp >= rows[1].timestamp);

    // A window that ends before today matches nothing.
    let past = DateRange::new(None, Some("2000-01-01".parse().unwrap()));
    let report = service.transaction_report(SubjectFilter::All, past);
    assert!(report.sections.is_empty());
}

#[test]
fn update_and_delete_follow_the_ledger_rules() {
    let (store, mut service) = admin_service();

    let item_id = service
        .create_item(Subject::Chemistry, beaker_fields(5))
        .unwrap();

    let mut fields = beaker_fields(7);
    fields.remarks = Some("shelf 3".to_string());
    service
        .update_item(Subject::Chemistry, item_id, fields)
        .unwrap();

    let ledger = service.state().ledgers.get(Subject::Chemistry);
    assert_eq!(ledger.item(item_id).unwrap().quantity, 7);
    // Edits are not logged.
    assert_eq!(ledger.transactions.len(), 1);

    service.delete_item(Subject::Chemistry, item_id).unwrap();

    let ledger = service.state().ledgers.get(Subject::Chemistry);
    assert!(ledger.items.is_empty());
    assert_eq!(ledger.transactions.len(), 1);

    // The store mirrors both: item node gone, history kept.
    let item = store.value_at(&labstock_store::path::inventory_item(
        Subject::Chemistry,
        item_id,
    ));
    assert!(item.is_null());
    let log = store.value_at(&labstock_store::path::transactions(Subject::Chemistry));
    assert_eq!(log.as_object().unwrap().len(), 1);
}

#[test]
fn subscription_updates_shared_service_and_errors_do_not_block() {
    labstock_observability::init();

    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(Mutex::new(InventoryService::new(Arc::clone(&store))));
    attach_subscription(&service, store.as_ref());

    // Write as an external client would, then deliver the change.
    store
        .set(
            &labstock_store::path::lab_incharges(Subject::Biology),
            serde_json::json!([{"name": "Remote", "email": "remote@gmail.com"}]),
        )
        .unwrap();
    store.emit();

    {
        let service = service.lock().unwrap();
        let incharges = &service.state().roster.lab_incharges;
        assert_eq!(incharges.get(Subject::Biology).len(), 1);
    }

    // A subscription error is logged, not propagated; state survives.
    store.emit_error("simulated sync outage");
    let service = service.lock().unwrap();
    assert_eq!(
        service.state().roster.lab_incharges.get(Subject::Biology).len(),
        1
    );
}
