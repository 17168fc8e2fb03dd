use chrono::{DateTime, TimeZone, Utc};
use financer_core::{Clock, FinanceService, LedgerStore, RecurrenceService};
use financer_domain::{
    Finance, FinanceType, Ledger, LegalPerson, LegalPersonType, Money, PersonRelation, Relation,
};
use financer_storage_json::JsonLedgerStore;
use std::fs;
use tempfile::tempdir;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn landlord() -> LegalPerson {
    LegalPerson::new(
        "Landlord",
        LegalPersonType::Person,
        Some(Relation::Person(PersonRelation::PublicFigure)),
        "555-0100",
        "",
    )
    .expect("legal person")
}

#[test]
fn new_ledger_is_not_written_until_saved() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("home.json");

    let store = JsonLedgerStore::open(&path, dir.path().join("backups"), 3).expect("open");

    assert_eq!(store.ledger().name, "home");
    assert_eq!(store.ledger().finance_count(), 0);
    assert!(!path.exists());
}

#[test]
fn recurrence_fields_survive_a_reopen() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("home.json");
    let backups = dir.path().join("backups");
    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 3, 20, 9, 0, 0).unwrap());

    let seed_id = {
        let mut store = JsonLedgerStore::open(&path, &backups, 3).expect("open");
        let person = FinanceService::add_legal_person(&mut store, landlord()).expect("person");
        let rent = Finance::new(
            FinanceType::Expense,
            Money::new(85000, 2),
            person,
            Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
        )
        .expect("finance")
        .with_notes("rent")
        .with_period(30)
        .expect("period");
        let seed_id = FinanceService::add_finance(&mut store, rent).expect("add");
        let report = RecurrenceService::expand(&mut store, &clock).expect("expand");
        assert_eq!(report.generated.len(), 2);
        seed_id
    };

    let mut reopened = JsonLedgerStore::open(&path, &backups, 3).expect("reopen");
    let ledger = reopened.ledger();
    assert_eq!(ledger.finance_count(), 3);
    let seed = ledger.finance(seed_id).expect("seed");
    assert!(seed.is_periodical);
    assert!(!seed.automatic_generated);
    assert_eq!(seed.period_duration, 30);
    assert_eq!(seed.amount, Money::new(85000, 2));
    assert_eq!(seed.notes, "rent");
    assert_eq!(ledger.periodically_connected(seed_id).len(), 2);

    let again = RecurrenceService::expand(&mut reopened, &clock).expect("expand again");
    assert!(again.is_empty());
    assert_eq!(reopened.ledger().finance_count(), 3);
}

#[test]
fn saves_keep_backups_within_retention() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("home.json");
    let backups = dir.path().join("backups");
    let mut store = JsonLedgerStore::open(&path, &backups, 2).expect("open");

    let person = FinanceService::add_legal_person(&mut store, landlord()).expect("person");
    for day in 1..=4 {
        let finance = Finance::new(
            FinanceType::Income,
            Money::new(10, 0),
            person,
            Utc.with_ymd_and_hms(2025, 2, day, 12, 0, 0).unwrap(),
        )
        .expect("finance");
        FinanceService::add_finance(&mut store, finance).expect("add");
    }

    let listed = store.list_backups().expect("list backups");
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|backup| backup.path.starts_with(&backups)));
    assert!(listed[0].created_at >= listed[1].created_at);

    let newest = fs::read_to_string(&listed[0].path).expect("read backup");
    let newest: Ledger = serde_json::from_str(&newest).expect("parse backup");
    assert_eq!(newest.finance_count(), 3);
}

#[test]
fn rollback_discards_staged_changes() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("home.json");
    let mut store = JsonLedgerStore::open(&path, dir.path().join("backups"), 3).expect("open");
    let person = FinanceService::add_legal_person(&mut store, landlord()).expect("person");

    let finance =
        Finance::new(FinanceType::Expense, Money::new(4, 0), person, Utc::now()).expect("finance");
    store.insert(finance).expect("stage insert");
    assert!(store.has_changes());

    store.rollback();

    assert!(!store.has_changes());
    assert_eq!(store.ledger().finance_count(), 0);
    let on_disk = JsonLedgerStore::open(&path, dir.path().join("backups"), 3).expect("reopen");
    assert_eq!(on_disk.ledger().legal_persons.len(), 1);
}

#[test]
fn corrupt_ledger_file_is_a_storage_error() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("home.json");
    fs::write(&path, "{ not json").expect("write");

    let err = JsonLedgerStore::open(&path, dir.path().join("backups"), 3).unwrap_err();

    assert!(err.is_storage());
}

#[test]
fn failed_save_preserves_file_and_staged_state_rolls_back() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("home.json");
    let backups = dir.path().join("backups");
    let mut store = JsonLedgerStore::open(&path, &backups, 3).expect("open");
    let person = FinanceService::add_legal_person(&mut store, landlord()).expect("person");
    let rent = Finance::new(
        FinanceType::Expense,
        Money::new(700, 0),
        person,
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap(),
    )
    .expect("finance")
    .with_period(7)
    .expect("period");
    FinanceService::add_finance(&mut store, rent).expect("add");
    let original = fs::read_to_string(&path).expect("read original");

    // A directory where the temporary file should go makes File::create fail.
    fs::create_dir_all(dir.path().join("home.json.tmp")).expect("block tmp path");

    let clock = FixedClock(Utc.with_ymd_and_hms(2025, 1, 30, 9, 0, 0).unwrap());
    let err = RecurrenceService::expand(&mut store, &clock).unwrap_err();

    assert!(err.is_storage());
    assert!(!store.has_changes());
    assert_eq!(store.ledger().finance_count(), 1);
    assert_eq!(fs::read_to_string(&path).expect("read after failure"), original);
}
