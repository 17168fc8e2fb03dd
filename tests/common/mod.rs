#![allow(dead_code)]

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use chrono::{DateTime, Duration, TimeZone, Utc};
use financer::LedgerSession;
use financer_core::Clock;
use financer_domain::{CompanyRelation, LegalPerson, LegalPersonType, Relation};
use financer_storage_json::JsonLedgerStore;
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// Clock the tests can move forward.
pub struct TestClock(Mutex<DateTime<Utc>>);

impl TestClock {
    pub fn at(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self(Mutex::new(now)))
    }

    pub fn advance(&self, days: i64) {
        let mut now = self.0.lock().expect("lock clock");
        *now += Duration::days(days);
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().expect("lock clock")
    }
}

pub fn jan(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, day, 8, 0, 0).unwrap()
}

pub fn employer() -> LegalPerson {
    LegalPerson::new(
        "ACME",
        LegalPersonType::Company,
        Some(Relation::Company(CompanyRelation::Employee)),
        "",
        "salary",
    )
    .expect("legal person")
}

pub fn json_store(home: &Path) -> JsonLedgerStore {
    JsonLedgerStore::open(home.join("ledger.json"), home.join("backups"), 3).expect("open store")
}

pub fn open_session(home: &Path, clock: Arc<TestClock>) -> LedgerSession {
    let (session, _) =
        LedgerSession::open(Box::new(json_store(home)), clock).expect("open session");
    session
}
