//! JSON file persistence for Financer ledgers.
//!
//! A [`JsonLedgerStore`] owns one ledger file. Changes are staged in memory and only
//! reach the disk on [`LedgerStore::save`], which first copies the previous file into
//! the backups directory and then replaces the ledger through a temporary file.

use std::{
    cmp::Reverse,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{DateTime, NaiveDateTime, Utc};
use financer_core::{storage::ledger_warnings, CoreError, LedgerStore, StagedLedger};
use financer_domain::{Finance, Ledger, LegalPerson};
use tracing::{debug, warn};
use uuid::Uuid;

const LEDGER_EXTENSION: &str = "json";
const BACKUP_DATE_FORMAT: &str = "%Y%m%d";
const BACKUP_TIME_FORMAT: &str = "%H%M%S%3f";
const TMP_SUFFIX: &str = "tmp";
pub const DEFAULT_RETENTION: usize = 5;

/// A backup file written before a save replaced the ledger.
#[derive(Debug, Clone)]
pub struct BackupInfo {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub size_bytes: u64,
    pub path: PathBuf,
}

/// Ledger persisted as a single JSON document.
#[derive(Debug)]
pub struct JsonLedgerStore {
    path: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
    state: StagedLedger,
}

impl JsonLedgerStore {
    /// Opens the ledger at `path`, or starts an empty one named after the file when it
    /// does not exist yet. Nothing is written until the first save.
    pub fn open(
        path: impl Into<PathBuf>,
        backups_dir: impl Into<PathBuf>,
        retention: usize,
    ) -> Result<Self, CoreError> {
        let path = path.into();
        let ledger = if path.exists() {
            load_ledger_from_path(&path)?
        } else {
            debug!(path = %path.display(), "starting a new ledger");
            Ledger::new(ledger_name(&path))
        };
        for warning in ledger_warnings(&ledger) {
            warn!("{}", warning);
        }
        Ok(Self {
            path,
            backups_dir: backups_dir.into(),
            retention: retention.max(1),
            state: StagedLedger::new(ledger),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backups_dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Backups of this ledger, newest first.
    pub fn list_backups(&self) -> Result<Vec<BackupInfo>, CoreError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let prefix = format!("{}_", canonical_name(&ledger_name(&self.path)));
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(LEDGER_EXTENSION) {
                continue;
            }
            let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
                continue;
            };
            if !file_name.starts_with(&prefix) {
                continue;
            }
            let size_bytes = fs::metadata(&path).map(|meta| meta.len()).unwrap_or(0);
            entries.push(BackupInfo {
                id: file_name.to_string(),
                created_at: parse_backup_timestamp(file_name).map(|(at, _)| at),
                size_bytes,
                path: path.clone(),
            });
        }
        entries.sort_by_key(|info| Reverse(backup_sort_key(&info.id)));
        Ok(entries)
    }

    fn backup_existing_file(&self) -> Result<(), CoreError> {
        if !self.path.exists() {
            return Ok(());
        }
        fs::create_dir_all(&self.backups_dir)?;
        let now = Utc::now();
        let stem = format!(
            "{}_{}_{}",
            canonical_name(&ledger_name(&self.path)),
            now.format(BACKUP_DATE_FORMAT),
            now.format(BACKUP_TIME_FORMAT)
        );
        let mut backup_path = self
            .backups_dir
            .join(format!("{}.{}", stem, LEDGER_EXTENSION));
        let mut counter = 1;
        while backup_path.exists() {
            backup_path = self
                .backups_dir
                .join(format!("{}-{}.{}", stem, counter, LEDGER_EXTENSION));
            counter += 1;
        }
        fs::copy(&self.path, &backup_path)?;
        self.prune_backups()
    }

    fn prune_backups(&self) -> Result<(), CoreError> {
        for entry in self.list_backups()?.into_iter().skip(self.retention) {
            if let Err(err) = fs::remove_file(&entry.path) {
                warn!("could not prune backup {}: {}", entry.id, err);
            }
        }
        Ok(())
    }
}

impl LedgerStore for JsonLedgerStore {
    fn ledger(&self) -> &Ledger {
        self.state.working()
    }

    fn insert(&mut self, finance: Finance) -> Result<(), CoreError> {
        self.state.insert(finance)
    }

    fn update(&mut self, finance: Finance) -> Result<(), CoreError> {
        self.state.update(finance)
    }

    fn delete(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.state.delete(id)
    }

    fn insert_legal_person(&mut self, person: LegalPerson) -> Result<(), CoreError> {
        self.state.insert_legal_person(person)
    }

    fn save(&mut self) -> Result<(), CoreError> {
        if !self.state.is_dirty() {
            return Ok(());
        }
        self.backup_existing_file()?;
        save_ledger_to_path(self.state.working(), &self.path)?;
        self.state.commit();
        debug!(path = %self.path.display(), "ledger saved");
        Ok(())
    }

    fn rollback(&mut self) {
        self.state.rollback();
    }

    fn has_changes(&self) -> bool {
        self.state.is_dirty()
    }
}

/// Saves a ledger to an arbitrary path on disk.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<(), CoreError> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, &serialize_ledger(ledger)?)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Loads a ledger from the provided filesystem path.
pub fn load_ledger_from_path(path: &Path) -> Result<Ledger, CoreError> {
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| CoreError::Serde(err.to_string()))
}

fn ledger_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("ledger")
        .to_string()
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '-',
        })
        .collect();
    if sanitized.trim_matches('-').is_empty() {
        "ledger".into()
    } else {
        sanitized
    }
}

/// Parses `<slug>_<date>_<time>[-<n>].json` into the timestamp and collision counter.
fn parse_backup_timestamp(name: &str) -> Option<(DateTime<Utc>, u32)> {
    let trimmed = name.strip_suffix(&format!(".{}", LEDGER_EXTENSION))?;
    let mut segments = trimmed.rsplitn(3, '_');
    let time_segment = segments.next()?;
    let date = segments.next()?;
    let (time, counter) = match time_segment.split_once('-') {
        Some((time, counter)) => (time, counter.parse().ok()?),
        None => (time_segment, 0),
    };
    if !is_digits(date, 8) || !is_digits(time, 9) {
        return None;
    }
    let raw = format!("{}{}", date, time);
    NaiveDateTime::parse_from_str(&raw, &format!("{}{}", BACKUP_DATE_FORMAT, BACKUP_TIME_FORMAT))
        .ok()
        .map(|naive| (DateTime::from_naive_utc_and_offset(naive, Utc), counter))
}

fn backup_sort_key(name: &str) -> (Option<(DateTime<Utc>, u32)>, String) {
    (parse_backup_timestamp(name), name.to_string())
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;
    Ok(())
}

fn serialize_ledger(ledger: &Ledger) -> Result<String, CoreError> {
    serde_json::to_string_pretty(ledger).map_err(|err| CoreError::Serde(err.to_string()))
}
