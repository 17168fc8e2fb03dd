//! The ledger store contract consumed by the services, plus an in-memory implementation.

use std::collections::{HashMap, HashSet};

use financer_domain::{Finance, Ledger, LegalPerson};
use uuid::Uuid;

use crate::CoreError;

/// Unit-of-work access to a persisted ledger.
///
/// `insert`, `update` and `delete` only stage changes; reads reflect staged changes.
/// `save` commits everything staged since the last commit as one all-or-nothing step and
/// `rollback` discards it.
pub trait LedgerStore {
    /// Working view of the ledger, staged changes included.
    fn ledger(&self) -> &Ledger;

    fn fetch_all(&self) -> Result<Vec<Finance>, CoreError> {
        Ok(self.ledger().finances.clone())
    }

    fn legal_persons(&self) -> Result<Vec<LegalPerson>, CoreError> {
        Ok(self.ledger().legal_persons.clone())
    }

    fn insert(&mut self, finance: Finance) -> Result<(), CoreError>;
    fn update(&mut self, finance: Finance) -> Result<(), CoreError>;
    fn delete(&mut self, id: Uuid) -> Result<(), CoreError>;
    fn insert_legal_person(&mut self, person: LegalPerson) -> Result<(), CoreError>;
    fn save(&mut self) -> Result<(), CoreError>;
    fn rollback(&mut self);
    fn has_changes(&self) -> bool;
}

/// Committed ledger plus a working copy that collects staged changes.
#[derive(Debug, Clone)]
pub struct StagedLedger {
    committed: Ledger,
    working: Ledger,
    dirty: bool,
}

impl StagedLedger {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            working: ledger.clone(),
            committed: ledger,
            dirty: false,
        }
    }

    pub fn working(&self) -> &Ledger {
        &self.working
    }

    pub fn committed(&self) -> &Ledger {
        &self.committed
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn insert(&mut self, finance: Finance) -> Result<(), CoreError> {
        if self.working.finance(finance.id).is_some() {
            return Err(CoreError::Validation(format!(
                "finance {} already exists",
                finance.id
            )));
        }
        self.working.add_finance(finance);
        self.dirty = true;
        Ok(())
    }

    pub fn update(&mut self, finance: Finance) -> Result<(), CoreError> {
        let slot = self
            .working
            .finance_mut(finance.id)
            .ok_or(CoreError::FinanceNotFound(finance.id))?;
        *slot = finance;
        self.working.touch();
        self.dirty = true;
        Ok(())
    }

    pub fn delete(&mut self, id: Uuid) -> Result<(), CoreError> {
        self.working
            .remove_finance(id)
            .ok_or(CoreError::FinanceNotFound(id))?;
        self.dirty = true;
        Ok(())
    }

    pub fn insert_legal_person(&mut self, person: LegalPerson) -> Result<(), CoreError> {
        if self.working.legal_person(person.id).is_some() {
            return Err(CoreError::Validation(format!(
                "legal person {} already exists",
                person.id
            )));
        }
        self.working.add_legal_person(person);
        self.dirty = true;
        Ok(())
    }

    /// Promotes the working copy to the committed state.
    pub fn commit(&mut self) {
        self.committed = self.working.clone();
        self.dirty = false;
    }

    pub fn rollback(&mut self) {
        self.working = self.committed.clone();
        self.dirty = false;
    }
}

/// Volatile store, used by tests and by front ends that manage persistence themselves.
#[derive(Debug, Clone)]
pub struct MemoryLedgerStore {
    state: StagedLedger,
}

impl MemoryLedgerStore {
    pub fn new(ledger: Ledger) -> Self {
        Self {
            state: StagedLedger::new(ledger),
        }
    }

    /// Last committed ledger, ignoring staged changes.
    pub fn committed(&self) -> &Ledger {
        self.state.committed()
    }
}

impl Default for MemoryLedgerStore {
    fn default() -> Self {
        Self::new(Ledger::default())
    }
}

impl LedgerStore for MemoryLedgerStore {
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
        self.state.commit();
        Ok(())
    }

    fn rollback(&mut self) {
        self.state.rollback();
    }

    fn has_changes(&self) -> bool {
        self.state.is_dirty()
    }
}

/// Detects dangling references and other anomalies within a ledger snapshot.
pub fn ledger_warnings(ledger: &Ledger) -> Vec<String> {
    let person_ids: HashSet<_> = ledger.legal_persons.iter().map(|p| p.id).collect();
    let mut warnings = Vec::new();

    for person in &ledger.legal_persons {
        if let Err(err) = person.validate() {
            warnings.push(format!("legal person {} is invalid: {}", person.id, err));
        }
    }

    let mut seeds_per_group: HashMap<Uuid, usize> = HashMap::new();
    for finance in &ledger.finances {
        if !person_ids.contains(&finance.legal_person_id) {
            warnings.push(format!(
                "finance {} references unknown legal person {}",
                finance.id, finance.legal_person_id
            ));
        }
        if finance.is_periodical && finance.period_duration == 0 {
            warnings.push(format!(
                "periodical finance {} has no period duration",
                finance.id
            ));
        }
        if finance.automatic_generated && finance.recurrence_group.is_none() {
            warnings.push(format!(
                "generated finance {} is not linked to a recurrence group",
                finance.id
            ));
        }
        if finance.is_recurrence_seed() {
            if let Some(group) = finance.recurrence_series() {
                *seeds_per_group.entry(group).or_default() += 1;
            }
        }
    }

    for (group, seeds) in seeds_per_group {
        if seeds > 1 {
            warnings.push(format!(
                "recurrence group {group} has {seeds} user-entered seeds"
            ));
        }
    }
    warnings.sort();
    warnings
}
