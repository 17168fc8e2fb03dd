//! An opened ledger together with the clock that drives its recurrences.
//!
//! Opening a session is the point at which periodical finances are brought up to date.
//! Deletions that would cascade over a recurrence group are parked in a pending slot
//! until the caller confirms or cancels them.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use financer_core::{
    BalanceService, Clock, DailyBalance, DeleteOutcome, DeletionService, ExpansionReport,
    FinanceService, LedgerStore, RecurrenceService,
};
use financer_domain::{Finance, Ledger, LegalPerson, Money};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::Result;

/// A delete waiting for the user to confirm removal of a whole recurrence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDelete {
    pub target: Uuid,
    pub group_size: usize,
}

pub struct LedgerSession {
    store: Box<dyn LedgerStore>,
    clock: Arc<dyn Clock>,
    pending_delete: Option<PendingDelete>,
}

impl LedgerSession {
    /// Takes ownership of `store` and runs the recurrence expansion once.
    pub fn open(
        store: Box<dyn LedgerStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<(Self, ExpansionReport)> {
        let mut session = Self {
            store,
            clock,
            pending_delete: None,
        };
        let report = session.refresh()?;
        Ok((session, report))
    }

    /// Generates every occurrence that became due since the last pass.
    pub fn refresh(&mut self) -> Result<ExpansionReport> {
        let report = RecurrenceService::expand(self.store.as_mut(), self.clock.as_ref())?;
        Ok(report)
    }

    pub fn ledger(&self) -> &Ledger {
        self.store.ledger()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Finances in listing order, newest first.
    pub fn finances(&self) -> Vec<&Finance> {
        FinanceService::sorted_by_date_desc(&self.ledger().finances)
    }

    pub fn add_legal_person(&mut self, person: LegalPerson) -> Result<Uuid> {
        let id = FinanceService::add_legal_person(self.store.as_mut(), person)?;
        info!(%id, "legal person added");
        Ok(id)
    }

    /// Records a finance, then expands it right away when it is periodical and already due.
    ///
    /// The finance is saved before the expansion runs. When only the expansion fails to
    /// save, the error is returned but the finance stays recorded, and its occurrences are
    /// generated by the next [`LedgerSession::refresh`].
    pub fn add_finance(&mut self, finance: Finance) -> Result<(Uuid, ExpansionReport)> {
        let periodical = finance.is_periodical;
        let id = FinanceService::add_finance(self.store.as_mut(), finance)?;
        let report = if periodical {
            self.refresh()?
        } else {
            ExpansionReport::default()
        };
        Ok((id, report))
    }

    /// Starts deleting `target`. A grouped target is parked until confirmed; any earlier
    /// pending request is replaced.
    pub fn request_delete(&mut self, target: Uuid) -> Result<DeleteOutcome> {
        let outcome = DeletionService::delete(self.store.as_mut(), target, false)?;
        self.pending_delete = match outcome {
            DeleteOutcome::NeedsConfirmation { target, group_size } => {
                debug!(%target, group_size, "delete awaiting confirmation");
                Some(PendingDelete { target, group_size })
            }
            _ => None,
        };
        Ok(outcome)
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.pending_delete
    }

    /// Removes the pending target and its whole recurrence group. Without a pending
    /// request this is a no-op.
    pub fn confirm_pending_delete(&mut self) -> Result<DeleteOutcome> {
        let Some(pending) = self.pending_delete.take() else {
            return Ok(DeleteOutcome::NoOp);
        };
        match DeletionService::delete(self.store.as_mut(), pending.target, true) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                self.pending_delete = Some(pending);
                Err(err.into())
            }
        }
    }

    /// Drops the pending request without touching the ledger.
    pub fn cancel_pending_delete(&mut self) -> Option<PendingDelete> {
        let cancelled = self.pending_delete.take();
        if let Some(pending) = cancelled {
            debug!(finance = %pending.target, "pending delete cancelled");
        }
        cancelled
    }

    pub fn total_balance(&self) -> Money {
        BalanceService::total(&self.ledger().finances)
    }

    pub fn daily_balances(&self, days: u32) -> Vec<DailyBalance> {
        BalanceService::daily_balances(&self.ledger().finances, days, self.today())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use chrono::TimeZone;
    use financer_core::{CoreError, MemoryLedgerStore};
    use financer_domain::{CompanyRelation, FinanceType, LegalPersonType, Relation};

    use super::*;

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    /// Memory store that fails every save once `saves_left` reaches zero.
    struct LimitedStore {
        inner: MemoryLedgerStore,
        saves_left: Rc<Cell<usize>>,
    }

    impl LedgerStore for LimitedStore {
        fn ledger(&self) -> &Ledger {
            self.inner.ledger()
        }

        fn insert(&mut self, finance: Finance) -> std::result::Result<(), CoreError> {
            self.inner.insert(finance)
        }

        fn update(&mut self, finance: Finance) -> std::result::Result<(), CoreError> {
            self.inner.update(finance)
        }

        fn delete(&mut self, id: Uuid) -> std::result::Result<(), CoreError> {
            self.inner.delete(id)
        }

        fn insert_legal_person(
            &mut self,
            person: LegalPerson,
        ) -> std::result::Result<(), CoreError> {
            self.inner.insert_legal_person(person)
        }

        fn save(&mut self) -> std::result::Result<(), CoreError> {
            match self.saves_left.get() {
                0 => Err(CoreError::Storage("disk full".into())),
                left => {
                    self.saves_left.set(left - 1);
                    self.inner.save()
                }
            }
        }

        fn rollback(&mut self) {
            self.inner.rollback()
        }

        fn has_changes(&self) -> bool {
            self.inner.has_changes()
        }
    }

    fn jan(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, 8, 0, 0).unwrap()
    }

    #[test]
    fn failed_expansion_after_add_keeps_the_recorded_finance() {
        let saves_left = Rc::new(Cell::new(2));
        let store = LimitedStore {
            inner: MemoryLedgerStore::default(),
            saves_left: saves_left.clone(),
        };
        let (mut session, _) =
            LedgerSession::open(Box::new(store), Arc::new(FixedClock(jan(25)))).unwrap();
        let person = LegalPerson::new(
            "ACME",
            LegalPersonType::Company,
            Some(Relation::Company(CompanyRelation::Employee)),
            "",
            "",
        )
        .unwrap();
        let person = session.add_legal_person(person).unwrap();
        let salary = Finance::new(FinanceType::Income, Money::from(100), person, jan(1))
            .unwrap()
            .with_period(10)
            .unwrap();
        let salary_id = salary.id;

        let err = session.add_finance(salary).unwrap_err();

        assert!(err.is_storage());
        assert_eq!(session.ledger().finance_count(), 1);
        assert!(session.ledger().finance(salary_id).is_some());

        saves_left.set(1);
        let report = session.refresh().unwrap();
        assert_eq!(report.generated.len(), 2);
        assert_eq!(session.ledger().finance_count(), 3);
    }
}
