//! Entry points for recording counterparties and finances.

use tracing::debug;
use uuid::Uuid;

use financer_domain::{Finance, LegalPerson};

use crate::{CoreError, LedgerStore};

pub struct FinanceService;

impl FinanceService {
    /// Records a new counterparty and saves it.
    pub fn add_legal_person(
        store: &mut dyn LedgerStore,
        person: LegalPerson,
    ) -> Result<Uuid, CoreError> {
        person.validate()?;
        let id = person.id;
        commit(store, |store| store.insert_legal_person(person))?;
        Ok(id)
    }

    /// Records a user-entered finance and saves it.
    pub fn add_finance(store: &mut dyn LedgerStore, finance: Finance) -> Result<Uuid, CoreError> {
        if store.ledger().legal_person(finance.legal_person_id).is_none() {
            return Err(CoreError::LegalPersonNotFound(finance.legal_person_id));
        }
        if finance.is_periodical && finance.period_duration == 0 {
            return Err(CoreError::Validation(
                "periodical finances need a period of at least one day".into(),
            ));
        }
        if finance.automatic_generated {
            return Err(CoreError::Validation(
                "generated finances are created by the recurrence expansion only".into(),
            ));
        }
        let id = finance.id;
        commit(store, |store| store.insert(finance))?;
        debug!(%id, "finance added");
        Ok(id)
    }

    /// Newest first, the order the ledger is listed in.
    pub fn sorted_by_date_desc(finances: &[Finance]) -> Vec<&Finance> {
        let mut sorted: Vec<&Finance> = finances.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        sorted
    }
}

fn commit(
    store: &mut dyn LedgerStore,
    stage: impl FnOnce(&mut dyn LedgerStore) -> Result<(), CoreError>,
) -> Result<(), CoreError> {
    let result = stage(&mut *store).and_then(|()| store.save());
    if result.is_err() {
        store.rollback();
    }
    result
}
