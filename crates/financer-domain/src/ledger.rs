//! The persisted ledger aggregate and recurrence-group queries over it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{finance::Finance, legal_person::LegalPerson};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub legal_persons: Vec<LegalPerson>,
    #[serde(default)]
    pub finances: Vec<Finance>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            legal_persons: Vec::new(),
            finances: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_legal_person(&mut self, person: LegalPerson) -> Uuid {
        let id = person.id;
        self.legal_persons.push(person);
        self.touch();
        id
    }

    pub fn add_finance(&mut self, finance: Finance) -> Uuid {
        let id = finance.id;
        self.finances.push(finance);
        self.touch();
        id
    }

    /// Removes the finance with `id`, returning it when present.
    pub fn remove_finance(&mut self, id: Uuid) -> Option<Finance> {
        let index = self.finances.iter().position(|finance| finance.id == id)?;
        let removed = self.finances.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn finance(&self, id: Uuid) -> Option<&Finance> {
        self.finances.iter().find(|finance| finance.id == id)
    }

    pub fn finance_mut(&mut self, id: Uuid) -> Option<&mut Finance> {
        self.finances.iter_mut().find(|finance| finance.id == id)
    }

    pub fn legal_person(&self, id: Uuid) -> Option<&LegalPerson> {
        self.legal_persons.iter().find(|person| person.id == id)
    }

    pub fn finance_count(&self) -> usize {
        self.finances.len()
    }

    /// Every finance of the recurrence series `group`, seed included.
    pub fn recurrence_group_members(&self, group: Uuid) -> Vec<&Finance> {
        self.finances
            .iter()
            .filter(|finance| finance.recurrence_series() == Some(group))
            .collect()
    }

    /// The other members of the recurrence series the finance `id` belongs to.
    ///
    /// Membership is derived from the shared group id, so the relation is symmetric and
    /// never contains the finance itself.
    pub fn periodically_connected(&self, id: Uuid) -> Vec<&Finance> {
        let Some(group) = self.finance(id).and_then(Finance::recurrence_series) else {
            return Vec::new();
        };
        self.finances
            .iter()
            .filter(|finance| finance.id != id && finance.recurrence_series() == Some(group))
            .collect()
    }

    /// Same amount and structurally similar counterparties.
    pub fn are_similar(&self, a: &Finance, b: &Finance) -> bool {
        if a.amount != b.amount {
            return false;
        }
        if a.legal_person_id == b.legal_person_id {
            return true;
        }
        match (
            self.legal_person(a.legal_person_id),
            self.legal_person(b.legal_person_id),
        ) {
            (Some(left), Some(right)) => left.is_similar_to(right),
            _ => false,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new("Financer")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;
    use crate::{
        common::Money,
        finance::FinanceType,
        legal_person::{CompanyRelation, LegalPersonType, Relation},
    };

    fn employer() -> LegalPerson {
        LegalPerson::new(
            "ACME",
            LegalPersonType::Company,
            Some(Relation::Company(CompanyRelation::Employee)),
            "",
            "",
        )
        .unwrap()
    }

    #[test]
    fn connected_finances_are_symmetric_and_exclude_self() {
        let mut ledger = Ledger::new("Links");
        let person = ledger.add_legal_person(employer());
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let seed = Finance::new(FinanceType::Income, Money::new(100, 0), person, date)
            .unwrap()
            .with_period(10)
            .unwrap();
        let first = seed.occurrence_at(date + Duration::days(10));
        let second = seed.occurrence_at(date + Duration::days(20));
        let ids = [seed.id, first.id, second.id];
        ledger.add_finance(seed);
        ledger.add_finance(first);
        ledger.add_finance(second);
        ledger.add_finance(
            Finance::new(FinanceType::Expense, Money::new(3, 0), person, date).unwrap(),
        );

        for a in ids {
            let peers: Vec<Uuid> = ledger
                .periodically_connected(a)
                .iter()
                .map(|finance| finance.id)
                .collect();
            assert_eq!(peers.len(), 2);
            assert!(!peers.contains(&a));
            for b in peers {
                assert!(ledger
                    .periodically_connected(b)
                    .iter()
                    .any(|finance| finance.id == a));
            }
        }
        assert_eq!(ledger.recurrence_group_members(ids[0]).len(), 3);
    }

    #[test]
    fn non_periodical_finance_has_no_connections() {
        let mut ledger = Ledger::new("Single");
        let person = ledger.add_legal_person(employer());
        let id = ledger.add_finance(
            Finance::new(FinanceType::Expense, Money::new(999, 2), person, Utc::now()).unwrap(),
        );
        assert!(ledger.periodically_connected(id).is_empty());
        assert!(ledger.remove_finance(id).is_some());
        assert!(ledger.remove_finance(id).is_none());
    }

    #[test]
    fn similarity_compares_amount_and_counterparty_fields() {
        let mut ledger = Ledger::new("Similar");
        let first = ledger.add_legal_person(employer());
        let second = ledger.add_legal_person(employer());
        let a = Finance::new(FinanceType::Income, Money::new(10, 0), first, Utc::now()).unwrap();
        let b = Finance::new(FinanceType::Income, Money::new(10, 0), second, Utc::now()).unwrap();
        let c = Finance::new(FinanceType::Income, Money::new(11, 0), first, Utc::now()).unwrap();
        assert!(ledger.are_similar(&a, &b));
        assert!(!ledger.are_similar(&a, &c));
        assert_ne!(a, b);
    }
}
