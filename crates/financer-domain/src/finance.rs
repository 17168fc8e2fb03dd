//! Domain models for ledger entries (incomes and expenses).

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
/// Whether a finance adds to or subtracts from the balance.
pub enum FinanceType {
    Income,
    Expense,
}

impl FinanceType {
    /// Parses `income` / `expense`, case-insensitive.
    pub fn parse(value: &str) -> Option<FinanceType> {
        match value.trim().to_ascii_lowercase().as_str() {
            "income" => Some(FinanceType::Income),
            "expense" => Some(FinanceType::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for FinanceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FinanceType::Income => "Income",
            FinanceType::Expense => "Expense",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Reasons a [`Finance`] cannot be constructed.
pub enum FinanceError {
    NegativeAmount(Money),
    ZeroPeriod,
}

impl fmt::Display for FinanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinanceError::NegativeAmount(amount) => {
                write!(f, "finance amount must not be negative (got {amount})")
            }
            FinanceError::ZeroPeriod => {
                f.write_str("periodical finances need a period of at least one day")
            }
        }
    }
}

impl std::error::Error for FinanceError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single ledger entry.
pub struct Finance {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: FinanceType,
    pub amount: Money,
    pub legal_person_id: Uuid,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_periodical: bool,
    /// Days between two occurrences. Only meaningful when `is_periodical` is set.
    #[serde(default)]
    pub period_duration: u32,
    #[serde(default)]
    pub automatic_generated: bool,
    /// Shared by every member of a recurrence series.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_group: Option<Uuid>,
}

impl Finance {
    pub fn new(
        kind: FinanceType,
        amount: Money,
        legal_person_id: Uuid,
        date: DateTime<Utc>,
    ) -> Result<Self, FinanceError> {
        if amount < Money::ZERO {
            return Err(FinanceError::NegativeAmount(amount));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            legal_person_id,
            date,
            notes: String::new(),
            is_periodical: false,
            period_duration: 0,
            automatic_generated: false,
            recurrence_group: None,
        })
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Marks the finance as recurring every `days` days and opens its recurrence group.
    pub fn with_period(mut self, days: u32) -> Result<Self, FinanceError> {
        if days == 0 {
            return Err(FinanceError::ZeroPeriod);
        }
        self.is_periodical = true;
        self.period_duration = days;
        if self.recurrence_group.is_none() {
            self.recurrence_group = Some(self.id);
        }
        Ok(self)
    }

    /// Group id of the recurrence series this finance belongs to, if any.
    pub fn recurrence_series(&self) -> Option<Uuid> {
        self.recurrence_group
            .or_else(|| self.is_periodical.then_some(self.id))
    }

    /// Periodical finances entered by the user start recurrence series.
    pub fn is_recurrence_seed(&self) -> bool {
        self.is_periodical && !self.automatic_generated && self.period_duration > 0
    }

    pub fn period(&self) -> Option<Duration> {
        (self.is_periodical && self.period_duration > 0)
            .then(|| Duration::days(i64::from(self.period_duration)))
    }

    /// Amount with the sign applied: incomes add, expenses subtract.
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            FinanceType::Income => self.amount,
            FinanceType::Expense => -self.amount,
        }
    }

    /// Builds the automatically generated occurrence of this finance dated `date`.
    pub fn occurrence_at(&self, date: DateTime<Utc>) -> Finance {
        Finance {
            id: Uuid::new_v4(),
            kind: self.kind,
            amount: self.amount,
            legal_person_id: self.legal_person_id,
            date,
            notes: self.notes.clone(),
            is_periodical: true,
            period_duration: self.period_duration,
            automatic_generated: true,
            recurrence_group: self.recurrence_series(),
        }
    }
}

impl PartialEq for Finance {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Finance {}

impl Displayable for Finance {
    fn display_label(&self) -> String {
        let sign = match self.kind {
            FinanceType::Income => '+',
            FinanceType::Expense => '-',
        };
        format!(
            "{sign}{:.2} on {}",
            self.amount,
            self.date.format("%Y-%m-%d")
        )
    }
}
