//! Balance computations over ledger finances.

use chrono::{Duration, NaiveDate};

use financer_domain::{Finance, Money};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyBalance {
    pub date: NaiveDate,
    /// Running balance at the end of `date`.
    pub balance: Money,
}

pub struct BalanceService;

impl BalanceService {
    /// Incomes minus expenses over every finance.
    pub fn total(finances: &[Finance]) -> Money {
        finances.iter().map(Finance::signed_amount).sum()
    }

    /// Running balance at the end of each of the last `days` days ending with `today`,
    /// oldest first. The window never starts before the oldest finance, since every earlier
    /// day carries a zero balance. Empty when there are no finances.
    pub fn daily_balances(finances: &[Finance], days: u32, today: NaiveDate) -> Vec<DailyBalance> {
        let Some(oldest) = finances.iter().map(|finance| finance.date.date_naive()).min() else {
            return Vec::new();
        };
        if days == 0 {
            return Vec::new();
        }
        let span = (today - oldest).num_days().max(0) + 1;
        let days = i64::from(days).min(span);
        let Some(first) = today.checked_sub_signed(Duration::days(days - 1)) else {
            return Vec::new();
        };
        let mut balance: Money = finances
            .iter()
            .filter(|finance| finance.date.date_naive() < first)
            .map(Finance::signed_amount)
            .sum();

        let mut rows = Vec::with_capacity(usize::try_from(days).unwrap_or_default());
        let mut date = first;
        while date <= today {
            balance += finances
                .iter()
                .filter(|finance| finance.date.date_naive() == date)
                .map(Finance::signed_amount)
                .sum::<Money>();
            rows.push(DailyBalance { date, balance });
            date += Duration::days(1);
        }
        rows
    }
}
