mod common;

use common::{employer, jan, json_store, open_session, temp_home, TestClock};
use financer::LedgerSession;
use financer_core::{DeleteOutcome, FinanceService, LedgerStore};
use financer_domain::{Finance, FinanceType, Money};

/// Ledger with a salary of 100 paid every 10 days since Jan 1, plus a one-off expense.
fn seeded_home() -> (std::path::PathBuf, uuid::Uuid, uuid::Uuid) {
    let home = temp_home();
    let mut store = json_store(&home);
    let person = FinanceService::add_legal_person(&mut store, employer()).expect("person");
    let salary = Finance::new(FinanceType::Income, Money::new(100, 0), person, jan(1))
        .expect("finance")
        .with_period(10)
        .expect("period");
    let salary = FinanceService::add_finance(&mut store, salary).expect("salary");
    let groceries = Finance::new(FinanceType::Expense, Money::new(4250, 2), person, jan(5))
        .expect("finance")
        .with_notes("groceries");
    let groceries = FinanceService::add_finance(&mut store, groceries).expect("groceries");
    (home, salary, groceries)
}

#[test]
fn opening_a_session_materializes_due_occurrences() {
    let (home, salary, _) = seeded_home();

    let (session, report) =
        LedgerSession::open(Box::new(json_store(&home)), TestClock::at(jan(25))).expect("open");

    assert_eq!(report.generated.len(), 2);
    let dates: Vec<_> = session
        .finances()
        .iter()
        .filter(|finance| finance.recurrence_series() == Some(salary))
        .map(|finance| finance.date)
        .collect();
    assert_eq!(dates, vec![jan(21), jan(11), jan(1)]);

    let reopened = json_store(&home);
    assert_eq!(reopened.ledger().finance_count(), 4);
}

#[test]
fn reopening_on_the_same_day_generates_nothing() {
    let (home, _, _) = seeded_home();
    drop(open_session(&home, TestClock::at(jan(25))));

    let (_, report) =
        LedgerSession::open(Box::new(json_store(&home)), TestClock::at(jan(25))).expect("open");

    assert!(report.is_empty());
}

#[test]
fn refresh_after_time_passes_continues_the_series() {
    let (home, salary, _) = seeded_home();
    let clock = TestClock::at(jan(25));
    let mut session = open_session(&home, clock.clone());

    clock.advance(7);
    let report = session.refresh().expect("refresh");

    assert_eq!(report.generated.len(), 1);
    assert_eq!(report.generated[0].date, jan(31));
    assert_eq!(session.ledger().recurrence_group_members(salary).len(), 4);
}

#[test]
fn periodical_delete_waits_for_confirmation_then_removes_the_series() {
    let (home, salary, groceries) = seeded_home();
    let mut session = open_session(&home, TestClock::at(jan(25)));
    let generated = session.ledger().periodically_connected(salary)[0].id;

    let outcome = session.request_delete(generated).expect("request");
    assert_eq!(
        outcome,
        DeleteOutcome::NeedsConfirmation {
            target: generated,
            group_size: 3
        }
    );
    assert_eq!(session.ledger().finance_count(), 4);
    assert_eq!(session.pending_delete().map(|p| p.target), Some(generated));

    let outcome = session.confirm_pending_delete().expect("confirm");
    match outcome {
        DeleteOutcome::Deleted { removed } => assert_eq!(removed.len(), 3),
        other => panic!("unexpected outcome {other:?}"),
    }
    assert!(session.pending_delete().is_none());

    let on_disk = json_store(&home);
    assert_eq!(on_disk.ledger().finance_count(), 1);
    assert!(on_disk.ledger().finance(groceries).is_some());
}

#[test]
fn cancelled_delete_changes_nothing() {
    let (home, salary, _) = seeded_home();
    let mut session = open_session(&home, TestClock::at(jan(25)));

    session.request_delete(salary).expect("request");
    let cancelled = session.cancel_pending_delete().expect("pending");

    assert_eq!(cancelled.group_size, 3);
    assert!(session.pending_delete().is_none());
    assert_eq!(
        session.confirm_pending_delete().expect("confirm"),
        DeleteOutcome::NoOp
    );
    assert_eq!(json_store(&home).ledger().finance_count(), 4);
}

#[test]
fn one_off_delete_needs_no_confirmation() {
    let (home, _, groceries) = seeded_home();
    let mut session = open_session(&home, TestClock::at(jan(25)));

    let outcome = session.request_delete(groceries).expect("delete");

    assert_eq!(
        outcome,
        DeleteOutcome::Deleted {
            removed: vec![groceries]
        }
    );
    assert!(session.pending_delete().is_none());
    assert_eq!(session.ledger().finance_count(), 3);
}

#[test]
fn adding_a_past_periodical_finance_expands_it_immediately() {
    let home = temp_home();
    let mut session = open_session(&home, TestClock::at(jan(25)));
    let person = session.add_legal_person(employer()).expect("person");

    let gym = Finance::new(FinanceType::Expense, Money::new(30, 0), person, jan(4))
        .expect("finance")
        .with_period(7)
        .expect("period");
    let (_, report) = session.add_finance(gym).expect("add");

    assert_eq!(report.generated.len(), 3);
    assert_eq!(session.total_balance(), Money::new(-120, 0));
}

#[test]
fn daily_balances_cover_the_requested_window() {
    let (home, _, _) = seeded_home();
    let session = open_session(&home, TestClock::at(jan(25)));

    let rows = session.daily_balances(5);

    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0].date, jan(21).date_naive());
    assert_eq!(rows[4].date, jan(25).date_naive());
    assert!(rows.iter().all(|row| row.balance == Money::new(25750, 2)));
    assert_eq!(session.total_balance(), Money::new(25750, 2));
}
