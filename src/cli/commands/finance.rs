use std::str::FromStr;

use financer_core::DeleteOutcome;
use financer_domain::{Displayable, Finance, FinanceType, Money};
use uuid::Uuid;

use crate::cli::{
    commands::{
        format_money, parse_date, resolve_finance, resolve_legal_person, short_id, usage_error,
        ParsedArgs,
    },
    context::{report_expansion, CliContext, CliMode},
    error::{CliError, CommandResult},
    output::{self, Table},
    registry::CommandEntry,
};
use crate::errors::FinancerError;

const ADD_USAGE: &str =
    "add <income|expense> <amount> <legal-person> [--date YYYY-MM-DD] [--every DAYS] [--notes TEXT]";
const DELETE_USAGE: &str = "delete <finance-id> [--yes]";
const BALANCE_USAGE: &str = "balance [days]";
const MAX_BALANCE_DAYS: u32 = 36_600;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("list", "List finances, newest first", "list", cmd_list),
        CommandEntry::new("add", "Record an income or expense", ADD_USAGE, cmd_add),
        CommandEntry::new(
            "delete",
            "Delete a finance and, once confirmed, its whole periodical series",
            DELETE_USAGE,
            cmd_delete,
        ),
        CommandEntry::new(
            "confirm",
            "Confirm the delete awaiting confirmation",
            "confirm",
            cmd_confirm,
        ),
        CommandEntry::new(
            "cancel",
            "Keep the finances of the delete awaiting confirmation",
            "cancel",
            cmd_cancel,
        ),
        CommandEntry::new(
            "balance",
            "Show the balance, optionally per day over the last days",
            BALANCE_USAGE,
            cmd_balance,
        ),
    ]
}

fn cmd_list(context: &mut CliContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("list"));
    }
    let ledger = context.session.ledger();
    let finances = context.session.finances();
    if finances.is_empty() {
        output::info("No finances recorded yet.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        "ID", "Date", "Type", "Amount", "Legal person", "Recurrence", "Notes",
    ])
    .align_right(3);
    for finance in finances {
        let person = ledger
            .legal_person(finance.legal_person_id)
            .map(|person| person.name().to_string())
            .unwrap_or_else(|| "(unknown)".into());
        table.push(vec![
            short_id(finance.id),
            finance.date.format("%Y-%m-%d").to_string(),
            finance.kind.to_string(),
            format_money(finance.signed_amount(), &context.config.currency),
            person,
            recurrence_label(finance),
            finance.notes.clone(),
        ]);
    }
    output::section(format!("Finances in {}", ledger.name));
    println!("{}", table.render());
    Ok(())
}

fn recurrence_label(finance: &Finance) -> String {
    match (finance.automatic_generated, finance.is_periodical) {
        (true, _) => "generated".into(),
        (false, true) => format!("every {} days", finance.period_duration),
        (false, false) => String::new(),
    }
}

fn cmd_add(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date", "every", "notes"], &[])?;
    let [kind, amount, person] = parsed.positional[..] else {
        return Err(usage_error(ADD_USAGE));
    };
    let kind = FinanceType::parse(kind)
        .ok_or_else(|| CliError::invalid(format!("Unknown finance type `{}`.", kind)))?;
    let amount = Money::from_str(amount.trim())
        .map_err(|_| CliError::invalid(format!("Invalid amount `{}`.", amount)))?;
    let person_id = resolve_legal_person(context.session.ledger(), person)?;
    let date = match parsed.option("date") {
        Some(raw) => parse_date(raw)?,
        None => context.session.now(),
    };

    let mut finance =
        Finance::new(kind, amount, person_id, date).map_err(FinancerError::from)?;
    if let Some(notes) = parsed.option("notes") {
        finance = finance.with_notes(notes);
    }
    if let Some(every) = parsed.option("every") {
        let days: u32 = every
            .parse()
            .map_err(|_| CliError::invalid(format!("Invalid period `{}`.", every)))?;
        finance = finance.with_period(days).map_err(FinancerError::from)?;
    }

    let (id, report) = context.session.add_finance(finance)?;
    output::success(format!(
        "Added {} of {} ({}).",
        kind.to_string().to_lowercase(),
        format_money(amount, &context.config.currency),
        short_id(id)
    ));
    report_expansion(&report);
    Ok(())
}

fn cmd_delete(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    let [token] = parsed.positional[..] else {
        return Err(usage_error(DELETE_USAGE));
    };
    let target = resolve_finance(context.session.ledger(), token)?;
    let label = context
        .session
        .ledger()
        .finance(target)
        .map(Displayable::display_label)
        .unwrap_or_default();

    match context.session.request_delete(target)? {
        DeleteOutcome::NeedsConfirmation { group_size, .. } => {
            let prompt = format!(
                "{} is periodical. Delete all {} finances of its series?",
                label, group_size
            );
            if parsed.flag("yes") || context.confirm(&prompt)? {
                let outcome = context.session.confirm_pending_delete()?;
                report_outcome(&outcome);
            } else if context.mode == CliMode::Script {
                output::warning(format!(
                    "{} belongs to a series of {} finances. Run `confirm` to delete them all \
                     or `cancel` to keep them.",
                    short_id(target),
                    group_size
                ));
            } else {
                context.session.cancel_pending_delete();
                output::info("Nothing was deleted.");
            }
        }
        outcome => report_outcome(&outcome),
    }
    Ok(())
}

fn cmd_confirm(context: &mut CliContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("confirm"));
    }
    if context.session.pending_delete().is_none() {
        output::warning("No delete is awaiting confirmation.");
        return Ok(());
    }
    let outcome = context.session.confirm_pending_delete()?;
    report_outcome(&outcome);
    Ok(())
}

fn cmd_cancel(context: &mut CliContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("cancel"));
    }
    match context.session.cancel_pending_delete() {
        Some(pending) => output::info(format!(
            "Kept {} finance(s) of {}.",
            pending.group_size,
            short_id(pending.target)
        )),
        None => output::warning("No delete is awaiting confirmation."),
    }
    Ok(())
}

fn report_outcome(outcome: &DeleteOutcome) {
    match outcome {
        DeleteOutcome::Deleted { removed } => output::success(format!(
            "Deleted {} finance(s): {}.",
            removed.len(),
            joined_ids(removed)
        )),
        DeleteOutcome::NoOp => output::warning("Nothing to delete."),
        DeleteOutcome::NeedsConfirmation { group_size, .. } => output::warning(format!(
            "Deleting this finance removes {} finances and needs confirmation.",
            group_size
        )),
    }
}

fn joined_ids(ids: &[Uuid]) -> String {
    ids.iter()
        .map(|id| short_id(*id))
        .collect::<Vec<_>>()
        .join(", ")
}

fn cmd_balance(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let days = match args {
        [] => None,
        [raw] => Some(
            raw.parse::<u32>()
                .ok()
                .filter(|days| *days <= MAX_BALANCE_DAYS)
                .ok_or_else(|| {
                    CliError::invalid(format!(
                        "Invalid number of days `{}`. Use at most {}.",
                        raw, MAX_BALANCE_DAYS
                    ))
                })?,
        ),
        _ => return Err(usage_error(BALANCE_USAGE)),
    };
    let currency = context.config.currency.as_str();

    output::two_column(&[(
        "Balance",
        format_money(context.session.total_balance(), currency),
    )]);

    if let Some(days) = days {
        let rows = context.session.daily_balances(days);
        if rows.is_empty() {
            output::info("No finances recorded yet.");
            return Ok(());
        }
        let mut table = Table::new(vec!["Date", "Balance"]).align_right(1);
        for row in rows {
            table.push(vec![
                row.date.format("%Y-%m-%d").to_string(),
                format_money(row.balance, currency),
            ]);
        }
        println!("{}", table.render());
    }
    Ok(())
}
