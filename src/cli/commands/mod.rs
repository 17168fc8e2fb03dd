pub mod finance;
pub mod people;
pub mod system;

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use financer_domain::{Ledger, Money};
use uuid::Uuid;

use crate::cli::{error::CliError, registry::CommandRegistry};

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in finance::definitions()
        .into_iter()
        .chain(people::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

/// Positional arguments plus `--name value` options and bare `--flag`s.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    pub positional: Vec<&'a str>,
    options: HashMap<&'static str, &'a str>,
    flags: HashSet<&'static str>,
}

impl<'a> ParsedArgs<'a> {
    pub fn parse(
        args: &[&'a str],
        options: &[&'static str],
        flags: &[&'static str],
    ) -> Result<Self, CliError> {
        let mut parsed = ParsedArgs::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(raw) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            let (name, inline) = match raw.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (raw, None),
            };
            if let Some(flag) = flags.iter().find(|flag| **flag == name) {
                parsed.flags.insert(*flag);
            } else if let Some(option) = options.iter().find(|option| **option == name) {
                let value = inline
                    .or_else(|| iter.next())
                    .ok_or_else(|| CliError::invalid(format!("Missing value for --{}.", name)))?;
                parsed.options.insert(*option, value);
            } else {
                return Err(CliError::invalid(format!("Unknown option --{}.", name)));
            }
        }
        Ok(parsed)
    }

    pub fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub fn flag(&self, name: &str) -> bool {
        self.flags.contains(name)
    }
}

pub(crate) fn usage_error(usage: &str) -> CliError {
    CliError::invalid(format!("Usage: {}", usage))
}

pub(crate) fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

pub(crate) fn format_money(amount: Money, currency: &str) -> String {
    format!("{:.2} {}", amount, currency)
}

/// Parses `YYYY-MM-DD` as midnight UTC.
pub(crate) fn parse_date(raw: &str) -> Result<DateTime<Utc>, CliError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CliError::invalid(format!("Invalid date `{}`, expected YYYY-MM-DD.", raw)))?;
    Ok(DateTime::from_naive_utc_and_offset(
        date.and_time(NaiveTime::MIN),
        Utc,
    ))
}

/// Matches a full id or a unique id prefix against `ids`.
fn resolve_id(
    token: &str,
    ids: impl Iterator<Item = Uuid>,
    what: &str,
) -> Result<Option<Uuid>, CliError> {
    if let Ok(id) = Uuid::parse_str(token) {
        return Ok(Some(id));
    }
    let prefix = token.trim().to_ascii_lowercase().replace('-', "");
    if prefix.is_empty() {
        return Ok(None);
    }
    let matches: Vec<Uuid> = ids
        .filter(|id| id.simple().to_string().starts_with(&prefix))
        .collect();
    match matches.as_slice() {
        [] => Ok(None),
        [id] => Ok(Some(*id)),
        _ => Err(CliError::invalid(format!(
            "`{}` matches more than one {}; use a longer id.",
            token, what
        ))),
    }
}

pub(crate) fn resolve_finance(ledger: &Ledger, token: &str) -> Result<Uuid, CliError> {
    resolve_id(token, ledger.finances.iter().map(|f| f.id), "finance")?
        .ok_or_else(|| CliError::invalid(format!("No finance matches `{}`.", token)))
}

/// Finds a legal person by id, id prefix or case-insensitive name.
pub(crate) fn resolve_legal_person(ledger: &Ledger, token: &str) -> Result<Uuid, CliError> {
    let by_name: Vec<Uuid> = ledger
        .legal_persons
        .iter()
        .filter(|person| person.name().eq_ignore_ascii_case(token.trim()))
        .map(|person| person.id)
        .collect();
    match by_name.as_slice() {
        [id] => return Ok(*id),
        [] => {}
        _ => {
            return Err(CliError::invalid(format!(
                "More than one legal person is named `{}`; use the id instead.",
                token
            )))
        }
    }
    resolve_id(
        token,
        ledger.legal_persons.iter().map(|person| person.id),
        "legal person",
    )?
    .filter(|id| ledger.legal_person(*id).is_some())
    .ok_or_else(|| CliError::invalid(format!("No legal person matches `{}`.", token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use financer_domain::{LegalPerson, LegalPersonType};

    #[test]
    fn parses_options_flags_and_positionals() {
        let args = ["expense", "12.5", "--notes", "lunch", "--every=7", "--yes", "Bob"];
        let parsed = ParsedArgs::parse(&args, &["notes", "every"], &["yes"]).unwrap();

        assert_eq!(parsed.positional, vec!["expense", "12.5", "Bob"]);
        assert_eq!(parsed.option("notes"), Some("lunch"));
        assert_eq!(parsed.option("every"), Some("7"));
        assert!(parsed.flag("yes"));
        assert!(ParsedArgs::parse(&["--bogus"], &[], &[]).is_err());
        assert!(ParsedArgs::parse(&["--notes"], &["notes"], &[]).is_err());
    }

    #[test]
    fn resolves_people_by_name_or_prefix() {
        let mut ledger = Ledger::new("test");
        let person = LegalPerson::new("Corner Shop", LegalPersonType::None, None, "", "").unwrap();
        let id = ledger.add_legal_person(person);

        assert_eq!(resolve_legal_person(&ledger, "corner shop").unwrap(), id);
        assert_eq!(resolve_legal_person(&ledger, &short_id(id)).unwrap(), id);
        assert!(resolve_legal_person(&ledger, "nobody").is_err());
        assert!(resolve_legal_person(&ledger, &Uuid::new_v4().to_string()).is_err());
    }

    #[test]
    fn formats_money_with_two_decimals() {
        assert_eq!(format_money(Money::new(-30, 0), "EUR"), "-30.00 EUR");
        assert_eq!(format_money(Money::new(32, 1), "USD"), "3.20 USD");
    }

    #[test]
    fn dates_parse_as_midnight_utc() {
        let date = parse_date("2025-01-11").unwrap();
        assert_eq!(date.to_rfc3339(), "2025-01-11T00:00:00+00:00");
        assert!(parse_date("11/01/2025").is_err());
    }
}
