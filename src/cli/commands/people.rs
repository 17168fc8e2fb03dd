use financer_domain::{Displayable, LegalPerson, LegalPersonType, Relation};

use crate::cli::{
    commands::{short_id, usage_error, ParsedArgs},
    context::CliContext,
    error::{CliError, CommandResult},
    output::{self, Table},
    registry::CommandEntry,
};
use crate::errors::FinancerError;

const ADD_PERSON_USAGE: &str =
    "add-person <name> [--kind company|organization|person] [--relation NAME] [--phone TEXT] [--notes TEXT]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("people", "List legal persons", "people", cmd_people),
        CommandEntry::new(
            "add-person",
            "Record a person, company or organization",
            ADD_PERSON_USAGE,
            cmd_add_person,
        ),
    ]
}

fn cmd_people(context: &mut CliContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return Err(usage_error("people"));
    }
    let persons = &context.session.ledger().legal_persons;
    if persons.is_empty() {
        output::info("No legal persons recorded yet.");
        return Ok(());
    }
    let mut table = Table::new(vec!["ID", "Name", "Type", "Relation", "Phone", "Notes"]);
    for person in persons {
        table.push(vec![
            short_id(person.id),
            person.name().to_string(),
            person.kind().to_string(),
            person
                .relation()
                .map(|relation| relation.to_string())
                .unwrap_or_default(),
            person.phone().to_string(),
            person.notes().to_string(),
        ]);
    }
    output::section("Legal persons");
    println!("{}", table.render());
    Ok(())
}

fn cmd_add_person(context: &mut CliContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["kind", "relation", "phone", "notes"], &[])?;
    let [name] = parsed.positional[..] else {
        return Err(usage_error(ADD_PERSON_USAGE));
    };
    let kind = match parsed.option("kind") {
        Some(raw) => LegalPersonType::parse(raw)
            .ok_or_else(|| CliError::invalid(format!("Unknown legal person type `{}`.", raw)))?,
        None => LegalPersonType::None,
    };
    let relation = parsed
        .option("relation")
        .map(|raw| {
            Relation::parse(kind, raw).ok_or_else(|| {
                CliError::invalid(format!("`{}` is not a relation of type {}.", raw, kind))
            })
        })
        .transpose()?;

    let person = LegalPerson::new(
        name,
        kind,
        relation,
        parsed.option("phone").unwrap_or_default(),
        parsed.option("notes").unwrap_or_default(),
    )
    .map_err(FinancerError::from)?;
    let label = person.display_label();
    let id = context.session.add_legal_person(person)?;
    output::success(format!("Added legal person {} ({}).", label, short_id(id)));
    Ok(())
}
