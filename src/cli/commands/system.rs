use financer_domain::CURRENT_SCHEMA_VERSION;

use crate::cli::{
    commands::usage_error,
    context::CliContext,
    error::{CliError, CommandResult},
    output,
    registry::CommandEntry,
};
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Stop reading script commands", "exit", cmd_exit),
    ]
}

fn cmd_version(context: &mut CliContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Financer {}", meta.version));
    output::two_column(&[
        ("Schema", format!("v{}", CURRENT_SCHEMA_VERSION)),
        (
            "Build hash",
            format!("{} ({})", meta.git_hash, meta.git_status),
        ),
        ("Built at", meta.timestamp.to_string()),
        ("Target", meta.target.to_string()),
        ("Profile", meta.profile.to_string()),
        ("Ledger", context.ledger_path().display().to_string()),
        ("Config", context.config_path().display().to_string()),
    ]);
    Ok(())
}

fn cmd_help(context: &mut CliContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            print_overview(context);
            Ok(())
        }
        [name] => {
            let name = name.to_lowercase();
            let Some(entry) = context.command(&name) else {
                context.suggest_command(&name);
                return Err(CliError::UnknownCommand(name));
            };
            output::section(format!("Help: {}", entry.name));
            output::two_column(&[
                ("description", entry.description.to_string()),
                ("usage", entry.usage.to_string()),
            ]);
            Ok(())
        }
        _ => Err(usage_error("help [command]")),
    }
}

fn cmd_exit(_context: &mut CliContext, _args: &[&str]) -> CommandResult {
    Err(CliError::ExitRequested)
}

pub(crate) fn print_overview(context: &CliContext) {
    output::section("Available commands");
    let rows: Vec<(&str, String)> = context
        .registry
        .list()
        .into_iter()
        .map(|entry| (entry.name, entry.description.to_string()))
        .collect();
    output::two_column(&rows);
    output::info("Use `help <command>` for details.");
}
