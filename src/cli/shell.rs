use std::{
    env,
    io::{self, BufRead},
};

use crate::cli::{
    commands,
    context::{CliContext, CliMode},
    error::{CliError, CommandResult},
    output,
};

/// Runs the command given on the command line, or every command read from stdin in
/// script mode.
pub fn run_cli() -> Result<(), CliError> {
    let mode = CliMode::from_env();
    let args: Vec<String> = env::args().skip(1).collect();
    let mut context = CliContext::new(mode)?;

    match (args.is_empty(), mode) {
        (false, _) => match dispatch(&mut context, &args) {
            Err(CliError::ExitRequested) => Ok(()),
            result => result,
        },
        (true, CliMode::Script) => run_script(&mut context, io::stdin().lock()),
        (true, CliMode::Interactive) => {
            commands::system::print_overview(&context);
            Ok(())
        }
    }
}

/// Executes one command per line. Blank lines and `#` comments are skipped; a failing
/// command is reported and the script continues unless the ledger could not be saved.
pub fn run_script(context: &mut CliContext, input: impl BufRead) -> Result<(), CliError> {
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let words = match shell_words::split(trimmed) {
            Ok(words) => words,
            Err(err) => {
                output::error(format!("Could not parse `{}`: {}", trimmed, err));
                continue;
            }
        };
        match dispatch(context, &words) {
            Ok(()) => {}
            Err(CliError::ExitRequested) => break,
            Err(err) if err.is_storage() => return Err(err),
            Err(err) => output::error(err.user_message()),
        }
    }
    Ok(())
}

fn dispatch(context: &mut CliContext, words: &[String]) -> CommandResult {
    let Some((name, rest)) = words.split_first() else {
        return Ok(());
    };
    let name = name.to_lowercase();
    let Some(handler) = context.registry.handler(&name) else {
        context.suggest_command(&name);
        return Err(CliError::UnknownCommand(name));
    };
    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    handler(context, &args)
}
