use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::error::CliError;

/// Asks a yes/no question on the terminal.
pub fn confirm_action(prompt: &str, default: bool) -> Result<bool, CliError> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CliError::from)
}
