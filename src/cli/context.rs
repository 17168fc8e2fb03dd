use std::{
    env,
    path::{Path, PathBuf},
    sync::Arc,
};

use financer_config::{Config, ConfigManager};
use financer_core::ExpansionReport;
use financer_storage_json::JsonLedgerStore;
use tracing::debug;

use crate::{
    cli::{
        commands,
        error::CliError,
        io as cli_io,
        output::{self, OutputPreferences},
        registry::{CommandEntry, CommandRegistry},
        system_clock::SystemClock,
    },
    session::LedgerSession,
};

/// Points the CLI at an alternative application directory.
pub const HOME_ENV: &str = "FINANCER_HOME";
/// Selects script mode: commands are read from stdin and never prompt.
pub const SCRIPT_ENV: &str = "FINANCER_CLI_SCRIPT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

impl CliMode {
    pub fn from_env() -> Self {
        if env::var_os(SCRIPT_ENV).is_some() {
            CliMode::Script
        } else {
            CliMode::Interactive
        }
    }
}

pub struct CliContext {
    pub mode: CliMode,
    pub config: Config,
    pub registry: CommandRegistry,
    pub session: LedgerSession,
    config_manager: ConfigManager,
    ledger_path: PathBuf,
}

impl CliContext {
    /// Loads the configuration, opens the configured ledger and brings its periodical
    /// finances up to date.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let (home, overridden) = app_home();
        let config_manager = ConfigManager::with_base_dir(home.clone())?;
        let mut config = config_manager.load()?;
        if overridden && config.default_ledger_root.is_none() {
            config.default_ledger_root = Some(home.join("ledgers"));
        }
        output::set_preferences(OutputPreferences {
            color_enabled: config.ui_color_enabled && mode == CliMode::Interactive,
        });

        let ledger_path = config.resolve_ledger_path();
        debug!(path = %ledger_path.display(), "opening ledger");
        let store = JsonLedgerStore::open(
            &ledger_path,
            config.resolve_default_backup_root(),
            config.backup_retention,
        )?;
        let (session, report) = LedgerSession::open(Box::new(store), Arc::new(SystemClock))?;
        report_expansion(&report);

        let mut registry = CommandRegistry::default();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            config,
            registry,
            session,
            config_manager,
            ledger_path,
        })
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn config_path(&self) -> &Path {
        self.config_manager.config_path()
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    /// Asks the user; script mode never prompts and answers `false`.
    pub fn confirm(&self, prompt: &str) -> Result<bool, CliError> {
        match self.mode {
            CliMode::Script => Ok(false),
            CliMode::Interactive => cli_io::confirm_action(prompt, false),
        }
    }

    pub fn suggest_command(&self, input: &str) {
        if let Some(best) = self.registry.suggest(input) {
            output::info(format!("Suggestion: `{}`?", best));
        }
    }
}

pub(crate) fn report_expansion(report: &ExpansionReport) {
    if !report.generated.is_empty() {
        output::info(format!(
            "Generated {} periodical finance(s).",
            report.generated.len()
        ));
    }
}

fn app_home() -> (PathBuf, bool) {
    if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return (PathBuf::from(home), true);
    }
    let base = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    (base.join(".financer"), false)
}
