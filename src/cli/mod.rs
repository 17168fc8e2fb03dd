pub mod commands;
pub mod context;
pub mod error;
pub mod io;
pub mod output;
pub mod registry;
mod shell;
pub mod system_clock;

pub use context::{CliContext, CliMode};
pub use error::CliError;
pub use shell::{run_cli, run_script};
