//! Financer keeps a personal ledger of incomes and expenses with the people and
//! companies they involve, materializing periodical finances as time passes.

pub mod cli;
pub mod errors;
pub mod session;
pub mod utils;

pub use errors::{FinancerError, Result};
pub use session::{LedgerSession, PendingDelete};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing once per process.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Financer tracing initialized.");
    });
}
