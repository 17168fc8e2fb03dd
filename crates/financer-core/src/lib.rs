//! financer-core
//!
//! Business logic and services for Financer: recurrence expansion, cascading deletes,
//! finance entry and balances. Depends on financer-domain. No CLI, no terminal I/O;
//! persistence is reached only through the [`LedgerStore`] trait.

pub mod balance_service;
pub mod deletion_service;
pub mod error;
pub mod finance_service;
pub mod recurrence_service;
pub mod storage;
pub mod time;

pub use balance_service::*;
pub use deletion_service::*;
pub use error::CoreError;
pub use finance_service::*;
pub use recurrence_service::*;
pub use storage::{LedgerStore, MemoryLedgerStore, StagedLedger};
pub use time::Clock;
