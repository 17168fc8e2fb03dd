//! financer-domain
//!
//! Pure domain models (Ledger, Finance, LegalPerson).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod finance;
pub mod ledger;
pub mod legal_person;

pub use common::*;
pub use finance::*;
pub use ledger::*;
pub use legal_person::*;
