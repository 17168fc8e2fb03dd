//! Shared traits and aliases for ledger primitives.

use rust_decimal::Decimal;

/// Money amounts are stored as exact decimals.
pub type Money = Decimal;

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}
