//! financer-config
//!
//! User preferences for the Financer front ends and their persistence on disk.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::Config;
