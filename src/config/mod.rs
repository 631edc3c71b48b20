//! Configuration for the ledger engine
//!
//! Path resolution for the base directory and the persisted user settings.

pub mod paths;
pub mod settings;

pub use paths::LedgerPaths;
pub use settings::Settings;
