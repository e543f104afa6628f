//! Loading errors
//!
//! Gameplay operations never fail: they report remainders or no-ops.
//! Only reading the designer tables from disk can go wrong.

use thiserror::Error;

/// Item catalog loading errors
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed item table
    #[error("Item table parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Inventory configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed configuration
    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Value out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}
