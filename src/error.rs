//! Error types for the shift planner.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading the survey export.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("roster file not found: {0}")]
    NotFound(PathBuf),

    #[error("roster has no column matching {0:?}")]
    MissingColumn(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors raised while reading or writing the shift grid.
#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid file not found: {0}")]
    NotFound(PathBuf),

    #[error("grid shape is unusable: {0}")]
    Shape(String),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the mail channel.
#[derive(Debug, Error)]
pub enum MailError {
    #[error("missing mail setting: {0}")]
    MissingSetting(String),

    #[error("invalid address {0:?}")]
    Address(String),

    #[error("could not build message: {0}")]
    Message(String),

    /// Connection or authentication failure; nothing more can be sent.
    #[error("{reason}\n\nCheck:\n  1. the SMTP username is correct\n  2. an application password is used if two-factor authentication is on\n  3. the host/port in the [mail] config section are reachable")]
    Connection { reason: String },

    #[error("delivery failed: {0}")]
    Delivery(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while loading the TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Mail(#[from] MailError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
