use std::path::PathBuf;

use thiserror::Error;

pub type TpResult<T> = Result<T, TpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TpError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error(
        "Invalid thermoprops configuration! Check your configuration file: {}. {reason}",
        path.display()
    )]
    Config { path: PathBuf, reason: String },

    #[error("I/O failure at {}: {reason}", path.display())]
    Io { path: PathBuf, reason: String },
}
