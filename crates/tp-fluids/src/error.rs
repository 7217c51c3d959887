//! Fluid state errors.

use thiserror::Error;
use tp_core::TpError;

/// Result type for fluid state operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors raised by inputs, states and processes.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Input factory or process precondition failure.
    #[error("{what}")]
    InvalidArg { what: &'static str },

    /// Fluid name or fractions rejected at construction.
    #[error("{message}")]
    InvalidComposition { message: String },

    /// Duplicate defining inputs, undefined state or non-finite output.
    #[error("{what}")]
    InvalidState { what: &'static str },

    /// Operation not available for this kind of state.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },

    /// Property backend failure.
    #[error("Backend error: {message}")]
    Backend { message: String },

    #[error(transparent)]
    Config(#[from] TpError),
}
