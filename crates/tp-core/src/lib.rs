//! tp-core: stable foundation for thermoprops.
//!
//! Contains:
//! - units (units systems + conversions between public units and SI)
//! - numeric (Real + tolerances + float helpers)
//! - config (active configuration, discovery and memoization)
//! - error (shared error types)

pub mod config;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use config::{Configuration, ConfigurationBuilder};
pub use error::{TpError, TpResult};
pub use numeric::*;
pub use units::{UnitConverter, UnitsSystem};
