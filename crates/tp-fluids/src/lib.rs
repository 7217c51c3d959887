//! tp-fluids: fluid and humid air states for thermoprops.
//!
//! Provides:
//! - Substance catalog (pure fluids, predefined refrigerant blends, incompressible solutions)
//! - Keyed inputs for fluids and humid air
//! - Lazily cached fluid states (`Fluid`, `Mixture`) and `HumidAir`
//! - Thermodynamic processes between states
//! - Serializable snapshots of every property
//!
//! # Architecture
//!
//! States never talk to a property engine directly. They go through the
//! [`PropertyOracle`] seam carried by a [`PropertyContext`], together with the
//! unit converter captured at construction. CoolProp (via `rfluids`) is the
//! production oracle, enabled by the `coolprop` feature.
//!
//! # Example
//!
//! ```ignore
//! use tp_fluids::{Fluid, Input, PropertyContext, Substance};
//!
//! let context = PropertyContext::coolprop()?;
//! let water = Fluid::new(&context, Substance::Water)?
//!     .with_state(Input::pressure(101_325.0), Input::temperature(20.0)?)?;
//! println!("Density: {} kg/m³", water.density()?);
//! ```

pub mod backend;
mod cache;
#[cfg(feature = "coolprop")]
pub mod coolprop;
pub mod error;
pub mod fluid;
pub mod humid_air;
pub mod humid_air_input;
pub mod input;
pub mod mixture;
pub mod phase;
pub mod process;
pub mod snapshot;
pub mod state;
pub mod substance;
#[cfg(test)]
mod test_support;

// Re-exports for ergonomics
pub use backend::{BackendRequest, FluidBackend, Fractions, PropertyContext, PropertyOracle};
#[cfg(feature = "coolprop")]
pub use coolprop::CoolPropOracle;
pub use error::{FluidError, FluidResult};
pub use fluid::{Fluid, FluidDescription, FluidSpec};
pub use humid_air::HumidAir;
pub use humid_air_input::{ALTITUDE_RANGE, HumidAirInput, HumidAirParam};
pub use input::{FluidParam, Input, KeyedInput};
pub use mixture::{Mixture, MixtureDescription, MixtureSpec};
pub use phase::Phase;
pub use snapshot::{FluidSnapshot, HumidAirSnapshot};
pub use state::{FluidIdentity, FluidState};
pub use substance::{MixKind, Substance};
pub use tp_core::{Configuration, UnitsSystem};
