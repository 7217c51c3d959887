//! Property oracle seam.
//!
//! This module isolates the state layer from the native property engine.
//! A [`PropertyOracle`] hands out stateful [`FluidBackend`] bindings (one per
//! fluid state) and evaluates humid air properties statelessly. The CoolProp
//! implementation lives behind the `coolprop` feature; tests use a
//! deterministic in-crate double.

use std::fmt;
use std::sync::Arc;

use crate::error::FluidResult;
use crate::humid_air_input::{HumidAirInput, HumidAirParam};
use crate::input::{FluidParam, Input};
use crate::phase::Phase;
use crate::substance::MixKind;

/// Fractions of the components of a binding, as decimal fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct Fractions {
    pub kind: MixKind,
    pub values: Vec<f64>,
}

/// What to bind: backend family, component names and their fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRequest {
    pub backend: &'static str,
    pub names: Vec<&'static str>,
    pub fractions: Option<Fractions>,
}

impl BackendRequest {
    pub fn joined_names(&self) -> String {
        self.names.join("&")
    }
}

/// A stateful binding of one fluid to the property engine.
pub trait FluidBackend: Send {
    /// Binds both defining inputs in a single call.
    fn update(&mut self, first: Input, second: Input) -> FluidResult<()>;

    /// Property value in SI for the last bound state.
    fn keyed_output(&self, key: FluidParam) -> FluidResult<f64>;

    /// Imposes `phase` on every following `update`; `Phase::NotImposed`
    /// lets the backend determine it again.
    fn specify_phase(&mut self, phase: Phase) -> FluidResult<()>;
}

/// Provider of property backends, shared by every state it creates.
pub trait PropertyOracle: Send + Sync {
    fn name(&self) -> &str;

    fn fluid_backend(&self, request: &BackendRequest) -> FluidResult<Box<dyn FluidBackend>>;

    /// Humid air property in SI from three SI inputs.
    fn humid_air_output(
        &self,
        output: HumidAirParam,
        inputs: &[HumidAirInput; 3],
    ) -> FluidResult<f64>;
}

/// Shared oracle handle plus the units system a state reports in.
#[derive(Clone)]
pub struct PropertyContext {
    oracle: Arc<dyn PropertyOracle>,
    units: tp_core::UnitConverter,
}

impl PropertyContext {
    pub fn new(oracle: Arc<dyn PropertyOracle>, units_system: tp_core::UnitsSystem) -> Self {
        Self {
            oracle,
            units: tp_core::UnitConverter::new(units_system),
        }
    }

    /// Context reporting in the units of the active configuration.
    pub fn active(oracle: Arc<dyn PropertyOracle>) -> FluidResult<Self> {
        Ok(Self {
            oracle,
            units: tp_core::UnitConverter::active()?,
        })
    }

    /// CoolProp context in the units of the active configuration.
    #[cfg(feature = "coolprop")]
    pub fn coolprop() -> FluidResult<Self> {
        Self::active(Arc::new(crate::coolprop::CoolPropOracle))
    }

    pub fn oracle(&self) -> &dyn PropertyOracle {
        self.oracle.as_ref()
    }

    pub fn units(&self) -> tp_core::UnitConverter {
        self.units
    }
}

impl fmt::Debug for PropertyContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyContext")
            .field("oracle", &self.oracle.name())
            .field("units", &self.units.units_system())
            .finish()
    }
}
