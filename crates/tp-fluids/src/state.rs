//! The abstract fluid state.
//!
//! A [`FluidState`] pairs an identity (what the fluid is) with a backend
//! binding, the two defining inputs and a memo cache. Properties are computed
//! lazily on first access and memoized until the next [`FluidState::update`]
//! or [`FluidState::reset`]. Getters return values in the units system the
//! state was created with.
//!
//! Lifecycle: a state starts Undefined (no inputs). A successful `update`
//! makes it Defined; a failed bind leaves it Undefined again.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;
use tp_core::{UnitConverter, UnitsSystem, ensure_finite};
use tracing::{debug, trace};

use crate::backend::{BackendRequest, FluidBackend, PropertyContext};
use crate::cache::PropertyCache;
use crate::error::{FluidError, FluidResult};
use crate::input::{FluidParam, Input, KeyedInput};
use crate::phase::Phase;

/// What a state describes: everything needed to bind a fresh backend.
pub trait FluidIdentity: Clone + PartialEq + fmt::Debug {
    /// Identity fields as they appear in snapshots.
    type Description: Serialize;

    fn backend_request(&self) -> BackendRequest;

    fn describe(&self, units: UnitConverter) -> Self::Description;

    /// Fails when process methods are unavailable for this identity.
    fn check_processes(&self) -> FluidResult<()> {
        Ok(())
    }
}

pub(crate) fn undefined_state() -> FluidError {
    FluidError::InvalidState {
        what: "state is not defined",
    }
}

pub(crate) fn finite_output(value: f64) -> FluidResult<f64> {
    ensure_finite(value, "property").map_err(|_| FluidError::InvalidState {
        what: "Invalid or not defined state!",
    })
}

/// Defining inputs as an order-insensitive key.
pub(crate) fn canonical_inputs<K: Copy + Ord>(inputs: &[KeyedInput<K>]) -> Vec<(K, u64)> {
    let mut canonical: Vec<(K, u64)> = inputs
        .iter()
        .map(|input| (input.key(), input.value().to_bits()))
        .collect();
    canonical.sort_unstable();
    canonical
}

pub(crate) fn has_unique_keys<K: PartialEq + Copy>(inputs: &[KeyedInput<K>]) -> bool {
    inputs
        .iter()
        .enumerate()
        .all(|(i, input)| inputs[i + 1..].iter().all(|other| other.key() != input.key()))
}

pub struct FluidState<I: FluidIdentity> {
    identity: I,
    context: PropertyContext,
    backend: Box<dyn FluidBackend>,
    inputs: Vec<Input>,
    specified_phase: Option<Phase>,
    cache: PropertyCache<FluidParam>,
}

impl<I: FluidIdentity> FluidState<I> {
    /// Undefined state bound to a fresh backend for `identity`.
    pub(crate) fn bind(identity: I, context: PropertyContext) -> FluidResult<Self> {
        let backend = context
            .oracle()
            .fluid_backend(&identity.backend_request())?;
        Ok(Self {
            identity,
            context,
            backend,
            inputs: Vec::new(),
            specified_phase: None,
            cache: PropertyCache::new(),
        })
    }

    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn context(&self) -> &PropertyContext {
        &self.context
    }

    pub fn units(&self) -> UnitConverter {
        self.context.units()
    }

    pub fn units_system(&self) -> UnitsSystem {
        self.units().units_system()
    }

    /// Defining inputs; empty while Undefined.
    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn is_defined(&self) -> bool {
        !self.inputs.is_empty()
    }

    /// Fresh Undefined instance with the same identity, units and imposed
    /// phase.
    pub fn factory(&self) -> FluidResult<Self> {
        let mut state = Self::bind(self.identity.clone(), self.context.clone())?;
        if let Some(phase) = self.specified_phase {
            state.specify_phase(phase)?;
        }
        Ok(state)
    }

    /// New instance defined by the given inputs; `self` is untouched.
    pub fn with_state(&self, first: Input, second: Input) -> FluidResult<Self> {
        let mut state = self.factory()?;
        state.update(first, second)?;
        Ok(state)
    }

    /// Independent copy defined by the same inputs.
    pub fn clone_state(&self) -> FluidResult<Self> {
        match self.inputs.as_slice() {
            [first, second] => self.with_state(*first, *second),
            _ => Err(undefined_state()),
        }
    }

    /// Redefines the state in place, invalidating every memoized property.
    pub fn update(&mut self, first: Input, second: Input) -> FluidResult<()> {
        let inputs = [first, second];
        if !has_unique_keys(&inputs) {
            return Err(FluidError::InvalidState {
                what: "Need to define 2 unique inputs!",
            });
        }
        self.reset();
        debug!(identity = ?self.identity, ?inputs, "binding fluid state");
        self.backend.update(first, second)?;
        self.inputs.extend(inputs);
        Ok(())
    }

    /// Phase imposed on the backend, if any.
    pub fn specified_phase(&self) -> Option<Phase> {
        self.specified_phase
    }

    /// Imposes `phase` for all further calculations. A defined state is
    /// rebound under the new phase.
    pub fn specify_phase(&mut self, phase: Phase) -> FluidResult<&mut Self> {
        self.impose_phase(phase)?;
        Ok(self)
    }

    /// Goes back to determining the phase from the inputs.
    pub fn unspecify_phase(&mut self) -> FluidResult<&mut Self> {
        self.impose_phase(Phase::NotImposed)?;
        Ok(self)
    }

    fn impose_phase(&mut self, phase: Phase) -> FluidResult<()> {
        self.backend.specify_phase(phase)?;
        self.specified_phase = (phase != Phase::NotImposed).then_some(phase);
        debug!(identity = ?self.identity, %phase, "imposing phase");
        let inputs = match self.inputs.as_slice() {
            [first, second] => Some((*first, *second)),
            _ => None,
        };
        match inputs {
            Some((first, second)) => self.update(first, second),
            None => {
                self.cache.clear();
                Ok(())
            }
        }
    }

    /// Back to Undefined.
    pub fn reset(&mut self) {
        self.inputs.clear();
        self.cache.clear();
    }

    /// Number of memoized properties.
    pub fn cached_properties(&self) -> usize {
        self.cache.filled()
    }

    pub(crate) fn keyed_output(&self, key: FluidParam) -> FluidResult<f64> {
        self.cache.get_or_try_init(key, || {
            if let Some(input) = self.inputs.iter().find(|input| input.key() == key) {
                return finite_output(input.value());
            }
            if !self.is_defined() && !key.is_trivial() {
                return Err(undefined_state());
            }
            trace!(?key, "querying fluid backend");
            finite_output(self.backend.keyed_output(key)?)
        })
    }

    fn nullable_output(&self, key: FluidParam) -> Option<f64> {
        match self.keyed_output(key) {
            Ok(value) => Some(value),
            Err(err) => {
                trace!(?key, %err, "property not available");
                None
            }
        }
    }

    fn temperature_output(&self, key: FluidParam) -> FluidResult<f64> {
        Ok(self.units().temperature_from_si(self.keyed_output(key)?))
    }

    fn nullable_temperature_output(&self, key: FluidParam) -> Option<f64> {
        self.nullable_output(key)
            .map(|value| self.units().temperature_from_si(value))
    }

    /// Compressibility factor, dimensionless.
    pub fn compressibility(&self) -> Option<f64> {
        self.nullable_output(FluidParam::Compressibility)
    }

    /// Thermal conductivity, W/m/K.
    pub fn conductivity(&self) -> Option<f64> {
        self.nullable_output(FluidParam::Conductivity)
    }

    /// Absolute pressure at the critical point, Pa.
    pub fn critical_pressure(&self) -> Option<f64> {
        self.nullable_output(FluidParam::CriticalPressure)
    }

    pub fn critical_temperature(&self) -> Option<f64> {
        self.nullable_temperature_output(FluidParam::CriticalTemperature)
    }

    /// Mass density, kg/m³.
    pub fn density(&self) -> FluidResult<f64> {
        self.keyed_output(FluidParam::Density)
    }

    /// Dynamic viscosity, Pa·s.
    pub fn dynamic_viscosity(&self) -> Option<f64> {
        self.nullable_output(FluidParam::DynamicViscosity)
    }

    /// Mass specific enthalpy, J/kg.
    pub fn enthalpy(&self) -> FluidResult<f64> {
        self.keyed_output(FluidParam::Enthalpy)
    }

    /// Mass specific entropy, J/kg/K.
    pub fn entropy(&self) -> FluidResult<f64> {
        self.keyed_output(FluidParam::Entropy)
    }

    pub fn freezing_temperature(&self) -> Option<f64> {
        self.nullable_temperature_output(FluidParam::FreezingTemperature)
    }

    /// Mass specific internal energy, J/kg.
    pub fn internal_energy(&self) -> FluidResult<f64> {
        self.keyed_output(FluidParam::InternalEnergy)
    }

    /// Kinematic viscosity, m²/s.
    pub fn kinematic_viscosity(&self) -> Option<f64> {
        let density = self.density().ok()?;
        self.dynamic_viscosity().map(|mu| mu / density)
    }

    pub fn max_pressure(&self) -> Option<f64> {
        self.nullable_output(FluidParam::MaxPressure)
    }

    pub fn max_temperature(&self) -> FluidResult<f64> {
        self.temperature_output(FluidParam::MaxTemperature)
    }

    pub fn min_pressure(&self) -> Option<f64> {
        self.nullable_output(FluidParam::MinPressure)
    }

    pub fn min_temperature(&self) -> FluidResult<f64> {
        self.temperature_output(FluidParam::MinTemperature)
    }

    /// Molar mass, kg/mol.
    pub fn molar_mass(&self) -> Option<f64> {
        self.nullable_output(FluidParam::MolarMass)
    }

    /// `Phase::Unknown` while Undefined or when the backend cannot tell.
    pub fn phase(&self) -> Phase {
        if !self.is_defined() {
            return Phase::Unknown;
        }
        self.keyed_output(FluidParam::Phase)
            .map(Phase::from_index)
            .unwrap_or(Phase::Unknown)
    }

    /// Prandtl number, dimensionless.
    pub fn prandtl(&self) -> Option<f64> {
        self.nullable_output(FluidParam::Prandtl)
    }

    /// Absolute pressure, Pa.
    pub fn pressure(&self) -> FluidResult<f64> {
        self.keyed_output(FluidParam::Pressure)
    }

    /// Vapor quality; `None` outside the two-phase region.
    pub fn quality(&self) -> Option<f64> {
        self.nullable_output(FluidParam::Quality)
            .filter(|q| (0.0..=1.0).contains(q))
            .map(|q| self.units().decimal_fraction_from_si(q))
    }

    /// Sound speed, m/s.
    pub fn sound_speed(&self) -> Option<f64> {
        self.nullable_output(FluidParam::SoundSpeed)
    }

    /// Mass specific constant pressure specific heat, J/kg/K.
    pub fn specific_heat(&self) -> FluidResult<f64> {
        self.keyed_output(FluidParam::SpecificHeat)
    }

    /// Mass specific volume, m³/kg.
    pub fn specific_volume(&self) -> FluidResult<f64> {
        Ok(1.0 / self.density()?)
    }

    /// Surface tension, N/m.
    pub fn surface_tension(&self) -> Option<f64> {
        self.nullable_output(FluidParam::SurfaceTension)
    }

    pub fn temperature(&self) -> FluidResult<f64> {
        self.temperature_output(FluidParam::Temperature)
    }

    /// Absolute pressure at the triple point, Pa.
    pub fn triple_pressure(&self) -> Option<f64> {
        self.nullable_output(FluidParam::TriplePressure)
    }

    pub fn triple_temperature(&self) -> Option<f64> {
        self.nullable_temperature_output(FluidParam::TripleTemperature)
    }
}

impl<I: FluidIdentity> PartialEq for FluidState<I> {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
            && canonical_inputs(&self.inputs) == canonical_inputs(&other.inputs)
    }
}

impl<I: FluidIdentity> Eq for FluidState<I> {}

impl<I: FluidIdentity> Hash for FluidState<I> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_inputs(&self.inputs).hash(state);
    }
}

impl<I: FluidIdentity> fmt::Debug for FluidState<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FluidState")
            .field("identity", &self.identity)
            .field("units_system", &self.units_system())
            .field("inputs", &self.inputs)
            .field("specified_phase", &self.specified_phase)
            .finish()
    }
}
