//! Serializable projections of states.
//!
//! Snapshots list identity fields first, then the units system, then every
//! property in alphabetical order. Values are in the state's units system.

use serde::Serialize;
use tp_core::UnitsSystem;

use crate::error::{FluidError, FluidResult};
use crate::humid_air::HumidAir;
use crate::phase::Phase;
use crate::state::{FluidIdentity, FluidState};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluidSnapshot<D> {
    #[serde(flatten)]
    pub identity: D,
    pub units_system: UnitsSystem,
    pub compressibility: Option<f64>,
    pub conductivity: Option<f64>,
    pub critical_pressure: Option<f64>,
    pub critical_temperature: Option<f64>,
    pub density: f64,
    pub dynamic_viscosity: Option<f64>,
    pub enthalpy: f64,
    pub entropy: f64,
    pub freezing_temperature: Option<f64>,
    pub internal_energy: f64,
    pub kinematic_viscosity: Option<f64>,
    pub max_pressure: Option<f64>,
    pub max_temperature: f64,
    pub min_pressure: Option<f64>,
    pub min_temperature: f64,
    pub molar_mass: Option<f64>,
    pub phase: Phase,
    pub prandtl: Option<f64>,
    pub pressure: f64,
    pub quality: Option<f64>,
    pub sound_speed: Option<f64>,
    pub specific_heat: f64,
    pub specific_volume: f64,
    pub surface_tension: Option<f64>,
    pub temperature: f64,
    pub triple_pressure: Option<f64>,
    pub triple_temperature: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumidAirSnapshot {
    pub units_system: UnitsSystem,
    pub compressibility: f64,
    pub conductivity: f64,
    pub density: f64,
    pub dew_temperature: f64,
    pub dynamic_viscosity: f64,
    pub enthalpy: f64,
    pub entropy: f64,
    pub humidity: f64,
    pub kinematic_viscosity: f64,
    pub partial_pressure: f64,
    pub prandtl: f64,
    pub pressure: f64,
    pub relative_humidity: f64,
    pub specific_heat: f64,
    pub specific_volume: f64,
    pub temperature: f64,
    pub wet_bulb_temperature: f64,
}

fn render<T: Serialize>(snapshot: &T, indented: bool) -> FluidResult<String> {
    let rendered = if indented {
        serde_json::to_string_pretty(snapshot)
    } else {
        serde_json::to_string(snapshot)
    };
    rendered.map_err(|e| FluidError::Backend {
        message: format!("failed to render snapshot: {e}"),
    })
}

impl<I: FluidIdentity> FluidState<I> {
    /// Every property of a defined state.
    pub fn as_dict(&self) -> FluidResult<FluidSnapshot<I::Description>> {
        Ok(FluidSnapshot {
            identity: self.identity().describe(self.units()),
            units_system: self.units_system(),
            compressibility: self.compressibility(),
            conductivity: self.conductivity(),
            critical_pressure: self.critical_pressure(),
            critical_temperature: self.critical_temperature(),
            density: self.density()?,
            dynamic_viscosity: self.dynamic_viscosity(),
            enthalpy: self.enthalpy()?,
            entropy: self.entropy()?,
            freezing_temperature: self.freezing_temperature(),
            internal_energy: self.internal_energy()?,
            kinematic_viscosity: self.kinematic_viscosity(),
            max_pressure: self.max_pressure(),
            max_temperature: self.max_temperature()?,
            min_pressure: self.min_pressure(),
            min_temperature: self.min_temperature()?,
            molar_mass: self.molar_mass(),
            phase: self.phase(),
            prandtl: self.prandtl(),
            pressure: self.pressure()?,
            quality: self.quality(),
            sound_speed: self.sound_speed(),
            specific_heat: self.specific_heat()?,
            specific_volume: self.specific_volume()?,
            surface_tension: self.surface_tension(),
            temperature: self.temperature()?,
            triple_pressure: self.triple_pressure(),
            triple_temperature: self.triple_temperature(),
        })
    }

    /// JSON rendering of [`FluidState::as_dict`]; missing values are `null`.
    pub fn as_json(&self, indented: bool) -> FluidResult<String> {
        render(&self.as_dict()?, indented)
    }
}

impl HumidAir {
    pub fn as_dict(&self) -> FluidResult<HumidAirSnapshot> {
        Ok(HumidAirSnapshot {
            units_system: self.units_system(),
            compressibility: self.compressibility()?,
            conductivity: self.conductivity()?,
            density: self.density()?,
            dew_temperature: self.dew_temperature()?,
            dynamic_viscosity: self.dynamic_viscosity()?,
            enthalpy: self.enthalpy()?,
            entropy: self.entropy()?,
            humidity: self.humidity()?,
            kinematic_viscosity: self.kinematic_viscosity()?,
            partial_pressure: self.partial_pressure()?,
            prandtl: self.prandtl()?,
            pressure: self.pressure()?,
            relative_humidity: self.relative_humidity()?,
            specific_heat: self.specific_heat()?,
            specific_volume: self.specific_volume()?,
            temperature: self.temperature()?,
            wet_bulb_temperature: self.wet_bulb_temperature()?,
        })
    }

    pub fn as_json(&self, indented: bool) -> FluidResult<String> {
        render(&self.as_dict()?, indented)
    }
}
