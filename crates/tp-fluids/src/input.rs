//! Keyed inputs defining a fluid state.
//!
//! An input is an immutable `(key, value)` pair whose value is always SI.
//! Named factories accept public units and convert them with either the
//! active [`UnitConverter`] or an explicit one (the `*_in` variants).

use std::hash::{Hash, Hasher};

use serde::Serialize;
use tp_core::UnitConverter;

use crate::error::FluidResult;

/// Fluid property identifiers understood by the property backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum FluidParam {
    Compressibility,
    Conductivity,
    CriticalPressure,
    CriticalTemperature,
    Density,
    DynamicViscosity,
    Enthalpy,
    Entropy,
    FreezingTemperature,
    InternalEnergy,
    MaxPressure,
    MaxTemperature,
    MinPressure,
    MinTemperature,
    MolarMass,
    Phase,
    Prandtl,
    Pressure,
    Quality,
    SoundSpeed,
    SpecificHeat,
    SurfaceTension,
    Temperature,
    TriplePressure,
    TripleTemperature,
}

impl FluidParam {
    pub const ALL: [FluidParam; 25] = [
        FluidParam::Compressibility,
        FluidParam::Conductivity,
        FluidParam::CriticalPressure,
        FluidParam::CriticalTemperature,
        FluidParam::Density,
        FluidParam::DynamicViscosity,
        FluidParam::Enthalpy,
        FluidParam::Entropy,
        FluidParam::FreezingTemperature,
        FluidParam::InternalEnergy,
        FluidParam::MaxPressure,
        FluidParam::MaxTemperature,
        FluidParam::MinPressure,
        FluidParam::MinTemperature,
        FluidParam::MolarMass,
        FluidParam::Phase,
        FluidParam::Prandtl,
        FluidParam::Pressure,
        FluidParam::Quality,
        FluidParam::SoundSpeed,
        FluidParam::SpecificHeat,
        FluidParam::SurfaceTension,
        FluidParam::Temperature,
        FluidParam::TriplePressure,
        FluidParam::TripleTemperature,
    ];

    /// CoolProp parameter name.
    pub fn coolprop_key(self) -> &'static str {
        match self {
            FluidParam::Compressibility => "Z",
            FluidParam::Conductivity => "L",
            FluidParam::CriticalPressure => "p_critical",
            FluidParam::CriticalTemperature => "T_critical",
            FluidParam::Density => "Dmass",
            FluidParam::DynamicViscosity => "V",
            FluidParam::Enthalpy => "Hmass",
            FluidParam::Entropy => "Smass",
            FluidParam::FreezingTemperature => "T_freeze",
            FluidParam::InternalEnergy => "Umass",
            FluidParam::MaxPressure => "P_max",
            FluidParam::MaxTemperature => "T_max",
            FluidParam::MinPressure => "P_min",
            FluidParam::MinTemperature => "T_min",
            FluidParam::MolarMass => "molar_mass",
            FluidParam::Phase => "Phase",
            FluidParam::Prandtl => "Prandtl",
            FluidParam::Pressure => "P",
            FluidParam::Quality => "Q",
            FluidParam::SoundSpeed => "A",
            FluidParam::SpecificHeat => "Cpmass",
            FluidParam::SurfaceTension => "I",
            FluidParam::Temperature => "T",
            FluidParam::TriplePressure => "p_triple",
            FluidParam::TripleTemperature => "T_triple",
        }
    }

    /// Substance constants that do not depend on the bound inputs.
    pub fn is_trivial(self) -> bool {
        matches!(
            self,
            FluidParam::CriticalPressure
                | FluidParam::CriticalTemperature
                | FluidParam::FreezingTemperature
                | FluidParam::MaxPressure
                | FluidParam::MaxTemperature
                | FluidParam::MinPressure
                | FluidParam::MinTemperature
                | FluidParam::MolarMass
                | FluidParam::TriplePressure
                | FluidParam::TripleTemperature
        )
    }
}

/// An immutable keyed input, value in SI units.
///
/// Equality and hashing use the exact bit pattern of the value.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct KeyedInput<K> {
    key: K,
    value: f64,
}

impl<K: Copy> KeyedInput<K> {
    /// Raw input; `value` must already be SI.
    pub fn new(key: K, value: f64) -> Self {
        Self { key, value }
    }

    pub fn key(&self) -> K {
        self.key
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

impl<K: PartialEq> PartialEq for KeyedInput<K> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.value.to_bits() == other.value.to_bits()
    }
}

impl<K: Eq> Eq for KeyedInput<K> {}

impl<K: Hash> Hash for KeyedInput<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.value.to_bits().hash(state);
    }
}

/// Keyed input for fluids and mixtures.
pub type Input = KeyedInput<FluidParam>;

impl KeyedInput<FluidParam> {
    /// Mass density, kg/m³.
    pub fn density(value: f64) -> Self {
        Self::new(FluidParam::Density, value)
    }

    /// Mass specific enthalpy, J/kg.
    pub fn enthalpy(value: f64) -> Self {
        Self::new(FluidParam::Enthalpy, value)
    }

    /// Mass specific entropy, J/kg/K.
    pub fn entropy(value: f64) -> Self {
        Self::new(FluidParam::Entropy, value)
    }

    /// Mass specific internal energy, J/kg.
    pub fn internal_energy(value: f64) -> Self {
        Self::new(FluidParam::InternalEnergy, value)
    }

    /// Absolute pressure, Pa.
    pub fn pressure(value: f64) -> Self {
        Self::new(FluidParam::Pressure, value)
    }

    /// Mass specific volume, m³/kg. Stored as density.
    pub fn specific_volume(value: f64) -> Self {
        Self::density(1.0 / value)
    }

    /// Vapor quality in the active units.
    pub fn quality(value: f64) -> FluidResult<Self> {
        Ok(Self::quality_in(UnitConverter::active()?, value))
    }

    pub fn quality_in(units: UnitConverter, value: f64) -> Self {
        Self::new(FluidParam::Quality, units.decimal_fraction_to_si(value))
    }

    /// Temperature in the active units.
    pub fn temperature(value: f64) -> FluidResult<Self> {
        Ok(Self::temperature_in(UnitConverter::active()?, value))
    }

    pub fn temperature_in(units: UnitConverter, value: f64) -> Self {
        Self::new(FluidParam::Temperature, units.temperature_to_si(value))
    }
}
