//! Keyed inputs defining a humid air state.

use serde::Serialize;
use tp_core::UnitConverter;

use crate::error::{FluidError, FluidResult};
use crate::input::KeyedInput;

/// Psychrometric property identifiers understood by the property backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum HumidAirParam {
    Compressibility,
    Conductivity,
    DewTemperature,
    DynamicViscosity,
    Enthalpy,
    Entropy,
    Humidity,
    PartialPressure,
    Pressure,
    RelativeHumidity,
    SpecificHeat,
    SpecificVolume,
    Temperature,
    WetBulbTemperature,
}

impl HumidAirParam {
    pub const ALL: [HumidAirParam; 14] = [
        HumidAirParam::Compressibility,
        HumidAirParam::Conductivity,
        HumidAirParam::DewTemperature,
        HumidAirParam::DynamicViscosity,
        HumidAirParam::Enthalpy,
        HumidAirParam::Entropy,
        HumidAirParam::Humidity,
        HumidAirParam::PartialPressure,
        HumidAirParam::Pressure,
        HumidAirParam::RelativeHumidity,
        HumidAirParam::SpecificHeat,
        HumidAirParam::SpecificVolume,
        HumidAirParam::Temperature,
        HumidAirParam::WetBulbTemperature,
    ];

    /// CoolProp `HAPropsSI` key.
    pub fn coolprop_key(self) -> &'static str {
        match self {
            HumidAirParam::Compressibility => "Z",
            HumidAirParam::Conductivity => "K",
            HumidAirParam::DewTemperature => "D",
            HumidAirParam::DynamicViscosity => "M",
            HumidAirParam::Enthalpy => "Hha",
            HumidAirParam::Entropy => "Sha",
            HumidAirParam::Humidity => "W",
            HumidAirParam::PartialPressure => "P_w",
            HumidAirParam::Pressure => "P",
            HumidAirParam::RelativeHumidity => "R",
            HumidAirParam::SpecificHeat => "Cha",
            HumidAirParam::SpecificVolume => "Vha",
            HumidAirParam::Temperature => "T",
            HumidAirParam::WetBulbTemperature => "B",
        }
    }
}

/// Keyed input for humid air.
pub type HumidAirInput = KeyedInput<HumidAirParam>;

/// Valid range of the altitude factory, m.
pub const ALTITUDE_RANGE: std::ops::RangeInclusive<f64> = -5000.0..=11000.0;

impl KeyedInput<HumidAirParam> {
    /// Altitude above sea level, m. Stored as the standard-atmosphere pressure.
    pub fn altitude(value: f64) -> FluidResult<Self> {
        if !ALTITUDE_RANGE.contains(&value) {
            return Err(FluidError::InvalidArg {
                what: "Altitude above sea level should be between -5000 and 11000 meters!",
            });
        }
        Ok(Self::pressure(
            101_325.0 * (1.0 - 2.25577e-5 * value).powf(5.2559),
        ))
    }

    /// Mass density per humid air unit, kg/m³. Stored as specific volume.
    pub fn density(value: f64) -> Self {
        Self::new(HumidAirParam::SpecificVolume, 1.0 / value)
    }

    /// Mass specific enthalpy per humid air, J/kg.
    pub fn enthalpy(value: f64) -> Self {
        Self::new(HumidAirParam::Enthalpy, value)
    }

    /// Mass specific entropy per humid air, J/kg/K.
    pub fn entropy(value: f64) -> Self {
        Self::new(HumidAirParam::Entropy, value)
    }

    /// Absolute humidity ratio, kg/kg dry air.
    pub fn humidity(value: f64) -> Self {
        Self::new(HumidAirParam::Humidity, value)
    }

    /// Partial pressure of water vapor, Pa.
    pub fn partial_pressure(value: f64) -> Self {
        Self::new(HumidAirParam::PartialPressure, value)
    }

    /// Absolute pressure, Pa.
    pub fn pressure(value: f64) -> Self {
        Self::new(HumidAirParam::Pressure, value)
    }

    /// Mass specific volume per humid air unit, m³/kg.
    pub fn specific_volume(value: f64) -> Self {
        Self::new(HumidAirParam::SpecificVolume, value)
    }

    pub fn dew_temperature(value: f64) -> FluidResult<Self> {
        Ok(Self::dew_temperature_in(UnitConverter::active()?, value))
    }

    pub fn dew_temperature_in(units: UnitConverter, value: f64) -> Self {
        Self::new(HumidAirParam::DewTemperature, units.temperature_to_si(value))
    }

    pub fn relative_humidity(value: f64) -> FluidResult<Self> {
        Ok(Self::relative_humidity_in(UnitConverter::active()?, value))
    }

    pub fn relative_humidity_in(units: UnitConverter, value: f64) -> Self {
        Self::new(
            HumidAirParam::RelativeHumidity,
            units.decimal_fraction_to_si(value),
        )
    }

    pub fn temperature(value: f64) -> FluidResult<Self> {
        Ok(Self::temperature_in(UnitConverter::active()?, value))
    }

    pub fn temperature_in(units: UnitConverter, value: f64) -> Self {
        Self::new(HumidAirParam::Temperature, units.temperature_to_si(value))
    }

    pub fn wet_bulb_temperature(value: f64) -> FluidResult<Self> {
        Ok(Self::wet_bulb_temperature_in(UnitConverter::active()?, value))
    }

    pub fn wet_bulb_temperature_in(units: UnitConverter, value: f64) -> Self {
        Self::new(
            HumidAirParam::WetBulbTemperature,
            units.temperature_to_si(value),
        )
    }
}
