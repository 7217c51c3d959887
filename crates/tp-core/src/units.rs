//! Units systems and conversions between public units and SI.
//!
//! Every value crossing the public API is expressed in the active
//! [`UnitsSystem`]; everything handed to a property backend is SI. The
//! conversions lean on `uom` quantities so the offsets and scales come from
//! the unit definitions rather than hand-written constants.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uom::si::f64::{Ratio, ThermodynamicTemperature};
use uom::si::ratio::{percent, ratio};
use uom::si::thermodynamic_temperature::{degree_celsius, kelvin};

use crate::config::Configuration;
use crate::{TpError, TpResult};

/// Units used for temperatures and decimal fractions in the public API.
///
/// Every other quantity is always SI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitsSystem {
    /// Kelvin, decimal fractions in [0; 1].
    SI,
    /// Degrees Celsius, decimal fractions in [0; 1].
    SIWithCelsius,
    /// Degrees Celsius, decimal fractions in percents.
    #[default]
    SIWithCelsiusAndPercents,
}

impl UnitsSystem {
    pub const ALL: [UnitsSystem; 3] = [
        UnitsSystem::SI,
        UnitsSystem::SIWithCelsius,
        UnitsSystem::SIWithCelsiusAndPercents,
    ];

    pub fn name(self) -> &'static str {
        match self {
            UnitsSystem::SI => "SI",
            UnitsSystem::SIWithCelsius => "SIWithCelsius",
            UnitsSystem::SIWithCelsiusAndPercents => "SIWithCelsiusAndPercents",
        }
    }
}

impl fmt::Display for UnitsSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for UnitsSystem {
    type Err = TpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UnitsSystem::ALL
            .into_iter()
            .find(|units| units.name() == s)
            .ok_or(TpError::InvalidArg {
                what: "unknown units system",
            })
    }
}

/// Converts temperatures and decimal fractions between a units system and SI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct UnitConverter {
    units_system: UnitsSystem,
}

impl UnitConverter {
    pub fn new(units_system: UnitsSystem) -> Self {
        Self { units_system }
    }

    /// Converter for the active configuration, read at call time.
    pub fn active() -> TpResult<Self> {
        Ok(Self::new(Configuration::build()?.units_system))
    }

    pub fn units_system(&self) -> UnitsSystem {
        self.units_system
    }

    pub fn temperature_to_si(&self, value: f64) -> f64 {
        if self.uses_celsius() {
            ThermodynamicTemperature::new::<degree_celsius>(value).get::<kelvin>()
        } else {
            value
        }
    }

    pub fn temperature_from_si(&self, value: f64) -> f64 {
        if self.uses_celsius() {
            ThermodynamicTemperature::new::<kelvin>(value).get::<degree_celsius>()
        } else {
            value
        }
    }

    pub fn decimal_fraction_to_si(&self, value: f64) -> f64 {
        if self.uses_percents() {
            Ratio::new::<percent>(value).get::<ratio>()
        } else {
            value
        }
    }

    pub fn decimal_fraction_from_si(&self, value: f64) -> f64 {
        if self.uses_percents() {
            Ratio::new::<ratio>(value).get::<percent>()
        } else {
            value
        }
    }

    /// The whole (100 % or 1) in public units.
    pub fn full_fraction(&self) -> f64 {
        if self.uses_percents() { 100.0 } else { 1.0 }
    }

    /// Suffix used in messages about decimal fractions.
    pub fn fraction_unit(&self) -> &'static str {
        if self.uses_percents() { " %" } else { "" }
    }

    fn uses_celsius(&self) -> bool {
        self.units_system != UnitsSystem::SI
    }

    fn uses_percents(&self) -> bool {
        self.units_system == UnitsSystem::SIWithCelsiusAndPercents
    }
}

impl From<UnitsSystem> for UnitConverter {
    fn from(units_system: UnitsSystem) -> Self {
        Self::new(units_system)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Tolerances, nearly_equal};

    #[test]
    fn si_is_identity() {
        let c = UnitConverter::new(UnitsSystem::SI);
        assert_eq!(c.temperature_to_si(293.15), 293.15);
        assert_eq!(c.temperature_from_si(293.15), 293.15);
        assert_eq!(c.decimal_fraction_to_si(0.5), 0.5);
        assert_eq!(c.decimal_fraction_from_si(0.5), 0.5);
        assert_eq!(c.full_fraction(), 1.0);
    }

    #[test]
    fn celsius_offsets_temperature_only() {
        let c = UnitConverter::new(UnitsSystem::SIWithCelsius);
        assert!(nearly_equal(
            c.temperature_to_si(20.0),
            293.15,
            Tolerances::default()
        ));
        assert!(nearly_equal(
            c.temperature_from_si(373.15),
            100.0,
            Tolerances::default()
        ));
        assert_eq!(c.decimal_fraction_to_si(0.5), 0.5);
    }

    #[test]
    fn percents_scale_fractions() {
        let c = UnitConverter::new(UnitsSystem::SIWithCelsiusAndPercents);
        assert!(nearly_equal(
            c.decimal_fraction_to_si(50.0),
            0.5,
            Tolerances::default()
        ));
        assert!(nearly_equal(
            c.decimal_fraction_from_si(0.25),
            25.0,
            Tolerances::default()
        ));
        assert_eq!(c.full_fraction(), 100.0);
        assert_eq!(c.fraction_unit(), " %");
    }

    #[test]
    fn names_round_trip() {
        for units in UnitsSystem::ALL {
            assert_eq!(units.to_string().parse::<UnitsSystem>(), Ok(units));
        }
        assert!("Imperial".parse::<UnitsSystem>().is_err());
        assert_eq!(UnitsSystem::default(), UnitsSystem::SIWithCelsiusAndPercents);
    }
}
