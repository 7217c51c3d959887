//! Thermodynamic processes over fluid states.
//!
//! Every process validates its preconditions against the current state and
//! returns a new state through [`FluidState::with_state`]. Temperatures and
//! fractions are taken in the state's units system, everything else in SI.

use tp_core::in_open_unit_interval;

use crate::error::{FluidError, FluidResult};
use crate::input::{FluidParam, Input};
use crate::state::{FluidIdentity, FluidState};

fn invalid(what: &'static str) -> FluidError {
    FluidError::InvalidArg { what }
}

pub(crate) fn check_pressure_drop(pressure_drop: f64) -> FluidResult<()> {
    if pressure_drop < 0.0 {
        return Err(invalid("Invalid pressure drop in the heat exchanger!"));
    }
    Ok(())
}

impl<I: FluidIdentity> FluidState<I> {
    fn isentropic_efficiency(&self, efficiency: f64, what: &'static str) -> FluidResult<f64> {
        let efficiency = self.units().decimal_fraction_to_si(efficiency);
        if in_open_unit_interval(efficiency) {
            Ok(efficiency)
        } else {
            Err(invalid(what))
        }
    }

    fn quality_input(&self, quality: f64) -> Input {
        Input::quality_in(self.units(), quality)
    }

    fn temperature_input(&self, temperature: f64) -> Input {
        Input::temperature_in(self.units(), temperature)
    }

    /// The process of isentropic compression to given pressure, Pa.
    pub fn isentropic_compression_to_pressure(&self, pressure: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        if !(pressure > self.pressure()?) {
            return Err(invalid(
                "Compressor outlet pressure should be higher than inlet pressure!",
            ));
        }
        self.with_state(Input::pressure(pressure), Input::entropy(self.entropy()?))
    }

    /// The process of compression to given pressure with an isentropic
    /// efficiency in public fraction units.
    pub fn compression_to_pressure(
        &self,
        pressure: f64,
        isentropic_efficiency: f64,
    ) -> FluidResult<Self> {
        self.identity().check_processes()?;
        let efficiency = self.isentropic_efficiency(
            isentropic_efficiency,
            "Invalid compressor isentropic efficiency!",
        )?;
        let enthalpy = self.enthalpy()?;
        let isentropic = self.isentropic_compression_to_pressure(pressure)?;
        self.with_state(
            Input::pressure(pressure),
            Input::enthalpy(enthalpy + (isentropic.enthalpy()? - enthalpy) / efficiency),
        )
    }

    /// The process of isenthalpic expansion to given pressure, Pa.
    pub fn isenthalpic_expansion_to_pressure(&self, pressure: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        if !(pressure < self.pressure()?) {
            return Err(invalid(
                "Expansion valve outlet pressure should be lower than inlet pressure!",
            ));
        }
        self.with_state(Input::pressure(pressure), Input::enthalpy(self.enthalpy()?))
    }

    /// The process of isentropic expansion to given pressure, Pa.
    pub fn isentropic_expansion_to_pressure(&self, pressure: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        if !(pressure < self.pressure()?) {
            return Err(invalid(
                "Expander outlet pressure should be lower than inlet pressure!",
            ));
        }
        self.with_state(Input::pressure(pressure), Input::entropy(self.entropy()?))
    }

    pub fn expansion_to_pressure(
        &self,
        pressure: f64,
        isentropic_efficiency: f64,
    ) -> FluidResult<Self> {
        self.identity().check_processes()?;
        let efficiency = self.isentropic_efficiency(
            isentropic_efficiency,
            "Invalid expander isentropic efficiency!",
        )?;
        let enthalpy = self.enthalpy()?;
        let isentropic = self.isentropic_expansion_to_pressure(pressure)?;
        self.with_state(
            Input::pressure(pressure),
            Input::enthalpy(enthalpy - (enthalpy - isentropic.enthalpy()?) * efficiency),
        )
    }

    pub fn cooling_to_temperature(
        &self,
        temperature: f64,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        self.identity().check_processes()?;
        if !(temperature < self.temperature()?) {
            return Err(invalid(
                "During the cooling process, the temperature should decrease!",
            ));
        }
        self.heat_transfer_to_temperature(temperature, pressure_drop)
    }

    pub fn cooling_to_enthalpy(&self, enthalpy: f64, pressure_drop: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        if !(enthalpy < self.enthalpy()?) {
            return Err(invalid(
                "During the cooling process, the enthalpy should decrease!",
            ));
        }
        self.heat_transfer_to_enthalpy(enthalpy, pressure_drop)
    }

    pub fn heating_to_temperature(
        &self,
        temperature: f64,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        self.identity().check_processes()?;
        if !(temperature > self.temperature()?) {
            return Err(invalid(
                "During the heating process, the temperature should increase!",
            ));
        }
        self.heat_transfer_to_temperature(temperature, pressure_drop)
    }

    pub fn heating_to_enthalpy(&self, enthalpy: f64, pressure_drop: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        if !(enthalpy > self.enthalpy()?) {
            return Err(invalid(
                "During the heating process, the enthalpy should increase!",
            ));
        }
        self.heat_transfer_to_enthalpy(enthalpy, pressure_drop)
    }

    fn heat_transfer_to_temperature(
        &self,
        temperature: f64,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        check_pressure_drop(pressure_drop)?;
        self.with_state(
            Input::pressure(self.pressure()? - pressure_drop),
            self.temperature_input(temperature),
        )
    }

    fn heat_transfer_to_enthalpy(&self, enthalpy: f64, pressure_drop: f64) -> FluidResult<Self> {
        check_pressure_drop(pressure_drop)?;
        self.with_state(
            Input::pressure(self.pressure()? - pressure_drop),
            Input::enthalpy(enthalpy),
        )
    }

    pub fn bubble_point_at_pressure(&self, pressure: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        self.with_state(Input::pressure(pressure), Input::new(FluidParam::Quality, 0.0))
    }

    pub fn bubble_point_at_temperature(&self, temperature: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        self.with_state(
            self.temperature_input(temperature),
            Input::new(FluidParam::Quality, 0.0),
        )
    }

    pub fn dew_point_at_pressure(&self, pressure: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        self.with_state(Input::pressure(pressure), Input::new(FluidParam::Quality, 1.0))
    }

    pub fn dew_point_at_temperature(&self, temperature: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        self.with_state(
            self.temperature_input(temperature),
            Input::new(FluidParam::Quality, 1.0),
        )
    }

    /// Two-phase point at given pressure, Pa, and vapor quality.
    pub fn two_phase_point_at_pressure(&self, pressure: f64, quality: f64) -> FluidResult<Self> {
        self.identity().check_processes()?;
        self.with_state(Input::pressure(pressure), self.quality_input(quality))
    }

    /// Adiabatic mixing of two flows of the same fluid at the same pressure.
    ///
    /// Flow rates are specific (dimensionless) mass flows.
    pub fn mixing(
        &self,
        first_specific_mass_flow: f64,
        first: &Self,
        second_specific_mass_flow: f64,
        second: &Self,
    ) -> FluidResult<Self> {
        self.identity().check_processes()?;
        if self.identity() != first.identity() || first.identity() != second.identity() {
            return Err(invalid(
                "The mixing process is possible only for the same fluids!",
            ));
        }
        let pressure = first.pressure()?;
        if pressure != second.pressure()? {
            return Err(invalid(
                "The mixing process is possible only for flows with the same pressure!",
            ));
        }
        let enthalpy = (first_specific_mass_flow * first.enthalpy()?
            + second_specific_mass_flow * second.enthalpy()?)
            / (first_specific_mass_flow + second_specific_mass_flow);
        self.with_state(Input::pressure(pressure), Input::enthalpy(enthalpy))
    }
}
