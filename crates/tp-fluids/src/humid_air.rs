//! Real humid air.
//!
//! A [`HumidAir`] state is defined by three distinct inputs. Unlike fluids
//! there is no stateful backend binding: every property is an independent
//! oracle evaluation over the stored inputs, memoized until the next update.

use std::fmt;
use std::hash::{Hash, Hasher};

use tp_core::{UnitConverter, UnitsSystem};
use tracing::{debug, trace};

use crate::backend::PropertyContext;
use crate::cache::PropertyCache;
use crate::error::{FluidError, FluidResult};
use crate::humid_air_input::{HumidAirInput, HumidAirParam};
use crate::process::check_pressure_drop;
use crate::state::{canonical_inputs, finite_output, has_unique_keys, undefined_state};

fn invalid(what: &'static str) -> FluidError {
    FluidError::InvalidArg { what }
}

pub struct HumidAir {
    context: PropertyContext,
    inputs: Option<[HumidAirInput; 3]>,
    cache: PropertyCache<HumidAirParam>,
}

impl HumidAir {
    /// Undefined humid air state.
    pub fn new(context: &PropertyContext) -> Self {
        Self {
            context: context.clone(),
            inputs: None,
            cache: PropertyCache::new(),
        }
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

    pub fn inputs(&self) -> &[HumidAirInput] {
        self.inputs.as_ref().map_or(&[], |inputs| inputs.as_slice())
    }

    pub fn is_defined(&self) -> bool {
        self.inputs.is_some()
    }

    pub fn factory(&self) -> Self {
        Self::new(&self.context)
    }

    pub fn with_state(
        &self,
        first: HumidAirInput,
        second: HumidAirInput,
        third: HumidAirInput,
    ) -> FluidResult<Self> {
        let mut state = self.factory();
        state.update(first, second, third)?;
        Ok(state)
    }

    pub fn clone_state(&self) -> FluidResult<Self> {
        let [first, second, third] = self.inputs.ok_or_else(undefined_state)?;
        self.with_state(first, second, third)
    }

    pub fn update(
        &mut self,
        first: HumidAirInput,
        second: HumidAirInput,
        third: HumidAirInput,
    ) -> FluidResult<()> {
        let inputs = [first, second, third];
        if !has_unique_keys(&inputs) {
            return Err(FluidError::InvalidState {
                what: "Need to define 3 unique inputs!",
            });
        }
        self.reset();
        debug!(?inputs, "defining humid air state");
        self.inputs = Some(inputs);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.inputs = None;
        self.cache.clear();
    }

    /// Number of memoized properties.
    pub fn cached_properties(&self) -> usize {
        self.cache.filled()
    }

    fn keyed_output(&self, key: HumidAirParam) -> FluidResult<f64> {
        let inputs = self.inputs.as_ref().ok_or_else(undefined_state)?;
        self.cache.get_or_try_init(key, || {
            if let Some(input) = inputs.iter().find(|input| input.key() == key) {
                return finite_output(input.value());
            }
            trace!(?key, "querying humid air properties");
            finite_output(self.context.oracle().humid_air_output(key, inputs)?)
        })
    }

    fn temperature_output(&self, key: HumidAirParam) -> FluidResult<f64> {
        Ok(self.units().temperature_from_si(self.keyed_output(key)?))
    }

    /// Compressibility factor, dimensionless.
    pub fn compressibility(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::Compressibility)
    }

    /// Thermal conductivity, W/m/K.
    pub fn conductivity(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::Conductivity)
    }

    /// Mass density per humid air unit, kg/m³.
    pub fn density(&self) -> FluidResult<f64> {
        Ok(1.0 / self.specific_volume()?)
    }

    pub fn dew_temperature(&self) -> FluidResult<f64> {
        self.temperature_output(HumidAirParam::DewTemperature)
    }

    /// Dynamic viscosity, Pa·s.
    pub fn dynamic_viscosity(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::DynamicViscosity)
    }

    /// Mass specific enthalpy per humid air, J/kg.
    pub fn enthalpy(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::Enthalpy)
    }

    /// Mass specific entropy per humid air, J/kg/K.
    pub fn entropy(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::Entropy)
    }

    /// Absolute humidity ratio, kg/kg dry air.
    pub fn humidity(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::Humidity)
    }

    /// Kinematic viscosity, m²/s.
    pub fn kinematic_viscosity(&self) -> FluidResult<f64> {
        Ok(self.dynamic_viscosity()? / self.density()?)
    }

    /// Partial pressure of water vapor, Pa.
    pub fn partial_pressure(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::PartialPressure)
    }

    pub fn prandtl(&self) -> FluidResult<f64> {
        Ok(self.dynamic_viscosity()? * self.specific_heat()? / self.conductivity()?)
    }

    /// Absolute pressure, Pa.
    pub fn pressure(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::Pressure)
    }

    pub fn relative_humidity(&self) -> FluidResult<f64> {
        Ok(self
            .units()
            .decimal_fraction_from_si(self.keyed_output(HumidAirParam::RelativeHumidity)?))
    }

    /// Mass specific constant pressure specific heat per humid air, J/kg/K.
    pub fn specific_heat(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::SpecificHeat)
    }

    /// Mass specific volume per humid air unit, m³/kg.
    pub fn specific_volume(&self) -> FluidResult<f64> {
        self.keyed_output(HumidAirParam::SpecificVolume)
    }

    /// Dry-bulb temperature.
    pub fn temperature(&self) -> FluidResult<f64> {
        self.temperature_output(HumidAirParam::Temperature)
    }

    pub fn wet_bulb_temperature(&self) -> FluidResult<f64> {
        self.temperature_output(HumidAirParam::WetBulbTemperature)
    }

    fn temperature_input(&self, temperature: f64) -> HumidAirInput {
        HumidAirInput::temperature_in(self.units(), temperature)
    }

    fn relative_humidity_input(&self, relative_humidity: f64) -> HumidAirInput {
        HumidAirInput::relative_humidity_in(self.units(), relative_humidity)
    }

    /// The process of cooling without dehumidification to given temperature.
    pub fn dry_cooling_to_temperature(
        &self,
        temperature: f64,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        self.check_dew_temperature(temperature)?;
        self.check_temperature(temperature, Direction::Cooling)?;
        self.dry_heat_transfer(self.temperature_input(temperature), pressure_drop)
    }

    /// The process of cooling without dehumidification to given enthalpy, J/kg.
    pub fn dry_cooling_to_enthalpy(&self, enthalpy: f64, pressure_drop: f64) -> FluidResult<Self> {
        self.check_dew_enthalpy(enthalpy)?;
        self.check_enthalpy(enthalpy, Direction::Cooling)?;
        self.dry_heat_transfer(HumidAirInput::enthalpy(enthalpy), pressure_drop)
    }

    pub fn heating_to_temperature(
        &self,
        temperature: f64,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        self.check_dew_temperature(temperature)?;
        self.check_temperature(temperature, Direction::Heating)?;
        self.dry_heat_transfer(self.temperature_input(temperature), pressure_drop)
    }

    pub fn heating_to_enthalpy(&self, enthalpy: f64, pressure_drop: f64) -> FluidResult<Self> {
        self.check_dew_enthalpy(enthalpy)?;
        self.check_enthalpy(enthalpy, Direction::Heating)?;
        self.dry_heat_transfer(HumidAirInput::enthalpy(enthalpy), pressure_drop)
    }

    /// The process of cooling with dehumidification to given temperature and
    /// relative humidity.
    pub fn wet_cooling_to_temperature_and_relative_humidity(
        &self,
        temperature: f64,
        relative_humidity: f64,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        self.wet_cooling_to(
            self.temperature_input(temperature),
            self.relative_humidity_input(relative_humidity),
            pressure_drop,
        )
    }

    pub fn wet_cooling_to_temperature_and_absolute_humidity(
        &self,
        temperature: f64,
        humidity: f64,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        self.wet_cooling_to(
            self.temperature_input(temperature),
            HumidAirInput::humidity(humidity),
            pressure_drop,
        )
    }

    pub fn wet_cooling_to_enthalpy_and_relative_humidity(
        &self,
        enthalpy: f64,
        relative_humidity: f64,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        self.wet_cooling_to(
            HumidAirInput::enthalpy(enthalpy),
            self.relative_humidity_input(relative_humidity),
            pressure_drop,
        )
    }

    pub fn wet_cooling_to_enthalpy_and_absolute_humidity(
        &self,
        enthalpy: f64,
        humidity: f64,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        self.wet_cooling_to(
            HumidAirInput::enthalpy(enthalpy),
            HumidAirInput::humidity(humidity),
            pressure_drop,
        )
    }

    /// Isenthalpic humidification to given relative humidity.
    pub fn humidification_by_water_to_relative_humidity(
        &self,
        relative_humidity: f64,
    ) -> FluidResult<Self> {
        self.humidification_to(
            HumidAirInput::enthalpy(self.enthalpy()?),
            self.relative_humidity_input(relative_humidity),
        )
    }

    /// Isenthalpic humidification to given absolute humidity, kg/kg dry air.
    pub fn humidification_by_water_to_absolute_humidity(&self, humidity: f64) -> FluidResult<Self> {
        self.humidification_to(
            HumidAirInput::enthalpy(self.enthalpy()?),
            HumidAirInput::humidity(humidity),
        )
    }

    /// Isothermal humidification to given relative humidity.
    pub fn humidification_by_steam_to_relative_humidity(
        &self,
        relative_humidity: f64,
    ) -> FluidResult<Self> {
        self.humidification_to(
            self.temperature_input(self.temperature()?),
            self.relative_humidity_input(relative_humidity),
        )
    }

    /// Isothermal humidification to given absolute humidity, kg/kg dry air.
    pub fn humidification_by_steam_to_absolute_humidity(&self, humidity: f64) -> FluidResult<Self> {
        self.humidification_to(
            self.temperature_input(self.temperature()?),
            HumidAirInput::humidity(humidity),
        )
    }

    /// Adiabatic mixing of two humid air flows at the same pressure.
    pub fn mixing(
        &self,
        first_specific_mass_flow: f64,
        first: &HumidAir,
        second_specific_mass_flow: f64,
        second: &HumidAir,
    ) -> FluidResult<Self> {
        let pressure = first.pressure()?;
        if pressure != second.pressure()? {
            return Err(invalid(
                "The mixing process is possible only for flows with the same pressure!",
            ));
        }
        let (w1, w2) = (first_specific_mass_flow, second_specific_mass_flow);
        let (h1, h2) = (first.enthalpy()?, second.enthalpy()?);
        let (x1, x2) = (first.humidity()?, second.humidity()?);
        self.with_state(
            HumidAirInput::pressure(pressure),
            HumidAirInput::enthalpy((w1 * h1 + w2 * h2) / (w1 + w2)),
            HumidAirInput::humidity(
                (w1 * x1 * (1.0 + x2) + w2 * x2 * (1.0 + x1))
                    / (w1 * (1.0 + x2) + w2 * (1.0 + x1)),
            ),
        )
    }

    fn dry_heat_transfer(&self, target: HumidAirInput, pressure_drop: f64) -> FluidResult<Self> {
        check_pressure_drop(pressure_drop)?;
        self.with_state(
            HumidAirInput::pressure(self.pressure()? - pressure_drop),
            target,
            HumidAirInput::humidity(self.humidity()?),
        )
    }

    fn wet_cooling_to(
        &self,
        first: HumidAirInput,
        second: HumidAirInput,
        pressure_drop: f64,
    ) -> FluidResult<Self> {
        match first.key() {
            HumidAirParam::Temperature => self.check_temperature(
                self.units().temperature_from_si(first.value()),
                Direction::Cooling,
            )?,
            HumidAirParam::Enthalpy => self.check_enthalpy(first.value(), Direction::Cooling)?,
            _ => {}
        }
        check_pressure_drop(pressure_drop)?;
        let result = self.with_state(
            HumidAirInput::pressure(self.pressure()? - pressure_drop),
            first,
            second,
        )?;
        if !(result.humidity()? < self.humidity()?) {
            return Err(invalid(
                "During the wet cooling process, the absolute humidity ratio should decrease!",
            ));
        }
        Ok(result)
    }

    fn humidification_to(&self, first: HumidAirInput, second: HumidAirInput) -> FluidResult<Self> {
        let result = self.with_state(HumidAirInput::pressure(self.pressure()?), first, second)?;
        if !(result.humidity()? > self.humidity()?) {
            return Err(invalid(
                "During the humidification process, the absolute humidity ratio should increase!",
            ));
        }
        Ok(result)
    }

    fn check_temperature(&self, temperature: f64, direction: Direction) -> FluidResult<()> {
        let current = self.temperature()?;
        match direction {
            Direction::Cooling if !(temperature < current) => Err(invalid(
                "During the cooling process, the temperature should decrease!",
            )),
            Direction::Heating if !(temperature > current) => Err(invalid(
                "During the heating process, the temperature should increase!",
            )),
            _ => Ok(()),
        }
    }

    fn check_enthalpy(&self, enthalpy: f64, direction: Direction) -> FluidResult<()> {
        let current = self.enthalpy()?;
        match direction {
            Direction::Cooling if !(enthalpy < current) => Err(invalid(
                "During the cooling process, the enthalpy should decrease!",
            )),
            Direction::Heating if !(enthalpy > current) => Err(invalid(
                "During the heating process, the enthalpy should increase!",
            )),
            _ => Ok(()),
        }
    }

    fn check_dew_temperature(&self, temperature: f64) -> FluidResult<()> {
        if temperature < self.dew_temperature()? {
            return Err(invalid(
                "The outlet temperature after dry heat transfer should be greater than the dew point temperature!",
            ));
        }
        Ok(())
    }

    fn check_dew_enthalpy(&self, enthalpy: f64) -> FluidResult<()> {
        let saturated = self.with_state(
            HumidAirInput::pressure(self.pressure()?),
            self.temperature_input(self.dew_temperature()?),
            self.relative_humidity_input(self.units().full_fraction()),
        )?;
        if enthalpy < saturated.enthalpy()? {
            return Err(invalid(
                "The outlet enthalpy after dry heat transfer should be greater than the dew point enthalpy!",
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Cooling,
    Heating,
}

impl PartialEq for HumidAir {
    fn eq(&self, other: &Self) -> bool {
        canonical_inputs(self.inputs()) == canonical_inputs(other.inputs())
    }
}

impl Eq for HumidAir {}

impl Hash for HumidAir {
    fn hash<H: Hasher>(&self, state: &mut H) {
        canonical_inputs(self.inputs()).hash(state);
    }
}

impl fmt::Debug for HumidAir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HumidAir")
            .field("units_system", &self.units_system())
            .field("inputs", &self.inputs())
            .finish()
    }
}
