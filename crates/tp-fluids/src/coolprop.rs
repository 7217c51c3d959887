//! CoolProp-based property oracle (via `rfluids`).
//!
//! Fluid states bind one `AbstractState` each; humid air goes through the
//! stateless `HAPropsSI` entry point.

use rfluids::io::{
    FluidInputPair, FluidParam as CoolPropParam, FluidTrivialParam, Phase as CoolPropPhase,
};
use rfluids::native::{AbstractState, CoolProp, CoolPropError};
use tracing::debug;

use crate::backend::{BackendRequest, FluidBackend, PropertyOracle};
use crate::error::{FluidError, FluidResult};
use crate::humid_air_input::{HumidAirInput, HumidAirParam};
use crate::input::{FluidParam, Input};
use crate::phase::Phase;
use crate::substance::MixKind;

fn backend_error(context: &str, err: CoolPropError) -> FluidError {
    FluidError::Backend {
        message: format!("{context}: {err}"),
    }
}

/// Property oracle backed by the CoolProp native library.
///
/// Thread-safe: rfluids serializes every CoolProp FFI call, and each fluid
/// state owns its `AbstractState`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoolPropOracle;

impl PropertyOracle for CoolPropOracle {
    fn name(&self) -> &str {
        "CoolProp"
    }

    fn fluid_backend(&self, request: &BackendRequest) -> FluidResult<Box<dyn FluidBackend>> {
        let names = request.joined_names();
        debug!(backend = request.backend, fluid = %names, "creating CoolProp abstract state");
        let mut state = AbstractState::new(request.backend, &names)
            .map_err(|e| backend_error(&format!("unknown fluid '{names}'"), e))?;
        if let Some(fractions) = &request.fractions {
            let values = match (request.names.len(), fractions.kind) {
                // Incompressible solutions take their own fraction kind as is.
                (1, _) => fractions.values.clone(),
                (_, MixKind::Mass) => {
                    mole_fractions(request.backend, &request.names, &fractions.values)?
                }
                (_, MixKind::Volume) => {
                    return Err(FluidError::NotSupported {
                        what: "volume-based multi-component mixtures",
                    });
                }
            };
            state
                .set_fractions(&values)
                .map_err(|e| backend_error(&format!("invalid fractions for '{names}'"), e))?;
        }
        Ok(Box::new(CoolPropBackend { state }))
    }

    fn humid_air_output(
        &self,
        output: HumidAirParam,
        inputs: &[HumidAirInput; 3],
    ) -> FluidResult<f64> {
        let [first, second, third] = inputs;
        CoolProp::ha_props_si(
            output.coolprop_key(),
            first.key().coolprop_key(),
            first.value(),
            second.key().coolprop_key(),
            second.value(),
            third.key().coolprop_key(),
            third.value(),
        )
        .map_err(|e| backend_error(&format!("HAPropsSI '{}'", output.coolprop_key()), e))
    }
}

/// Converts mass fractions to the mole fractions `AbstractState` expects.
fn mole_fractions(backend: &str, names: &[&str], mass: &[f64]) -> FluidResult<Vec<f64>> {
    let moles = names
        .iter()
        .zip(mass)
        .map(|(name, w)| {
            let component = AbstractState::new(backend, name)
                .map_err(|e| backend_error(&format!("unknown fluid '{name}'"), e))?;
            let molar_mass = component
                .keyed_output(FluidTrivialParam::MolarMass)
                .map_err(|e| backend_error(&format!("molar mass of '{name}'"), e))?;
            Ok(w / molar_mass)
        })
        .collect::<FluidResult<Vec<f64>>>()?;
    let total: f64 = moles.iter().sum();
    Ok(moles.iter().map(|n| n / total).collect())
}

struct CoolPropBackend {
    state: AbstractState,
}

impl FluidBackend for CoolPropBackend {
    fn update(&mut self, first: Input, second: Input) -> FluidResult<()> {
        let (pair, a, b) = input_pair(first, second)?;
        self.state
            .update(pair, a, b)
            .map_err(|e| backend_error("failed to update state", e))
    }

    fn keyed_output(&self, key: FluidParam) -> FluidResult<f64> {
        use CoolPropParam as P;
        use FluidTrivialParam as Trivial;

        let state = &self.state;
        let result = match key {
            FluidParam::Compressibility => state.keyed_output(P::Z),
            FluidParam::Conductivity => state.keyed_output(P::Conductivity),
            FluidParam::CriticalPressure => state.keyed_output(Trivial::PCritical),
            FluidParam::CriticalTemperature => state.keyed_output(Trivial::TCritical),
            FluidParam::Density => state.keyed_output(P::DMass),
            FluidParam::DynamicViscosity => state.keyed_output(P::DynamicViscosity),
            FluidParam::Enthalpy => state.keyed_output(P::HMass),
            FluidParam::Entropy => state.keyed_output(P::SMass),
            FluidParam::FreezingTemperature => state.keyed_output(Trivial::TFreeze),
            FluidParam::InternalEnergy => state.keyed_output(P::UMass),
            FluidParam::MaxPressure => state.keyed_output(Trivial::PMax),
            FluidParam::MaxTemperature => state.keyed_output(Trivial::TMax),
            FluidParam::MinPressure => state.keyed_output(Trivial::PMin),
            FluidParam::MinTemperature => state.keyed_output(Trivial::TMin),
            FluidParam::MolarMass => state.keyed_output(Trivial::MolarMass),
            FluidParam::Phase => state.keyed_output(P::Phase),
            FluidParam::Prandtl => state.keyed_output(P::Prandtl),
            FluidParam::Pressure => state.keyed_output(P::P),
            FluidParam::Quality => state.keyed_output(P::Q),
            FluidParam::SoundSpeed => state.keyed_output(P::SoundSpeed),
            FluidParam::SpecificHeat => state.keyed_output(P::CpMass),
            FluidParam::SurfaceTension => state.keyed_output(P::SurfaceTension),
            FluidParam::Temperature => state.keyed_output(P::T),
            FluidParam::TriplePressure => state.keyed_output(Trivial::PTriple),
            FluidParam::TripleTemperature => state.keyed_output(Trivial::TTriple),
        };
        result.map_err(|e| {
            backend_error(&format!("'{}' is not available", key.coolprop_key()), e)
        })
    }

    fn specify_phase(&mut self, phase: Phase) -> FluidResult<()> {
        let imposed = match phase {
            Phase::Liquid => CoolPropPhase::Liquid,
            Phase::Supercritical => CoolPropPhase::Supercritical,
            Phase::SupercriticalGas => CoolPropPhase::SupercriticalGas,
            Phase::SupercriticalLiquid => CoolPropPhase::SupercriticalLiquid,
            Phase::CriticalPoint => CoolPropPhase::CriticalPoint,
            Phase::Gas => CoolPropPhase::Gas,
            Phase::TwoPhase => CoolPropPhase::TwoPhase,
            Phase::NotImposed => CoolPropPhase::NotImposed,
            Phase::Unknown => {
                return Err(FluidError::InvalidArg {
                    what: "Unknown phase cannot be specified!",
                });
            }
        };
        self.state
            .specify_phase(imposed)
            .map_err(|e| backend_error(&format!("failed to impose phase {phase}"), e))
    }
}

/// CoolProp input pair for two defining inputs, with values in pair order.
fn input_pair(first: Input, second: Input) -> FluidResult<(FluidInputPair, f64, f64)> {
    use FluidInputPair as Pair;
    use FluidParam::*;

    let (a, b) = if first.key() <= second.key() {
        (first, second)
    } else {
        (second, first)
    };
    let (x, y) = (a.value(), b.value());
    Ok(match (a.key(), b.key()) {
        (Density, Enthalpy) => (Pair::DMassHMass, x, y),
        (Density, Entropy) => (Pair::DMassSMass, x, y),
        (Density, InternalEnergy) => (Pair::DMassUMass, x, y),
        (Density, Pressure) => (Pair::DMassP, x, y),
        (Density, Quality) => (Pair::DMassQ, x, y),
        (Density, Temperature) => (Pair::DMassT, x, y),
        (Enthalpy, Entropy) => (Pair::HMassSMass, x, y),
        (Enthalpy, Pressure) => (Pair::HMassP, x, y),
        (Enthalpy, Quality) => (Pair::HMassQ, x, y),
        (Enthalpy, Temperature) => (Pair::HMassT, x, y),
        (Entropy, InternalEnergy) => (Pair::SMassUMass, x, y),
        (Entropy, Pressure) => (Pair::PSMass, y, x),
        (Entropy, Quality) => (Pair::QSMass, y, x),
        (Entropy, Temperature) => (Pair::SMassT, x, y),
        (InternalEnergy, Pressure) => (Pair::PUMass, y, x),
        (InternalEnergy, Temperature) => (Pair::TUMass, y, x),
        (Pressure, Quality) => (Pair::PQ, x, y),
        (Pressure, Temperature) => (Pair::PT, x, y),
        (Quality, Temperature) => (Pair::QT, x, y),
        _ => {
            return Err(FluidError::NotSupported {
                what: "this pair of inputs",
            });
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_are_order_insensitive() {
        let (pair, p, t) =
            input_pair(Input::new(FluidParam::Temperature, 293.15), Input::pressure(1e5)).unwrap();
        assert!(matches!(pair, FluidInputPair::PT));
        assert_eq!(p, 1e5);
        assert_eq!(t, 293.15);
    }

    #[test]
    fn swapped_pairs_keep_coolprop_order() {
        let (pair, p, s) = input_pair(Input::entropy(1000.0), Input::pressure(1e5)).unwrap();
        assert!(matches!(pair, FluidInputPair::PSMass));
        assert_eq!((p, s), (1e5, 1000.0));

        let (pair, t, u) =
            input_pair(Input::internal_energy(2e5), Input::new(FluidParam::Temperature, 300.0))
                .unwrap();
        assert!(matches!(pair, FluidInputPair::TUMass));
        assert_eq!((t, u), (300.0, 2e5));
    }

    #[test]
    fn trivial_keys_cannot_define_a_state() {
        let result = input_pair(
            Input::new(FluidParam::MolarMass, 0.018),
            Input::pressure(1e5),
        );
        assert!(matches!(result, Err(FluidError::NotSupported { .. })));
    }

    #[test]
    fn water_binds_and_reports_liquid() {
        let request = BackendRequest {
            backend: "HEOS",
            names: vec!["Water"],
            fractions: None,
        };
        let mut backend = CoolPropOracle.fluid_backend(&request).unwrap();
        backend
            .update(Input::pressure(101_325.0), Input::new(FluidParam::Temperature, 293.15))
            .unwrap();
        let rho = backend.keyed_output(FluidParam::Density).unwrap();
        assert!(rho > 990.0 && rho < 1005.0, "rho = {rho}");
    }

    #[test]
    fn unknown_fluid_fails_at_bind() {
        let request = BackendRequest {
            backend: "HEOS",
            names: vec!["Unobtainium"],
            fractions: None,
        };
        assert!(matches!(
            CoolPropOracle.fluid_backend(&request),
            Err(FluidError::Backend { .. })
        ));
    }
}
