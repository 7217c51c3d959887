//! Deterministic oracle double for unit tests.
//!
//! Fluids follow a water-like ideal gas with a Clausius–Clapeyron saturation
//! line; humid air follows Magnus-formula psychrometrics. The models are
//! closed-form so tests can predict every output, and every backend query is
//! counted.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tp_core::UnitsSystem;

use crate::backend::{BackendRequest, FluidBackend, PropertyContext, PropertyOracle};
use crate::error::{FluidError, FluidResult};
use crate::humid_air_input::{HumidAirInput, HumidAirParam};
use crate::input::{FluidParam, Input};
use crate::phase::Phase;

pub(crate) const R: f64 = 461.5;
pub(crate) const CP: f64 = 2000.0;
pub(crate) const T0: f64 = 273.15;
pub(crate) const P0: f64 = 101_325.0;
pub(crate) const LATENT: f64 = 2.257e6;
pub(crate) const T_BOIL: f64 = 373.15;

pub(crate) fn saturation_temperature(p: f64) -> f64 {
    1.0 / (1.0 / T_BOIL - R / LATENT * (p / P0).ln())
}

pub(crate) fn saturation_pressure(t: f64) -> f64 {
    P0 * (LATENT / R * (1.0 / T_BOIL - 1.0 / t)).exp()
}

fn unsupported(what: String) -> FluidError {
    FluidError::Backend { message: what }
}

#[derive(Debug, Default)]
pub(crate) struct ToyOracle {
    queries: Arc<AtomicUsize>,
    poisoned: Option<FluidParam>,
    requests: Mutex<Vec<BackendRequest>>,
    imposed: Arc<Mutex<Vec<Phase>>>,
}

impl ToyOracle {
    /// Oracle answering NaN for `key`.
    pub(crate) fn poisoned(key: FluidParam) -> Self {
        Self {
            poisoned: Some(key),
            ..Self::default()
        }
    }

    pub(crate) fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<BackendRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Every phase imposed on any backend, `NotImposed` for a release.
    pub(crate) fn imposed_phases(&self) -> Vec<Phase> {
        self.imposed.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl PropertyOracle for ToyOracle {
    fn name(&self) -> &str {
        "toy"
    }

    fn fluid_backend(&self, request: &BackendRequest) -> FluidResult<Box<dyn FluidBackend>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        Ok(Box::new(ToyBackend {
            queries: Arc::clone(&self.queries),
            poisoned: self.poisoned,
            imposed: Arc::clone(&self.imposed),
            phase: Phase::NotImposed,
            point: None,
        }))
    }

    fn humid_air_output(
        &self,
        output: HumidAirParam,
        inputs: &[HumidAirInput; 3],
    ) -> FluidResult<f64> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        let moist = MoistAir::resolve(inputs)?;
        Ok(moist.output(output))
    }
}

/// Toy oracle plus a context reporting in `units_system`.
pub(crate) fn toy_context(units_system: UnitsSystem) -> (Arc<ToyOracle>, PropertyContext) {
    let oracle = Arc::new(ToyOracle::default());
    let context = PropertyContext::new(oracle.clone(), units_system);
    (oracle, context)
}

#[derive(Debug, Clone, Copy)]
struct Point {
    p: f64,
    t: f64,
    q: Option<f64>,
}

impl Point {
    fn resolve(first: Input, second: Input) -> FluidResult<Point> {
        use FluidParam::*;
        let (a, b) = if first.key() <= second.key() {
            (first, second)
        } else {
            (second, first)
        };
        let (u, v) = (a.value(), b.value());
        let point = match (a.key(), b.key()) {
            (Pressure, Temperature) => Point { p: u, t: v, q: None },
            (Enthalpy, Pressure) => Point {
                p: v,
                t: T0 + u / CP,
                q: None,
            },
            (Entropy, Pressure) => Point {
                p: v,
                t: T0 * ((u + R * (v / P0).ln()) / CP).exp(),
                q: None,
            },
            (Density, Pressure) => Point {
                p: v,
                t: v / (u * R),
                q: None,
            },
            (Density, Temperature) => Point {
                p: u * R * v,
                t: v,
                q: None,
            },
            (Entropy, Temperature) => Point {
                p: P0 * ((CP * (v / T0).ln() - u) / R).exp(),
                t: v,
                q: None,
            },
            (InternalEnergy, Pressure) => Point {
                p: v,
                t: (u + CP * T0) / (CP - R),
                q: None,
            },
            (Pressure, Quality) if (0.0..=1.0).contains(&v) => Point {
                p: u,
                t: saturation_temperature(u),
                q: Some(v),
            },
            (Quality, Temperature) if (0.0..=1.0).contains(&u) => Point {
                p: saturation_pressure(v),
                t: v,
                q: Some(u),
            },
            (x, y) => return Err(unsupported(format!("input pair {x:?}/{y:?} is not supported"))),
        };
        if point.p > 0.0 && point.t > 0.0 && point.p.is_finite() && point.t.is_finite() {
            Ok(point)
        } else {
            Err(unsupported("non-physical state".into()))
        }
    }

    fn enthalpy(&self) -> f64 {
        CP * (self.t - T0) + self.q.unwrap_or(0.0) * LATENT
    }

    fn entropy(&self) -> f64 {
        CP * (self.t / T0).ln() - R * (self.p / P0).ln() + self.q.unwrap_or(0.0) * LATENT / self.t
    }

    fn output(&self, key: FluidParam) -> FluidResult<f64> {
        use FluidParam::*;
        Ok(match key {
            Compressibility => 1.0,
            Conductivity => 0.6,
            Density => self.p / (R * self.t),
            DynamicViscosity => 1e-3,
            Enthalpy => self.enthalpy(),
            Entropy => self.entropy(),
            InternalEnergy => self.enthalpy() - R * self.t,
            FluidParam::Phase => match self.q {
                Some(_) => crate::phase::Phase::TwoPhase.index(),
                None if self.t < saturation_temperature(self.p) => {
                    crate::phase::Phase::Liquid.index()
                }
                None => crate::phase::Phase::Gas.index(),
            },
            Prandtl => CP * 1e-3 / 0.6,
            Pressure => self.p,
            Quality => self.q.unwrap_or(-1.0),
            SoundSpeed => (1.33 * R * self.t).sqrt(),
            SpecificHeat => CP,
            SurfaceTension => match self.q {
                Some(_) => 0.0589,
                None => return Err(unsupported("surface tension needs a two-phase state".into())),
            },
            Temperature => self.t,
            trivial => return trivial_output(trivial),
        })
    }
}

fn trivial_output(key: FluidParam) -> FluidResult<f64> {
    use FluidParam::*;
    Ok(match key {
        CriticalPressure => 22.064e6,
        CriticalTemperature => 647.096,
        MaxPressure => 1e9,
        MaxTemperature => 2000.0,
        MinPressure => 611.655,
        MinTemperature => 273.16,
        MolarMass => 0.018_015_268,
        TriplePressure => 611.655,
        TripleTemperature => 273.16,
        other => return Err(unsupported(format!("{other:?} is not available"))),
    })
}

struct ToyBackend {
    queries: Arc<AtomicUsize>,
    poisoned: Option<FluidParam>,
    imposed: Arc<Mutex<Vec<Phase>>>,
    phase: Phase,
    point: Option<Point>,
}

impl FluidBackend for ToyBackend {
    fn update(&mut self, first: Input, second: Input) -> FluidResult<()> {
        self.point = None;
        self.point = Some(Point::resolve(first, second)?);
        Ok(())
    }

    fn keyed_output(&self, key: FluidParam) -> FluidResult<f64> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.poisoned == Some(key) {
            return Ok(f64::NAN);
        }
        if key.is_trivial() {
            return trivial_output(key);
        }
        if key == FluidParam::Phase && self.phase != Phase::NotImposed && self.point.is_some() {
            return Ok(self.phase.index());
        }
        match &self.point {
            Some(point) => point.output(key),
            None => Err(unsupported("state is not bound".into())),
        }
    }

    fn specify_phase(&mut self, phase: Phase) -> FluidResult<()> {
        if phase == Phase::Unknown {
            return Err(unsupported("unknown phase cannot be imposed".into()));
        }
        if let Ok(mut imposed) = self.imposed.lock() {
            imposed.push(phase);
        }
        self.phase = phase;
        Ok(())
    }
}

const CP_DA: f64 = 1006.0;
const CP_V: f64 = 1860.0;
const H_FG: f64 = 2_501_000.0;
const EPS: f64 = 0.621_945;
const R_DA: f64 = 287.055;

/// Magnus saturation pressure over water, Pa.
pub(crate) fn magnus_pressure(t: f64) -> f64 {
    let tc = t - T0;
    610.94 * (17.625 * tc / (tc + 243.04)).exp()
}

fn magnus_temperature(pw: f64) -> f64 {
    let g = (pw / 610.94).ln();
    243.04 * g / (17.625 - g) + T0
}

fn humidity_from_partial_pressure(p: f64, pw: f64) -> f64 {
    EPS * pw / (p - pw)
}

fn moist_enthalpy(t: f64, w: f64) -> f64 {
    let tc = t - T0;
    CP_DA * tc + w * (H_FG + CP_V * tc)
}

#[derive(Debug, Clone, Copy)]
struct MoistAir {
    p: f64,
    t: f64,
    w: f64,
}

impl MoistAir {
    fn resolve(inputs: &[HumidAirInput; 3]) -> FluidResult<MoistAir> {
        use HumidAirParam::*;
        let p = inputs
            .iter()
            .find(|i| i.key() == Pressure)
            .map(|i| i.value())
            .ok_or_else(|| unsupported("pressure is required".into()))?;
        let mut rest: Vec<HumidAirInput> =
            inputs.iter().copied().filter(|i| i.key() != Pressure).collect();
        rest.sort_by_key(|i| i.key());
        let [a, b] = rest.as_slice() else {
            return Err(unsupported("expected two inputs besides pressure".into()));
        };
        let (u, v) = (a.value(), b.value());
        let (t, w) = match (a.key(), b.key()) {
            (Humidity, Temperature) => (v, u),
            (RelativeHumidity, Temperature) => {
                (v, humidity_from_partial_pressure(p, u * magnus_pressure(v)))
            }
            (DewTemperature, Temperature) => {
                (v, humidity_from_partial_pressure(p, magnus_pressure(u)))
            }
            (Enthalpy, Temperature) => {
                let tc = v - T0;
                (v, (u - CP_DA * tc) / (H_FG + CP_V * tc))
            }
            (Enthalpy, Humidity) => (T0 + (u - H_FG * v) / (CP_DA + CP_V * v), v),
            (Humidity, RelativeHumidity) => {
                let pw = p * u / (EPS + u);
                (magnus_temperature(pw / v), u)
            }
            (Enthalpy, RelativeHumidity) => {
                let humidity_at = |t: f64| {
                    let pw = v * magnus_pressure(t);
                    if pw < p {
                        humidity_from_partial_pressure(p, pw)
                    } else {
                        f64::INFINITY
                    }
                };
                let (mut lo, mut hi) = (T0 - 100.0, T0 + 150.0);
                for _ in 0..200 {
                    let mid = 0.5 * (lo + hi);
                    if moist_enthalpy(mid, humidity_at(mid)) > u {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }
                let t = 0.5 * (lo + hi);
                (t, humidity_at(t))
            }
            (x, y) => return Err(unsupported(format!("inputs {x:?}/{y:?} are not supported"))),
        };
        let pw = p * w / (EPS + w);
        if t > 0.0 && w >= 0.0 && t.is_finite() && w.is_finite() && pw < p {
            Ok(MoistAir { p, t, w })
        } else {
            Err(unsupported("non-physical humid air state".into()))
        }
    }

    fn partial_pressure(&self) -> f64 {
        self.p * self.w / (EPS + self.w)
    }

    fn output(&self, key: HumidAirParam) -> f64 {
        use HumidAirParam::*;
        let dew = magnus_temperature(self.partial_pressure());
        match key {
            Compressibility => 0.9996,
            Conductivity => 0.0258,
            DewTemperature => dew,
            DynamicViscosity => 1.81e-5,
            Enthalpy => moist_enthalpy(self.t, self.w),
            Entropy => {
                CP_DA * (self.t / T0).ln() - R_DA * (self.p / P0).ln()
                    + self.w * (CP_V * (self.t / T0).ln() + H_FG / T0)
            }
            Humidity => self.w,
            PartialPressure => self.partial_pressure(),
            Pressure => self.p,
            RelativeHumidity => self.partial_pressure() / magnus_pressure(self.t),
            SpecificHeat => CP_DA + CP_V * self.w,
            SpecificVolume => R_DA * self.t * (1.0 + 1.6078 * self.w) / self.p,
            Temperature => self.t,
            WetBulbTemperature => self.t - 0.35 * (self.t - dew),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toy_phase_matches_saturation_line() {
        let mut backend = ToyBackend {
            queries: Arc::default(),
            poisoned: None,
            imposed: Arc::default(),
            phase: Phase::NotImposed,
            point: None,
        };
        backend
            .update(Input::pressure(P0), Input::new(FluidParam::Temperature, 293.15))
            .unwrap();
        assert_eq!(
            Phase::from_index(backend.keyed_output(FluidParam::Phase).unwrap()),
            Phase::Liquid
        );
        assert!((saturation_temperature(P0) - T_BOIL).abs() < 1e-9);
        assert!((saturation_pressure(saturation_temperature(2e5)) - 2e5).abs() < 1e-6);
    }
}
