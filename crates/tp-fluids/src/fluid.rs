//! Pure fluids, pseudo-pure predefined blends and binary incompressible
//! mixtures.

use serde::Serialize;
use tp_core::UnitConverter;

use crate::backend::{BackendRequest, Fractions, PropertyContext};
use crate::error::{FluidError, FluidResult};
use crate::state::{FluidIdentity, FluidState};
use crate::substance::Substance;

/// Identity of a [`Fluid`]: substance plus its fraction (SI).
#[derive(Debug, Clone, PartialEq)]
pub struct FluidSpec {
    substance: Substance,
    fraction: f64,
}

impl FluidSpec {
    /// `fraction` is in public units; pure substances are always whole.
    pub fn new(
        substance: Substance,
        fraction: Option<f64>,
        units: UnitConverter,
    ) -> FluidResult<Self> {
        let (min, max) = substance.fraction_limits().unwrap_or((0.0, 1.0));
        let si = match fraction {
            Some(fraction) => {
                let si = units.decimal_fraction_to_si(fraction);
                if !(min..=max).contains(&si) {
                    let unit = units.fraction_unit();
                    return Err(FluidError::InvalidComposition {
                        message: format!(
                            "Invalid fraction value! It should be in [{}; {}]{unit}. \
                             Entered value = {fraction}{unit}.",
                            units.decimal_fraction_from_si(min),
                            units.decimal_fraction_from_si(max),
                        ),
                    });
                }
                Some(si)
            }
            None => None,
        };
        let fraction = match si {
            _ if substance.is_pure() => 1.0,
            Some(si) => si,
            None => {
                return Err(FluidError::InvalidComposition {
                    message: "Need to define fraction!".into(),
                });
            }
        };
        Ok(Self {
            substance,
            fraction,
        })
    }

    pub fn substance(&self) -> Substance {
        self.substance
    }

    /// Decimal fraction (SI).
    pub fn fraction(&self) -> f64 {
        self.fraction
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluidDescription {
    pub name: Substance,
    pub fraction: f64,
}

impl FluidIdentity for FluidSpec {
    type Description = FluidDescription;

    fn backend_request(&self) -> BackendRequest {
        BackendRequest {
            backend: self.substance.backend(),
            names: vec![self.substance.coolprop_name()],
            fractions: (!self.substance.is_pure()).then(|| Fractions {
                kind: self.substance.mix_kind(),
                values: vec![self.fraction],
            }),
        }
    }

    fn describe(&self, units: UnitConverter) -> FluidDescription {
        FluidDescription {
            name: self.substance,
            fraction: units.decimal_fraction_from_si(self.fraction),
        }
    }
}

/// A single substance state.
pub type Fluid = FluidState<FluidSpec>;

impl FluidState<FluidSpec> {
    /// Undefined state of a pure substance.
    pub fn new(context: &PropertyContext, substance: Substance) -> FluidResult<Self> {
        Self::create(context, substance, None)
    }

    /// Undefined state of a binary mixture; `fraction` in public units.
    pub fn with_fraction(
        context: &PropertyContext,
        substance: Substance,
        fraction: f64,
    ) -> FluidResult<Self> {
        Self::create(context, substance, Some(fraction))
    }

    fn create(
        context: &PropertyContext,
        substance: Substance,
        fraction: Option<f64>,
    ) -> FluidResult<Self> {
        let identity = FluidSpec::new(substance, fraction, context.units())?;
        Self::bind(identity, context.clone())
    }

    pub fn name(&self) -> Substance {
        self.identity().substance()
    }

    /// Fraction in public units.
    pub fn fraction(&self) -> f64 {
        self.units()
            .decimal_fraction_from_si(self.identity().fraction())
    }
}
