//! Mass-based mixtures of pure HEOS fluids.

use serde::Serialize;
use tp_core::{Tolerances, UnitConverter, in_open_unit_interval, nearly_equal};

use crate::backend::{BackendRequest, Fractions, PropertyContext};
use crate::error::{FluidError, FluidResult};
use crate::state::{FluidIdentity, FluidState};
use crate::substance::{MixKind, Substance};

const MIXTURE_BACKEND: &str = "HEOS";

/// Identity of a [`Mixture`]: components and their mass fractions (SI).
#[derive(Debug, Clone, PartialEq)]
pub struct MixtureSpec {
    components: Vec<Substance>,
    fractions: Vec<f64>,
}

impl MixtureSpec {
    /// `fractions` are mass fractions in public units.
    pub fn new(
        components: Vec<Substance>,
        fractions: Vec<f64>,
        units: UnitConverter,
    ) -> FluidResult<Self> {
        let invalid = |message: String| FluidError::InvalidComposition { message };
        if components.len() != fractions.len() {
            return Err(invalid(
                "Invalid input! Fluids and fractions should be of the same length.".into(),
            ));
        }
        if !components
            .iter()
            .all(|c| c.is_pure() && c.backend() == MIXTURE_BACKEND)
        {
            return Err(invalid(format!(
                "Invalid components! All of them should be a pure fluid with {MIXTURE_BACKEND} backend."
            )));
        }
        let si: Vec<f64> = fractions
            .iter()
            .map(|f| units.decimal_fraction_to_si(*f))
            .collect();
        if !si.iter().all(|f| in_open_unit_interval(*f)) {
            return Err(invalid(format!(
                "Invalid components mass fractions! All of them should be in (0;{}){}.",
                units.full_fraction(),
                units.fraction_unit(),
            )));
        }
        let whole = units.full_fraction();
        if !nearly_equal(fractions.iter().sum(), whole, Tolerances::FRACTION_SUM) {
            return Err(invalid(format!(
                "Invalid components mass fractions! Their sum should be equal to {whole}{}.",
                units.fraction_unit(),
            )));
        }
        Ok(Self {
            components,
            fractions: si,
        })
    }

    pub fn components(&self) -> &[Substance] {
        &self.components
    }

    /// Mass fractions (SI).
    pub fn fractions(&self) -> &[f64] {
        &self.fractions
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MixtureDescription {
    pub fluids: Vec<Substance>,
    pub fractions: Vec<f64>,
}

impl FluidIdentity for MixtureSpec {
    type Description = MixtureDescription;

    fn backend_request(&self) -> BackendRequest {
        BackendRequest {
            backend: MIXTURE_BACKEND,
            names: self.components.iter().map(|c| c.coolprop_name()).collect(),
            fractions: Some(Fractions {
                kind: MixKind::Mass,
                values: self.fractions.clone(),
            }),
        }
    }

    fn describe(&self, units: UnitConverter) -> MixtureDescription {
        MixtureDescription {
            fluids: self.components.clone(),
            fractions: self
                .fractions
                .iter()
                .map(|f| units.decimal_fraction_from_si(*f))
                .collect(),
        }
    }

    fn check_processes(&self) -> FluidResult<()> {
        Err(FluidError::NotSupported {
            what: "processes are not available for mixtures",
        })
    }
}

/// A mass-based mixture state.
pub type Mixture = FluidState<MixtureSpec>;

impl FluidState<MixtureSpec> {
    pub fn new(
        context: &PropertyContext,
        components: Vec<Substance>,
        fractions: Vec<f64>,
    ) -> FluidResult<Self> {
        let identity = MixtureSpec::new(components, fractions, context.units())?;
        Self::bind(identity, context.clone())
    }

    pub fn fluids(&self) -> &[Substance] {
        self.identity().components()
    }

    /// Mass fractions in public units.
    pub fn fractions(&self) -> Vec<f64> {
        self.identity()
            .fractions()
            .iter()
            .map(|f| self.units().decimal_fraction_from_si(*f))
            .collect()
    }
}
