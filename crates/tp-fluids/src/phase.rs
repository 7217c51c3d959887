//! Phase states reported by the property backend.

use std::fmt;

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Liquid,
    Supercritical,
    SupercriticalGas,
    SupercriticalLiquid,
    CriticalPoint,
    Gas,
    TwoPhase,
    Unknown,
    NotImposed,
}

impl Phase {
    /// Maps a CoolProp phase index. Anything unrecognized is `Unknown`.
    pub fn from_index(index: f64) -> Phase {
        const PHASES: [Phase; 9] = [
            Phase::Liquid,
            Phase::Supercritical,
            Phase::SupercriticalGas,
            Phase::SupercriticalLiquid,
            Phase::CriticalPoint,
            Phase::Gas,
            Phase::TwoPhase,
            Phase::Unknown,
            Phase::NotImposed,
        ];
        if index.fract() != 0.0 || index < 0.0 {
            return Phase::Unknown;
        }
        PHASES
            .get(index as usize)
            .copied()
            .unwrap_or(Phase::Unknown)
    }

    /// CoolProp phase index.
    pub fn index(self) -> f64 {
        self as u8 as f64
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
