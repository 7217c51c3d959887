//! Substance definitions: backend name, purity and fraction limits.

use std::fmt;

use serde::{Serialize, Serializer};

/// How fractions of a binary mixture are expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MixKind {
    /// Mass-based fractions.
    Mass,
    /// Volume-based fractions.
    Volume,
}

/// Substances available through the property backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Substance {
    Air,
    Ammonia,
    Argon,
    CarbonDioxide,
    CarbonMonoxide,
    Ethane,
    Ethanol,
    Helium,
    Hydrogen,
    Isobutane,
    Methane,
    NButane,
    Nitrogen,
    NitrousOxide,
    NPropane,
    Oxygen,
    R32,
    R125,
    R134a,
    R152a,
    R245fa,
    R1234yf,
    R404A,
    R407C,
    R410A,
    Water,
    Xenon,
    /// Antifreeze, ethylene glycol based (volume fraction).
    AEG,
    /// Antifreeze, propylene glycol based (volume fraction).
    APG,
    /// Dowtherm Q heat transfer oil.
    DowQ,
    /// Ammonia–water solution (mass fraction).
    MAM,
    /// Ethylene glycol–water solution (mass fraction).
    MEG,
    /// Propylene glycol–water solution (mass fraction).
    MPG,
    /// Propylene glycol–water solution, Melinder correlation (mass fraction).
    MPG2,
}

impl Substance {
    pub const ALL: [Substance; 34] = [
        Substance::Air,
        Substance::Ammonia,
        Substance::Argon,
        Substance::CarbonDioxide,
        Substance::CarbonMonoxide,
        Substance::Ethane,
        Substance::Ethanol,
        Substance::Helium,
        Substance::Hydrogen,
        Substance::Isobutane,
        Substance::Methane,
        Substance::NButane,
        Substance::Nitrogen,
        Substance::NitrousOxide,
        Substance::NPropane,
        Substance::Oxygen,
        Substance::R32,
        Substance::R125,
        Substance::R134a,
        Substance::R152a,
        Substance::R245fa,
        Substance::R1234yf,
        Substance::R404A,
        Substance::R407C,
        Substance::R410A,
        Substance::Water,
        Substance::Xenon,
        Substance::AEG,
        Substance::APG,
        Substance::DowQ,
        Substance::MAM,
        Substance::MEG,
        Substance::MPG,
        Substance::MPG2,
    ];

    /// Canonical key, also used in snapshots.
    pub fn key(&self) -> &'static str {
        match self {
            Substance::Air => "Air",
            Substance::Ammonia => "Ammonia",
            Substance::Argon => "Argon",
            Substance::CarbonDioxide => "CarbonDioxide",
            Substance::CarbonMonoxide => "CarbonMonoxide",
            Substance::Ethane => "Ethane",
            Substance::Ethanol => "Ethanol",
            Substance::Helium => "Helium",
            Substance::Hydrogen => "Hydrogen",
            Substance::Isobutane => "Isobutane",
            Substance::Methane => "Methane",
            Substance::NButane => "nButane",
            Substance::Nitrogen => "Nitrogen",
            Substance::NitrousOxide => "NitrousOxide",
            Substance::NPropane => "nPropane",
            Substance::Oxygen => "Oxygen",
            Substance::R32 => "R32",
            Substance::R125 => "R125",
            Substance::R134a => "R134a",
            Substance::R152a => "R152a",
            Substance::R245fa => "R245fa",
            Substance::R1234yf => "R1234yf",
            Substance::R404A => "R404A",
            Substance::R407C => "R407C",
            Substance::R410A => "R410A",
            Substance::Water => "Water",
            Substance::Xenon => "Xenon",
            Substance::AEG => "AEG",
            Substance::APG => "APG",
            Substance::DowQ => "DowQ",
            Substance::MAM => "MAM",
            Substance::MEG => "MEG",
            Substance::MPG => "MPG",
            Substance::MPG2 => "MPG2",
        }
    }

    /// Name handed to the property backend.
    pub fn coolprop_name(&self) -> &'static str {
        match self {
            Substance::NButane => "n-Butane",
            Substance::NPropane => "n-Propane",
            Substance::R152a => "R152A",
            Substance::R404A => "R404A.mix",
            Substance::R407C => "R407C.mix",
            Substance::R410A => "R410A.mix",
            other => other.key(),
        }
    }

    /// Backend family: `HEOS` for real fluids, `INCOMP` for liquids.
    pub fn backend(&self) -> &'static str {
        match self {
            Substance::AEG
            | Substance::APG
            | Substance::DowQ
            | Substance::MAM
            | Substance::MEG
            | Substance::MPG
            | Substance::MPG2 => "INCOMP",
            _ => "HEOS",
        }
    }

    /// Pure (or predefined pseudo-pure) substances take no fraction.
    pub fn is_pure(&self) -> bool {
        self.fraction_limits().is_none()
    }

    pub fn mix_kind(&self) -> MixKind {
        match self {
            Substance::AEG | Substance::APG => MixKind::Volume,
            _ => MixKind::Mass,
        }
    }

    /// Allowed fraction range `[min, max]` as decimal fractions, for binary
    /// mixtures only.
    pub fn fraction_limits(&self) -> Option<(f64, f64)> {
        match self {
            Substance::AEG | Substance::APG => Some((0.1, 0.6)),
            Substance::MAM => Some((0.0, 0.3)),
            Substance::MEG | Substance::MPG => Some((0.0, 0.6)),
            Substance::MPG2 => Some((0.15, 0.57)),
            _ => None,
        }
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl Serialize for Substance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl std::str::FromStr for Substance {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Substance::ALL
            .into_iter()
            .find(|substance| {
                substance.key().eq_ignore_ascii_case(wanted)
                    || substance.coolprop_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or("unknown substance")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coolprop_mapping() {
        assert_eq!(Substance::Water.coolprop_name(), "Water");
        assert_eq!(Substance::NPropane.coolprop_name(), "n-Propane");
        assert_eq!(Substance::R152a.coolprop_name(), "R152A");
        assert_eq!(Substance::R410A.coolprop_name(), "R410A.mix");
        assert_eq!(Substance::MPG.backend(), "INCOMP");
        assert_eq!(Substance::Water.backend(), "HEOS");
    }

    #[test]
    fn binary_mixtures_carry_limits() {
        assert!(Substance::Water.is_pure());
        assert!(Substance::DowQ.is_pure());
        assert!(Substance::R407C.is_pure());
        assert!(!Substance::MPG.is_pure());
        assert_eq!(Substance::MPG2.fraction_limits(), Some((0.15, 0.57)));
        assert_eq!(Substance::AEG.mix_kind(), MixKind::Volume);
        assert_eq!(Substance::MEG.mix_kind(), MixKind::Mass);
    }

    #[test]
    fn parse_accepts_keys_and_backend_names() {
        assert_eq!("water".parse::<Substance>(), Ok(Substance::Water));
        assert_eq!("n-Butane".parse::<Substance>(), Ok(Substance::NButane));
        assert_eq!(" R404A.mix ".parse::<Substance>(), Ok(Substance::R404A));
        assert!("Unobtainium".parse::<Substance>().is_err());
    }

    #[test]
    fn keys_round_trip() {
        for substance in Substance::ALL {
            assert_eq!(substance.key().parse::<Substance>(), Ok(substance));
        }
    }
}
