//! Predefined dictionary registry.
//!
//! The classic ArUco dictionary lineup: 4x4 through 7x7 bit markers in sets
//! of 50, 100, 250 and 1000, plus the original 1024-marker 5x5 set. Each
//! dictionary is built once on first access from a fixed per-name seed, so
//! the tables are identical in every process; afterwards the registry is
//! read-only and safe to share across threads.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::dictionary::Dictionary;
use crate::error::DictionaryError;
use crate::generator::generate_custom_dictionary_with_rng;

/// Names of the built-in dictionaries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum PredefinedDictionary {
    #[serde(rename = "DICT_4X4_50")]
    Dict4x4_50,
    #[serde(rename = "DICT_4X4_100")]
    Dict4x4_100,
    #[serde(rename = "DICT_4X4_250")]
    Dict4x4_250,
    #[serde(rename = "DICT_4X4_1000")]
    Dict4x4_1000,
    #[serde(rename = "DICT_5X5_50")]
    Dict5x5_50,
    #[serde(rename = "DICT_5X5_100")]
    Dict5x5_100,
    #[serde(rename = "DICT_5X5_250")]
    Dict5x5_250,
    #[serde(rename = "DICT_5X5_1000")]
    Dict5x5_1000,
    #[serde(rename = "DICT_6X6_50")]
    Dict6x6_50,
    #[serde(rename = "DICT_6X6_100")]
    Dict6x6_100,
    #[serde(rename = "DICT_6X6_250")]
    Dict6x6_250,
    #[serde(rename = "DICT_6X6_1000")]
    Dict6x6_1000,
    #[serde(rename = "DICT_7X7_50")]
    Dict7x7_50,
    #[serde(rename = "DICT_7X7_100")]
    Dict7x7_100,
    #[serde(rename = "DICT_7X7_250")]
    Dict7x7_250,
    #[serde(rename = "DICT_7X7_1000")]
    Dict7x7_1000,
    #[serde(rename = "DICT_ARUCO_ORIGINAL")]
    DictArucoOriginal,
}

impl PredefinedDictionary {
    /// All names, in registry order.
    pub const ALL: [Self; 17] = [
        Self::Dict4x4_50,
        Self::Dict4x4_100,
        Self::Dict4x4_250,
        Self::Dict4x4_1000,
        Self::Dict5x5_50,
        Self::Dict5x5_100,
        Self::Dict5x5_250,
        Self::Dict5x5_1000,
        Self::Dict6x6_50,
        Self::Dict6x6_100,
        Self::Dict6x6_250,
        Self::Dict6x6_1000,
        Self::Dict7x7_50,
        Self::Dict7x7_100,
        Self::Dict7x7_250,
        Self::Dict7x7_1000,
        Self::DictArucoOriginal,
    ];

    /// Marker side length in bits.
    pub fn marker_size(self) -> usize {
        match self {
            Self::Dict4x4_50 | Self::Dict4x4_100 | Self::Dict4x4_250 | Self::Dict4x4_1000 => 4,
            Self::Dict5x5_50
            | Self::Dict5x5_100
            | Self::Dict5x5_250
            | Self::Dict5x5_1000
            | Self::DictArucoOriginal => 5,
            Self::Dict6x6_50 | Self::Dict6x6_100 | Self::Dict6x6_250 | Self::Dict6x6_1000 => 6,
            Self::Dict7x7_50 | Self::Dict7x7_100 | Self::Dict7x7_250 | Self::Dict7x7_1000 => 7,
        }
    }

    /// Number of markers in the dictionary.
    pub fn n_markers(self) -> usize {
        match self {
            Self::Dict4x4_50 | Self::Dict5x5_50 | Self::Dict6x6_50 | Self::Dict7x7_50 => 50,
            Self::Dict4x4_100 | Self::Dict5x5_100 | Self::Dict6x6_100 | Self::Dict7x7_100 => 100,
            Self::Dict4x4_250 | Self::Dict5x5_250 | Self::Dict6x6_250 | Self::Dict7x7_250 => 250,
            Self::Dict4x4_1000 | Self::Dict5x5_1000 | Self::Dict6x6_1000 | Self::Dict7x7_1000 => {
                1000
            }
            Self::DictArucoOriginal => 1024,
        }
    }

    /// Canonical string name, e.g. `DICT_4X4_50`.
    pub fn name(self) -> &'static str {
        match self {
            Self::Dict4x4_50 => "DICT_4X4_50",
            Self::Dict4x4_100 => "DICT_4X4_100",
            Self::Dict4x4_250 => "DICT_4X4_250",
            Self::Dict4x4_1000 => "DICT_4X4_1000",
            Self::Dict5x5_50 => "DICT_5X5_50",
            Self::Dict5x5_100 => "DICT_5X5_100",
            Self::Dict5x5_250 => "DICT_5X5_250",
            Self::Dict5x5_1000 => "DICT_5X5_1000",
            Self::Dict6x6_50 => "DICT_6X6_50",
            Self::Dict6x6_100 => "DICT_6X6_100",
            Self::Dict6x6_250 => "DICT_6X6_250",
            Self::Dict6x6_1000 => "DICT_6X6_1000",
            Self::Dict7x7_50 => "DICT_7X7_50",
            Self::Dict7x7_100 => "DICT_7X7_100",
            Self::Dict7x7_250 => "DICT_7X7_250",
            Self::Dict7x7_1000 => "DICT_7X7_1000",
            Self::DictArucoOriginal => "DICT_ARUCO_ORIGINAL",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Fixed generation seed, one per name, so every process builds
    /// byte-identical tables.
    fn seed(self) -> u64 {
        0x6172_7563_6f00_0000 | self.index() as u64
    }
}

impl fmt::Display for PredefinedDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PredefinedDictionary {
    type Err = DictionaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.name() == s)
            .ok_or_else(|| DictionaryError::UnknownName {
                name: s.to_string(),
            })
    }
}

/// Shared reference to a built-in dictionary.
///
/// The first call for a given name builds it (the 1000-marker sets take
/// noticeably longer than the small ones); later calls and concurrent
/// readers get the same immutable instance.
pub fn get_predefined_dictionary(name: PredefinedDictionary) -> &'static Dictionary {
    const SLOT: OnceLock<Dictionary> = OnceLock::new();
    static SLOTS: [OnceLock<Dictionary>; 17] = [SLOT; 17];

    SLOTS[name.index()].get_or_init(|| {
        debug!("building predefined dictionary {name}");
        let mut rng = ChaCha8Rng::seed_from_u64(name.seed());
        generate_custom_dictionary_with_rng(name.n_markers(), name.marker_size(), None, &mut rng)
            .expect("predefined dictionary parameters are valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_str() {
        for name in PredefinedDictionary::ALL {
            assert_eq!(name.name().parse::<PredefinedDictionary>().unwrap(), name);
        }
        assert!(matches!(
            "DICT_3X3_50".parse::<PredefinedDictionary>(),
            Err(DictionaryError::UnknownName { .. })
        ));
    }

    #[test]
    fn serde_uses_canonical_names() {
        let json = serde_json::to_string(&PredefinedDictionary::Dict5x5_250).unwrap();
        assert_eq!(json, "\"DICT_5X5_250\"");
        let back: PredefinedDictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PredefinedDictionary::Dict5x5_250);
    }

    #[test]
    fn registry_returns_shared_instances() {
        let a = get_predefined_dictionary(PredefinedDictionary::Dict4x4_50);
        let b = get_predefined_dictionary(PredefinedDictionary::Dict4x4_50);
        assert!(std::ptr::eq(a, b));
        assert_eq!(a.len(), 50);
        assert_eq!(a.marker_size(), 4);
    }

    #[test]
    fn registry_parameters_match_names() {
        for name in [
            PredefinedDictionary::Dict5x5_50,
            PredefinedDictionary::Dict6x6_50,
        ] {
            let dict = get_predefined_dictionary(name);
            assert_eq!(dict.len(), name.n_markers());
            assert_eq!(dict.marker_size(), name.marker_size());
        }
    }
}
