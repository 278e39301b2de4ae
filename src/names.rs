//! Display names for the opaque weapon and equipment codes used by the stats API.
//!
//! The published tables drifted between releases (code `p99` alone has carried three
//! different names), so every table is tied to a [`NameTableVersion`]. A table is built
//! once at startup and only read afterwards.

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde_json::{Map, Value as Json};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Codes whose names never changed between table versions
const BASE_NAMES: &[(&str, &str)] = &[
    ("p09", "AirStrike"),
    ("p11", "BGM"),
    ("p52", "TankLvl1"),
    ("p53", "APCLvl1"),
    ("p54", "HeliLvl1"),
    ("p55", "TankLvl2"),
    ("p56", "APCLvl2"),
    ("p57", "HeliLvl2"),
    ("p58", "TankLvl3"),
    ("p59", "APCLvl3"),
    ("p60", "HeliLvl3"),
    ("p61", "ARRifle"),
    ("p62", "AKRifle"),
    ("p63", "Pistol"),
    ("p64", "HuntingRifle"),
    ("p65", "RPG"),
    ("p66", "Shotgun"),
    ("p67", "SniperRifle"),
    ("p68", "SMG"),
    ("p69", "Homing"),
    ("p71", "Grenade"),
    ("p74", "HeliMinigun"),
    ("p75", "TankMinigun"),
    ("p76", "Knife"),
    ("p78", "Revolver"),
    ("p79", "Minigun"),
    ("p80", "GrenadeLauncher"),
    ("p81", "SmokeGrenade"),
    ("p82", "Jet1Rockets"),
    ("p83", "Jet1Homing"),
    ("p84", "Jet1MachineGun"),
    ("p85", "Jet2Rockets"),
    ("p86", "Jet2Homing"),
    ("p87", "Jet2MachineGun"),
    ("p88", "Fists"),
    ("p89", "VSS"),
    ("p90", "FiftyCalSniper"),
    ("p91", "MGTurret"),
    ("p92", "Crossbow"),
    ("p93", "SCAR"),
    ("p94", "TacticalShotgun"),
    ("p95", "VEK"),
    ("p96", "Desert"),
    ("p97", "Auto"),
    ("p98", "LMG"),
    ("p101", "RubberChicken"),
    ("p103", "Chainsaw"),
    ("p104", "AKSMG"),
    ("p105", "AutoSniper"),
    ("p108", "HealingPistol"),
    ("p110", "ImplosionGrenade"),
    ("p111", "LaserTripMine"),
    ("p112", "ConcussionGrenade"),
    ("p126", "G3A3"),
];

const V1_NAMES: &[(&str, &str)] = &[
    ("p99", "UNRELEASED_WEAPON_99"),
    ("p100", "UnreleasedMace"),
    ("p102", "UnreleasedButterfly"),
    ("p106", "UnreleasedAR"),
    ("p107", "UnreleasedSawedOff"),
    ("p109", "UnreleasedMP7"),
];

const V2_NAMES: &[(&str, &str)] = &[
    ("p99", "unreleased_B_melee"),
    ("p100", "Mace"),
    ("p102", "Butterfly"),
    ("p106", "G36"),
    ("p107", "SawedOff"),
    ("p109", "MP7"),
];

const V3_NAMES: &[(&str, &str)] = &[
    ("p99", "KBAR"),
    ("p100", "Mace"),
    ("p102", "Butterfly"),
    ("p106", "G36"),
    ("p107", "SawedOff"),
    ("p109", "MP7"),
];

static V1_TABLE: Lazy<NameTable> = Lazy::new(|| NameTable::build(NameTableVersion::V1));
static V2_TABLE: Lazy<NameTable> = Lazy::new(|| NameTable::build(NameTableVersion::V2));
static V3_TABLE: Lazy<NameTable> = Lazy::new(|| NameTable::build(NameTableVersion::V3));

/// Release of the built-in name table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameTableVersion {
    /// Pre-release names (`p99` = `UNRELEASED_WEAPON_99`)
    V1,
    /// `p99` = `unreleased_B_melee`
    V2,
    /// `p99` = `KBAR`
    #[default]
    V3,
}

impl NameTableVersion {
    pub const ALL: [NameTableVersion; 3] = [Self::V1, Self::V2, Self::V3];

    fn overrides(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::V1 => V1_NAMES,
            Self::V2 => V2_NAMES,
            Self::V3 => V3_NAMES,
        }
    }
}

impl fmt::Display for NameTableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
            Self::V3 => write!(f, "v3"),
        }
    }
}

impl FromStr for NameTableVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            "v3" | "3" => Ok(Self::V3),
            other => Err(format!("Unknown name table version: {} (expected v1, v2 or v3)", other)),
        }
    }
}

/// Immutable code → display name mapping
#[derive(Debug, Clone)]
pub struct NameTable {
    version: NameTableVersion,
    names: HashMap<String, String>,
}

impl NameTable {
    fn build(version: NameTableVersion) -> Self {
        let names = BASE_NAMES
            .iter()
            .chain(version.overrides())
            .map(|(code, name)| (code.to_string(), name.to_string()))
            .collect();
        Self { version, names }
    }

    /// Shared built-in table for a version
    pub fn builtin(version: NameTableVersion) -> &'static NameTable {
        match version {
            NameTableVersion::V1 => &V1_TABLE,
            NameTableVersion::V2 => &V2_TABLE,
            NameTableVersion::V3 => &V3_TABLE,
        }
    }

    /// Build a table from explicit pairs. Later pairs win on duplicate codes.
    pub fn from_pairs<I, C, N>(version: NameTableVersion, pairs: I) -> Self
    where
        I: IntoIterator<Item = (C, N)>,
        C: Into<String>,
        N: Into<String>,
    {
        let names = pairs
            .into_iter()
            .map(|(code, name)| (code.into(), name.into()))
            .collect();
        Self { version, names }
    }

    /// Built-in table for `version`, optionally layered with a JSON object file of
    /// `{"code": "name"}` overrides
    pub fn load(version: NameTableVersion, overrides: Option<&Path>) -> Result<Self> {
        let mut table = Self::builtin(version).clone();

        if let Some(path) = overrides {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read name table: {:?}", path))?;
            let map: Map<String, Json> = serde_json::from_str(&text)
                .with_context(|| format!("Name table {:?} is not a JSON object", path))?;

            for (code, name) in map {
                let name = name
                    .as_str()
                    .with_context(|| format!("Name for code {} must be a string", code))?;
                table.names.insert(code, name.to_string());
            }
        }

        Ok(table)
    }

    /// Display name for `code`, or `code` itself when the table has no entry
    pub fn resolve<'a>(&'a self, code: &'a str) -> &'a str {
        self.names.get(code).map(String::as_str).unwrap_or(code)
    }

    pub fn version(&self) -> NameTableVersion {
        self.version
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_known_codes_resolve() {
        let table = NameTable::builtin(NameTableVersion::V3);
        assert_eq!(table.resolve("p61"), "ARRifle");
        assert_eq!(table.resolve("p93"), "SCAR");
        assert_eq!(table.resolve("p99"), "KBAR");
    }

    #[test]
    fn test_unknown_codes_pass_through() {
        for version in NameTableVersion::ALL {
            let table = NameTable::builtin(version);
            for code in ["p200", "v30", "m00", "", "damage_dealt"] {
                assert_eq!(table.resolve(code), code);
            }
        }
    }

    #[test]
    fn test_p99_differs_between_versions() {
        assert_eq!(NameTable::builtin(NameTableVersion::V1).resolve("p99"), "UNRELEASED_WEAPON_99");
        assert_eq!(NameTable::builtin(NameTableVersion::V2).resolve("p99"), "unreleased_B_melee");
        assert_eq!(NameTable::builtin(NameTableVersion::V3).resolve("p99"), "KBAR");
    }

    #[test]
    fn test_every_version_covers_same_codes() {
        let sizes: Vec<usize> = NameTableVersion::ALL
            .iter()
            .map(|v| NameTable::builtin(*v).len())
            .collect();
        assert_eq!(sizes, vec![BASE_NAMES.len() + 6; 3]);
    }

    #[test]
    fn test_version_from_str() {
        assert_eq!("V2".parse::<NameTableVersion>(), Ok(NameTableVersion::V2));
        assert_eq!("3".parse::<NameTableVersion>(), Ok(NameTableVersion::V3));
        assert!("v9".parse::<NameTableVersion>().is_err());
    }

    #[test]
    fn test_load_with_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"p99": "Kukri", "p300": "Railgun"}}"#).unwrap();

        let table = NameTable::load(NameTableVersion::V3, Some(file.path())).unwrap();
        assert_eq!(table.resolve("p99"), "Kukri");
        assert_eq!(table.resolve("p300"), "Railgun");
        assert_eq!(table.resolve("p61"), "ARRifle");
        // the shared built-in table is untouched
        assert_eq!(NameTable::builtin(NameTableVersion::V3).resolve("p99"), "KBAR");
    }

    #[test]
    fn test_load_rejects_non_string_names() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"p99": 5}}"#).unwrap();
        assert!(NameTable::load(NameTableVersion::V1, Some(file.path())).is_err());
    }
}
