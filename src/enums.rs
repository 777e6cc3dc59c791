// src/enums.rs
//! Public enum types used throughout the crate
//!
//! Central location for the closed enumerations of the record schema and
//! the container format. Unknown values never deserialize; they surface as
//! a schema mismatch instead of being carried around as loose strings.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{ENCRYPTED_EXTENSION, PLAIN_EXTENSION};

/// Body model a mole was placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// Kind of skin condition a marker tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    #[default]
    Mole,
    Eczema,
    Acne,
    Psoriasis,
    Rash,
    Other,
}

/// Checked letters of the ABCDE melanoma heuristic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AbcdeFlag {
    /// Asymmetry
    A,
    /// Border irregularity
    B,
    /// Color variation
    C,
    /// Diameter
    D,
    /// Evolving
    E,
}

impl AbcdeFlag {
    pub fn letter(self) -> char {
        match self {
            AbcdeFlag::A => 'A',
            AbcdeFlag::B => 'B',
            AbcdeFlag::C => 'C',
            AbcdeFlag::D => 'D',
            AbcdeFlag::E => 'E',
        }
    }
}

/// Whether a container holds the dataset in the clear or inside an envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Plain,
    Encrypted,
}

impl ContainerKind {
    /// Conventional file extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            ContainerKind::Plain => PLAIN_EXTENSION,
            ContainerKind::Encrypted => ENCRYPTED_EXTENSION,
        }
    }

    /// Guess the kind from a file name. Content detection stays authoritative.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        if ext.eq_ignore_ascii_case(ENCRYPTED_EXTENSION) {
            Some(ContainerKind::Encrypted)
        } else if ext.eq_ignore_ascii_case(PLAIN_EXTENSION) {
            Some(ContainerKind::Plain)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_type_defaults_to_mole() {
        assert_eq!(ConditionType::default(), ConditionType::Mole);
    }

    #[test]
    fn container_kind_from_path() {
        assert_eq!(
            ContainerKind::from_path("backup.TAM"),
            Some(ContainerKind::Encrypted)
        );
        assert_eq!(
            ContainerKind::from_path("dir/backup.json"),
            Some(ContainerKind::Plain)
        );
        assert_eq!(ContainerKind::from_path("backup.zip"), None);
        assert_eq!(ContainerKind::from_path("backup"), None);
    }

    #[test]
    fn enums_use_wire_names() {
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
        assert_eq!(
            serde_json::to_string(&ConditionType::Psoriasis).unwrap(),
            "\"psoriasis\""
        );
        assert_eq!(serde_json::to_string(&AbcdeFlag::C).unwrap(), "\"C\"");
        assert!(serde_json::from_str::<Gender>("\"other\"").is_err());
    }
}
