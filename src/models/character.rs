//! Character record as served by the remote API.

use serde::{Deserialize, Serialize};

/// Life status of a character.
///
/// Values the API does not document decode as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterStatus {
    Alive,
    Dead,
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl CharacterStatus {
    /// All statuses in display order.
    pub const ALL: [CharacterStatus; 3] = [Self::Alive, Self::Dead, Self::Unknown];

    /// Parse a status from user input (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "alive" => Some(Self::Alive),
            "dead" => Some(Self::Dead),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Value sent in the `status` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Alive => "alive",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alive => write!(f, "Alive"),
            Self::Dead => write!(f, "Dead"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Gender of a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Female,
    Male,
    Genderless,
    #[serde(rename = "unknown", other)]
    Unknown,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Self::Female, Self::Male, Self::Genderless, Self::Unknown];

    /// Parse a gender from user input (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "female" => Some(Self::Female),
            "male" => Some(Self::Male),
            "genderless" => Some(Self::Genderless),
            "unknown" => Some(Self::Unknown),
            _ => None,
        }
    }

    /// Value sent in the `gender` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            Self::Female => "female",
            Self::Male => "male",
            Self::Genderless => "genderless",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Female => write!(f, "Female"),
            Self::Male => write!(f, "Male"),
            Self::Genderless => write!(f, "Genderless"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Reference to a location resource. Never dereferenced client-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    /// Empty when the API has no resource for this location.
    #[serde(default)]
    pub url: String,
}

/// One catalog record. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    /// Sub-type classifier (API field `type`), often empty.
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: Gender,
    pub origin: LocationRef,
    pub location: LocationRef,
    /// Avatar image URL.
    pub image: String,
    /// URLs of the episodes the character appears in.
    #[serde(default)]
    pub episode: Vec<String>,
    /// Canonical API URL of this character.
    pub url: String,
    /// Creation timestamp, kept as the API formats it.
    pub created: String,
}
