//! Listing classification enums.
//!
//! Categories and privacy levels are stored in the database and sent over
//! the wire as uppercase strings (`HOUSE`, `ENTIRE`, ...). The French labels
//! are what renters see in the catalogue.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Property category
// ---------------------------------------------------------------------------

/// Top-level category of a listed property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PropertyCategory {
    House,
    Office,
    Event,
}

impl PropertyCategory {
    pub const ALL: [PropertyCategory; 3] = [Self::House, Self::Office, Self::Event];

    /// Parse a category string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "HOUSE" => Ok(Self::House),
            "OFFICE" => Ok(Self::Office),
            "EVENT" => Ok(Self::Event),
            _ => Err(CoreError::Validation(format!(
                "Invalid property category '{s}'. Must be one of: HOUSE, OFFICE, EVENT"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::House => "HOUSE",
            Self::Office => "OFFICE",
            Self::Event => "EVENT",
        }
    }

    /// Catalogue label shown to renters.
    pub fn label(self) -> &'static str {
        match self {
            Self::House => "Maison",
            Self::Office => "Bureau",
            Self::Event => "Espace événementiel",
        }
    }
}

// ---------------------------------------------------------------------------
// Privacy level
// ---------------------------------------------------------------------------

/// How much of the property the renter gets to themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PrivacyLevel {
    Entire,
    Private,
    Shared,
}

impl PrivacyLevel {
    pub const ALL: [PrivacyLevel; 3] = [Self::Entire, Self::Private, Self::Shared];

    /// Parse a privacy string from the database.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "ENTIRE" => Ok(Self::Entire),
            "PRIVATE" => Ok(Self::Private),
            "SHARED" => Ok(Self::Shared),
            _ => Err(CoreError::Validation(format!(
                "Invalid privacy level '{s}'. Must be one of: ENTIRE, PRIVATE, SHARED"
            ))),
        }
    }

    /// Convert to a database-compatible string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Entire => "ENTIRE",
            Self::Private => "PRIVATE",
            Self::Shared => "SHARED",
        }
    }

    /// Catalogue label shown to renters.
    pub fn label(self) -> &'static str {
        match self {
            Self::Entire => "Logement entier",
            Self::Private => "Chambre privée",
            Self::Shared => "Espace partagé",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
