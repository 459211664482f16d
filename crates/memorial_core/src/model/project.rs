//! Survey project record.
//!
//! # Invariants
//! - A session holds at most one project; it is replaced wholesale.
//! - `area` and `perimeter` are finite and `>= 0`.

use super::{check_id, check_non_negative, new_entity_id, EntityId, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Surveyed property and measurement metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: EntityId,
    #[serde(rename = "nome")]
    pub name: String,
    /// Property address. May be blank until filled in or detected on import.
    #[serde(rename = "endereco")]
    pub address: String,
    /// Square meters, echoed verbatim in the document.
    pub area: f64,
    /// Meters, echoed verbatim in the document.
    #[serde(rename = "perimetro")]
    pub perimeter: f64,
    #[serde(rename = "epocaMedicao")]
    pub measurement_epoch: String,
    #[serde(rename = "instrumentoUtilizado")]
    pub instrument: String,
    #[serde(rename = "sistemaGeodesico", default)]
    pub geodetic_system: String,
    #[serde(rename = "projecaoCartografica", default)]
    pub cartographic_projection: String,
}

impl Project {
    /// Creates a project with a generated id and blank metadata.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            address: String::new(),
            area: 0.0,
            perimeter: 0.0,
            measurement_epoch: String::new(),
            instrument: String::new(),
            geodetic_system: String::new(),
            cartographic_projection: String::new(),
        }
    }

    /// Returns a copy with `address` replaced. Used when a detected address
    /// is applied, since projects are never patched in place.
    pub fn with_address(&self, address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..self.clone()
        }
    }

    pub fn has_address(&self) -> bool {
        !self.address.trim().is_empty()
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        check_id("project", &self.id)?;
        check_non_negative("area", self.area)?;
        check_non_negative("perimetro", self.perimeter)
    }
}
