//! Technical responsible (survey signatory).

use super::{check_id, new_entity_id, EntityId, ModelValidationError};
use serde::{Deserialize, Serialize};

/// Credentialed professional who signs the memorial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalResponsible {
    pub id: EntityId,
    #[serde(rename = "nome")]
    pub name: String,
    /// Title printed under the signature line, e.g. `Técnico em Agrimensura`.
    #[serde(rename = "cargo")]
    pub role: String,
    /// Professional council registration number.
    #[serde(rename = "registroCFT")]
    pub registration: String,
}

impl TechnicalResponsible {
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        registration: impl Into<String>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            role: role.into(),
            registration: registration.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        check_id("technical responsible", &self.id)
    }
}
