//! Technical responsible step draft.

use super::{require, FormResult};
use crate::model::responsible::TechnicalResponsible;
use crate::model::{new_entity_id, EntityId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnicalResponsibleDraft {
    id: Option<EntityId>,
    name: String,
    role: String,
    registration: String,
}

impl TechnicalResponsibleDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_existing(responsible: &TechnicalResponsible) -> Self {
        Self {
            id: Some(responsible.id.clone()),
            name: responsible.name.clone(),
            role: responsible.role.clone(),
            registration: responsible.registration.clone(),
        }
    }

    pub fn set_name(&mut self, value: &str) -> &mut Self {
        self.name = value.to_string();
        self
    }

    pub fn set_role(&mut self, value: &str) -> &mut Self {
        self.role = value.to_string();
        self
    }

    pub fn set_registration(&mut self, value: &str) -> &mut Self {
        self.registration = value.to_string();
        self
    }

    pub fn submit(&self) -> FormResult<TechnicalResponsible> {
        require("nome", &self.name)?;
        require("cargo", &self.role)?;
        require("registroCFT", &self.registration)?;
        Ok(TechnicalResponsible {
            id: self.id.clone().unwrap_or_else(new_entity_id),
            name: self.name.trim().to_string(),
            role: self.role.trim().to_string(),
            registration: self.registration.trim().to_string(),
        })
    }
}
