//! Beneficiary and confrontant step drafts.
//!
//! The document field is masked as it is typed, so the stored value is
//! always in `000.000.000-00` or `00.000.000/0000-00` form.

use super::{require, FormError, FormResult};
use crate::format::masks::format_document;
use crate::model::party::{Beneficiary, Confrontant, Direction, PostalAddress};
use crate::model::{new_entity_id, EntityId};

/// Fields shared by both party forms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct PartyFields {
    id: Option<EntityId>,
    name: String,
    document: String,
    address: PostalAddress,
}

impl PartyFields {
    fn check(&self) -> FormResult<()> {
        require("nome", &self.name)?;
        require("documento", &self.document)
    }

    fn trimmed_address(&self) -> PostalAddress {
        PostalAddress {
            street: self.address.street.trim().to_string(),
            number: self.address.number.trim().to_string(),
            district: self.address.district.trim().to_string(),
            city: self.address.city.trim().to_string(),
        }
    }
}

macro_rules! party_setters {
    () => {
        pub fn set_name(&mut self, value: &str) -> &mut Self {
            self.fields.name = value.to_string();
            self
        }

        /// Keeps digits only and applies the CPF/CNPJ mask.
        pub fn set_document(&mut self, value: &str) -> &mut Self {
            self.fields.document = format_document(value);
            self
        }

        pub fn set_street(&mut self, value: &str) -> &mut Self {
            self.fields.address.street = value.to_string();
            self
        }

        pub fn set_number(&mut self, value: &str) -> &mut Self {
            self.fields.address.number = value.to_string();
            self
        }

        pub fn set_district(&mut self, value: &str) -> &mut Self {
            self.fields.address.district = value.to_string();
            self
        }

        pub fn set_city(&mut self, value: &str) -> &mut Self {
            self.fields.address.city = value.to_string();
            self
        }

        /// Masked document as currently displayed.
        pub fn document(&self) -> &str {
            &self.fields.document
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BeneficiaryDraft {
    fields: PartyFields,
}

impl BeneficiaryDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_existing(beneficiary: &Beneficiary) -> Self {
        Self {
            fields: PartyFields {
                id: Some(beneficiary.id.clone()),
                name: beneficiary.name.clone(),
                document: beneficiary.document.clone(),
                address: beneficiary.address.clone(),
            },
        }
    }

    party_setters!();

    /// Requires name and document.
    pub fn submit(&self) -> FormResult<Beneficiary> {
        self.fields.check()?;
        Ok(Beneficiary {
            id: self.fields.id.clone().unwrap_or_else(new_entity_id),
            name: self.fields.name.trim().to_string(),
            document: self.fields.document.clone(),
            address: self.fields.trimmed_address(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfrontantDraft {
    fields: PartyFields,
    direction: Option<Direction>,
}

impl ConfrontantDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_existing(confrontant: &Confrontant) -> Self {
        Self {
            fields: PartyFields {
                id: Some(confrontant.id.clone()),
                name: confrontant.name.clone(),
                document: confrontant.document.clone(),
                address: confrontant.address.clone(),
            },
            direction: Some(confrontant.direction),
        }
    }

    party_setters!();

    pub fn set_direction(&mut self, direction: Direction) -> &mut Self {
        self.direction = Some(direction);
        self
    }

    /// Requires name, document and a direction.
    pub fn submit(&self) -> FormResult<Confrontant> {
        self.fields.check()?;
        let direction = self.direction.ok_or(FormError::MissingField("direcao"))?;
        Ok(Confrontant {
            id: self.fields.id.clone().unwrap_or_else(new_entity_id),
            name: self.fields.name.trim().to_string(),
            document: self.fields.document.clone(),
            direction,
            address: self.fields.trimmed_address(),
        })
    }
}
