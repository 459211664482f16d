//! Beneficiaries and confrontants (adjoining owners).
//!
//! Both are people or companies identified by a CPF/CNPJ document and a
//! postal address; confrontants also carry the side of the property they
//! border.

use super::{check_id, new_entity_id, EntityId, ModelValidationError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Street address stored flat next to the owning record's fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "rua")]
    pub street: String,
    #[serde(rename = "numero")]
    pub number: String,
    #[serde(rename = "bairro")]
    pub district: String,
    #[serde(rename = "cidade")]
    pub city: String,
}

impl PostalAddress {
    /// Single-line form used in documents: `street, number - district, city`.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {} - {}, {}",
            self.street, self.number, self.district, self.city
        )
    }
}

/// Person or company benefiting from the survey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub id: EntityId,
    #[serde(rename = "nome")]
    pub name: String,
    /// CPF or CNPJ, already masked.
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(flatten)]
    pub address: PostalAddress,
}

impl Beneficiary {
    pub fn new(name: impl Into<String>, document: impl Into<String>) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            document: document.into(),
            address: PostalAddress::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        check_id("beneficiary", &self.id)
    }
}

/// Side of the surveyed property a confrontant borders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "Frente")]
    Front,
    #[serde(rename = "Fundos")]
    Back,
    #[serde(rename = "Direita")]
    Right,
    #[serde(rename = "Esquerda")]
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Front, Self::Back, Self::Right, Self::Left];

    /// Label printed in the document, identical to the stored value.
    pub fn label(self) -> &'static str {
        match self {
            Self::Front => "Frente",
            Self::Back => "Fundos",
            Self::Right => "Direita",
            Self::Left => "Esquerda",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.label().eq_ignore_ascii_case(value.trim()))
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Adjoining property owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confrontant {
    pub id: EntityId,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "documento")]
    pub document: String,
    #[serde(rename = "direcao")]
    pub direction: Direction,
    #[serde(flatten)]
    pub address: PostalAddress,
}

impl Confrontant {
    pub fn new(
        name: impl Into<String>,
        document: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            id: new_entity_id(),
            name: name.into(),
            document: document.into(),
            direction,
            address: PostalAddress::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        check_id("confrontant", &self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::{Confrontant, Direction, PostalAddress};

    #[test]
    fn confrontant_serializes_flat_portuguese_fields() {
        let mut confrontant = Confrontant::new("Maria Souza", "123.456.789-01", Direction::Back);
        confrontant.id = "c-1".to_string();
        confrontant.address = PostalAddress {
            street: "Rua A".to_string(),
            number: "12".to_string(),
            district: "Centro".to_string(),
            city: "Goiania".to_string(),
        };

        let json = serde_json::to_value(&confrontant).unwrap();
        assert_eq!(json["direcao"], "Fundos");
        assert_eq!(json["rua"], "Rua A");
        assert_eq!(json["cidade"], "Goiania");
        assert!(json.get("address").is_none());

        let back: Confrontant = serde_json::from_value(json).unwrap();
        assert_eq!(back, confrontant);
    }

    #[test]
    fn direction_labels_parse_case_insensitively() {
        assert_eq!(Direction::from_label(" esquerda "), Some(Direction::Left));
        assert_eq!(Direction::from_label("Norte"), None);
        assert_eq!(Direction::Front.to_string(), "Frente");
    }

    #[test]
    fn one_line_address_matches_document_layout() {
        let address = PostalAddress {
            street: "Av. Brasil".to_string(),
            number: "100".to_string(),
            district: "Jardim".to_string(),
            city: "Campinas".to_string(),
        };
        assert_eq!(address.one_line(), "Av. Brasil, 100 - Jardim, Campinas");
    }
}
