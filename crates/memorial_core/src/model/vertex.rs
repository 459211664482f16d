//! Boundary vertex record.
//!
//! # Invariants
//! - Collection order is report order; the first vertex starts the
//!   boundary narrative.
//! - `distance` is finite and `>= 0`.
//! - `confrontant_id` is a loose reference and may dangle.

use super::{check_id, check_non_negative, new_entity_id, EntityId, ModelValidationError};
use serde::{Deserialize, Serialize};

/// One boundary segment: from/to point labels, the coordinates of the
/// segment, its length and the confrontant bordering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: EntityId,
    #[serde(rename = "deVertice")]
    pub from_label: String,
    #[serde(rename = "paraVertice")]
    pub to_label: String,
    /// Sanitized geographic coordinate text, e.g. `48°12'33.1"W`.
    pub longitude: String,
    pub latitude: String,
    /// Meters.
    #[serde(rename = "distancia")]
    pub distance: f64,
    #[serde(rename = "confrontanteId")]
    pub confrontant_id: EntityId,
}

impl Vertex {
    pub fn new(
        from_label: impl Into<String>,
        to_label: impl Into<String>,
        longitude: impl Into<String>,
        latitude: impl Into<String>,
        distance: f64,
        confrontant_id: impl Into<String>,
    ) -> Self {
        Self {
            id: new_entity_id(),
            from_label: from_label.into(),
            to_label: to_label.into(),
            longitude: longitude.into(),
            latitude: latitude.into(),
            distance,
            confrontant_id: confrontant_id.into(),
        }
    }

    pub fn references(&self, confrontant_id: &str) -> bool {
        self.confrontant_id == confrontant_id
    }

    pub fn validate(&self) -> Result<(), ModelValidationError> {
        check_id("vertex", &self.id)?;
        check_non_negative("distancia", self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::Vertex;

    #[test]
    fn reads_integer_distance_written_by_earlier_sessions() {
        let stored = r#"{"id":"v-1","deVertice":"V1","paraVertice":"V2",
            "longitude":"45W","latitude":"23S","distancia":20,"confrontanteId":"C1"}"#;
        let vertex: Vertex = serde_json::from_str(stored).unwrap();
        assert_eq!(vertex.distance, 20.0);
        assert!(vertex.references("C1"));
        assert!(vertex.validate().is_ok());
    }

    #[test]
    fn negative_distance_fails_validation() {
        let vertex = Vertex::new("V1", "V2", "45W", "23S", -0.5, "C1");
        assert!(vertex.validate().is_err());
    }
}
