//! Vertex step draft.

use super::{require, FormError, FormResult};
use crate::format::masks::format_coordinates;
use crate::format::numeric::parse_lenient_f64;
use crate::model::vertex::Vertex;
use crate::model::{new_entity_id, EntityId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexDraft {
    id: Option<EntityId>,
    from_label: String,
    to_label: String,
    longitude: String,
    latitude: String,
    distance: f64,
    confrontant_id: String,
}

impl VertexDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a draft pointing at `confrontant_id`, the form's preselection.
    pub fn for_confrontant(confrontant_id: &str) -> Self {
        Self {
            confrontant_id: confrontant_id.to_string(),
            ..Self::default()
        }
    }

    pub fn from_existing(vertex: &Vertex) -> Self {
        Self {
            id: Some(vertex.id.clone()),
            from_label: vertex.from_label.clone(),
            to_label: vertex.to_label.clone(),
            longitude: vertex.longitude.clone(),
            latitude: vertex.latitude.clone(),
            distance: vertex.distance,
            confrontant_id: vertex.confrontant_id.clone(),
        }
    }

    pub fn set_from_label(&mut self, value: &str) -> &mut Self {
        self.from_label = value.to_string();
        self
    }

    pub fn set_to_label(&mut self, value: &str) -> &mut Self {
        self.to_label = value.to_string();
        self
    }

    /// Drops characters that cannot be part of a coordinate.
    pub fn set_longitude(&mut self, value: &str) -> &mut Self {
        self.longitude = format_coordinates(value);
        self
    }

    pub fn set_latitude(&mut self, value: &str) -> &mut Self {
        self.latitude = format_coordinates(value);
        self
    }

    /// Typed text; malformed input reads as `0`.
    pub fn set_distance_text(&mut self, value: &str) -> &mut Self {
        self.distance = parse_lenient_f64(value);
        self
    }

    pub fn set_confrontant_id(&mut self, value: &str) -> &mut Self {
        self.confrontant_id = value.to_string();
        self
    }

    pub fn longitude(&self) -> &str {
        &self.longitude
    }

    pub fn latitude(&self) -> &str {
        &self.latitude
    }

    /// Requires both labels, both coordinates and a confrontant; the
    /// distance may be zero but not negative.
    pub fn submit(&self) -> FormResult<Vertex> {
        require("deVertice", &self.from_label)?;
        require("paraVertice", &self.to_label)?;
        require("longitude", &self.longitude)?;
        require("latitude", &self.latitude)?;
        require("confrontanteId", &self.confrontant_id)?;
        if self.distance < 0.0 {
            return Err(FormError::Negative("distancia"));
        }

        Ok(Vertex {
            id: self.id.clone().unwrap_or_else(new_entity_id),
            from_label: self.from_label.trim().to_string(),
            to_label: self.to_label.trim().to_string(),
            longitude: self.longitude.trim().to_string(),
            latitude: self.latitude.trim().to_string(),
            distance: self.distance,
            confrontant_id: self.confrontant_id.trim().to_string(),
        })
    }
}
