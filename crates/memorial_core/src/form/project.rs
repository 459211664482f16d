//! Project step draft.

use super::{require, FormError, FormResult};
use crate::format::numeric::parse_lenient_f64;
use crate::model::project::Project;
use crate::model::{new_entity_id, EntityId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    id: Option<EntityId>,
    name: String,
    address: String,
    area: f64,
    perimeter: f64,
    measurement_epoch: String,
    instrument: String,
    geodetic_system: String,
    cartographic_projection: String,
}

impl ProjectDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_existing(project: &Project) -> Self {
        Self {
            id: Some(project.id.clone()),
            name: project.name.clone(),
            address: project.address.clone(),
            area: project.area,
            perimeter: project.perimeter,
            measurement_epoch: project.measurement_epoch.clone(),
            instrument: project.instrument.clone(),
            geodetic_system: project.geodetic_system.clone(),
            cartographic_projection: project.cartographic_projection.clone(),
        }
    }

    pub fn set_name(&mut self, value: &str) -> &mut Self {
        self.name = value.to_string();
        self
    }

    pub fn set_address(&mut self, value: &str) -> &mut Self {
        self.address = value.to_string();
        self
    }

    /// Typed text; malformed input reads as `0`.
    pub fn set_area_text(&mut self, value: &str) -> &mut Self {
        self.area = parse_lenient_f64(value);
        self
    }

    pub fn set_perimeter_text(&mut self, value: &str) -> &mut Self {
        self.perimeter = parse_lenient_f64(value);
        self
    }

    pub fn set_measurement_epoch(&mut self, value: &str) -> &mut Self {
        self.measurement_epoch = value.to_string();
        self
    }

    pub fn set_instrument(&mut self, value: &str) -> &mut Self {
        self.instrument = value.to_string();
        self
    }

    pub fn set_geodetic_system(&mut self, value: &str) -> &mut Self {
        self.geodetic_system = value.to_string();
        self
    }

    pub fn set_cartographic_projection(&mut self, value: &str) -> &mut Self {
        self.cartographic_projection = value.to_string();
        self
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn perimeter(&self) -> f64 {
        self.perimeter
    }

    /// Requires name, address, and strictly positive area and perimeter.
    pub fn submit(&self) -> FormResult<Project> {
        require("nome", &self.name)?;
        require("endereco", &self.address)?;
        if self.area.is_nan() || self.area <= 0.0 {
            return Err(FormError::NotPositive("area"));
        }
        if self.perimeter.is_nan() || self.perimeter <= 0.0 {
            return Err(FormError::NotPositive("perimetro"));
        }

        Ok(Project {
            id: self.id.clone().unwrap_or_else(new_entity_id),
            name: self.name.trim().to_string(),
            address: self.address.trim().to_string(),
            area: self.area,
            perimeter: self.perimeter,
            measurement_epoch: self.measurement_epoch.trim().to_string(),
            instrument: self.instrument.trim().to_string(),
            geodetic_system: self.geodetic_system.trim().to_string(),
            cartographic_projection: self.cartographic_projection.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ProjectDraft;
    use crate::form::FormError;

    fn filled() -> ProjectDraft {
        let mut draft = ProjectDraft::new();
        draft
            .set_name("Sitio Boa Vista")
            .set_address("Estrada Municipal, km 4")
            .set_area_text("1250.5")
            .set_perimeter_text("142");
        draft
    }

    #[test]
    fn submit_builds_project_from_typed_values() {
        let project = filled().submit().unwrap();
        assert_eq!(project.area, 1250.5);
        assert_eq!(project.perimeter, 142.0);
        assert!(!project.id.is_empty());
    }

    #[test]
    fn missing_address_blocks_submission() {
        let mut draft = filled();
        draft.set_address("  ");
        assert_eq!(draft.submit(), Err(FormError::MissingField("endereco")));
    }

    #[test]
    fn malformed_area_reads_as_zero_and_blocks_submission() {
        let mut draft = filled();
        draft.set_area_text("mil metros");
        assert_eq!(draft.area(), 0.0);
        assert_eq!(draft.submit(), Err(FormError::NotPositive("area")));
    }

    #[test]
    fn editing_keeps_existing_id() {
        let original = filled().submit().unwrap();
        let mut draft = ProjectDraft::from_existing(&original);
        draft.set_instrument("GNSS RTK");
        let edited = draft.submit().unwrap();
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.instrument, "GNSS RTK");
    }
}
