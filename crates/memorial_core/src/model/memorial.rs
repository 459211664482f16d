//! Derived memorial aggregate.
//!
//! # Invariants
//! - A `Memorial` exists only when the project is set and beneficiaries,
//!   confrontants and vertices are all non-empty.
//! - The technical responsible never gates construction.
//! - The aggregate borrows store state; it is never persisted.

use super::party::{Beneficiary, Confrontant};
use super::project::Project;
use super::responsible::TechnicalResponsible;
use super::vertex::Vertex;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Required part of the memorial that may be missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MemorialPart {
    Project,
    Beneficiaries,
    Confrontants,
    Vertices,
}

impl MemorialPart {
    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Beneficiaries => "beneficiaries",
            Self::Confrontants => "confrontants",
            Self::Vertices => "vertices",
        }
    }
}

/// Returned when the memorial cannot be composed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteMemorial {
    /// Every missing part, in section order.
    pub missing: Vec<MemorialPart>,
}

impl Display for IncompleteMemorial {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let labels = self
            .missing
            .iter()
            .map(|part| part.label())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "memorial data incomplete; missing: {labels}")
    }
}

impl Error for IncompleteMemorial {}

/// Read-only view over everything the document needs.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Memorial<'a> {
    #[serde(rename = "projeto")]
    pub project: &'a Project,
    #[serde(rename = "beneficiarios")]
    pub beneficiaries: &'a [Beneficiary],
    #[serde(rename = "confrontantes")]
    pub confrontants: &'a [Confrontant],
    pub vertices: &'a [Vertex],
    #[serde(rename = "responsavelTecnico")]
    pub technical_responsible: Option<&'a TechnicalResponsible>,
}

impl<'a> Memorial<'a> {
    /// Assembles the aggregate, reporting every missing required part.
    pub fn assemble(
        project: Option<&'a Project>,
        beneficiaries: &'a [Beneficiary],
        confrontants: &'a [Confrontant],
        vertices: &'a [Vertex],
        technical_responsible: Option<&'a TechnicalResponsible>,
    ) -> Result<Self, IncompleteMemorial> {
        let mut missing = Vec::new();
        if project.is_none() {
            missing.push(MemorialPart::Project);
        }
        if beneficiaries.is_empty() {
            missing.push(MemorialPart::Beneficiaries);
        }
        if confrontants.is_empty() {
            missing.push(MemorialPart::Confrontants);
        }
        if vertices.is_empty() {
            missing.push(MemorialPart::Vertices);
        }

        match project {
            Some(project) if missing.is_empty() => Ok(Self {
                project,
                beneficiaries,
                confrontants,
                vertices,
                technical_responsible,
            }),
            _ => Err(IncompleteMemorial { missing }),
        }
    }

    /// Resolves the confrontant bordering `vertex`; `None` when dangling.
    pub fn confrontant_for(&self, vertex: &Vertex) -> Option<&'a Confrontant> {
        self.confrontants
            .iter()
            .find(|confrontant| confrontant.id == vertex.confrontant_id)
    }

    /// Point label the boundary description starts from.
    pub fn starting_point(&self) -> Option<&'a str> {
        self.vertices.first().map(|vertex| vertex.from_label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::{Memorial, MemorialPart};
    use crate::model::party::{Beneficiary, Confrontant, Direction};
    use crate::model::project::Project;
    use crate::model::vertex::Vertex;

    #[test]
    fn assemble_lists_every_missing_part() {
        let err = Memorial::assemble(None, &[], &[], &[], None).unwrap_err();
        assert_eq!(
            err.missing,
            vec![
                MemorialPart::Project,
                MemorialPart::Beneficiaries,
                MemorialPart::Confrontants,
                MemorialPart::Vertices,
            ]
        );
        assert!(err.to_string().contains("beneficiaries"));
    }

    #[test]
    fn dangling_vertex_reference_resolves_to_none() {
        let project = Project::new("Lote 1");
        let beneficiaries = vec![Beneficiary::new("Ana", "123.456.789-01")];
        let confrontants = vec![Confrontant::new("Joao", "987.654.321-00", Direction::Front)];
        let vertices = vec![
            Vertex::new("V1", "V2", "45W", "23S", 10.0, confrontants[0].id.clone()),
            Vertex::new("V2", "V3", "46W", "24S", 12.0, "ghost"),
        ];

        let memorial =
            Memorial::assemble(Some(&project), &beneficiaries, &confrontants, &vertices, None)
                .unwrap();
        assert_eq!(memorial.starting_point(), Some("V1"));
        assert_eq!(
            memorial.confrontant_for(&vertices[0]).map(|c| c.name.as_str()),
            Some("Joao")
        );
        assert!(memorial.confrontant_for(&vertices[1]).is_none());
    }
}
