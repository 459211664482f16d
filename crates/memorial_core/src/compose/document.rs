//! Structured view of the memorial document.
//!
//! The view holds display-ready strings so renderers only lay them out.

use super::{echo_number, CLOSING_REMARKS, DOCUMENT_TITLE};
use crate::model::memorial::Memorial;
use chrono::NaiveDate;
use serde::Serialize;

/// Placeholder shown for blank values and unresolved confrontants.
pub const MISSING_VALUE: &str = "—";

const ISSUED_ON_FORMAT: &str = "%d/%m/%Y";
const RESPONSIBLE_PENDING: &str =
    "Cadastre o responsável técnico para incluir a assinatura no memorial.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentView {
    pub title: String,
    /// Issue date as printed, `dd/mm/yyyy`.
    pub issued_on: String,
    pub sections: Vec<DocumentSection>,
    pub signatures: SignatureBlock,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSection {
    /// 1-based number printed before the heading.
    pub number: usize,
    pub heading: String,
    pub body: SectionBody,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionBody {
    Parties { rows: Vec<PartyRow> },
    Fields { rows: Vec<FieldRow> },
    Text { text: String },
    Boundary { intro: String, rows: Vec<BoundaryRow> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartyRow {
    pub name: String,
    pub document: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldRow {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoundaryRow {
    pub from: String,
    pub to: String,
    pub longitude: String,
    pub latitude: String,
    /// Distance with unit, e.g. `10.5 m`.
    pub distance: String,
    /// Confrontant name, or [`MISSING_VALUE`] when the reference dangles.
    pub confrontant: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureLine {
    pub name: String,
    pub caption: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignatureBlock {
    pub beneficiaries: Vec<SignatureLine>,
    pub confrontants: Vec<SignatureLine>,
    pub technical: TechnicalSignature,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TechnicalSignature {
    Signed {
        name: String,
        role: String,
        registration: String,
    },
    /// No technical responsible yet; the UI shows a call to action.
    Pending { message: String },
}

impl DocumentView {
    pub fn from_memorial(memorial: &Memorial<'_>, issued_on: NaiveDate) -> Self {
        let project = memorial.project;
        let headings_and_bodies = [
            (
                "Beneficiários",
                SectionBody::Parties {
                    rows: memorial
                        .beneficiaries
                        .iter()
                        .map(|beneficiary| PartyRow {
                            name: beneficiary.name.clone(),
                            document: beneficiary.document.clone(),
                            address: beneficiary.address.one_line(),
                        })
                        .collect(),
                },
            ),
            (
                "Identificação do Imóvel",
                SectionBody::Fields {
                    rows: vec![
                        field("Nome do Projeto", &project.name),
                        field("Endereço", &project.address),
                        field("Área Total", &format!("{} m²", echo_number(project.area))),
                        field("Perímetro", &format!("{} m", echo_number(project.perimeter))),
                    ],
                },
            ),
            ("Época da Medição", text(&project.measurement_epoch)),
            ("Instrumento Utilizado", text(&project.instrument)),
            ("Sistema Geodésico de Referência", text(&project.geodetic_system)),
            ("Projeção Cartográfica", text(&project.cartographic_projection)),
            (
                "Descrição dos Limites",
                SectionBody::Boundary {
                    intro: format!(
                        "O imóvel tem início pelo vértice {} e segue com os seguintes pontos:",
                        memorial.starting_point().unwrap_or(MISSING_VALUE)
                    ),
                    rows: memorial
                        .vertices
                        .iter()
                        .map(|vertex| BoundaryRow {
                            from: vertex.from_label.clone(),
                            to: vertex.to_label.clone(),
                            longitude: vertex.longitude.clone(),
                            latitude: vertex.latitude.clone(),
                            distance: format!("{} m", echo_number(vertex.distance)),
                            confrontant: memorial
                                .confrontant_for(vertex)
                                .map_or_else(|| MISSING_VALUE.to_string(), |c| c.name.clone()),
                        })
                        .collect(),
                },
            ),
            (
                "Considerações Finais",
                SectionBody::Text {
                    text: CLOSING_REMARKS.to_string(),
                },
            ),
        ];

        let sections = headings_and_bodies
            .into_iter()
            .enumerate()
            .map(|(index, (heading, body))| DocumentSection {
                number: index + 1,
                heading: heading.to_string(),
                body,
            })
            .collect();

        Self {
            title: DOCUMENT_TITLE.to_string(),
            issued_on: issued_on.format(ISSUED_ON_FORMAT).to_string(),
            sections,
            signatures: signature_block(memorial),
        }
    }

    /// Number the signature block is printed under, after every section.
    pub fn signature_section_number(&self) -> usize {
        self.sections.len() + 1
    }
}

fn signature_block(memorial: &Memorial<'_>) -> SignatureBlock {
    let technical = match memorial.technical_responsible {
        Some(responsible) => TechnicalSignature::Signed {
            name: responsible.name.clone(),
            role: responsible.role.clone(),
            registration: responsible.registration.clone(),
        },
        None => TechnicalSignature::Pending {
            message: RESPONSIBLE_PENDING.to_string(),
        },
    };

    SignatureBlock {
        beneficiaries: memorial
            .beneficiaries
            .iter()
            .map(|beneficiary| SignatureLine {
                name: beneficiary.name.clone(),
                caption: format!("Beneficiário - {}", beneficiary.document),
            })
            .collect(),
        confrontants: memorial
            .confrontants
            .iter()
            .map(|confrontant| SignatureLine {
                name: confrontant.name.clone(),
                caption: format!("Confrontante ({})", confrontant.direction),
            })
            .collect(),
        technical,
    }
}

fn field(label: &str, value: &str) -> FieldRow {
    FieldRow {
        label: label.to_string(),
        value: or_placeholder(value),
    }
}

fn text(value: &str) -> SectionBody {
    SectionBody::Text {
        text: or_placeholder(value),
    }
}

fn or_placeholder(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        MISSING_VALUE.to_string()
    } else {
        trimmed.to_string()
    }
}
