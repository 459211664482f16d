//! Plain-text export of the memorial.

use super::{echo_number, CLOSING_REMARKS, DOCUMENT_TITLE};
use crate::format::masks::collapse_whitespace;
use crate::model::memorial::Memorial;
use crate::model::project::Project;
use std::fmt::Write;

const FILE_NAME_PREFIX: &str = "memorial_descritivo_";
const FILE_NAME_EXTENSION: &str = ".txt";

/// Flattens `memorial` into the numbered text template.
pub fn render_export_text(memorial: &Memorial<'_>) -> String {
    let project = memorial.project;
    let mut text = String::with_capacity(2048);
    let _ = writeln!(text, "{DOCUMENT_TITLE}\n");

    text.push_str("1. BENEFICIÁRIOS\n");
    for beneficiary in memorial.beneficiaries {
        let _ = writeln!(text, "Nome: {}", beneficiary.name);
        let _ = writeln!(text, "Documento: {}", beneficiary.document);
        let _ = writeln!(text, "Endereço: {}\n", beneficiary.address.one_line());
    }

    text.push_str("2. IDENTIFICAÇÃO DO IMÓVEL\n");
    let _ = writeln!(text, "Projeto: {}", project.name);
    let _ = writeln!(text, "Endereço: {}", project.address);
    let _ = writeln!(text, "Área: {} m²", echo_number(project.area));
    let _ = writeln!(text, "Perímetro: {} m\n", echo_number(project.perimeter));

    let _ = writeln!(text, "3. ÉPOCA DA MEDIÇÃO\n{}\n", project.measurement_epoch);
    let _ = writeln!(text, "4. INSTRUMENTO UTILIZADO\n{}\n", project.instrument);
    let _ = writeln!(
        text,
        "5. SISTEMA GEODÉSICO DE REFERÊNCIA\n{}\n",
        project.geodetic_system
    );
    let _ = writeln!(
        text,
        "6. PROJEÇÃO CARTOGRÁFICA\n{}\n",
        project.cartographic_projection
    );

    text.push_str("7. DESCRIÇÃO DOS LIMITES\n");
    let boundary = memorial
        .vertices
        .iter()
        .map(|vertex| {
            let confrontant = memorial
                .confrontant_for(vertex)
                .map_or("", |confrontant| confrontant.name.as_str());
            format!(
                "De {} para {}\n  Longitude: {}\n  Latitude: {}\n  Distância: {} m\n  Confrontante: {}",
                vertex.from_label,
                vertex.to_label,
                vertex.longitude,
                vertex.latitude,
                echo_number(vertex.distance),
                confrontant
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let _ = writeln!(text, "{boundary}\n");

    text.push_str("8. CONFRONTANTES\n");
    let confrontants = memorial
        .confrontants
        .iter()
        .map(|confrontant| {
            format!(
                "{}: {} ({})\nEndereço: {}",
                confrontant.direction,
                confrontant.name,
                confrontant.document,
                confrontant.address.one_line()
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");
    let _ = writeln!(text, "{confrontants}\n");

    text.push_str("9. RESPONSÁVEL TÉCNICO\n");
    match memorial.technical_responsible {
        Some(responsible) => {
            let _ = writeln!(text, "Nome: {}", responsible.name);
            let _ = writeln!(text, "Cargo: {}", responsible.role);
            let _ = writeln!(text, "Registro CFT: {}", responsible.registration);
        }
        None => text.push_str("Não informado\n"),
    }

    let _ = writeln!(text, "\n10. CONSIDERAÇÕES FINAIS\n{CLOSING_REMARKS}");

    text
}

/// Download name for the export, e.g. `memorial_descritivo_Sitio_Boa_Vista.txt`.
pub fn export_file_name(project: &Project) -> String {
    format!(
        "{FILE_NAME_PREFIX}{}{FILE_NAME_EXTENSION}",
        collapse_whitespace(&project.name, "_")
    )
}
