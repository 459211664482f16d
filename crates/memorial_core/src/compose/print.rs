//! Printable HTML rendering of a [`DocumentView`].
//!
//! The page is self-contained: fixed stylesheet, escaped content and a
//! load script that opens the print dialog after [`PRINT_DELAY_MS`].

use super::document::{
    BoundaryRow, DocumentSection, DocumentView, SectionBody, SignatureLine, TechnicalSignature,
};
use std::fmt::Write;

/// Delay before the print dialog opens, leaving time for styles to load.
pub const PRINT_DELAY_MS: u64 = 250;

const PRINT_STYLESHEET: &str = "\
body { font-family: Arial, sans-serif; margin: 0; padding: 20px; }
h1 { text-align: center; font-size: 20px; margin-bottom: 30px; }
h2 { font-size: 16px; margin-top: 30px; margin-bottom: 10px; }
table { width: 100%; border-collapse: collapse; margin: 10px 0; }
table, th, td { border: 1px solid #ddd; }
th, td { padding: 8px; text-align: left; }
th { background-color: #f0f0f0; }
.header { text-align: center; margin-bottom: 30px; }
.signatures { display: flex; gap: 40px; }
.signature-column { flex: 1; }
.signature { margin-top: 40px; text-align: center; }
@media print {
  button { display: none; }
}";

/// Renders the complete print page.
pub fn render_print_html(view: &DocumentView) -> String {
    let mut html = String::with_capacity(4096);
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{}</title>", escape_html(&view.title));
    let _ = writeln!(html, "<style>\n{PRINT_STYLESHEET}\n</style>");
    html.push_str("</head>\n<body>\n");

    let _ = writeln!(
        html,
        "<div class=\"header\"><h1>{}</h1><p>{}</p></div>",
        escape_html(&view.title),
        escape_html(&view.issued_on)
    );
    for section in &view.sections {
        push_section(&mut html, section);
    }
    push_signatures(&mut html, view);

    let _ = writeln!(
        html,
        "<script>window.addEventListener('load', function () {{ \
         setTimeout(function () {{ window.print(); window.close(); }}, {PRINT_DELAY_MS}); }});</script>"
    );
    html.push_str("</body>\n</html>\n");
    html
}

fn push_section(html: &mut String, section: &DocumentSection) {
    let _ = writeln!(
        html,
        "<h2>{}. {}</h2>",
        section.number,
        escape_html(&section.heading.to_uppercase())
    );
    match &section.body {
        SectionBody::Parties { rows } => {
            push_table(
                html,
                &["Nome", "CPF/CNPJ", "Endereço"],
                rows.iter()
                    .map(|row| vec![row.name.as_str(), row.document.as_str(), row.address.as_str()]),
            );
        }
        SectionBody::Fields { rows } => {
            for row in rows {
                let _ = writeln!(
                    html,
                    "<p><strong>{}:</strong> {}</p>",
                    escape_html(&row.label),
                    escape_html(&row.value)
                );
            }
        }
        SectionBody::Text { text } => {
            let _ = writeln!(html, "<p>{}</p>", escape_html(text));
        }
        SectionBody::Boundary { intro, rows } => {
            let _ = writeln!(html, "<p>{}</p>", escape_html(intro));
            push_table(
                html,
                &["De", "Para", "Longitude", "Latitude", "Distância", "Confrontante"],
                rows.iter().map(boundary_cells),
            );
        }
    }
}

fn boundary_cells(row: &BoundaryRow) -> Vec<&str> {
    vec![
        row.from.as_str(),
        row.to.as_str(),
        row.longitude.as_str(),
        row.latitude.as_str(),
        row.distance.as_str(),
        row.confrontant.as_str(),
    ]
}

fn push_table<'a>(html: &mut String, headers: &[&str], rows: impl Iterator<Item = Vec<&'a str>>) {
    html.push_str("<table>\n<thead><tr>");
    for header in headers {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr></thead>\n<tbody>\n");
    for cells in rows {
        html.push_str("<tr>");
        for cell in cells {
            let _ = write!(html, "<td>{}</td>", escape_html(cell));
        }
        html.push_str("</tr>\n");
    }
    html.push_str("</tbody>\n</table>\n");
}

fn push_signatures(html: &mut String, view: &DocumentView) {
    let _ = writeln!(
        html,
        "<h2>{}. ASSINATURAS</h2>",
        view.signature_section_number()
    );
    html.push_str("<div class=\"signatures\">\n");
    push_signature_column(html, &view.signatures.beneficiaries);
    push_signature_column(html, &view.signatures.confrontants);
    html.push_str("</div>\n");
    match &view.signatures.technical {
        TechnicalSignature::Signed {
            name,
            role,
            registration,
        } => {
            let _ = writeln!(
                html,
                "<div class=\"signature\"><p>______________________________</p>\
                 <p>{}</p><p>{}</p><p>{}</p></div>",
                escape_html(name),
                escape_html(role),
                escape_html(registration)
            );
        }
        TechnicalSignature::Pending { message } => {
            let _ = writeln!(
                html,
                "<div class=\"signature\"><p><em>{}</em></p></div>",
                escape_html(message)
            );
        }
    }
}

/// Beneficiaries fill the left column, confrontants the right one.
fn push_signature_column(html: &mut String, lines: &[SignatureLine]) {
    html.push_str("<div class=\"signature-column\">\n");
    for line in lines {
        push_signature_line(html, line);
    }
    html.push_str("</div>\n");
}

fn push_signature_line(html: &mut String, line: &SignatureLine) {
    let _ = writeln!(
        html,
        "<div class=\"signature\"><p>______________________________</p><p>{}</p><p>{}</p></div>",
        escape_html(&line.name),
        escape_html(&line.caption)
    );
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
