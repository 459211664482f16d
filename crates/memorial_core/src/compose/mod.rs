//! Memorial document composition.
//!
//! # Responsibility
//! - Turn a complete `Memorial` into a structured document view.
//! - Render that view as a printable HTML page.
//! - Flatten the memorial into the plain-text export file.
//!
//! # Invariants
//! - Section order is fixed and ends with the closing remarks; vertices
//!   keep collection order.
//! - Numbers are echoed as entered; nothing is computed.
//! - A dangling confrontant reference renders as a placeholder, never fails.

pub mod document;
pub mod export;
pub mod print;

pub use document::{DocumentView, SectionBody, TechnicalSignature};
pub use export::{export_file_name, render_export_text};
pub use print::{render_print_html, PRINT_DELAY_MS};

/// Title shared by every output form.
pub const DOCUMENT_TITLE: &str = "MEMORIAL DESCRITIVO";

/// Fixed closing paragraph shared by every output form.
pub const CLOSING_REMARKS: &str = "Todas as coordenadas aqui descritas estão georreferenciadas e os azimutes, distâncias e áreas foram calculados com base nas informações levantadas em campo.";

/// Shortest round-trip form of a user-entered number (`20`, `10.5`).
pub(crate) fn echo_number(value: f64) -> String {
    format!("{value}")
}
