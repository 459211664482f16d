//! Import session: parsed rows, column mapping and vertex coercion.

use super::delimited::{parse_delimited, Delimiter};
use super::ImportError;
use crate::format::masks::format_coordinates;
use crate::format::numeric::{has_numeric_prefix, parse_lenient_non_negative};
use crate::model::project::Project;
use crate::model::vertex::Vertex;
use crate::model::EntityId;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Shortest address-column value accepted as a detected address is this
/// many characters plus one.
const MIN_ADDRESS_CHARS: usize = 5;

/// Zero-based column index for each vertex field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    pub from_vertex: usize,
    pub to_vertex: usize,
    pub longitude: usize,
    pub latitude: usize,
    pub distance: usize,
    pub confrontant: usize,
    /// Column holding the property address, if the table has one.
    pub address: Option<usize>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            from_vertex: 0,
            to_vertex: 1,
            longitude: 2,
            latitude: 3,
            distance: 4,
            confrontant: 5,
            address: Some(6),
        }
    }
}

impl ColumnMapping {
    /// Minimum cell count for a row to be considered at all.
    pub fn required_cells(&self) -> usize {
        [self.from_vertex, self.to_vertex, self.longitude, self.latitude]
            .into_iter()
            .max()
            .unwrap_or(0)
            .saturating_add(1)
    }
}

/// How the first parsed row is treated when more than one row exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMode {
    /// Skip row 0 only if its distance cell is missing or not numeric.
    #[default]
    Detect,
    Always,
    Never,
}

/// User-adjustable import settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOptions {
    pub delimiter: Delimiter,
    pub mapping: ColumnMapping,
    pub header: HeaderMode,
    /// Used when a row's confrontant cell is blank or missing.
    pub default_confrontant_id: EntityId,
}

impl ImportOptions {
    /// Default options preselecting the first known confrontant.
    pub fn with_default_confrontant<'a>(
        mut confrontant_ids: impl Iterator<Item = &'a str>,
    ) -> Self {
        Self {
            default_confrontant_id: confrontant_ids
                .next()
                .map(str::to_string)
                .unwrap_or_default(),
            ..Self::default()
        }
    }
}

/// Parsed import input plus the settings it was parsed with.
#[derive(Debug, Clone, Default)]
pub struct ImportSession {
    options: ImportOptions,
    source: String,
    rows: Vec<Vec<String>>,
    detected_address: Option<String>,
}

impl ImportSession {
    pub fn new(options: ImportOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> &ImportOptions {
        &self.options
    }

    /// Raw cells of every non-blank line, header included.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Address suggestion found during the last parse.
    pub fn detected_address(&self) -> Option<&str> {
        self.detected_address.as_deref()
    }

    /// Parses pasted text. `project` drives address detection.
    pub fn load_text(&mut self, text: &str, project: Option<&Project>) {
        self.source = text.to_string();
        self.reparse(project);
    }

    /// Reads a `.csv`/`.txt` file as UTF-8 and parses it like pasted text.
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        project: Option<&Project>,
    ) -> Result<(), ImportError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_text(text.trim_start_matches('\u{feff}'), project);
        Ok(())
    }

    /// Changes the delimiter and re-parses the current input.
    pub fn set_delimiter(&mut self, delimiter: Delimiter, project: Option<&Project>) {
        self.options.delimiter = delimiter;
        self.reparse(project);
    }

    /// Changes the column mapping; address detection follows the new column.
    pub fn set_mapping(&mut self, mapping: ColumnMapping, project: Option<&Project>) {
        self.options.mapping = mapping;
        self.reparse(project);
    }

    pub fn set_header_mode(&mut self, header: HeaderMode) {
        self.options.header = header;
    }

    pub fn set_default_confrontant(&mut self, confrontant_id: &str) {
        self.options.default_confrontant_id = confrontant_id.to_string();
    }

    /// Coerces every data row into a vertex, dropping unusable rows.
    ///
    /// Each vertex gets a fresh id, so building twice yields different ids.
    pub fn build_vertices(&self) -> Vec<Vertex> {
        let skip = usize::from(self.skips_header());
        let required = self.options.mapping.required_cells();

        let vertices = self
            .rows
            .iter()
            .skip(skip)
            .filter(|row| row.len() >= required)
            .filter_map(|row| self.coerce_row(row))
            .collect::<Vec<_>>();

        debug!(
            "event=import_build module=import status=ok rows={} header_skipped={} accepted={}",
            self.rows.len(),
            skip == 1,
            vertices.len()
        );
        vertices
    }

    /// Whether row 0 is treated as a header under the current settings.
    pub fn skips_header(&self) -> bool {
        if self.rows.len() <= 1 {
            return false;
        }
        match self.options.header {
            HeaderMode::Always => true,
            HeaderMode::Never => false,
            HeaderMode::Detect => self.rows[0]
                .get(self.options.mapping.distance)
                .map_or(true, |cell| !has_numeric_prefix(cell)),
        }
    }

    fn reparse(&mut self, project: Option<&Project>) {
        self.rows = parse_delimited(&self.source, self.options.delimiter);
        self.detected_address = match project {
            Some(project) if !project.has_address() => self.scan_address(),
            _ => None,
        };
    }

    fn scan_address(&self) -> Option<String> {
        let column = self.options.mapping.address?;
        self.rows
            .iter()
            .filter_map(|row| row.get(column))
            .map(|cell| cell.trim())
            .find(|cell| cell.chars().count() > MIN_ADDRESS_CHARS)
            .map(str::to_string)
    }

    fn coerce_row(&self, row: &[String]) -> Option<Vertex> {
        let mapping = &self.options.mapping;
        let cell = |index: usize| row.get(index).map_or("", |value| value.trim());

        let confrontant_id = match cell(mapping.confrontant) {
            "" => self.options.default_confrontant_id.clone(),
            value => value.to_string(),
        };
        let vertex = Vertex::new(
            cell(mapping.from_vertex),
            cell(mapping.to_vertex),
            format_coordinates(cell(mapping.longitude)),
            format_coordinates(cell(mapping.latitude)),
            parse_lenient_non_negative(cell(mapping.distance)),
            confrontant_id,
        );

        let complete = [
            &vertex.from_label,
            &vertex.to_label,
            &vertex.longitude,
            &vertex.latitude,
        ]
        .iter()
        .all(|value| !value.is_empty());
        complete.then_some(vertex)
    }
}

#[cfg(test)]
mod tests {
    use super::{ColumnMapping, HeaderMode, ImportOptions, ImportSession};
    use crate::import::Delimiter;
    use crate::model::project::Project;

    fn session_with(text: &str) -> ImportSession {
        let mut session = ImportSession::new(ImportOptions::default());
        session.load_text(text, None);
        session
    }

    #[test]
    fn required_cells_ignores_distance_and_confrontant_columns() {
        let mapping = ColumnMapping {
            distance: 9,
            confrontant: 10,
            ..ColumnMapping::default()
        };
        assert_eq!(mapping.required_cells(), 4);
    }

    #[test]
    fn out_of_range_column_index_rejects_every_row() {
        let mapping = ColumnMapping {
            latitude: usize::MAX,
            ..ColumnMapping::default()
        };
        assert_eq!(mapping.required_cells(), usize::MAX);

        let mut session = ImportSession::new(ImportOptions::default());
        session.set_mapping(mapping, None);
        session.load_text("V1,V2,45W,23S,10.5,C1", None);
        assert!(session.build_vertices().is_empty());
    }

    #[test]
    fn numeric_first_row_is_data_under_detect() {
        let session = session_with("V1,V2,45W,23S,10.5,C1\nV3,V4,46W,24S,20,C1");
        assert!(!session.skips_header());
        let vertices = session.build_vertices();
        assert_eq!(vertices.len(), 2);
        assert_eq!(vertices[0].distance, 10.5);
        assert_eq!(vertices[1].distance, 20.0);
        assert!(vertices.iter().all(|vertex| vertex.confrontant_id == "C1"));
    }

    #[test]
    fn textual_first_row_is_skipped_as_header() {
        let session = session_with(
            "De,Para,Longitude,Latitude,Distancia,Confrontante\nV1,V2,45W,23S,10.5,C1",
        );
        assert!(session.skips_header());
        assert_eq!(session.build_vertices().len(), 1);
    }

    #[test]
    fn always_mode_skips_first_row_like_the_wizard() {
        let mut session = session_with("V1,V2,45W,23S,10.5,C1\nV3,V4,46W,24S,20,C1");
        session.set_header_mode(HeaderMode::Always);
        let vertices = session.build_vertices();
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].from_label, "V3");
    }

    #[test]
    fn single_row_is_never_a_header() {
        let mut session = session_with("V1,V2,45W,23S,abc,C1");
        session.set_header_mode(HeaderMode::Always);
        let vertices = session.build_vertices();
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].distance, 0.0);
    }

    #[test]
    fn short_rows_and_incomplete_rows_are_dropped() {
        let session = session_with(
            "V1,V2,45W,23S,10,C1\nV2,V3,46W\nV3,,47W,25S,5,C1\nV4,V5,xyz,26S,5,C1",
        );
        let vertices = session.build_vertices();
        assert_eq!(vertices.len(), 1);
        assert_eq!(vertices[0].from_label, "V1");
    }

    #[test]
    fn blank_confrontant_falls_back_to_default() {
        let mut session = session_with("V1,V2,45W,23S,10, \nV2,V3,46W,24S,11");
        session.set_default_confrontant("c-default");
        let vertices = session.build_vertices();
        assert_eq!(vertices.len(), 2);
        assert!(vertices
            .iter()
            .all(|vertex| vertex.confrontant_id == "c-default"));
    }

    #[test]
    fn cells_are_trimmed_and_coordinates_sanitized() {
        let session = session_with(" V1 , V2 , 48°12'33\"W? , -16.5 lat ,12.5m,C9");
        let vertex = &session.build_vertices()[0];
        assert_eq!(vertex.from_label, "V1");
        assert_eq!(vertex.to_label, "V2");
        assert_eq!(vertex.longitude, "48°12'33\"W");
        assert_eq!(vertex.latitude, "-16.5 ");
        assert_eq!(vertex.distance, 12.5);
        assert_eq!(vertex.confrontant_id, "C9");
    }

    #[test]
    fn address_detected_only_for_project_without_address() {
        let text = "V1;V2;45W;23S;10;C1; Rua das Flores, 100 ";
        let blank = Project::new("Lote 1");

        let mut session = ImportSession::new(ImportOptions::default());
        session.set_delimiter(Delimiter::Semicolon, None);
        session.load_text(text, Some(&blank));
        assert_eq!(session.detected_address(), Some("Rua das Flores, 100"));

        let addressed = blank.with_address("Rua Existente, 1");
        session.load_text(text, Some(&addressed));
        assert_eq!(session.detected_address(), None);

        session.load_text(text, None);
        assert_eq!(session.detected_address(), None);
    }

    #[test]
    fn address_needs_more_than_five_characters() {
        let mut session = ImportSession::new(ImportOptions::default());
        let project = Project::new("Lote 1");
        session.load_text(
            "V1,V2,45W,23S,10,C1,Rua 1\nV2,V3,46W,24S,10,C1,Rua Nova 22",
            Some(&project),
        );
        assert_eq!(session.detected_address(), Some("Rua Nova 22"));
    }

    #[test]
    fn changing_delimiter_reparses_input() {
        let mut session = ImportSession::new(ImportOptions::default());
        session.load_text("V1;V2;45W;23S;10;C1", None);
        assert!(session.build_vertices().is_empty());

        session.set_delimiter(Delimiter::Semicolon, None);
        assert_eq!(session.build_vertices().len(), 1);
    }

    #[test]
    fn default_confrontant_comes_from_first_id() {
        let options = ImportOptions::with_default_confrontant(["c-1", "c-2"].into_iter());
        assert_eq!(options.default_confrontant_id, "c-1");
        assert_eq!(
            ImportOptions::with_default_confrontant(std::iter::empty()).default_confrontant_id,
            ""
        );
    }
}
