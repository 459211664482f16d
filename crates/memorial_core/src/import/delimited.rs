//! Line and field splitting for pasted tables.

use serde::{Deserialize, Serialize};

/// Single-character field separator offered by the import form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    #[default]
    Comma,
    Semicolon,
    Tab,
    Space,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Self::Comma => ',',
            Self::Semicolon => ';',
            Self::Tab => '\t',
            Self::Space => ' ',
        }
    }

    pub fn from_char(value: char) -> Option<Self> {
        match value {
            ',' => Some(Self::Comma),
            ';' => Some(Self::Semicolon),
            '\t' => Some(Self::Tab),
            ' ' => Some(Self::Space),
            _ => None,
        }
    }
}

/// Splits `text` into rows of raw cells.
///
/// Lines end at LF or CRLF; whitespace-only lines are dropped. Cells are not
/// trimmed here.
pub fn parse_delimited(text: &str, delimiter: Delimiter) -> Vec<Vec<String>> {
    let separator = delimiter.as_char();
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.split(separator).map(str::to_string).collect())
        .collect()
}
