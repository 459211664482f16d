//! Bulk vertex import from delimited text.
//!
//! # Responsibility
//! - Split pasted or file-loaded text into rows of cells.
//! - Map user-selected columns onto vertex fields and coerce each row.
//! - Detect a property address in an extra column.
//!
//! # Invariants
//! - Parsing never fails: bad rows are skipped, bad numbers read as `0`.
//! - No quoting or escaping; a delimiter inside a value splits it.
//! - Confrontant references are taken verbatim and never validated.

use crate::service::memorial_store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod delimited;
pub mod session;

pub use delimited::{parse_delimited, Delimiter};
pub use session::{ColumnMapping, HeaderMode, ImportOptions, ImportSession};

#[derive(Debug)]
pub enum ImportError {
    /// No row produced an acceptable vertex.
    NothingToImport,
    /// Import file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Store rejected or failed to save the imported data.
    Store(StoreError),
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingToImport => write!(f, "no importable vertex rows"),
            Self::Io { path, source } => {
                write!(f, "failed to read import file `{}`: {source}", path.display())
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NothingToImport => None,
            Self::Io { source, .. } => Some(source),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<StoreError> for ImportError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}
