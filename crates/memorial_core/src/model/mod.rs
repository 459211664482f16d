//! Domain records of a boundary survey.
//!
//! # Responsibility
//! - Define the value records collected by the wizard (project, parties,
//!   vertices, technical responsible) and the derived `Memorial` view.
//! - Keep the serialized shape compatible with values already stored under
//!   the `memorial_*` keys.
//!
//! # Invariants
//! - Records carry data and id references only; no record owns another.
//! - Numeric fields are finite and never negative once validated.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod memorial;
pub mod party;
pub mod project;
pub mod responsible;
pub mod vertex;

/// Identifier shared by every record.
///
/// Kept as a string: imported vertex rows may reference confrontants by
/// literal ids such as `C1`.
pub type EntityId = String;

/// Generates a fresh UUID v4 identifier in hyphenated form.
pub fn new_entity_id() -> EntityId {
    Uuid::new_v4().to_string()
}

/// Model invariant violations detected by `validate()`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelValidationError {
    /// Numeric field is NaN or infinite.
    NonFinite { field: &'static str },
    /// Numeric field is below zero.
    Negative { field: &'static str, value: f64 },
    /// Identifier is blank.
    EmptyId { record: &'static str },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite { field } => write!(f, "{field} must be a finite number"),
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::EmptyId { record } => write!(f, "{record} id cannot be empty"),
        }
    }
}

impl Error for ModelValidationError {}

pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<(), ModelValidationError> {
    if !value.is_finite() {
        return Err(ModelValidationError::NonFinite { field });
    }
    if value < 0.0 {
        return Err(ModelValidationError::Negative { field, value });
    }
    Ok(())
}

pub(crate) fn check_id(record: &'static str, id: &str) -> Result<(), ModelValidationError> {
    if id.trim().is_empty() {
        return Err(ModelValidationError::EmptyId { record });
    }
    Ok(())
}
