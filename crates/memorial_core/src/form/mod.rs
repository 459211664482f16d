//! Typed form drafts for the wizard steps.
//!
//! # Responsibility
//! - Hold in-progress form input behind named per-field setters.
//! - Apply input masks and lenient numeric parsing as values are typed.
//! - Enforce required fields when the form is submitted.
//!
//! # Invariants
//! - A draft never touches the store; `submit()` only returns a record.
//! - Editing an existing record keeps its id.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod party;
pub mod project;
pub mod responsible;
pub mod vertex;

pub type FormResult<T> = Result<T, FormError>;

/// Submission blocked by missing or out-of-range input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormError {
    MissingField(&'static str),
    NotPositive(&'static str),
    Negative(&'static str),
}

impl Display for FormError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "required field `{field}` is empty"),
            Self::NotPositive(field) => write!(f, "field `{field}` must be greater than zero"),
            Self::Negative(field) => write!(f, "field `{field}` must not be negative"),
        }
    }
}

impl Error for FormError {}

pub(crate) fn require(field: &'static str, value: &str) -> FormResult<()> {
    if value.trim().is_empty() {
        return Err(FormError::MissingField(field));
    }
    Ok(())
}
