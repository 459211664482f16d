//! Pure string helpers shared by forms, the importer and the composer.

pub mod masks;
pub mod numeric;
