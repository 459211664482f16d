//! Core domain logic for the memorial descritivo wizard.
//! This crate is the single source of truth for survey data invariants.

pub mod compose;
pub mod db;
pub mod form;
pub mod format;
pub mod import;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use compose::{
    export_file_name, render_export_text, render_print_html, DocumentView, PRINT_DELAY_MS,
};
pub use import::{ColumnMapping, Delimiter, HeaderMode, ImportError, ImportOptions, ImportSession};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::memorial::{IncompleteMemorial, Memorial, MemorialPart};
pub use model::party::{Beneficiary, Confrontant, Direction, PostalAddress};
pub use model::project::Project;
pub use model::responsible::TechnicalResponsible;
pub use model::vertex::Vertex;
pub use model::{EntityId, ModelValidationError};
pub use repo::kv_store::{KeyValueStore, KvError, SqliteKeyValueStore};
pub use repo::snapshot_repo::MemorialSnapshot;
pub use service::memorial_store::{MemorialStore, StoreError, StoreResult};
pub use service::notice::{Notice, NoticeKind};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
