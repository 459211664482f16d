//! Applies an import session to the domain store.
//!
//! # Invariants
//! - Nothing is written when no row is importable.
//! - A detected address is applied only while the project address is blank,
//!   so repeating an import never overwrites it.
//! - Once the vertices are saved the import succeeds, even when the address
//!   fill that follows fails.

use crate::import::{ImportError, ImportOptions, ImportSession};
use crate::repo::kv_store::KeyValueStore;
use crate::service::memorial_store::MemorialStore;
use log::{info, warn};

/// Result of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub imported: usize,
    /// Address written to the project by this import, if any.
    pub address_applied: Option<String>,
}

/// Default import options for `store`: comma, standard mapping, first
/// confrontant preselected.
pub fn import_options_for<S: KeyValueStore>(store: &MemorialStore<S>) -> ImportOptions {
    ImportOptions::with_default_confrontant(
        store
            .confrontants()
            .iter()
            .map(|confrontant| confrontant.id.as_str()),
    )
}

/// Starts an import session seeded with `text`.
pub fn start_import<S: KeyValueStore>(
    store: &MemorialStore<S>,
    options: ImportOptions,
    text: &str,
) -> ImportSession {
    let mut session = ImportSession::new(options);
    session.load_text(text, store.project());
    session
}

/// Appends the session's vertices and back-fills a detected address.
///
/// # Errors
/// - `ImportError::NothingToImport` when no row produced a vertex.
/// - `ImportError::Store` when the store rejects or fails to save the
///   vertices.
pub fn apply_import<S: KeyValueStore>(
    store: &mut MemorialStore<S>,
    session: &ImportSession,
) -> Result<ImportOutcome, ImportError> {
    let vertices = session.build_vertices();
    if vertices.is_empty() {
        info!(
            "event=import_apply module=import status=skipped reason=no_rows rows={}",
            session.rows().len()
        );
        return Err(ImportError::NothingToImport);
    }

    let imported = store.import_vertices(vertices)?;
    // The vertices are already saved; a failed address fill leaves them in
    // place and is reported through the store's notice.
    let address_applied = match apply_detected_address(store, session) {
        Ok(true) => session.detected_address().map(str::to_string),
        Ok(false) => None,
        Err(err) => {
            warn!("event=import_apply module=import status=partial error_code=address_fill_failed imported={imported} error={err}");
            None
        }
    };

    info!(
        "event=import_apply module=import status=ok imported={} address_applied={}",
        imported,
        address_applied.is_some()
    );
    Ok(ImportOutcome {
        imported,
        address_applied,
    })
}

/// Writes the detected address into a project that still has none.
///
/// Returns `false` when there is no suggestion, no project, or the project
/// already has an address.
pub fn apply_detected_address<S: KeyValueStore>(
    store: &mut MemorialStore<S>,
    session: &ImportSession,
) -> Result<bool, ImportError> {
    match session.detected_address() {
        Some(address) => Ok(store.fill_project_address(address)?),
        None => Ok(false),
    }
}
