//! JSON marshaling of the memorial state slots.
//!
//! # Responsibility
//! - Load each slot from its fixed key when a session starts.
//! - Save the full value of every slot after a mutation.
//!
//! # Invariants
//! - Collections are always written, even when empty.
//! - Singleton slots are written only when present.
//! - Malformed or invalid stored values fail the load; nothing is repaired.

use crate::model::party::{Beneficiary, Confrontant};
use crate::model::project::Project;
use crate::model::responsible::TechnicalResponsible;
use crate::model::vertex::Vertex;
use crate::model::ModelValidationError;
use crate::repo::kv_store::{KeyValueStore, KvError};
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const PROJECT_KEY: &str = "memorial_projeto";
pub const BENEFICIARIES_KEY: &str = "memorial_beneficiarios";
pub const CONFRONTANTS_KEY: &str = "memorial_confrontantes";
pub const VERTICES_KEY: &str = "memorial_vertices";
pub const TECHNICAL_RESPONSIBLE_KEY: &str = "memorial_responsavel_tecnico";

/// Every key owned by the memorial, in load order.
pub const ALL_KEYS: [&str; 5] = [
    PROJECT_KEY,
    BENEFICIARIES_KEY,
    CONFRONTANTS_KEY,
    VERTICES_KEY,
    TECHNICAL_RESPONSIBLE_KEY,
];

pub type SnapshotResult<T> = Result<T, SnapshotError>;

#[derive(Debug)]
pub enum SnapshotError {
    Store(KvError),
    /// Stored value is not valid JSON for its slot.
    InvalidData { key: &'static str, message: String },
    /// Stored value parsed but breaks a model invariant.
    Validation {
        key: &'static str,
        source: ModelValidationError,
    },
    /// Serializing an in-memory slot failed.
    Encode { key: &'static str, message: String },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid stored value under `{key}`: {message}")
            }
            Self::Validation { key, source } => {
                write!(f, "stored value under `{key}` is invalid: {source}")
            }
            Self::Encode { key, message } => {
                write!(f, "failed to encode value for `{key}`: {message}")
            }
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Validation { source, .. } => Some(source),
            Self::InvalidData { .. } | Self::Encode { .. } => None,
        }
    }
}

impl From<KvError> for SnapshotError {
    fn from(value: KvError) -> Self {
        Self::Store(value)
    }
}

/// Full in-memory state of one memorial session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorialSnapshot {
    pub project: Option<Project>,
    pub beneficiaries: Vec<Beneficiary>,
    pub confrontants: Vec<Confrontant>,
    pub vertices: Vec<Vertex>,
    pub technical_responsible: Option<TechnicalResponsible>,
}

/// Reads every slot; absent keys leave the slot at its default.
pub fn load_snapshot<S: KeyValueStore>(store: &S) -> SnapshotResult<MemorialSnapshot> {
    let project: Option<Project> = read_slot(store, PROJECT_KEY)?;
    let beneficiaries: Vec<Beneficiary> =
        read_slot(store, BENEFICIARIES_KEY)?.unwrap_or_default();
    let confrontants: Vec<Confrontant> = read_slot(store, CONFRONTANTS_KEY)?.unwrap_or_default();
    let vertices: Vec<Vertex> = read_slot(store, VERTICES_KEY)?.unwrap_or_default();
    let technical_responsible: Option<TechnicalResponsible> =
        read_slot(store, TECHNICAL_RESPONSIBLE_KEY)?;

    validate_slot(PROJECT_KEY, project.iter().map(Project::validate))?;
    validate_slot(
        BENEFICIARIES_KEY,
        beneficiaries.iter().map(Beneficiary::validate),
    )?;
    validate_slot(
        CONFRONTANTS_KEY,
        confrontants.iter().map(Confrontant::validate),
    )?;
    validate_slot(VERTICES_KEY, vertices.iter().map(Vertex::validate))?;
    validate_slot(
        TECHNICAL_RESPONSIBLE_KEY,
        technical_responsible
            .iter()
            .map(TechnicalResponsible::validate),
    )?;

    debug!(
        "event=snapshot_load module=repo status=ok has_project={} beneficiaries={} confrontants={} vertices={} has_responsible={}",
        project.is_some(),
        beneficiaries.len(),
        confrontants.len(),
        vertices.len(),
        technical_responsible.is_some()
    );

    Ok(MemorialSnapshot {
        project,
        beneficiaries,
        confrontants,
        vertices,
        technical_responsible,
    })
}

/// Writes the full value of every slot in one store call.
pub fn save_snapshot<S: KeyValueStore>(
    store: &S,
    snapshot: &MemorialSnapshot,
) -> SnapshotResult<()> {
    let mut entries = Vec::with_capacity(ALL_KEYS.len());
    if let Some(project) = &snapshot.project {
        entries.push((PROJECT_KEY, encode(PROJECT_KEY, project)?));
    }
    entries.push((
        BENEFICIARIES_KEY,
        encode(BENEFICIARIES_KEY, &snapshot.beneficiaries)?,
    ));
    entries.push((
        CONFRONTANTS_KEY,
        encode(CONFRONTANTS_KEY, &snapshot.confrontants)?,
    ));
    entries.push((VERTICES_KEY, encode(VERTICES_KEY, &snapshot.vertices)?));
    if let Some(responsible) = &snapshot.technical_responsible {
        entries.push((
            TECHNICAL_RESPONSIBLE_KEY,
            encode(TECHNICAL_RESPONSIBLE_KEY, responsible)?,
        ));
    }

    store.set_many(&entries).map_err(|err| {
        error!(
            "event=snapshot_save module=repo status=error keys={} error={}",
            entries.len(),
            err
        );
        SnapshotError::from(err)
    })?;
    debug!(
        "event=snapshot_save module=repo status=ok keys={}",
        entries.len()
    );
    Ok(())
}

/// Deletes every memorial key.
pub fn clear_snapshot<S: KeyValueStore>(store: &S) -> SnapshotResult<()> {
    for key in ALL_KEYS {
        store.remove(key)?;
    }
    Ok(())
}

fn read_slot<S, T>(store: &S, key: &'static str) -> SnapshotResult<Option<T>>
where
    S: KeyValueStore,
    T: DeserializeOwned,
{
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| {
            error!(
                "event=snapshot_load module=repo status=error key={} error_code=invalid_json line={} column={}",
                key,
                err.line(),
                err.column()
            );
            SnapshotError::InvalidData {
                key,
                message: err.to_string(),
            }
        })
}

fn validate_slot(
    key: &'static str,
    mut results: impl Iterator<Item = Result<(), ModelValidationError>>,
) -> SnapshotResult<()> {
    match results.find_map(Result::err) {
        Some(source) => Err(SnapshotError::Validation { key, source }),
        None => Ok(()),
    }
}

fn encode<T: Serialize + ?Sized>(key: &'static str, value: &T) -> SnapshotResult<String> {
    serde_json::to_string(value).map_err(|err| SnapshotError::Encode {
        key,
        message: err.to_string(),
    })
}
