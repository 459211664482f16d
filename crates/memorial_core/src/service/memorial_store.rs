//! Domain store for one memorial session.
//!
//! # Responsibility
//! - Own the project, beneficiaries, confrontants, vertices and technical
//!   responsible of the session.
//! - Save the full snapshot explicitly after every successful mutation.
//!   A mutation is applied to a copy of the state, and the copy replaces the
//!   current state only after it was saved.
//! - Queue a user-facing notice for every mutation outcome.
//!
//! # Invariants
//! - A confrontant referenced by any vertex is never removed.
//! - Collections keep insertion order; replace-by-id keeps the position and
//!   the target id.
//! - Update/remove on an unknown id changes nothing and saves nothing.
//! - Vertex writes do not check the confrontant reference.

use crate::model::memorial::{IncompleteMemorial, Memorial};
use crate::model::party::{Beneficiary, Confrontant};
use crate::model::project::Project;
use crate::model::responsible::TechnicalResponsible;
use crate::model::vertex::Vertex;
use crate::model::{EntityId, ModelValidationError};
use crate::repo::kv_store::KeyValueStore;
use crate::repo::snapshot_repo::{
    clear_snapshot, load_snapshot, save_snapshot, MemorialSnapshot, SnapshotError,
};
use crate::service::notice::Notice;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Record breaks a model invariant; nothing was written.
    Validation(ModelValidationError),
    /// Loading or saving the snapshot failed.
    Snapshot(SnapshotError),
    /// Confrontant is still referenced by vertices and was kept.
    ConfrontantInUse { id: EntityId, vertex_count: usize },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::ConfrontantInUse { id, vertex_count } => write!(
                f,
                "confrontant {id} is referenced by {vertex_count} vertex(es); remove those vertices first"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Snapshot(err) => Some(err),
            Self::ConfrontantInUse { .. } => None,
        }
    }
}

impl From<ModelValidationError> for StoreError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SnapshotError> for StoreError {
    fn from(value: SnapshotError) -> Self {
        Self::Snapshot(value)
    }
}

/// Records addressable by id inside a collection.
trait Keyed {
    fn key(&self) -> &str;
    fn rekey(&mut self, id: EntityId);
}

macro_rules! impl_keyed {
    ($($record:ty),+) => {
        $(impl Keyed for $record {
            fn key(&self) -> &str {
                &self.id
            }

            fn rekey(&mut self, id: EntityId) {
                self.id = id;
            }
        })+
    };
}

impl_keyed!(Beneficiary, Confrontant, Vertex);

fn replace_by_id<T: Keyed>(items: &mut [T], id: &str, mut replacement: T) -> bool {
    match items.iter_mut().find(|item| item.key() == id) {
        Some(slot) => {
            replacement.rekey(id.to_string());
            *slot = replacement;
            true
        }
        None => false,
    }
}

fn remove_by_id<T: Keyed>(items: &mut Vec<T>, id: &str) -> bool {
    let before = items.len();
    items.retain(|item| item.key() != id);
    items.len() != before
}

fn find_by_id<'a, T: Keyed>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.key() == id)
}

/// Explicitly constructed session state over a key/value store.
pub struct MemorialStore<S: KeyValueStore> {
    kv: S,
    state: MemorialSnapshot,
    notices: Vec<Notice>,
}

impl<S: KeyValueStore> MemorialStore<S> {
    /// Loads every slot from `kv` and returns the ready store.
    pub fn open(kv: S) -> StoreResult<Self> {
        let state = load_snapshot(&kv)?;
        info!(
            "event=store_open module=store status=ok beneficiaries={} confrontants={} vertices={}",
            state.beneficiaries.len(),
            state.confrontants.len(),
            state.vertices.len()
        );
        Ok(Self {
            kv,
            state,
            notices: Vec::new(),
        })
    }

    pub fn project(&self) -> Option<&Project> {
        self.state.project.as_ref()
    }

    pub fn beneficiaries(&self) -> &[Beneficiary] {
        &self.state.beneficiaries
    }

    pub fn confrontants(&self) -> &[Confrontant] {
        &self.state.confrontants
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.state.vertices
    }

    pub fn technical_responsible(&self) -> Option<&TechnicalResponsible> {
        self.state.technical_responsible.as_ref()
    }

    /// Current in-memory state.
    pub fn snapshot(&self) -> &MemorialSnapshot {
        &self.state
    }

    pub fn beneficiary(&self, id: &str) -> Option<&Beneficiary> {
        find_by_id(&self.state.beneficiaries, id)
    }

    pub fn confrontant(&self, id: &str) -> Option<&Confrontant> {
        find_by_id(&self.state.confrontants, id)
    }

    pub fn vertex(&self, id: &str) -> Option<&Vertex> {
        find_by_id(&self.state.vertices, id)
    }

    /// Drains queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Replaces the project wholesale.
    pub fn set_project(&mut self, project: Project) -> StoreResult<()> {
        project.validate()?;
        let id = project.id.clone();
        let mut next = self.state.clone();
        next.project = Some(project);
        self.commit("project_set", next)?;
        info!("event=project_set module=store status=ok project_id={id}");
        self.notify(Notice::success(
            "Projeto salvo",
            "Informações do projeto foram salvas com sucesso.",
        ));
        Ok(())
    }

    /// Sets the project address only while it is blank.
    ///
    /// Returns `false` without writing when there is no project or the
    /// address is already filled.
    pub fn fill_project_address(&mut self, address: &str) -> StoreResult<bool> {
        if address.trim().is_empty() {
            return Ok(false);
        }
        let updated = match self.state.project.as_ref() {
            Some(project) if !project.has_address() => project.with_address(address.trim()),
            _ => return Ok(false),
        };
        let id = updated.id.clone();
        let mut next = self.state.clone();
        next.project = Some(updated);
        self.commit("project_address_fill", next)?;
        info!("event=project_address_fill module=store status=ok project_id={id}");
        self.notify(Notice::success(
            "Endereço atualizado",
            "O endereço do imóvel foi automaticamente preenchido.",
        ));
        Ok(true)
    }

    pub fn add_beneficiary(&mut self, beneficiary: Beneficiary) -> StoreResult<EntityId> {
        beneficiary.validate()?;
        let id = beneficiary.id.clone();
        let description = format!("{} foi adicionado com sucesso.", beneficiary.name);
        let mut next = self.state.clone();
        next.beneficiaries.push(beneficiary);
        self.commit("beneficiary_add", next)?;
        info!("event=beneficiary_add module=store status=ok beneficiary_id={id}");
        self.notify(Notice::success("Beneficiário adicionado", description));
        Ok(id)
    }

    /// Replaces the beneficiary with `id`. Returns `false` when none matches.
    pub fn update_beneficiary(&mut self, id: &str, beneficiary: Beneficiary) -> StoreResult<bool> {
        beneficiary.validate()?;
        let description = format!("{} foi atualizado com sucesso.", beneficiary.name);
        let mut next = self.state.clone();
        if !replace_by_id(&mut next.beneficiaries, id, beneficiary) {
            info!("event=beneficiary_update module=store status=skipped reason=not_found beneficiary_id={id}");
            return Ok(false);
        }
        self.commit("beneficiary_update", next)?;
        info!("event=beneficiary_update module=store status=ok beneficiary_id={id}");
        self.notify(Notice::success("Beneficiário atualizado", description));
        Ok(true)
    }

    /// Removes the beneficiary with `id`. Returns `false` when none matches.
    pub fn remove_beneficiary(&mut self, id: &str) -> StoreResult<bool> {
        let mut next = self.state.clone();
        if !remove_by_id(&mut next.beneficiaries, id) {
            info!("event=beneficiary_remove module=store status=skipped reason=not_found beneficiary_id={id}");
            return Ok(false);
        }
        self.commit("beneficiary_remove", next)?;
        info!("event=beneficiary_remove module=store status=ok beneficiary_id={id}");
        self.notify(Notice::success(
            "Beneficiário removido",
            "Beneficiário foi removido com sucesso.",
        ));
        Ok(true)
    }

    pub fn add_confrontant(&mut self, confrontant: Confrontant) -> StoreResult<EntityId> {
        confrontant.validate()?;
        let id = confrontant.id.clone();
        let description = format!("{} foi adicionado com sucesso.", confrontant.name);
        let mut next = self.state.clone();
        next.confrontants.push(confrontant);
        self.commit("confrontant_add", next)?;
        info!("event=confrontant_add module=store status=ok confrontant_id={id}");
        self.notify(Notice::success("Confrontante adicionado", description));
        Ok(id)
    }

    /// Replaces the confrontant with `id`. Returns `false` when none matches.
    pub fn update_confrontant(&mut self, id: &str, confrontant: Confrontant) -> StoreResult<bool> {
        confrontant.validate()?;
        let description = format!("{} foi atualizado com sucesso.", confrontant.name);
        let mut next = self.state.clone();
        if !replace_by_id(&mut next.confrontants, id, confrontant) {
            info!("event=confrontant_update module=store status=skipped reason=not_found confrontant_id={id}");
            return Ok(false);
        }
        self.commit("confrontant_update", next)?;
        info!("event=confrontant_update module=store status=ok confrontant_id={id}");
        self.notify(Notice::success("Confrontante atualizado", description));
        Ok(true)
    }

    /// Removes the confrontant with `id` unless a vertex references it.
    ///
    /// # Errors
    /// - `StoreError::ConfrontantInUse` when any vertex points at `id`; the
    ///   collection is left untouched.
    pub fn remove_confrontant(&mut self, id: &str) -> StoreResult<bool> {
        let vertex_count = self
            .state
            .vertices
            .iter()
            .filter(|vertex| vertex.references(id))
            .count();
        if vertex_count > 0 {
            warn!(
                "event=confrontant_remove module=store status=rejected reason=in_use confrontant_id={id} vertex_count={vertex_count}"
            );
            self.notify(Notice::destructive(
                "Não foi possível remover",
                "Este confrontante está sendo usado em vértices. Remova os vértices primeiro.",
            ));
            return Err(StoreError::ConfrontantInUse {
                id: id.to_string(),
                vertex_count,
            });
        }

        let mut next = self.state.clone();
        if !remove_by_id(&mut next.confrontants, id) {
            info!("event=confrontant_remove module=store status=skipped reason=not_found confrontant_id={id}");
            return Ok(false);
        }
        self.commit("confrontant_remove", next)?;
        info!("event=confrontant_remove module=store status=ok confrontant_id={id}");
        self.notify(Notice::success(
            "Confrontante removido",
            "Confrontante foi removido com sucesso.",
        ));
        Ok(true)
    }

    pub fn add_vertex(&mut self, vertex: Vertex) -> StoreResult<EntityId> {
        vertex.validate()?;
        self.warn_if_dangling(&vertex);
        let id = vertex.id.clone();
        let description = format!(
            "Vértice de {} para {} foi adicionado.",
            vertex.from_label, vertex.to_label
        );
        let mut next = self.state.clone();
        next.vertices.push(vertex);
        self.commit("vertex_add", next)?;
        info!("event=vertex_add module=store status=ok vertex_id={id}");
        self.notify(Notice::success("Vértice adicionado", description));
        Ok(id)
    }

    /// Replaces the vertex with `id`. Returns `false` when none matches.
    pub fn update_vertex(&mut self, id: &str, vertex: Vertex) -> StoreResult<bool> {
        vertex.validate()?;
        self.warn_if_dangling(&vertex);
        let mut next = self.state.clone();
        if !replace_by_id(&mut next.vertices, id, vertex) {
            info!("event=vertex_update module=store status=skipped reason=not_found vertex_id={id}");
            return Ok(false);
        }
        self.commit("vertex_update", next)?;
        info!("event=vertex_update module=store status=ok vertex_id={id}");
        self.notify(Notice::success(
            "Vértice atualizado",
            "Vértice foi atualizado com sucesso.",
        ));
        Ok(true)
    }

    /// Removes the vertex with `id`. Returns `false` when none matches.
    pub fn remove_vertex(&mut self, id: &str) -> StoreResult<bool> {
        let mut next = self.state.clone();
        if !remove_by_id(&mut next.vertices, id) {
            info!("event=vertex_remove module=store status=skipped reason=not_found vertex_id={id}");
            return Ok(false);
        }
        self.commit("vertex_remove", next)?;
        info!("event=vertex_remove module=store status=ok vertex_id={id}");
        self.notify(Notice::success(
            "Vértice removido",
            "Vértice foi removido com sucesso.",
        ));
        Ok(true)
    }

    /// Appends a batch of vertices with a single save and a single notice.
    ///
    /// The whole batch is validated before anything is appended. An empty
    /// batch is a no-op.
    pub fn import_vertices(&mut self, vertices: Vec<Vertex>) -> StoreResult<usize> {
        for vertex in &vertices {
            vertex.validate()?;
        }
        let count = vertices.len();
        if count == 0 {
            return Ok(0);
        }

        let dangling = vertices
            .iter()
            .filter(|vertex| self.confrontant(&vertex.confrontant_id).is_none())
            .count();
        let mut next = self.state.clone();
        next.vertices.extend(vertices);
        self.commit("vertex_import", next)?;
        info!(
            "event=vertex_import module=store status=ok count={count} dangling_refs={dangling}"
        );
        self.notify(Notice::success(
            "Vértices importados",
            format!("{count} vértices foram importados com sucesso."),
        ));
        Ok(count)
    }

    /// Replaces the technical responsible wholesale.
    pub fn set_technical_responsible(
        &mut self,
        responsible: TechnicalResponsible,
    ) -> StoreResult<()> {
        responsible.validate()?;
        let id = responsible.id.clone();
        let mut next = self.state.clone();
        next.technical_responsible = Some(responsible);
        self.commit("technical_responsible_set", next)?;
        info!("event=technical_responsible_set module=store status=ok responsible_id={id}");
        self.notify(Notice::success(
            "Responsável técnico salvo",
            "Dados do responsável técnico foram salvos com sucesso.",
        ));
        Ok(())
    }

    /// Builds the memorial aggregate, or reports what is still missing.
    pub fn memorial(&self) -> Result<Memorial<'_>, IncompleteMemorial> {
        Memorial::assemble(
            self.state.project.as_ref(),
            &self.state.beneficiaries,
            &self.state.confrontants,
            &self.state.vertices,
            self.state.technical_responsible.as_ref(),
        )
    }

    /// Clears every slot and deletes every persisted key.
    ///
    /// The in-memory state is only cleared once storage has been cleared.
    pub fn reset(&mut self) -> StoreResult<()> {
        if let Err(err) = clear_snapshot(&self.kv) {
            self.report_save_failure("store_reset", &err);
            return Err(err.into());
        }
        self.state = MemorialSnapshot::default();
        info!("event=store_reset module=store status=ok");
        self.notify(Notice::success(
            "Memorial resetado",
            "Todos os dados do memorial foram apagados.",
        ));
        Ok(())
    }

    /// Saves `next` and adopts it as the current state only when the save
    /// succeeds.
    fn commit(&mut self, operation: &'static str, next: MemorialSnapshot) -> StoreResult<()> {
        if let Err(err) = save_snapshot(&self.kv, &next) {
            self.report_save_failure(operation, &err);
            return Err(err.into());
        }
        self.state = next;
        Ok(())
    }

    fn report_save_failure(&mut self, operation: &'static str, err: &SnapshotError) {
        warn!("event={operation} module=store status=error error_code=save_failed error={err}");
        self.notify(Notice::destructive(
            "Falha ao salvar",
            "Não foi possível salvar os dados do memorial.",
        ));
    }

    fn warn_if_dangling(&self, vertex: &Vertex) {
        if self.confrontant(&vertex.confrontant_id).is_none() {
            warn!(
                "event=vertex_write module=store status=ok warning=dangling_confrontant vertex_id={} confrontant_id={}",
                vertex.id, vertex.confrontant_id
            );
        }
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
