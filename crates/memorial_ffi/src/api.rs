//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose one function per wizard use case to Dart via FRB.
//! - Translate form input through the core drafts so masks and required
//!   fields behave exactly as in the core.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every DB-backed call receives the database path and opens it itself;
//!   no path is cached in process state.
//! - Response messages are the store's user-facing notice text on success.
//! - Read calls (`*_get`, `*_list`, `vertices_import_preview`) never write.

use memorial_core::db::open_db;
use memorial_core::form::party::{BeneficiaryDraft, ConfrontantDraft};
use memorial_core::form::project::ProjectDraft;
use memorial_core::form::responsible::TechnicalResponsibleDraft;
use memorial_core::form::vertex::VertexDraft;
use memorial_core::service::import_service::{apply_import, import_options_for, start_import};
use memorial_core::{
    core_version as core_version_inner, export_file_name, init_logging as init_logging_inner,
    ping as ping_inner, render_export_text, render_print_html, Beneficiary, ColumnMapping,
    Confrontant, Delimiter, Direction, DocumentView, HeaderMode, ImportSession, MemorialStore,
    Project, SqliteKeyValueStore, TechnicalResponsible, Vertex, PRINT_DELAY_MS,
};
use log::warn;

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Project step form values, as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectInput {
    pub name: String,
    pub address: String,
    /// Square meters as typed; parsed leniently.
    pub area: String,
    /// Meters as typed; parsed leniently.
    pub perimeter: String,
    pub measurement_epoch: String,
    pub instrument: String,
    pub geodetic_system: String,
    pub cartographic_projection: String,
}

/// Beneficiary or confrontant form values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyInput {
    pub name: String,
    /// CPF/CNPJ digits, masked or not.
    pub document: String,
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    /// `Frente|Fundos|Direita|Esquerda`; confrontants only.
    pub direction: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexInput {
    pub from_label: String,
    pub to_label: String,
    pub longitude: String,
    pub latitude: String,
    /// Meters as typed; parsed leniently.
    pub distance: String,
    pub confrontant_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnicalResponsibleInput {
    pub name: String,
    pub role: String,
    pub registration: String,
}

/// Bulk vertex import request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportRequest {
    pub text: String,
    /// One of `,`, `;`, tab or space. Empty means comma.
    pub delimiter: String,
    /// `detect|always|never`. Empty means `detect`.
    pub header_mode: String,
    /// Used for rows with a blank confrontant cell; defaults to the first
    /// registered confrontant.
    pub default_confrontant_id: Option<String>,
    /// Column positions; `None` keeps the standard layout.
    pub mapping: Option<ImportColumns>,
}

/// Zero-based column index per vertex field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportColumns {
    pub from_vertex: u32,
    pub to_vertex: u32,
    pub longitude: u32,
    pub latitude: u32,
    pub distance: u32,
    pub confrontant: u32,
    /// Column scanned for a property address; `None` disables detection.
    pub address: Option<u32>,
}

impl Default for ImportColumns {
    fn default() -> Self {
        let mapping = ColumnMapping::default();
        Self {
            from_vertex: count(mapping.from_vertex),
            to_vertex: count(mapping.to_vertex),
            longitude: count(mapping.longitude),
            latitude: count(mapping.latitude),
            distance: count(mapping.distance),
            confrontant: count(mapping.confrontant),
            address: mapping.address.map(count),
        }
    }
}

impl From<ImportColumns> for ColumnMapping {
    fn from(value: ImportColumns) -> Self {
        Self {
            from_vertex: index(value.from_vertex),
            to_vertex: index(value.to_vertex),
            longitude: index(value.longitude),
            latitude: index(value.latitude),
            distance: index(value.distance),
            confrontant: index(value.confrontant),
            address: value.address.map(index),
        }
    }
}

/// Parsed import text before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPreview {
    pub ok: bool,
    /// Every parsed row, header included, cells untrimmed.
    pub rows: Vec<Vec<String>>,
    pub header_skipped: bool,
    /// Rows that would become vertices on import.
    pub vertex_count: u32,
    /// Address suggestion for a project that has none yet.
    pub detected_address: Option<String>,
    pub message: String,
}

impl ImportPreview {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            rows: Vec::new(),
            header_skipped: false,
            vertex_count: 0,
            detected_address: None,
            message: message.into(),
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether operation succeeded.
    pub ok: bool,
    /// Id of the record created or touched, when there is one.
    pub entity_id: Option<String>,
    /// Human-readable response message for UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, entity_id: Option<String>) -> Self {
        Self {
            ok: true,
            entity_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entity_id: None,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportResponse {
    pub ok: bool,
    pub imported: u32,
    /// Address written into the project by this import.
    pub address_applied: Option<String>,
    pub message: String,
}

/// Rendered memorial output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemorialTextResponse {
    pub ok: bool,
    /// Suggested download name; export only.
    pub file_name: Option<String>,
    /// Plain text for export, HTML for print. Empty on failure.
    pub content: String,
    /// Delay before triggering the print dialog; print only.
    pub print_delay_ms: Option<u64>,
    pub message: String,
}

impl MemorialTextResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            file_name: None,
            content: String::new(),
            print_delay_ms: None,
            message: message.into(),
        }
    }
}

/// Stored project as shown by the project step.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectView {
    pub id: String,
    pub name: String,
    pub address: String,
    pub area: f64,
    pub perimeter: f64,
    pub measurement_epoch: String,
    pub instrument: String,
    pub geodetic_system: String,
    pub cartographic_projection: String,
}

/// Stored beneficiary or confrontant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyView {
    pub id: String,
    pub name: String,
    pub document: String,
    pub street: String,
    pub number: String,
    pub district: String,
    pub city: String,
    /// Confrontants only.
    pub direction: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexView {
    pub id: String,
    pub from_label: String,
    pub to_label: String,
    pub longitude: String,
    pub latitude: String,
    pub distance: f64,
    pub confrontant_id: String,
    /// `None` when the id matches no registered confrontant.
    pub confrontant_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalResponsibleView {
    pub id: String,
    pub name: String,
    pub role: String,
    pub registration: String,
}

/// Read envelope for the project step.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectReadResponse {
    pub ok: bool,
    /// Empty until a project was saved.
    pub items: Vec<ProjectView>,
    pub message: String,
}

/// Read envelope for beneficiaries and confrontants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyReadResponse {
    pub ok: bool,
    /// Records in collection order; at most one for `confrontant_get`.
    pub items: Vec<PartyView>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VertexReadResponse {
    pub ok: bool,
    pub items: Vec<VertexView>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TechnicalResponsibleReadResponse {
    pub ok: bool,
    pub items: Vec<TechnicalResponsibleView>,
    pub message: String,
}

/// Wizard progress summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemorialStatus {
    pub has_project: bool,
    pub beneficiary_count: u32,
    pub confrontant_count: u32,
    pub vertex_count: u32,
    pub has_technical_responsible: bool,
    /// Parts still blocking the memorial (`project|beneficiaries|...`).
    pub missing: Vec<String>,
    pub ready: bool,
    /// Empty on success; load error otherwise.
    pub message: String,
}

/// Replaces the project with the submitted form values.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Fails without writing when a required field is blank or area/perimeter
///   is not positive.
#[flutter_rust_bridge::frb(sync)]
pub fn project_set(db_path: String, input: ProjectInput) -> ActionResponse {
    let mut draft = ProjectDraft::new();
    draft
        .set_name(&input.name)
        .set_address(&input.address)
        .set_area_text(&input.area)
        .set_perimeter_text(&input.perimeter)
        .set_measurement_epoch(&input.measurement_epoch)
        .set_instrument(&input.instrument)
        .set_geodetic_system(&input.geodetic_system)
        .set_cartographic_projection(&input.cartographic_projection);
    let project = match draft.submit() {
        Ok(project) => project,
        Err(err) => return ActionResponse::failure(format!("project_set failed: {err}")),
    };
    let id = project.id.clone();
    run_action("project_set", &db_path, |store| {
        store.set_project(project).map(|()| Some(id))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn beneficiary_add(db_path: String, input: PartyInput) -> ActionResponse {
    let beneficiary = match beneficiary_draft(&input).submit() {
        Ok(beneficiary) => beneficiary,
        Err(err) => return ActionResponse::failure(format!("beneficiary_add failed: {err}")),
    };
    run_action("beneficiary_add", &db_path, |store| {
        store.add_beneficiary(beneficiary).map(Some)
    })
}

/// Replaces the beneficiary with `id`; unknown ids succeed with no change.
#[flutter_rust_bridge::frb(sync)]
pub fn beneficiary_update(db_path: String, id: String, input: PartyInput) -> ActionResponse {
    let beneficiary = match beneficiary_draft(&input).submit() {
        Ok(beneficiary) => beneficiary,
        Err(err) => return ActionResponse::failure(format!("beneficiary_update failed: {err}")),
    };
    run_action("beneficiary_update", &db_path, |store| {
        store
            .update_beneficiary(&id, beneficiary)
            .map(|found| found.then(|| id.clone()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn beneficiary_remove(db_path: String, id: String) -> ActionResponse {
    run_action("beneficiary_remove", &db_path, |store| {
        store
            .remove_beneficiary(&id)
            .map(|found| found.then(|| id.clone()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn confrontant_add(db_path: String, input: PartyInput) -> ActionResponse {
    let confrontant = match confrontant_draft(&input).and_then(|draft| draft.submit().map_err(|err| err.to_string())) {
        Ok(confrontant) => confrontant,
        Err(err) => return ActionResponse::failure(format!("confrontant_add failed: {err}")),
    };
    run_action("confrontant_add", &db_path, |store| {
        store.add_confrontant(confrontant).map(Some)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn confrontant_update(db_path: String, id: String, input: PartyInput) -> ActionResponse {
    let confrontant = match confrontant_draft(&input).and_then(|draft| draft.submit().map_err(|err| err.to_string())) {
        Ok(confrontant) => confrontant,
        Err(err) => return ActionResponse::failure(format!("confrontant_update failed: {err}")),
    };
    run_action("confrontant_update", &db_path, |store| {
        store
            .update_confrontant(&id, confrontant)
            .map(|found| found.then(|| id.clone()))
    })
}

/// Removes a confrontant unless a vertex still references it.
///
/// # FFI contract
/// - A referenced confrontant yields `ok=false` with the store's
///   rejection text; nothing is removed.
#[flutter_rust_bridge::frb(sync)]
pub fn confrontant_remove(db_path: String, id: String) -> ActionResponse {
    run_action("confrontant_remove", &db_path, |store| {
        store
            .remove_confrontant(&id)
            .map(|found| found.then(|| id.clone()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn vertex_add(db_path: String, input: VertexInput) -> ActionResponse {
    let vertex = match vertex_draft(&input).submit() {
        Ok(vertex) => vertex,
        Err(err) => return ActionResponse::failure(format!("vertex_add failed: {err}")),
    };
    run_action("vertex_add", &db_path, |store| {
        store.add_vertex(vertex).map(Some)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn vertex_update(db_path: String, id: String, input: VertexInput) -> ActionResponse {
    let vertex = match vertex_draft(&input).submit() {
        Ok(vertex) => vertex,
        Err(err) => return ActionResponse::failure(format!("vertex_update failed: {err}")),
    };
    run_action("vertex_update", &db_path, |store| {
        store
            .update_vertex(&id, vertex)
            .map(|found| found.then(|| id.clone()))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn vertex_remove(db_path: String, id: String) -> ActionResponse {
    run_action("vertex_remove", &db_path, |store| {
        store
            .remove_vertex(&id)
            .map(|found| found.then(|| id.clone()))
    })
}

/// Parses delimited text without writing anything.
///
/// # FFI contract
/// - Sync call, DB-backed read.
/// - Never panics.
/// - `detected_address` is only set while the project address is blank.
#[flutter_rust_bridge::frb(sync)]
pub fn vertices_import_preview(db_path: String, request: ImportRequest) -> ImportPreview {
    let session = match read_store(&db_path, |store| import_session(store, &request)) {
        Ok(Ok(session)) => session,
        Ok(Err(err)) => {
            return ImportPreview::failure(format!("vertices_import_preview failed: {err}"))
        }
        Err(err) => return ImportPreview::failure(err),
    };

    let vertex_count = count(session.build_vertices().len());
    ImportPreview {
        ok: true,
        rows: session.rows().to_vec(),
        header_skipped: session.skips_header(),
        vertex_count,
        detected_address: session.detected_address().map(str::to_string),
        message: format!("{vertex_count} vértice(s) prontos para importar."),
    }
}

/// Parses delimited text and appends every usable row as a vertex.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - A detected address fills a blank project address; an existing address
///   is never overwritten.
/// - `message` carries every notice the import raised, in order.
#[flutter_rust_bridge::frb(sync)]
pub fn vertices_import(db_path: String, request: ImportRequest) -> ImportResponse {
    let failure = |message: String| ImportResponse {
        ok: false,
        imported: 0,
        address_applied: None,
        message,
    };

    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => return failure(format!("memorial DB open failed: {err}")),
    };
    let mut store = match MemorialStore::open(SqliteKeyValueStore::new(&conn)) {
        Ok(store) => store,
        Err(err) => return failure(format!("memorial store load failed: {err}")),
    };
    let session = match import_session(&store, &request) {
        Ok(session) => session,
        Err(err) => return failure(format!("vertices_import failed: {err}")),
    };

    match apply_import(&mut store, &session) {
        Ok(outcome) => ImportResponse {
            ok: true,
            imported: count(outcome.imported),
            message: notice_messages(&mut store, "Import finished."),
            address_applied: outcome.address_applied,
        },
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call=vertices_import error={err}");
            failure(format!("vertices_import failed: {err}"))
        }
    }
}

/// Writes a confirmed address suggestion into a project that has none.
///
/// # FFI contract
/// - `entity_id` is the project id when the address was written, `None`
///   when there is no project or it already has an address.
#[flutter_rust_bridge::frb(sync)]
pub fn project_apply_address(db_path: String, address: String) -> ActionResponse {
    run_action("project_apply_address", &db_path, |store| {
        if store.fill_project_address(&address)? {
            Ok(store.project().map(|project| project.id.clone()))
        } else {
            Ok(None)
        }
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn project_get(db_path: String) -> ProjectReadResponse {
    let (ok, items, message) = read_items(&db_path, |store| {
        store.project().map(project_view).into_iter().collect()
    });
    ProjectReadResponse { ok, items, message }
}

#[flutter_rust_bridge::frb(sync)]
pub fn beneficiary_list(db_path: String) -> PartyReadResponse {
    let (ok, items, message) = read_items(&db_path, |store| {
        store.beneficiaries().iter().map(beneficiary_view).collect()
    });
    PartyReadResponse { ok, items, message }
}

#[flutter_rust_bridge::frb(sync)]
pub fn confrontant_list(db_path: String) -> PartyReadResponse {
    let (ok, items, message) = read_items(&db_path, |store| {
        store.confrontants().iter().map(confrontant_view).collect()
    });
    PartyReadResponse { ok, items, message }
}

/// Looks up one confrontant; unknown ids return no items.
#[flutter_rust_bridge::frb(sync)]
pub fn confrontant_get(db_path: String, id: String) -> PartyReadResponse {
    let (ok, items, message) = read_items(&db_path, |store| {
        store.confrontant(&id).map(confrontant_view).into_iter().collect()
    });
    PartyReadResponse { ok, items, message }
}

#[flutter_rust_bridge::frb(sync)]
pub fn vertex_list(db_path: String) -> VertexReadResponse {
    let (ok, items, message) = read_items(&db_path, |store| {
        store
            .vertices()
            .iter()
            .map(|vertex| vertex_view(vertex, store.confrontant(&vertex.confrontant_id)))
            .collect()
    });
    VertexReadResponse { ok, items, message }
}

#[flutter_rust_bridge::frb(sync)]
pub fn technical_responsible_get(db_path: String) -> TechnicalResponsibleReadResponse {
    let (ok, items, message) = read_items(&db_path, |store| {
        store
            .technical_responsible()
            .map(technical_responsible_view)
            .into_iter()
            .collect()
    });
    TechnicalResponsibleReadResponse { ok, items, message }
}

#[flutter_rust_bridge::frb(sync)]
pub fn technical_responsible_set(
    db_path: String,
    input: TechnicalResponsibleInput,
) -> ActionResponse {
    let mut draft = TechnicalResponsibleDraft::new();
    draft
        .set_name(&input.name)
        .set_role(&input.role)
        .set_registration(&input.registration);
    let responsible = match draft.submit() {
        Ok(responsible) => responsible,
        Err(err) => {
            return ActionResponse::failure(format!("technical_responsible_set failed: {err}"))
        }
    };
    let id = responsible.id.clone();
    run_action("technical_responsible_set", &db_path, |store| {
        store.set_technical_responsible(responsible).map(|()| Some(id))
    })
}

/// Renders the plain-text export and its download name.
///
/// # FFI contract
/// - `ok=false` with the missing parts listed while the memorial is
///   incomplete.
#[flutter_rust_bridge::frb(sync)]
pub fn memorial_export_text(db_path: String) -> MemorialTextResponse {
    render_memorial(&db_path, |memorial| MemorialTextResponse {
        ok: true,
        file_name: Some(export_file_name(memorial.project)),
        content: render_export_text(memorial),
        print_delay_ms: None,
        message: "Memorial exportado".to_string(),
    })
}

/// Renders the printable HTML page dated today.
#[flutter_rust_bridge::frb(sync)]
pub fn memorial_print_html(db_path: String) -> MemorialTextResponse {
    let issued_on = chrono::Local::now().date_naive();
    render_memorial(&db_path, |memorial| MemorialTextResponse {
        ok: true,
        file_name: None,
        content: render_print_html(&DocumentView::from_memorial(memorial, issued_on)),
        print_delay_ms: Some(PRINT_DELAY_MS),
        message: "A janela de impressão foi aberta.".to_string(),
    })
}

/// Deletes every memorial slot.
#[flutter_rust_bridge::frb(sync)]
pub fn memorial_reset(db_path: String) -> ActionResponse {
    run_action("memorial_reset", &db_path, |store| {
        store.reset().map(|()| None)
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn memorial_status(db_path: String) -> MemorialStatus {
    let conn = match open_db(&db_path) {
        Ok(conn) => conn,
        Err(err) => {
            return MemorialStatus {
                message: format!("memorial DB open failed: {err}"),
                ..MemorialStatus::default()
            }
        }
    };
    let store = match MemorialStore::open(SqliteKeyValueStore::new(&conn)) {
        Ok(store) => store,
        Err(err) => {
            return MemorialStatus {
                message: format!("memorial store load failed: {err}"),
                ..MemorialStatus::default()
            }
        }
    };

    let missing = match store.memorial() {
        Ok(_) => Vec::new(),
        Err(incomplete) => incomplete
            .missing
            .iter()
            .map(|part| part.label().to_string())
            .collect(),
    };
    MemorialStatus {
        has_project: store.project().is_some(),
        beneficiary_count: count(store.beneficiaries().len()),
        confrontant_count: count(store.confrontants().len()),
        vertex_count: count(store.vertices().len()),
        has_technical_responsible: store.technical_responsible().is_some(),
        ready: missing.is_empty(),
        missing,
        message: String::new(),
    }
}

type Store<'conn> = MemorialStore<SqliteKeyValueStore<'conn>>;

fn run_action(
    call: &'static str,
    db_path: &str,
    f: impl FnOnce(&mut Store<'_>) -> memorial_core::StoreResult<Option<String>>,
) -> ActionResponse {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => return ActionResponse::failure(format!("memorial DB open failed: {err}")),
    };
    let mut store = match MemorialStore::open(SqliteKeyValueStore::new(&conn)) {
        Ok(store) => store,
        Err(err) => return ActionResponse::failure(format!("memorial store load failed: {err}")),
    };

    match f(&mut store) {
        Ok(entity_id) => {
            let message = last_notice_message(&mut store, "No matching record.");
            ActionResponse::success(message, entity_id)
        }
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call={call} error={err}");
            let notice = store.take_notices().pop();
            let message = match notice {
                Some(notice) if notice.is_destructive() => {
                    format!("{}: {}", notice.title, notice.description)
                }
                _ => format!("{call} failed: {err}"),
            };
            ActionResponse::failure(message)
        }
    }
}

fn render_memorial(
    db_path: &str,
    render: impl FnOnce(&memorial_core::Memorial<'_>) -> MemorialTextResponse,
) -> MemorialTextResponse {
    let conn = match open_db(db_path) {
        Ok(conn) => conn,
        Err(err) => return MemorialTextResponse::failure(format!("memorial DB open failed: {err}")),
    };
    let store = match MemorialStore::open(SqliteKeyValueStore::new(&conn)) {
        Ok(store) => store,
        Err(err) => {
            return MemorialTextResponse::failure(format!("memorial store load failed: {err}"))
        }
    };
    match store.memorial() {
        Ok(memorial) => render(&memorial),
        Err(incomplete) => MemorialTextResponse::failure(incomplete.to_string()),
    }
}

fn last_notice_message(store: &mut Store<'_>, fallback: &str) -> String {
    store
        .take_notices()
        .pop()
        .map_or_else(|| fallback.to_string(), |notice| notice.description)
}

fn notice_messages(store: &mut Store<'_>, fallback: &str) -> String {
    let descriptions = store
        .take_notices()
        .into_iter()
        .map(|notice| notice.description)
        .collect::<Vec<_>>();
    if descriptions.is_empty() {
        fallback.to_string()
    } else {
        descriptions.join(" ")
    }
}

fn read_store<T>(db_path: &str, f: impl FnOnce(&Store<'_>) -> T) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| format!("memorial DB open failed: {err}"))?;
    let store = MemorialStore::open(SqliteKeyValueStore::new(&conn))
        .map_err(|err| format!("memorial store load failed: {err}"))?;
    Ok(f(&store))
}

/// `(ok, items, message)` for the read envelopes.
fn read_items<T>(db_path: &str, f: impl FnOnce(&Store<'_>) -> Vec<T>) -> (bool, Vec<T>, String) {
    match read_store(db_path, f) {
        Ok(items) => {
            let message = if items.is_empty() {
                "No records.".to_string()
            } else {
                format!("Found {} record(s).", items.len())
            };
            (true, items, message)
        }
        Err(message) => (false, Vec::new(), message),
    }
}

fn import_session(store: &Store<'_>, request: &ImportRequest) -> Result<ImportSession, String> {
    let mut options = import_options_for(store);
    options.delimiter = parse_delimiter(&request.delimiter)?;
    options.header = parse_header_mode(&request.header_mode)?;
    if let Some(columns) = request.mapping {
        options.mapping = columns.into();
    }
    if let Some(confrontant_id) = request.default_confrontant_id.as_deref() {
        options.default_confrontant_id = confrontant_id.trim().to_string();
    }
    Ok(start_import(store, options, &request.text))
}

fn project_view(project: &Project) -> ProjectView {
    ProjectView {
        id: project.id.clone(),
        name: project.name.clone(),
        address: project.address.clone(),
        area: project.area,
        perimeter: project.perimeter,
        measurement_epoch: project.measurement_epoch.clone(),
        instrument: project.instrument.clone(),
        geodetic_system: project.geodetic_system.clone(),
        cartographic_projection: project.cartographic_projection.clone(),
    }
}

fn beneficiary_view(beneficiary: &Beneficiary) -> PartyView {
    PartyView {
        id: beneficiary.id.clone(),
        name: beneficiary.name.clone(),
        document: beneficiary.document.clone(),
        street: beneficiary.address.street.clone(),
        number: beneficiary.address.number.clone(),
        district: beneficiary.address.district.clone(),
        city: beneficiary.address.city.clone(),
        direction: None,
    }
}

fn confrontant_view(confrontant: &Confrontant) -> PartyView {
    PartyView {
        id: confrontant.id.clone(),
        name: confrontant.name.clone(),
        document: confrontant.document.clone(),
        street: confrontant.address.street.clone(),
        number: confrontant.address.number.clone(),
        district: confrontant.address.district.clone(),
        city: confrontant.address.city.clone(),
        direction: Some(confrontant.direction.label().to_string()),
    }
}

fn vertex_view(vertex: &Vertex, confrontant: Option<&Confrontant>) -> VertexView {
    VertexView {
        id: vertex.id.clone(),
        from_label: vertex.from_label.clone(),
        to_label: vertex.to_label.clone(),
        longitude: vertex.longitude.clone(),
        latitude: vertex.latitude.clone(),
        distance: vertex.distance,
        confrontant_id: vertex.confrontant_id.clone(),
        confrontant_name: confrontant.map(|confrontant| confrontant.name.clone()),
    }
}

fn technical_responsible_view(responsible: &TechnicalResponsible) -> TechnicalResponsibleView {
    TechnicalResponsibleView {
        id: responsible.id.clone(),
        name: responsible.name.clone(),
        role: responsible.role.clone(),
        registration: responsible.registration.clone(),
    }
}

fn beneficiary_draft(input: &PartyInput) -> BeneficiaryDraft {
    let mut draft = BeneficiaryDraft::new();
    draft
        .set_name(&input.name)
        .set_document(&input.document)
        .set_street(&input.street)
        .set_number(&input.number)
        .set_district(&input.district)
        .set_city(&input.city);
    draft
}

fn confrontant_draft(input: &PartyInput) -> Result<ConfrontantDraft, String> {
    let mut draft = ConfrontantDraft::new();
    draft
        .set_name(&input.name)
        .set_document(&input.document)
        .set_street(&input.street)
        .set_number(&input.number)
        .set_district(&input.district)
        .set_city(&input.city);
    if let Some(label) = input.direction.as_deref() {
        let direction = Direction::from_label(label)
            .ok_or_else(|| format!("unsupported direction `{label}`"))?;
        draft.set_direction(direction);
    }
    Ok(draft)
}

fn vertex_draft(input: &VertexInput) -> VertexDraft {
    let mut draft = VertexDraft::for_confrontant(&input.confrontant_id);
    draft
        .set_from_label(&input.from_label)
        .set_to_label(&input.to_label)
        .set_longitude(&input.longitude)
        .set_latitude(&input.latitude)
        .set_distance_text(&input.distance);
    draft
}

fn parse_delimiter(raw: &str) -> Result<Delimiter, String> {
    if raw.is_empty() {
        return Ok(Delimiter::default());
    }
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => {
            Delimiter::from_char(ch).ok_or_else(|| format!("unsupported delimiter `{raw}`"))
        }
        _ if raw == "\\t" => Ok(Delimiter::Tab),
        _ => Err(format!("unsupported delimiter `{raw}`")),
    }
}

fn parse_header_mode(raw: &str) -> Result<HeaderMode, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "detect" => Ok(HeaderMode::Detect),
        "always" => Ok(HeaderMode::Always),
        "never" => Ok(HeaderMode::Never),
        other => Err(format!(
            "unsupported header mode `{other}`; expected detect|always|never"
        )),
    }
}

fn count(len: usize) -> u32 {
    u32::try_from(len).unwrap_or(u32::MAX)
}

fn index(column: u32) -> usize {
    usize::try_from(column).unwrap_or(usize::MAX)
}
