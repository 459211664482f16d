use memorial_core::db::open_db_in_memory;
use memorial_core::repo::snapshot_repo::{BENEFICIARIES_KEY, VERTICES_KEY};
use memorial_core::{
    Beneficiary, Confrontant, Direction, KeyValueStore, MemorialPart, MemorialStore, NoticeKind,
    Project, SqliteKeyValueStore, StoreError, TechnicalResponsible, Vertex,
};
use rusqlite::Connection;

fn open_store(conn: &Connection) -> MemorialStore<SqliteKeyValueStore<'_>> {
    MemorialStore::open(SqliteKeyValueStore::new(conn)).unwrap()
}

#[test]
fn fresh_store_is_empty_and_memorial_reports_every_gap() {
    let conn = open_db_in_memory().unwrap();
    let store = open_store(&conn);

    assert!(store.project().is_none());
    assert!(store.beneficiaries().is_empty());
    assert!(store.confrontants().is_empty());
    assert!(store.vertices().is_empty());
    assert!(store.technical_responsible().is_none());

    let err = store.memorial().unwrap_err();
    assert_eq!(err.missing.len(), 4);
}

#[test]
fn add_update_remove_beneficiary_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let id = store
        .add_beneficiary(Beneficiary::new("Ana", "123.456.789-01"))
        .unwrap();
    assert_eq!(store.beneficiaries().len(), 1);

    let updated = store
        .update_beneficiary(&id, Beneficiary::new("Ana Maria", "123.456.789-01"))
        .unwrap();
    assert!(updated);
    let loaded = store.beneficiary(&id).unwrap();
    assert_eq!(loaded.name, "Ana Maria");
    assert_eq!(loaded.id, id);

    assert!(store.remove_beneficiary(&id).unwrap());
    assert!(store.beneficiaries().is_empty());

    let titles = store
        .take_notices()
        .into_iter()
        .map(|notice| notice.title)
        .collect::<Vec<_>>();
    assert_eq!(
        titles,
        vec![
            "Beneficiário adicionado",
            "Beneficiário atualizado",
            "Beneficiário removido",
        ]
    );
    assert!(store.take_notices().is_empty());
}

#[test]
fn unknown_id_updates_and_removes_are_silent() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    store
        .add_beneficiary(Beneficiary::new("Ana", "123.456.789-01"))
        .unwrap();
    store.take_notices();
    let before = store.snapshot().clone();

    assert!(!store
        .update_beneficiary("missing", Beneficiary::new("X", "1"))
        .unwrap());
    assert!(!store.remove_beneficiary("missing").unwrap());
    assert!(!store.remove_vertex("missing").unwrap());
    assert!(!store.remove_confrontant("missing").unwrap());

    assert_eq!(store.snapshot(), &before);
    assert!(store.take_notices().is_empty());
}

#[test]
fn confrontant_in_use_cannot_be_removed() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let confrontant_id = store
        .add_confrontant(Confrontant::new("Joao", "987.654.321-00", Direction::Front))
        .unwrap();
    let vertex_id = store
        .add_vertex(Vertex::new("V1", "V2", "45W", "23S", 10.0, confrontant_id.clone()))
        .unwrap();
    store.take_notices();

    let err = store.remove_confrontant(&confrontant_id).unwrap_err();
    match err {
        StoreError::ConfrontantInUse { id, vertex_count } => {
            assert_eq!(id, confrontant_id);
            assert_eq!(vertex_count, 1);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.confrontants().len(), 1);
    let notices = store.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Destructive);

    assert!(store.remove_vertex(&vertex_id).unwrap());
    assert!(store.remove_confrontant(&confrontant_id).unwrap());
    assert!(store.confrontants().is_empty());
}

#[test]
fn vertex_with_unknown_confrontant_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let id = store
        .add_vertex(Vertex::new("V1", "V2", "45W", "23S", 3.0, "C9"))
        .unwrap();
    assert_eq!(store.vertex(&id).unwrap().confrontant_id, "C9");
}

#[test]
fn negative_distance_is_rejected_without_writing() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    let err = store
        .add_vertex(Vertex::new("V1", "V2", "45W", "23S", -1.0, "C1"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));
    assert!(store.vertices().is_empty());
    assert!(store.take_notices().is_empty());
    assert_eq!(SqliteKeyValueStore::new(&conn).get(VERTICES_KEY).unwrap(), None);
}

#[test]
fn mutations_are_written_through_immediately() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    store
        .add_beneficiary(Beneficiary::new("Ana", "123.456.789-01"))
        .unwrap();

    let raw = SqliteKeyValueStore::new(&conn)
        .get(BENEFICIARIES_KEY)
        .unwrap()
        .unwrap();
    assert!(raw.contains("\"nome\":\"Ana\""));
    assert!(raw.contains("\"documento\":\"123.456.789-01\""));
}

#[test]
fn memorial_is_available_once_required_parts_exist() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);

    store.set_project(Project::new("Sitio")).unwrap();
    store
        .add_beneficiary(Beneficiary::new("Ana", "123.456.789-01"))
        .unwrap();
    let confrontant_id = store
        .add_confrontant(Confrontant::new("Joao", "987.654.321-00", Direction::Back))
        .unwrap();
    assert_eq!(
        store.memorial().unwrap_err().missing,
        vec![MemorialPart::Vertices]
    );

    store
        .add_vertex(Vertex::new("V1", "V2", "45W", "23S", 1.0, confrontant_id))
        .unwrap();
    let memorial = store.memorial().unwrap();
    assert!(memorial.technical_responsible.is_none());

    store
        .set_technical_responsible(TechnicalResponsible::new("Carlos", "Técnico", "CFT 1"))
        .unwrap();
    assert_eq!(
        store.memorial().unwrap().technical_responsible.unwrap().name,
        "Carlos"
    );
}

#[test]
fn fill_project_address_only_writes_blank_addresses() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    assert!(!store.fill_project_address("Rua A, 10").unwrap());

    store.set_project(Project::new("Sitio")).unwrap();
    assert!(store.fill_project_address("Rua A, 10").unwrap());
    assert!(!store.fill_project_address("Rua B, 20").unwrap());
    assert_eq!(store.project().unwrap().address, "Rua A, 10");
}

#[test]
fn reset_clears_state_and_storage() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    store.set_project(Project::new("Sitio")).unwrap();
    store
        .add_beneficiary(Beneficiary::new("Ana", "123.456.789-01"))
        .unwrap();

    store.reset().unwrap();
    assert!(store.project().is_none());
    assert!(store.beneficiaries().is_empty());
    assert!(SqliteKeyValueStore::new(&conn).keys().unwrap().is_empty());

    let reopened = open_store(&conn);
    assert!(reopened.project().is_none());
}

#[test]
fn repeating_the_same_update_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let mut store = open_store(&conn);
    let confrontant_id = store
        .add_confrontant(Confrontant::new("Joao", "987.654.321-00", Direction::Front))
        .unwrap();
    let replacement = Confrontant::new("Joao Silva", "987.654.321-00", Direction::Right);

    assert!(store
        .update_confrontant(&confrontant_id, replacement.clone())
        .unwrap());
    let once = store.snapshot().clone();
    assert!(store
        .update_confrontant(&confrontant_id, replacement)
        .unwrap());

    assert_eq!(store.snapshot(), &once);
    assert_eq!(store.confrontants()[0].id, confrontant_id);
    assert_eq!(store.confrontants()[0].direction, Direction::Right);
}
