use memorial_core::db::{open_db, open_db_in_memory};
use memorial_core::repo::snapshot_repo::{
    load_snapshot, ALL_KEYS, PROJECT_KEY, TECHNICAL_RESPONSIBLE_KEY, VERTICES_KEY,
};
use memorial_core::repo::snapshot_repo::SnapshotError;
use memorial_core::{
    Beneficiary, Confrontant, Direction, KeyValueStore, MemorialStore, PostalAddress, Project,
    SqliteKeyValueStore, StoreError, TechnicalResponsible, Vertex,
};

#[test]
fn session_state_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memorial.db");

    let expected = {
        let conn = open_db(&path).unwrap();
        let mut store = MemorialStore::open(SqliteKeyValueStore::new(&conn)).unwrap();

        let mut project = Project::new("Sitio Boa Vista");
        project.area = 1250.5;
        project.perimeter = 142.0;
        project.geodetic_system = "SIRGAS 2000".to_string();
        store.set_project(project).unwrap();

        let mut beneficiary = Beneficiary::new("Ana", "123.456.789-01");
        beneficiary.address = PostalAddress {
            street: "Rua A".to_string(),
            number: "10".to_string(),
            district: "Centro".to_string(),
            city: "Campinas".to_string(),
        };
        store.add_beneficiary(beneficiary).unwrap();
        let confrontant_id = store
            .add_confrontant(Confrontant::new("Joao", "987.654.321-00", Direction::Left))
            .unwrap();
        store
            .add_vertex(Vertex::new("V1", "V2", "45W", "23S", 10.5, confrontant_id.clone()))
            .unwrap();
        store
            .add_vertex(Vertex::new("V2", "V1", "46W", "24S", 20.0, confrontant_id))
            .unwrap();
        store
            .set_technical_responsible(TechnicalResponsible::new("Carlos", "Técnico", "CFT 1"))
            .unwrap();
        store.snapshot().clone()
    };

    let conn = open_db(&path).unwrap();
    let reopened = MemorialStore::open(SqliteKeyValueStore::new(&conn)).unwrap();
    assert_eq!(reopened.snapshot(), &expected);
    assert_eq!(reopened.vertices()[0].from_label, "V1");
    assert_eq!(reopened.beneficiaries()[0].address.city, "Campinas");
}

#[test]
fn every_slot_uses_its_fixed_key() {
    let conn = open_db_in_memory().unwrap();
    let mut store = MemorialStore::open(SqliteKeyValueStore::new(&conn)).unwrap();
    store.set_project(Project::new("Sitio")).unwrap();
    store
        .set_technical_responsible(TechnicalResponsible::new("Carlos", "Técnico", "CFT 1"))
        .unwrap();

    let mut keys = SqliteKeyValueStore::new(&conn).keys().unwrap();
    keys.sort();
    let mut expected = ALL_KEYS.to_vec();
    expected.sort();
    assert_eq!(keys, expected);
}

#[test]
fn values_written_by_earlier_sessions_are_read() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    kv.set(
        PROJECT_KEY,
        r#"{"id":"p1","nome":"Lote 3","endereco":"","area":300,"perimetro":70,
            "epocaMedicao":"Jan/2024","instrumentoUtilizado":"GNSS"}"#,
    )
    .unwrap();
    kv.set(
        VERTICES_KEY,
        r#"[{"id":"v1","deVertice":"V1","paraVertice":"V2","longitude":"45W",
            "latitude":"23S","distancia":12,"confrontanteId":"C1"}]"#,
    )
    .unwrap();
    kv.set(
        TECHNICAL_RESPONSIBLE_KEY,
        r#"{"id":"r1","nome":"Carlos","cargo":"Técnico","registroCFT":"CFT 9"}"#,
    )
    .unwrap();

    let store = MemorialStore::open(&kv).unwrap();
    let project = store.project().unwrap();
    assert_eq!(project.name, "Lote 3");
    assert_eq!(project.area, 300.0);
    assert!(project.geodetic_system.is_empty());
    assert_eq!(store.vertices()[0].distance, 12.0);
    assert_eq!(
        store.technical_responsible().unwrap().registration,
        "CFT 9"
    );
}

#[test]
fn malformed_stored_value_fails_the_load() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    kv.set(VERTICES_KEY, "not json").unwrap();

    let err = load_snapshot(&kv).unwrap_err();
    assert!(matches!(err, SnapshotError::InvalidData { key, .. } if key == VERTICES_KEY));

    let store_err = MemorialStore::open(&kv).err().unwrap();
    assert!(matches!(store_err, StoreError::Snapshot(_)));
}
