use memorial_core::db::open_db_in_memory;
use memorial_core::{
    Beneficiary, Confrontant, Direction, MemorialStore, Project, SqliteKeyValueStore, Vertex,
};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Add(String),
    /// Index into the current list; out-of-range picks an unknown id.
    Update(usize, String),
    Remove(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[A-Za-z]{1,8}".prop_map(Op::Add),
        (0..6usize, "[A-Za-z]{1,8}").prop_map(|(index, name)| Op::Update(index, name)),
        (0..6usize).prop_map(Op::Remove),
    ]
}

proptest! {
    #[test]
    fn prop_beneficiaries_match_a_plain_list(ops in proptest::collection::vec(op_strategy(), 0..30)) {
        let conn = open_db_in_memory().unwrap();
        let mut store = MemorialStore::open(SqliteKeyValueStore::new(&conn)).unwrap();
        let mut model: Vec<(String, String)> = Vec::new();

        for op in ops {
            match op {
                Op::Add(name) => {
                    let id = store.add_beneficiary(Beneficiary::new(name.clone(), "1")).unwrap();
                    model.push((id, name));
                }
                Op::Update(index, name) => {
                    let id = model
                        .get(index)
                        .map_or_else(|| "unknown".to_string(), |(id, _)| id.clone());
                    let updated = store
                        .update_beneficiary(&id, Beneficiary::new(name.clone(), "1"))
                        .unwrap();
                    prop_assert_eq!(updated, index < model.len());
                    if let Some(entry) = model.get_mut(index) {
                        entry.1 = name;
                    }
                }
                Op::Remove(index) => {
                    let id = model
                        .get(index)
                        .map_or_else(|| "unknown".to_string(), |(id, _)| id.clone());
                    let removed = store.remove_beneficiary(&id).unwrap();
                    prop_assert_eq!(removed, index < model.len());
                    if index < model.len() {
                        model.remove(index);
                    }
                }
            }
        }

        let actual = store
            .beneficiaries()
            .iter()
            .map(|beneficiary| (beneficiary.id.clone(), beneficiary.name.clone()))
            .collect::<Vec<_>>();
        prop_assert_eq!(&actual, &model);

        let reopened = MemorialStore::open(SqliteKeyValueStore::new(&conn)).unwrap();
        prop_assert_eq!(reopened.beneficiaries(), store.beneficiaries());
    }

    #[test]
    fn prop_memorial_exists_iff_required_parts_present(
        with_project in any::<bool>(),
        beneficiaries in 0..3usize,
        confrontants in 0..3usize,
        vertices in 0..3usize,
    ) {
        let conn = open_db_in_memory().unwrap();
        let mut store = MemorialStore::open(SqliteKeyValueStore::new(&conn)).unwrap();

        if with_project {
            store.set_project(Project::new("Sitio")).unwrap();
        }
        for index in 0..beneficiaries {
            store.add_beneficiary(Beneficiary::new(format!("B{index}"), "1")).unwrap();
        }
        for index in 0..confrontants {
            store
                .add_confrontant(Confrontant::new(format!("C{index}"), "2", Direction::Front))
                .unwrap();
        }
        for index in 0..vertices {
            store
                .add_vertex(Vertex::new(format!("V{index}"), "V0", "45W", "23S", 1.0, "C1"))
                .unwrap();
        }

        let complete = with_project && beneficiaries > 0 && confrontants > 0 && vertices > 0;
        prop_assert_eq!(store.memorial().is_ok(), complete);
    }
}
