use memorial_core::db::DbError;
use memorial_core::service::import_service::{apply_import, start_import};
use memorial_core::{
    Beneficiary, Confrontant, Direction, ImportOptions, KeyValueStore, KvError, MemorialStore,
    NoticeKind, Project,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory store that starts refusing writes once its budget is spent.
#[derive(Default)]
struct BudgetedStore {
    entries: RefCell<HashMap<String, String>>,
    writes_left: Cell<Option<usize>>,
}

impl BudgetedStore {
    fn refuse_writes_after(&self, writes: usize) {
        self.writes_left.set(Some(writes));
    }

    fn spend_write(&self) -> Result<(), KvError> {
        match self.writes_left.get() {
            Some(0) => Err(KvError::Db(DbError::Sqlite(
                rusqlite::Error::QueryReturnedNoRows,
            ))),
            Some(left) => {
                self.writes_left.set(Some(left - 1));
                Ok(())
            }
            None => Ok(()),
        }
    }
}

impl KeyValueStore for BudgetedStore {
    fn get(&self, key: &str) -> Result<Option<String>, KvError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        self.spend_write()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), KvError> {
        self.spend_write()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> Result<(), KvError> {
        self.spend_write()?;
        let mut map = self.entries.borrow_mut();
        for (key, value) in entries {
            map.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}

fn last_notice_kind(store: &mut MemorialStore<&BudgetedStore>) -> Option<NoticeKind> {
    store.take_notices().pop().map(|notice| notice.kind)
}

#[test]
fn failed_save_leaves_memory_untouched() {
    let kv = BudgetedStore::default();
    let mut store = MemorialStore::open(&kv).unwrap();
    kv.refuse_writes_after(0);

    assert!(store.add_beneficiary(Beneficiary::new("Ana", "1")).is_err());
    assert!(store.beneficiaries().is_empty());
    assert_eq!(last_notice_kind(&mut store), Some(NoticeKind::Destructive));

    assert!(store.set_project(Project::new("Sitio")).is_err());
    assert!(store.project().is_none());
}

#[test]
fn failed_update_and_remove_keep_previous_records() {
    let kv = BudgetedStore::default();
    let mut store = MemorialStore::open(&kv).unwrap();
    let id = store
        .add_confrontant(Confrontant::new("Joao", "2", Direction::Front))
        .unwrap();
    let before = store.snapshot().clone();
    store.take_notices();
    kv.refuse_writes_after(0);

    assert!(store
        .update_confrontant(&id, Confrontant::new("Jose", "3", Direction::Back))
        .is_err());
    assert!(store.remove_confrontant(&id).is_err());
    assert_eq!(store.snapshot(), &before);

    let titles = store
        .take_notices()
        .into_iter()
        .map(|notice| notice.title)
        .collect::<Vec<_>>();
    assert_eq!(titles, vec!["Falha ao salvar", "Falha ao salvar"]);
}

#[test]
fn failed_reset_keeps_state_in_memory_and_storage() {
    let kv = BudgetedStore::default();
    let mut store = MemorialStore::open(&kv).unwrap();
    store.set_project(Project::new("Sitio")).unwrap();
    kv.refuse_writes_after(0);

    assert!(store.reset().is_err());
    assert_eq!(store.project().unwrap().name, "Sitio");

    let reopened = MemorialStore::open(&kv).unwrap();
    assert_eq!(reopened.project().unwrap().name, "Sitio");
}

#[test]
fn import_keeps_saved_vertices_when_address_fill_fails() {
    let kv = BudgetedStore::default();
    let mut store = MemorialStore::open(&kv).unwrap();
    store.set_project(Project::new("Sitio")).unwrap();
    store.take_notices();

    let session = start_import(
        &store,
        ImportOptions::default(),
        "V1,V2,45W,23S,10,C1,Rua das Flores 100",
    );
    kv.refuse_writes_after(1);

    let outcome = apply_import(&mut store, &session).unwrap();
    assert_eq!(outcome.imported, 1);
    assert_eq!(outcome.address_applied, None);
    assert_eq!(store.vertices().len(), 1);
    assert!(!store.project().unwrap().has_address());

    let reopened = MemorialStore::open(&kv).unwrap();
    assert_eq!(reopened.vertices().len(), 1);
}
