//! End-to-end tests for the authority directory over a SQLite database file.

use fixit_core::authority::routing::directory_keys_for;
use fixit_core::authority::{AuthorityPatch, OverrideTable, OVERRIDES_KEY};
use fixit_core::{AuthorityStore, Database, KeyValueStore};

fn open_db(dir: &tempfile::TempDir) -> Database {
    let db = Database::new(dir.path().join("fixit.db")).expect("failed to open db");
    db.initialize().expect("failed to initialize db");
    db
}

#[test]
fn test_email_edit_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let store = AuthorityStore::new(open_db(&dir));
        store.update_email("Community and Safety", "safe-bfp", "bfp.olongapo@bfp.gov.ph");
    }

    let store = AuthorityStore::new(open_db(&dir));
    let list = store.get_for_category("community and safety");
    let bfp = list.iter().find(|a| a.id == "safe-bfp").unwrap();
    assert_eq!(bfp.email, "bfp.olongapo@bfp.gov.ph");
    assert_eq!(bfp.name, "Bureau of Fire Protection – Olongapo City");
    assert_eq!(list.len(), 5);
}

#[test]
fn test_round_trip_through_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let store = AuthorityStore::new(open_db(&dir));

    let mut table = OverrideTable::new();
    table.insert(
        "environment and public spaces".into(),
        vec![AuthorityPatch::email("env-ppmo", "ppmo@olongapocity.gov.ph")],
    );
    store.save_overrides(&table);
    assert_eq!(store.load_overrides(), Some(table));
}

#[test]
fn test_corrupt_row_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    db.set(OVERRIDES_KEY, "[1, 2").unwrap();

    let store = AuthorityStore::new(db);
    assert_eq!(store.all(), store.get_defaults());

    // the next edit replaces the unreadable payload
    store.update_email("others", "other-sbma", "records@sbma.com");
    assert_eq!(
        store.find("others", "other-sbma").unwrap().email,
        "records@sbma.com"
    );
}

#[test]
fn test_routing_feeds_directory_lookup() {
    let dir = tempfile::tempdir().unwrap();
    let store = AuthorityStore::new(open_db(&dir));

    let keys = directory_keys_for("Clogged drainage / waste");
    assert_eq!(keys, vec!["sanitation and waste"]);
    let ids: Vec<String> = keys
        .iter()
        .flat_map(|k| store.get_for_category(k))
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec!["san-esmo", "san-cenro"]);

    let fallback: Vec<String> = directory_keys_for("stray dogs")
        .iter()
        .flat_map(|k| store.get_for_category(k))
        .map(|a| a.id)
        .collect();
    assert_eq!(fallback, vec!["default-mayor", "other-sbma", "other-dswd", "other-deped"]);
}
