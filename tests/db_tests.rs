//! tests/db_tests.rs
//! SQLite record store: snapshots, atomic replace, persistence

mod common;
mod support;
use support::{left_shoulder, rich_dataset, seeded_sqlite, sqlite_at};

use tempfile::tempdir;
use trackamole_backup::aliases::StoreKey;
use trackamole_backup::{
    export_data, import_data, ContainerKind, Dataset, ExportOptions, ImportStage, MoleEntry,
    RecordStore, SqliteStore,
};

#[test]
fn fresh_store_is_empty() {
    let store = SqliteStore::open_in_memory().unwrap();
    assert!(store.read_all_records().unwrap().is_empty());
}

#[test]
fn records_come_back_in_written_order_with_passthrough_fields() {
    let mut dataset = rich_dataset();
    // Ids out of order on purpose; the store must keep write order, not id order
    dataset.moles.reverse();
    dataset.entries.reverse();

    let mut store = SqliteStore::open_in_memory().unwrap();
    store.replace_all_records(&dataset).unwrap();

    let read = store.read_all_records().unwrap();
    assert_eq!(read, dataset);
    assert_eq!(read.moles[1].extra["colorHint"], "#aa3300");
}

#[test]
fn replace_drops_everything_that_was_there() {
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.replace_all_records(&rich_dataset()).unwrap();
    store.replace_all_records(&left_shoulder()).unwrap();
    assert_eq!(store.read_all_records().unwrap(), left_shoulder());

    store.replace_all_records(&Dataset::default()).unwrap();
    assert!(store.read_all_records().unwrap().is_empty());
}

#[test]
fn failed_replace_keeps_prior_contents() {
    common::setup();
    let mut store = SqliteStore::open_in_memory().unwrap();
    store.replace_all_records(&rich_dataset()).unwrap();

    // Dangling reference trips the foreign key after the deletes already ran
    let mut dangling = left_shoulder();
    dangling
        .entries
        .push(MoleEntry::new(2, 404, 1_700_000_000_000, 1.0, ""));
    assert!(store.replace_all_records(&dangling).is_err());
    assert_eq!(store.read_all_records().unwrap(), rich_dataset());

    // So does a repeated primary key
    let mut duplicate = left_shoulder();
    duplicate.moles.push(duplicate.moles[0].clone());
    assert!(store.replace_all_records(&duplicate).is_err());
    assert_eq!(store.read_all_records().unwrap(), rich_dataset());
}

#[test]
fn records_persist_across_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data").join("records.db");

    drop(seeded_sqlite(&path, &rich_dataset()));

    let reopened = sqlite_at(&path);
    assert_eq!(reopened.read_all_records().unwrap(), rich_dataset());
}

#[test]
fn keyed_store_reopens_with_its_key() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records.db");
    let key = StoreKey::new("local-store-key".to_owned());

    {
        let mut store = SqliteStore::open(&path, Some(&key)).unwrap();
        store.replace_all_records(&left_shoulder()).unwrap();
    }

    let store = SqliteStore::open(&path, Some(&key)).unwrap();
    assert_eq!(store.read_all_records().unwrap(), left_shoulder());
}

#[test]
fn backup_moves_records_between_sqlite_stores() {
    common::setup();
    let dir = tempdir().unwrap();
    let source = seeded_sqlite(&dir.path().join("phone.db"), &rich_dataset());
    let mut target = seeded_sqlite(&dir.path().join("laptop.db"), &left_shoulder());

    let options = ExportOptions {
        kdf: support::light_kdf(),
        pretty_json: false,
    };
    let file = export_data(&source, Some("correct-horse"), &options).unwrap();
    assert_eq!(file.kind, ContainerKind::Encrypted);

    let err = import_data(&mut target, &file.bytes, Some("wrong-horse")).unwrap_err();
    assert_eq!(err.stage, ImportStage::Decrypting);
    assert_eq!(target.read_all_records().unwrap(), left_shoulder());

    import_data(&mut target, &file.bytes, Some("correct-horse")).unwrap();
    assert_eq!(
        target.read_all_records().unwrap(),
        source.read_all_records().unwrap()
    );
}
