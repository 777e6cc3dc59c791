// tests/support.rs
//! Test fixtures: datasets, light KDF parameters, stores
#![allow(dead_code)]

use std::num::NonZeroU32;
use std::path::Path;

use serde_json::{json, Map, Value};
use trackamole_backup::{
    AbcdeFlag, ConditionType, Dataset, Gender, KdfParams, LesionCount, Mole, MoleEntry, Photo,
    SqliteStore,
};

/// Fast Argon2id parameters; production defaults would make tests crawl
pub fn light_kdf() -> KdfParams {
    KdfParams::new(64, 1, 1)
}

pub const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// One mole, one entry: the canonical "Left Shoulder" scenario
pub fn left_shoulder() -> Dataset {
    let mole = Mole::new(
        1,
        "Left Shoulder",
        Gender::Male,
        [0.1, 0.2, 0.3],
        1_700_000_000_000,
    );
    let mut entry = MoleEntry::new(1, 1, 1_700_000_100_000, 4.5, "");
    entry.abcde = Some(vec![AbcdeFlag::A]);
    Dataset::new(vec![mole], vec![entry])
}

/// Every optional field populated somewhere, plus passthrough fields
pub fn rich_dataset() -> Dataset {
    let mut back = Mole::new(
        10,
        "Upper back",
        Gender::Female,
        [-0.25, 1.1, -0.07],
        1_690_000_000_000,
    );
    back.normal = Some([0.0, 0.1, -0.99]);
    back.starred = Some(true);
    back.condition = Some(ConditionType::Eczema);
    back.count = Some(LesionCount::Several);
    back.spread = Some(3.5);
    back.extra = extra(json!({ "colorHint": "#aa3300", "layer": 2 }));

    let mut arm = Mole::new(
        11,
        "Right forearm",
        Gender::Female,
        [0.4, 0.9, 0.05],
        1_690_000_500_000,
    );
    arm.count = Some(LesionCount::Exact(NonZeroU32::new(4).unwrap()));
    arm.starred = Some(false);

    let mut first = MoleEntry::new(100, 10, 1_690_100_000_000, 6.25, "itchy after sun");
    first.photo = Some(Photo::from_bytes("image/png", &PNG_MAGIC));
    first.texture = Some("rough".into());
    first.abcde = Some(vec![AbcdeFlag::B, AbcdeFlag::E]);
    first.severity = Some(7);
    first.symptoms = Some(vec!["itching".into(), "redness".into()]);
    first.flare_up = Some(true);
    first.reference_object = Some("coin".into());
    first.scale_reference = Some(0.82);
    first.extra = extra(json!({ "device": "pixel-7" }));

    let second = MoleEntry::new(101, 10, 1_690_200_000_000, 0.0, "cleared up");
    let third = MoleEntry::new(102, 11, 1_690_300_000_000, 2.0, "");

    Dataset::new(vec![back, arm], vec![first, second, third])
}

pub fn extra(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

pub fn sqlite_at(path: &Path) -> SqliteStore {
    SqliteStore::open(path, None).expect("open sqlite store")
}

pub fn seeded_sqlite(path: &Path, dataset: &Dataset) -> SqliteStore {
    use trackamole_backup::RecordStore;
    let mut store = sqlite_at(path);
    store.replace_all_records(dataset).expect("seed store");
    store
}
