//! tests/model_tests.rs
//! Dataset validation rules

mod support;
use support::{left_shoulder, rich_dataset};

use trackamole_backup::model::validate;
use trackamole_backup::{AbcdeFlag, Dataset, MoleEntry, Photo, ValidationError};

#[test]
fn valid_datasets_pass_unchanged() {
    for dataset in [Dataset::default(), left_shoulder(), rich_dataset()] {
        let checked = validate(dataset.clone()).expect("valid dataset");
        assert_eq!(checked, dataset);
    }
}

#[test]
fn dangling_mole_reference_is_rejected() {
    let mut dataset = left_shoulder();
    dataset.entries.push(MoleEntry::new(2, 99, 1_700_000_200_000, 1.0, ""));

    assert_eq!(
        validate(dataset),
        Err(ValidationError::DanglingMoleRef {
            entry_id: 2,
            mole_id: 99
        })
    );
}

#[test]
fn entries_without_moles_are_dangling() {
    let dataset = Dataset::new(vec![], left_shoulder().entries);
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::DanglingMoleRef { mole_id: 1, .. })
    ));
}

#[test]
fn duplicate_ids_are_rejected() {
    let mut dataset = left_shoulder();
    dataset.moles.push(dataset.moles[0].clone());
    assert_eq!(validate(dataset), Err(ValidationError::DuplicateMoleId(1)));

    let mut dataset = left_shoulder();
    dataset.entries.push(dataset.entries[0].clone());
    assert_eq!(validate(dataset), Err(ValidationError::DuplicateEntryId(1)));
}

#[test]
fn empty_label_is_rejected() {
    let mut dataset = left_shoulder();
    dataset.moles[0].label.clear();
    assert_eq!(validate(dataset), Err(ValidationError::EmptyLabel(1)));
}

#[test]
fn whitespace_label_is_kept() {
    let mut dataset = left_shoulder();
    dataset.moles[0].label = " ".into();
    let checked = validate(dataset).expect("whitespace label is a label");
    assert_eq!(checked.moles[0].label, " ");
}

#[test]
fn numeric_fields_must_be_finite_and_in_range() {
    let mut dataset = left_shoulder();
    dataset.moles[0].position[1] = f64::NAN;
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::NonFinite {
            field: "position",
            ..
        })
    ));

    let mut dataset = left_shoulder();
    dataset.entries[0].size = -0.5;
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::OutOfRange { field: "size", .. })
    ));

    let mut dataset = left_shoulder();
    dataset.entries[0].size = f64::INFINITY;
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::NonFinite { field: "size", .. })
    ));

    let mut dataset = left_shoulder();
    dataset.entries[0].severity = Some(11);
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::OutOfRange {
            field: "severity",
            ..
        })
    ));

    let mut dataset = left_shoulder();
    dataset.moles[0].spread = Some(0.0);
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::OutOfRange {
            field: "spread",
            ..
        })
    ));

    let mut dataset = left_shoulder();
    dataset.moles[0].created_at = -1;
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::OutOfRange {
            field: "createdAt",
            ..
        })
    ));
}

#[test]
fn zero_size_and_empty_notes_are_fine() {
    let mut dataset = left_shoulder();
    dataset.entries[0].size = 0.0;
    dataset.entries[0].notes.clear();
    dataset.entries[0].severity = Some(0);
    assert!(validate(dataset).is_ok());
}

#[test]
fn normal_is_not_checked_for_unit_length() {
    let mut dataset = left_shoulder();
    dataset.moles[0].normal = Some([3.0, 0.0, 4.0]);
    assert!(validate(dataset).is_ok());
}

#[test]
fn abcde_letters_appear_at_most_once() {
    let mut dataset = left_shoulder();
    dataset.entries[0].abcde = Some(vec![AbcdeFlag::A, AbcdeFlag::C, AbcdeFlag::A]);
    assert_eq!(
        validate(dataset),
        Err(ValidationError::RepeatedAbcdeFlag {
            entry_id: 1,
            flag: 'A'
        })
    );
}

#[test]
fn photos_must_be_base64_image_data_urls() {
    let mut dataset = left_shoulder();
    dataset.entries[0].photo = Some(Photo::from_data_url("https://example.org/a.png"));
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::InvalidPhoto { entry_id: 1, .. })
    ));

    let mut dataset = left_shoulder();
    dataset.entries[0].photo = Some(Photo::from_data_url("data:image/jpeg;base64,@@@not-b64"));
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::InvalidPhoto { .. })
    ));

    let mut dataset = left_shoulder();
    dataset.entries[0].photo = Some(Photo::from_bytes("text/html", b"<script>"));
    assert!(matches!(
        validate(dataset),
        Err(ValidationError::InvalidPhoto { .. })
    ));
}

#[test]
fn blob_photo_has_its_own_error() {
    let mut dataset = left_shoulder();
    dataset.entries[0].photo = Some(Photo::from_data_url("blob:http://localhost/abc"));
    let err = validate(dataset).unwrap_err();
    assert_eq!(err, ValidationError::BlobPhoto { entry_id: 1 });
    assert!(err.to_string().contains("blob: URL"));
    assert!(err.to_string().contains("base64 data URL"));
}

#[test]
fn summary_counts_photos() {
    let summary = rich_dataset().summary();
    assert_eq!(summary.moles, 2);
    assert_eq!(summary.entries, 3);
    assert_eq!(summary.photos, 1);
    assert_eq!(
        summary.to_string(),
        "2 mole(s), 3 entries (1 with photo)"
    );
}

#[test]
fn entries_for_filters_by_mole() {
    let dataset = rich_dataset();
    let ids: Vec<i64> = dataset.entries_for(10).map(|e| e.id).collect();
    assert_eq!(ids, vec![100, 101]);
    assert!(dataset.mole(11).is_some());
    assert!(dataset.mole(12).is_none());
    assert!(dataset.entries[0].has_flag(AbcdeFlag::E));
    assert!(!dataset.entries[0].has_flag(AbcdeFlag::A));
}
