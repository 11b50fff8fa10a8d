use notestore::{
    NewRecord, RecordPatch, RecordStore, RecordValidationError, StoreError, DEFAULT_CATEGORY,
};

#[test]
fn add_and_get_roundtrip() {
    let store = RecordStore::open_in_memory().unwrap();

    let draft = NewRecord::new("shopping list")
        .with_content("milk, bread")
        .with_category("errands");
    let id = store.add(&draft).unwrap();

    let record = store.get(id).unwrap().unwrap();
    assert_eq!(record.id, id);
    assert_eq!(record.title, "shopping list");
    assert_eq!(record.content, "milk, bread");
    assert_eq!(record.category, "errands");
    // datetime('now') shape: YYYY-MM-DD HH:MM:SS
    assert_eq!(record.created_at.len(), 19);
    assert!(record.created_at.starts_with("20"));
}

#[test]
fn add_uses_defaults_for_content_and_category() {
    let store = RecordStore::open_in_memory().unwrap();

    let id = store.add(&NewRecord::new("bare title")).unwrap();
    let record = store.get(id).unwrap().unwrap();
    assert_eq!(record.content, "");
    assert_eq!(record.category, DEFAULT_CATEGORY);
}

#[test]
fn ids_are_strictly_increasing_and_not_reused() {
    let store = RecordStore::open_in_memory().unwrap();

    let first = store.add(&NewRecord::new("first")).unwrap();
    let second = store.add(&NewRecord::new("second")).unwrap();
    assert!(second > first);

    assert!(store.delete(second).unwrap());
    let third = store.add(&NewRecord::new("third")).unwrap();
    assert!(third > second);
}

#[test]
fn add_with_empty_title_fails_and_leaves_store_unchanged() {
    let store = RecordStore::open_in_memory().unwrap();

    let err = store.add(&NewRecord::new("")).unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::EmptyTitle)
    ));

    let err = store.add(&NewRecord::new("   ")).unwrap_err();
    assert!(matches!(err, StoreError::Validation(_)));

    assert_eq!(store.stats().unwrap().total, 0);
}

#[test]
fn get_unknown_id_returns_none() {
    let store = RecordStore::open_in_memory().unwrap();
    assert!(store.get(42).unwrap().is_none());
}

#[test]
fn update_applies_only_supplied_fields() {
    let store = RecordStore::open_in_memory().unwrap();
    let id = store
        .add(
            &NewRecord::new("draft")
                .with_content("original body")
                .with_category("inbox"),
        )
        .unwrap();

    let changed = store
        .update(id, &RecordPatch::default().title("final"))
        .unwrap();
    assert!(changed);

    let record = store.get(id).unwrap().unwrap();
    assert_eq!(record.title, "final");
    assert_eq!(record.content, "original body");
    assert_eq!(record.category, "inbox");
}

#[test]
fn update_can_clear_content_to_empty() {
    let store = RecordStore::open_in_memory().unwrap();
    let id = store
        .add(&NewRecord::new("note").with_content("to be cleared"))
        .unwrap();

    assert!(store.update(id, &RecordPatch::default().content("")).unwrap());
    assert_eq!(store.get(id).unwrap().unwrap().content, "");
}

#[test]
fn update_with_empty_patch_returns_false_and_changes_nothing() {
    let store = RecordStore::open_in_memory().unwrap();
    let id = store.add(&NewRecord::new("stable")).unwrap();
    let before = store.get(id).unwrap().unwrap();

    assert!(!store.update(id, &RecordPatch::default()).unwrap());
    assert_eq!(store.get(id).unwrap().unwrap(), before);
}

#[test]
fn update_unknown_id_returns_false() {
    let store = RecordStore::open_in_memory().unwrap();
    let changed = store
        .update(999, &RecordPatch::default().title("ghost"))
        .unwrap();
    assert!(!changed);
}

#[test]
fn update_rejects_empty_title_and_changes_nothing() {
    let store = RecordStore::open_in_memory().unwrap();
    let id = store.add(&NewRecord::new("keep me")).unwrap();

    let err = store
        .update(id, &RecordPatch::default().title("").content("new body"))
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::Validation(RecordValidationError::EmptyTitle)
    ));

    let record = store.get(id).unwrap().unwrap();
    assert_eq!(record.title, "keep me");
    assert_eq!(record.content, "");
}

#[test]
fn update_does_not_touch_created_at() {
    let store = RecordStore::open_in_memory().unwrap();
    let id = store.add(&NewRecord::new("timestamped")).unwrap();
    let created_at = store.get(id).unwrap().unwrap().created_at;

    assert!(store
        .update(id, &RecordPatch::default().title("renamed"))
        .unwrap());
    assert_eq!(store.get(id).unwrap().unwrap().created_at, created_at);
}

#[test]
fn delete_is_idempotent_in_effect() {
    let store = RecordStore::open_in_memory().unwrap();
    let id = store.add(&NewRecord::new("doomed")).unwrap();

    assert!(store.delete(id).unwrap());
    assert!(store.get(id).unwrap().is_none());
    assert!(!store.delete(id).unwrap());
}
