mod common;

use common::{builder, temp_path};
use json_vault::{json, shutdown, Database, Error, RootKind, SavePolicy};

#[test]
fn manual_policy_writes_only_on_save() {
    let (_dir, path) = temp_path("manual");
    let db = builder(&path).root(RootKind::Array).open().unwrap();
    db.list().unwrap().append(&1).unwrap();
    assert!(!path.exists());
    db.save().unwrap();
    assert!(path.exists());
}

#[test]
fn immediate_policy_writes_after_each_mutation() {
    let (_dir, path) = temp_path("immediate");
    let db = builder(&path)
        .root(RootKind::Object)
        .policy(SavePolicy::Immediate)
        .open()
        .unwrap();
    db.dict().unwrap().insert("x", &42).unwrap();
    let fresh = builder(&path).load().unwrap();
    assert_eq!(fresh.copy(), json!({"x": 42}));
}

#[test]
fn immediate_policy_skips_rejected_writes() {
    let (_dir, path) = temp_path("immediate_reject");
    let db = builder(&path)
        .root(RootKind::Array)
        .policy(SavePolicy::Immediate)
        .open()
        .unwrap();
    assert!(db.list().unwrap().append(&f64::NAN).is_err());
    assert!(!path.exists());
}

#[test]
fn immediate_policy_rolls_back_when_the_write_fails() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    let path = blocker.join("doc.json");
    let db = builder(&path)
        .root(RootKind::Array)
        .policy(SavePolicy::Immediate)
        .open()
        .unwrap();
    db.list().unwrap().append(&1).unwrap();

    std::fs::remove_dir_all(&blocker).unwrap();
    std::fs::write(&blocker, "not a directory").unwrap();

    let err = db.list().unwrap().append(&2).unwrap_err();
    assert!(matches!(err, Error::Save(_)));
    assert_eq!(db.copy(), json!([1]));
    assert!(db.set_item(0usize, &"changed").is_err());
    assert_eq!(db.copy(), json!([1]));
}

#[test]
fn save_all_flushes_exit_queue() {
    // the exit handler saves this again when the test binary exits, so keep it
    // out of a TempDir that will be gone by then
    let path = std::env::temp_dir().join("json_vault_test_exit_queue.json");
    let _ = std::fs::remove_file(&path);
    let db = Database::builder(&path)
        .root(RootKind::Array)
        .save_at_exit(true)
        .open()
        .unwrap();
    db.list().unwrap().append(&"pending").unwrap();
    assert!(shutdown::queued() >= 1);

    shutdown::save_all().unwrap();
    let fresh = builder(&path).load().unwrap();
    assert_eq!(fresh.copy(), json!(["pending"]));

    let queued = shutdown::queued();
    let again = Database::open(&path).unwrap();
    assert!(std::sync::Arc::ptr_eq(&db, &again));
    assert_eq!(shutdown::queued(), queued);
}
