mod common;

use common::{builder, temp_path};
use json_vault::{json, Database, RootKind};
use std::process::Command;

const CHILD_ENV: &str = "JSON_VAULT_EXIT_PATH";

/// Runs inside a child process: mutate without saving and let the process end.
#[test]
#[ignore = "spawned by exit_hook_saves_on_normal_exit"]
fn child_writes_at_exit() {
    let Some(path) = std::env::var_os(CHILD_ENV) else {
        return;
    };
    let db = Database::builder(&path)
        .root(RootKind::Array)
        .open()
        .unwrap();
    db.list().unwrap().append("from child").unwrap();
}

#[test]
fn exit_hook_saves_on_normal_exit() {
    let (_dir, path) = temp_path("child_exit");
    let status = Command::new(std::env::current_exe().unwrap())
        .args(["child_writes_at_exit", "--exact", "--ignored", "--test-threads=1"])
        .env(CHILD_ENV, &path)
        .status()
        .unwrap();
    assert!(status.success());

    let fresh = builder(&path).root(RootKind::Array).load().unwrap();
    assert_eq!(fresh.copy(), json!(["from child"]));
}

#[test]
fn opting_out_skips_the_exit_save() {
    let (_dir, path) = temp_path("child_opt_out");
    let status = Command::new(std::env::current_exe().unwrap())
        .args(["child_opts_out", "--exact", "--ignored"])
        .env(CHILD_ENV, &path)
        .status()
        .unwrap();
    assert!(status.success());
    assert!(!path.exists());
}

#[test]
#[ignore = "spawned by opting_out_skips_the_exit_save"]
fn child_opts_out() {
    let Some(path) = std::env::var_os(CHILD_ENV) else {
        return;
    };
    let db = Database::builder(&path)
        .root(RootKind::Array)
        .save_at_exit(false)
        .open()
        .unwrap();
    db.list().unwrap().append("dropped").unwrap();
}
