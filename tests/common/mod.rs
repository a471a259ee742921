#![allow(dead_code)]

use json_vault::{Database, DatabaseBuilder};
use std::path::PathBuf;
use tempfile::TempDir;

/// Fresh directory plus a file path inside it. Keep the `TempDir` alive for
/// the whole test, the directory is deleted when it drops.
pub fn temp_path(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{name}.json"));
    (dir, path)
}

/// Builder with the exit save turned off so tests don't write into deleted
/// temp dirs when the test binary exits.
pub fn builder(path: &PathBuf) -> DatabaseBuilder {
    Database::builder(path).save_at_exit(false)
}
