//! Process-wide registry: one live [`Database`] per resolved file path.
//!
//! Entries are never evicted. A database opened once stays cached, along with
//! its root value, until the process exits.

use crate::config::DatabaseConfig;
use crate::database::Database;
use crate::error::Result;
use crate::shutdown;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

static OPEN_DATABASES: Lazy<Mutex<HashMap<PathBuf, Arc<Database>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Return the database registered for `config.path`, or load and register a
/// new one. Lookup and insert happen under one lock, so two threads racing on
/// the same path still end up with a single instance.
///
/// Only the first call for a path decides its settings; later configs are
/// ignored.
pub fn open(config: DatabaseConfig) -> Result<Arc<Database>> {
    let path = config.resolved_path()?;
    let mut databases = OPEN_DATABASES.lock();
    if let Some(db) = databases.get(&path) {
        tracing::debug!(path = %path.display(), "reusing open database");
        return Ok(Arc::clone(db));
    }

    let db = Arc::new(Database::from_config(config)?);
    if db.config().save_at_exit {
        shutdown::register(&db);
    }
    databases.insert(path, Arc::clone(&db));
    Ok(db)
}

/// Registered database for `path`, if any.
#[must_use]
pub fn get(path: impl AsRef<Path>) -> Option<Arc<Database>> {
    let path = crate::config::resolve(path.as_ref()).ok()?;
    OPEN_DATABASES.lock().get(&path).cloned()
}

/// Number of registered databases.
#[must_use]
pub fn len() -> usize {
    OPEN_DATABASES.lock().len()
}

/// Resolved paths of every registered database.
#[must_use]
pub fn paths() -> Vec<PathBuf> {
    OPEN_DATABASES.lock().keys().cloned().collect()
}
