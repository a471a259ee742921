//! Core database type and builder.

use crate::config::{DatabaseConfig, RootKind, SavePolicy};
use crate::dict::DictView;
use crate::error::{Error, Result};
use crate::list::ListView;
use crate::persist::{atomic_write, load};
use crate::registry;
use crate::serializer::{JsonSerializer, Serializer};
use crate::value::{self, Kind};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Address of an item inside the root container.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Position in an array root.
    Index(usize),
    /// Key in an object root.
    Name(String),
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Name(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Name(s)
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Name(s) => write!(f, "{s:?}"),
        }
    }
}

/// A JSON document backed by a single file.
///
/// Get one through [`Database::open`] or [`Database::builder`]; both go through
/// the process-wide registry, so every call for the same file hands back the
/// same `Arc<Database>` and mutations are visible through all of them.
///
/// Every write validates the incoming value in full before touching the root,
/// so a rejected call leaves the document exactly as it was.
///
/// The root sits behind a lock, which keeps the type `Send + Sync`, but there is
/// no transaction support: two threads interleaving read-modify-write sequences
/// will race at the application level.
pub struct Database {
    path: PathBuf,
    config: DatabaseConfig,
    serializer: JsonSerializer,
    root: RwLock<Value>,
}

impl Database {
    /// Open (or create) the database at `path` with default settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Arc<Database>> {
        Self::builder(path).open()
    }

    /// Start configuring a database at `path`.
    pub fn builder(path: impl AsRef<Path>) -> DatabaseBuilder {
        DatabaseBuilder::new(DatabaseConfig::new(path))
    }

    /// Start configuring a database at `<cwd>/db/<name>.json`.
    pub fn named(name: &str) -> DatabaseBuilder {
        DatabaseBuilder::new(DatabaseConfig::named(name))
    }

    /// Load a database outside the registry. Nothing is cached and no exit hook
    /// is installed.
    pub(crate) fn from_config(config: DatabaseConfig) -> Result<Database> {
        let path = config.resolved_path()?;
        value::validate(&config.default)?;
        let serializer = JsonSerializer::with_indent(config.indent);

        let root = match load(&path, &serializer)? {
            Some(root) => {
                if !config.root.admits(&root) {
                    return Err(Error::Load(format!(
                        "{}: root is {}, expected {}",
                        path.display(),
                        Kind::of(&root),
                        config.root.kind().map_or("any", Kind::name),
                    )));
                }
                tracing::debug!(path = %path.display(), kind = %Kind::of(&root), "loaded database");
                root
            }
            None => {
                tracing::debug!(path = %path.display(), "no file, seeding default");
                config.seed()
            }
        };

        Ok(Database {
            path,
            config,
            serializer,
            root: RwLock::new(root),
        })
    }

    // ---- reads ----

    /// Resolved absolute path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Settings this database was opened with.
    #[must_use]
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Declared root constraint.
    #[must_use]
    pub fn root_kind(&self) -> RootKind {
        self.config.root
    }

    /// Runtime variant of the current root.
    #[must_use]
    pub fn kind(&self) -> Kind {
        Kind::of(&*self.root.read())
    }

    /// Item at `key`: an index for array roots, a name for object roots.
    pub fn get(&self, key: impl Into<Key>) -> Result<Value> {
        let key = key.into();
        let root = self.root.read();
        match (&*root, &key) {
            (Value::Array(items), Key::Index(i)) => items
                .get(*i)
                .cloned()
                .ok_or_else(|| index_error(*i, items.len())),
            (Value::Object(map), Key::Name(name)) => map
                .get(name)
                .cloned()
                .ok_or_else(|| Error::Key(format!("{name:?}"))),
            (other, _) => Err(key_mismatch(other, &key)),
        }
    }

    /// `true` if `key` addresses an existing item. Never errors.
    #[must_use]
    pub fn contains(&self, key: impl Into<Key>) -> bool {
        match (&*self.root.read(), key.into()) {
            (Value::Array(items), Key::Index(i)) => i < items.len(),
            (Value::Object(map), Key::Name(name)) => map.contains_key(&name),
            _ => false,
        }
    }

    /// Number of items in the root container.
    pub fn count(&self) -> Result<usize> {
        match &*self.root.read() {
            Value::Array(items) => Ok(items.len()),
            Value::Object(map) => Ok(map.len()),
            other => Err(Error::TypeMismatch(format!(
                "{} root has no length",
                Kind::of(other)
            ))),
        }
    }

    /// `true` when the root container is empty. Scalars count as non-empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count().is_ok_and(|n| n == 0)
    }

    /// Deep copy of the root. Mutating it never affects the database.
    #[must_use]
    pub fn copy(&self) -> Value {
        self.root.read().clone()
    }

    /// Borrow the root for the duration of `f` without copying it.
    pub fn with_root<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&*self.root.read())
    }

    /// Structural equality between the root and `other`.
    #[must_use]
    pub fn equals(&self, other: &Value) -> bool {
        *self.root.read() == *other
    }

    // ---- writes ----

    /// Store `value` at `key`. Array roots overwrite in range and refuse to
    /// grow; object roots insert or overwrite.
    pub fn set_item<T>(&self, key: impl Into<Key>, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        let value = value::to_value(value)?;
        self.mutate(|root| match (root, &key) {
            (Value::Array(items), Key::Index(i)) => {
                let len = items.len();
                let slot = items.get_mut(*i).ok_or_else(|| index_error(*i, len))?;
                *slot = value;
                Ok(())
            }
            (Value::Object(map), Key::Name(name)) => {
                map.insert(name.clone(), value);
                Ok(())
            }
            (other, _) => Err(key_mismatch(other, &key)),
        })
    }

    /// Delete the item at `key` and return it.
    pub fn remove(&self, key: impl Into<Key>) -> Result<Value> {
        let key = key.into();
        self.mutate(|root| match (root, &key) {
            (Value::Array(items), Key::Index(i)) => {
                if *i < items.len() {
                    Ok(items.remove(*i))
                } else {
                    Err(index_error(*i, items.len()))
                }
            }
            (Value::Object(map), Key::Name(name)) => map
                .shift_remove(name)
                .ok_or_else(|| Error::Key(format!("{name:?}"))),
            (other, _) => Err(key_mismatch(other, &key)),
        })
    }

    /// Swap the whole root for `value`. Fails if a root constraint is declared
    /// and `value` doesn't satisfy it.
    pub fn replace_root<T>(&self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = value::to_value(value)?;
        if !self.config.root.admits(&value) {
            return Err(Error::TypeMismatch(format!(
                "root must be {}, got {}",
                self.config.root.kind().map_or("any", Kind::name),
                Kind::of(&value)
            )));
        }
        self.mutate(|root| {
            *root = value;
            Ok(())
        })
    }

    /// Reset the root to an empty container of the declared kind, or to the
    /// configured default when no container kind is declared.
    pub fn clear(&self) -> Result<()> {
        let seed = self.config.seed();
        self.mutate(|root| {
            *root = seed;
            Ok(())
        })
    }

    // ---- views ----

    /// List operations. Fails unless the root is currently an array.
    pub fn list(&self) -> Result<ListView<'_>> {
        ListView::new(self)
    }

    /// Dict operations. Fails unless the root is currently an object.
    pub fn dict(&self) -> Result<DictView<'_>> {
        DictView::new(self)
    }

    // ---- persistence ----

    /// Write the root to disk with the configured formatting.
    pub fn save(&self) -> Result<()> {
        self.save_with(&self.serializer)
    }

    /// Write the root to disk with one-off formatting options.
    pub fn save_with<S: Serializer>(&self, serializer: &S) -> Result<()> {
        self.write_out(&*self.root.read(), serializer)
    }

    fn write_out<S: Serializer>(&self, root: &Value, serializer: &S) -> Result<()> {
        let bytes = serializer.serialize(root)?;
        atomic_write(&self.path, &bytes)?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "saved database");
        Ok(())
    }

    // ---- internal ----

    /// Run `f` under the write lock. `f` must leave the root untouched when it
    /// returns an error. Under [`SavePolicy::Immediate`] the change is rolled
    /// back if it can't be written to disk.
    pub(crate) fn mutate<R>(&self, f: impl FnOnce(&mut Value) -> Result<R>) -> Result<R> {
        let mut root = self.root.write();
        match self.config.policy {
            SavePolicy::Immediate => {
                let previous = root.clone();
                let out = f(&mut *root)?;
                if let Err(e) = self.write_out(&*root, &self.serializer) {
                    *root = previous;
                    return Err(e);
                }
                Ok(out)
            }
            SavePolicy::Manual => f(&mut *root),
        }
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&Value) -> R) -> R {
        f(&*self.root.read())
    }
}

impl PartialEq<Value> for Database {
    fn eq(&self, other: &Value) -> bool {
        self.equals(other)
    }
}

impl PartialEq for Database {
    fn eq(&self, other: &Database) -> bool {
        std::ptr::eq(self, other) || *self.root.read() == *other.root.read()
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .field("root", &self.config.root)
            .field("policy", &self.config.policy)
            .finish_non_exhaustive()
    }
}

pub(crate) fn index_error(i: usize, len: usize) -> Error {
    Error::Index(format!("index {i} out of range for length {len}"))
}

fn key_mismatch(root: &Value, key: &Key) -> Error {
    let by = match key {
        Key::Index(_) => "an index",
        Key::Name(_) => "a name",
    };
    Error::TypeMismatch(format!("cannot address {} root by {by} ({key})", Kind::of(root)))
}

pub(crate) fn as_array(root: &Value) -> Result<&Vec<Value>> {
    root.as_array()
        .ok_or_else(|| Error::TypeMismatch(format!("expected array root, got {}", Kind::of(root))))
}

pub(crate) fn as_array_mut(root: &mut Value) -> Result<&mut Vec<Value>> {
    let kind = Kind::of(root);
    root.as_array_mut()
        .ok_or_else(|| Error::TypeMismatch(format!("expected array root, got {kind}")))
}

pub(crate) fn as_object(root: &Value) -> Result<&Map<String, Value>> {
    root.as_object()
        .ok_or_else(|| Error::TypeMismatch(format!("expected object root, got {}", Kind::of(root))))
}

pub(crate) fn as_object_mut(root: &mut Value) -> Result<&mut Map<String, Value>> {
    let kind = Kind::of(root);
    root.as_object_mut()
        .ok_or_else(|| Error::TypeMismatch(format!("expected object root, got {kind}")))
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Configures and opens a [`Database`].
///
/// ```rust,no_run
/// use json_vault::{Database, RootKind};
///
/// let db = Database::builder("db/scores.json")
///     .root(RootKind::Array)
///     .indent(2)
///     .open()
///     .unwrap();
/// db.list().unwrap().append(&10).unwrap();
/// db.save().unwrap();
/// ```
pub struct DatabaseBuilder {
    config: DatabaseConfig,
    error: Option<Error>,
}

impl DatabaseBuilder {
    /// Builder seeded from an explicit config.
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            error: None,
        }
    }

    /// Seed value when the file doesn't exist and no container root is
    /// declared. Rejected values surface from [`open`](Self::open).
    pub fn default<T>(mut self, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        match value::to_value(value) {
            Ok(v) => self.config.default = v,
            Err(e) => {
                self.error.get_or_insert(e);
            }
        }
        self
    }

    /// Declare the root constraint (default: [`RootKind::Any`]).
    pub fn root(mut self, root: RootKind) -> Self {
        self.config.root = root;
        self
    }

    /// Save once at normal process exit (default: `true`).
    pub fn save_at_exit(mut self, yes: bool) -> Self {
        self.config.save_at_exit = yes;
        self
    }

    /// Indent width in spaces (default: 4).
    pub fn indent(mut self, width: usize) -> Self {
        self.config.indent = Some(width);
        self
    }

    /// Write single-line JSON instead of indented.
    pub fn compact(mut self) -> Self {
        self.config.indent = None;
        self
    }

    /// Set the save policy (default: [`SavePolicy::Manual`]).
    pub fn policy(mut self, policy: SavePolicy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Config as it stands.
    #[must_use]
    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Return the registered database for this path, loading it on first use.
    /// Settings are ignored when the path is already open.
    pub fn open(self) -> Result<Arc<Database>> {
        if let Some(err) = self.error {
            return Err(err);
        }
        registry::open(self.config)
    }

    /// Load a private instance that bypasses the registry and the exit hook.
    /// Handy for reading what another handle left on disk.
    pub fn load(self) -> Result<Database> {
        if let Some(err) = self.error {
            return Err(err);
        }
        Database::from_config(self.config)
    }
}

impl std::fmt::Debug for DatabaseBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseBuilder")
            .field("path", &self.config.path)
            .field("root", &self.config.root)
            .field("save_at_exit", &self.config.save_at_exit)
            .field("indent", &self.config.indent)
            .field("policy", &self.config.policy)
            .finish()
    }
}
