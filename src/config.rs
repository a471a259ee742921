//! Construction parameters and path resolution.

use crate::error::{Error, Result};
use crate::serializer::DEFAULT_INDENT;
use crate::value::Kind;
use serde_json::Value;
use std::path::{Component, Path, PathBuf};

/// Folder used by [`DatabaseConfig::named`], relative to the working directory.
pub const DEFAULT_FOLDER: &str = "db";

/// File extension used by [`DatabaseConfig::named`].
pub const DEFAULT_EXTENSION: &str = "json";

/// Restriction on the variant of the root value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RootKind {
    /// Anything goes; `default` seeds a fresh file.
    #[default]
    Any,
    /// Root must be an array; a fresh file starts as `[]`.
    Array,
    /// Root must be an object; a fresh file starts as `{}`.
    Object,
}

impl RootKind {
    /// Empty container for this constraint, or `None` for [`RootKind::Any`].
    #[must_use]
    pub fn empty(self) -> Option<Value> {
        match self {
            RootKind::Any => None,
            RootKind::Array => Some(Value::Array(Vec::new())),
            RootKind::Object => Some(Value::Object(serde_json::Map::new())),
        }
    }

    /// `true` if `value` satisfies the constraint.
    #[must_use]
    pub fn admits(self, value: &Value) -> bool {
        match self {
            RootKind::Any => true,
            RootKind::Array => value.is_array(),
            RootKind::Object => value.is_object(),
        }
    }

    /// The [`Kind`] required, if any.
    #[must_use]
    pub fn kind(self) -> Option<Kind> {
        match self {
            RootKind::Any => None,
            RootKind::Array => Some(Kind::Array),
            RootKind::Object => Some(Kind::Object),
        }
    }
}

/// Controls when the root value gets written to disk.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SavePolicy {
    /// Only on `save()` and, if enabled, at process exit.
    #[default]
    Manual,
    /// After every successful mutation. Safest, but most I/O.
    Immediate,
}

/// Everything needed to open a database.
///
/// | field          | default              |
/// |----------------|----------------------|
/// | `default`      | `null`               |
/// | `root`         | [`RootKind::Any`]    |
/// | `save_at_exit` | `true`               |
/// | `indent`       | `Some(4)`            |
/// | `policy`       | [`SavePolicy::Manual`] |
#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseConfig {
    /// Target file. Relative paths are resolved against the working directory.
    pub path: PathBuf,
    /// Seed value for a fresh file when `root` is [`RootKind::Any`].
    pub default: Value,
    /// Declared root constraint.
    pub root: RootKind,
    /// Save once when the process exits normally.
    pub save_at_exit: bool,
    /// Spaces per indent level; `None` writes compact JSON.
    pub indent: Option<usize>,
    /// When to save besides explicit calls.
    pub policy: SavePolicy,
}

impl DatabaseConfig {
    /// Config for `path` with every other field at its default.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            default: Value::Null,
            root: RootKind::Any,
            save_at_exit: true,
            indent: Some(DEFAULT_INDENT),
            policy: SavePolicy::Manual,
        }
    }

    /// Config for `<cwd>/db/<name>.json`.
    pub fn named(name: &str) -> Self {
        Self::new(default_location(name, DEFAULT_FOLDER, DEFAULT_EXTENSION))
    }

    /// Value a fresh (or cleared) database starts from.
    #[must_use]
    pub fn seed(&self) -> Value {
        self.root.empty().unwrap_or_else(|| self.default.clone())
    }

    /// Absolute, lexically normalized form of [`path`](Self::path).
    pub fn resolved_path(&self) -> Result<PathBuf> {
        resolve(&self.path)
    }
}

/// `<folder>/<name>.<extension>`, with `folder` relative to the working
/// directory unless absolute.
pub fn default_location(name: &str, folder: impl AsRef<Path>, extension: &str) -> PathBuf {
    folder.as_ref().join(format!("{name}.{extension}"))
}

/// Make `path` absolute and strip `.`/`..` without touching the filesystem,
/// since the file usually doesn't exist yet. Symlinks are not followed.
pub fn resolve(path: &Path) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(Error::Config("database path is empty".into()));
    }
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| Error::Config(format!("cannot read working directory: {e}")))?
            .join(path)
    };

    let mut out = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    Ok(out)
}
