//! Dict operations for object-rooted databases.
//!
//! Objects keep insertion order, so [`DictView::pop_last`] always removes the
//! most recently inserted key. Overwriting an existing key keeps its position.

use crate::database::{as_object, as_object_mut, Database};
use crate::error::{Error, Result};
use crate::value::{self, Kind};
use serde::Serialize;
use serde_json::Value;

/// Borrowed view exposing dict operations on a [`Database`] whose root is an
/// object.
///
/// [`keys`](Self::keys), [`values`](Self::values) and [`items`](Self::items)
/// iterate over a snapshot taken at call time. Later mutations don't show up
/// in an iterator that already exists.
#[derive(Debug, Clone, Copy)]
pub struct DictView<'a> {
    db: &'a Database,
}

impl<'a> DictView<'a> {
    pub(crate) fn new(db: &'a Database) -> Result<Self> {
        db.read(|root| as_object(root).map(|_| ()))?;
        Ok(Self { db })
    }

    /// The database behind this view.
    #[must_use]
    pub fn database(&self) -> &'a Database {
        self.db
    }

    // ---- reads ----

    /// Number of keys.
    pub fn len(&self) -> Result<usize> {
        self.db.read(|root| as_object(root).map(|m| m.len()))
    }

    /// `true` when there are no keys.
    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }

    /// Value for `key`, or [`Error::Key`] if absent.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.db.get(key)
    }

    /// Value for `key`, or `fallback` if absent. Missing keys are not an error.
    pub fn get_or(&self, key: &str, fallback: Value) -> Result<Value> {
        self.db
            .read(|root| Ok(as_object(root)?.get(key).cloned().unwrap_or(fallback)))
    }

    /// `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> Result<bool> {
        self.db.read(|root| Ok(as_object(root)?.contains_key(key)))
    }

    /// Keys in insertion order (snapshot).
    pub fn keys(&self) -> Result<std::vec::IntoIter<String>> {
        self.db
            .read(|root| Ok(as_object(root)?.keys().cloned().collect::<Vec<_>>().into_iter()))
    }

    /// Values in insertion order (snapshot).
    pub fn values(&self) -> Result<std::vec::IntoIter<Value>> {
        self.db
            .read(|root| Ok(as_object(root)?.values().cloned().collect::<Vec<_>>().into_iter()))
    }

    /// Key/value pairs in insertion order (snapshot).
    pub fn items(&self) -> Result<std::vec::IntoIter<(String, Value)>> {
        self.db.read(|root| {
            Ok(as_object(root)?
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect::<Vec<_>>()
                .into_iter())
        })
    }

    // ---- writes ----

    /// Insert or overwrite `key`. Returns the previous value, if any.
    pub fn insert<T>(&self, key: &str, value: &T) -> Result<Option<Value>>
    where
        T: Serialize + ?Sized,
    {
        let value = value::to_value(value)?;
        self.db
            .mutate(|root| Ok(as_object_mut(root)?.insert(key.to_owned(), value)))
    }

    /// Remove `key` and return its value, or [`Error::Key`] if absent.
    pub fn remove(&self, key: &str) -> Result<Value> {
        self.db.remove(key)
    }

    /// Remove `key` and return its value, or hand back `fallback` untouched if
    /// the key is absent. Unlike list removal, absence is not an error.
    pub fn pop(&self, key: &str, fallback: Value) -> Result<Value> {
        self.db
            .mutate(|root| Ok(as_object_mut(root)?.shift_remove(key).unwrap_or(fallback)))
    }

    /// Remove and return the most recently inserted entry.
    pub fn pop_last(&self) -> Result<(String, Value)> {
        self.db.mutate(|root| {
            let map = as_object_mut(root)?;
            let last = map
                .keys()
                .next_back()
                .cloned()
                .ok_or_else(|| Error::Key("pop_last on an empty object".into()))?;
            let value = map.shift_remove(&last).unwrap_or(Value::Null);
            Ok((last, value))
        })
    }

    /// Existing value for `key`, or insert `default` and return it.
    pub fn set_default<T>(&self, key: &str, default: &T) -> Result<Value>
    where
        T: Serialize + ?Sized,
    {
        let default = value::to_value(default)?;
        self.db.mutate(|root| {
            let map = as_object_mut(root)?;
            if let Some(existing) = map.get(key) {
                return Ok(existing.clone());
            }
            map.insert(key.to_owned(), default.clone());
            Ok(default)
        })
    }

    /// Merge `entries` into the object. `entries` must serialize to a
    /// string-keyed map (a `HashMap<String, _>`, a struct, a `json!({..})`).
    /// The whole batch is validated before anything is written.
    pub fn update<T>(&self, entries: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let incoming = match value::to_value(entries)? {
            Value::Object(map) => map,
            other => {
                return Err(Error::TypeMismatch(format!(
                    "update needs key/value entries, got {}",
                    Kind::of(&other)
                )))
            }
        };
        self.db.mutate(|root| {
            let map = as_object_mut(root)?;
            for (k, v) in incoming {
                map.insert(k, v);
            }
            Ok(())
        })
    }
}
