//! List operations for array-rooted databases.

use crate::database::{as_array, as_array_mut, index_error, Database};
use crate::error::{Error, Result};
use crate::value::{self, Kind};
use serde::Serialize;
use serde_json::Value;
use std::cell::Cell;
use std::cmp::Ordering;

/// Borrowed view exposing list operations on a [`Database`] whose root is an
/// array. Every call re-checks the root, so a view outliving a `replace_root`
/// to another variant gets [`Error::TypeMismatch`] rather than coercion.
#[derive(Debug, Clone, Copy)]
pub struct ListView<'a> {
    db: &'a Database,
}

impl<'a> ListView<'a> {
    pub(crate) fn new(db: &'a Database) -> Result<Self> {
        db.read(|root| as_array(root).map(|_| ()))?;
        Ok(Self { db })
    }

    /// The database behind this view.
    #[must_use]
    pub fn database(&self) -> &'a Database {
        self.db
    }

    // ---- reads ----

    /// Number of elements.
    pub fn len(&self) -> Result<usize> {
        self.db.read(|root| as_array(root).map(Vec::len))
    }

    /// `true` when the list has no elements.
    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|n| n == 0)
    }

    /// Element at `position`.
    pub fn get(&self, position: usize) -> Result<Value> {
        self.db.get(position)
    }

    /// Snapshot of every element.
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        self.db.read(|root| as_array(root).cloned())
    }

    /// Position of the first element equal to `value`.
    pub fn index_of<T>(&self, value: &T) -> Result<usize>
    where
        T: Serialize + ?Sized,
    {
        let needle = value::to_value(value)?;
        self.db.read(|root| {
            as_array(root)?
                .iter()
                .position(|v| *v == needle)
                .ok_or_else(|| Error::NotFound(format!("{needle} is not in the list")))
        })
    }

    /// `true` if some element equals `value`.
    pub fn contains<T>(&self, value: &T) -> Result<bool>
    where
        T: Serialize + ?Sized,
    {
        match self.index_of(value) {
            Ok(_) => Ok(true),
            Err(Error::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// How many elements equal `value`.
    pub fn occurrences<T>(&self, value: &T) -> Result<usize>
    where
        T: Serialize + ?Sized,
    {
        let needle = value::to_value(value)?;
        self.db
            .read(|root| Ok(as_array(root)?.iter().filter(|v| **v == needle).count()))
    }

    // ---- writes ----

    /// Add `value` at the end.
    pub fn append<T>(&self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = value::to_value(value)?;
        self.db.mutate(|root| {
            as_array_mut(root)?.push(value);
            Ok(())
        })
    }

    /// Append every element of `values`. One bad element rejects the batch.
    pub fn extend<I, T>(&self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Serialize,
    {
        let batch = values
            .into_iter()
            .map(|v| value::to_value(&v))
            .collect::<Result<Vec<_>>>()?;
        self.db.mutate(|root| {
            as_array_mut(root)?.extend(batch);
            Ok(())
        })
    }

    /// Insert `value` before `position`; `position == len` appends.
    pub fn insert<T>(&self, position: usize, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let value = value::to_value(value)?;
        self.db.mutate(|root| {
            let items = as_array_mut(root)?;
            if position > items.len() {
                return Err(Error::Index(format!(
                    "insert position {position} out of range for length {}",
                    items.len()
                )));
            }
            items.insert(position, value);
            Ok(())
        })
    }

    /// Remove and return the element at `position`.
    pub fn remove_at(&self, position: usize) -> Result<Value> {
        self.db.mutate(|root| {
            let items = as_array_mut(root)?;
            if position >= items.len() {
                return Err(index_error(position, items.len()));
            }
            Ok(items.remove(position))
        })
    }

    /// Remove and return the last element.
    pub fn pop(&self) -> Result<Value> {
        self.db.mutate(|root| {
            as_array_mut(root)?
                .pop()
                .ok_or_else(|| Error::Index("pop from empty list".into()))
        })
    }

    /// Remove the first element equal to `value`.
    pub fn remove<T>(&self, value: &T) -> Result<()>
    where
        T: Serialize + ?Sized,
    {
        let needle = value::to_value(value)?;
        self.db.mutate(|root| {
            let items = as_array_mut(root)?;
            let at = items
                .iter()
                .position(|v| *v == needle)
                .ok_or_else(|| Error::NotFound(format!("{needle} is not in the list")))?;
            items.remove(at);
            Ok(())
        })
    }

    /// Reverse element order in place.
    pub fn reverse(&self) -> Result<()> {
        self.db.mutate(|root| {
            as_array_mut(root)?.reverse();
            Ok(())
        })
    }

    /// Sort ascending (stable). Every pair of elements must be comparable, see
    /// [`value::compare`]; otherwise the list is left as it was.
    pub fn sort(&self) -> Result<()> {
        self.db.mutate(|root| {
            let items = as_array_mut(root)?;
            let mut sorted = items.clone();
            let clash: Cell<Option<(Kind, Kind)>> = Cell::new(None);
            sorted.sort_by(|a, b| {
                value::compare(a, b).unwrap_or_else(|| {
                    if clash.get().is_none() {
                        clash.set(Some((Kind::of(a), Kind::of(b))));
                    }
                    Ordering::Equal
                })
            });
            if let Some((a, b)) = clash.get() {
                return Err(Error::TypeMismatch(format!(
                    "cannot order {a} against {b}"
                )));
            }
            *items = sorted;
            Ok(())
        })
    }
}
