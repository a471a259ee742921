//! A JSON document that lives in one file.
//!
//! Open a path, mutate the value tree in memory, and save it back, either
//! explicitly or automatically when the process exits. Every mutation is
//! validated up front, so a rejected write never leaves the document half
//! changed.
//!
//! ```rust,no_run
//! use json_vault::{Database, RootKind};
//!
//! let db = Database::builder("db/scores.json")
//!     .root(RootKind::Array)
//!     .open()
//!     .unwrap();
//! let scores = db.list().unwrap();
//! scores.append(&10).unwrap();
//! scores.append(&20).unwrap();
//! db.save().unwrap();
//! ```
//!
//! Handles are cached per resolved path: opening the same file twice in one
//! process hands back the same [`Database`].
//!
//! **Single-process only.** If multiple processes open the same file they will
//! clobber each other on save.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod database;
pub mod dict;
pub mod error;
pub mod list;
pub mod persist;
pub mod registry;
pub mod serializer;
pub mod shutdown;
pub mod value;

pub use config::{DatabaseConfig, RootKind, SavePolicy};
pub use database::{Database, DatabaseBuilder, Key};
pub use dict::DictView;
pub use error::{Error, Result, ValidationError};
pub use list::ListView;
pub use serializer::JsonSerializer;
pub use serde_json::{json, Value};
pub use value::Kind;
