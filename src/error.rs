//! Unified error type for all database operations.

/// Why a submitted value was rejected before touching the database.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Some node in the tree has no JSON counterpart (bytes, NaN, huge ints...).
    UnsupportedType(String),
    /// An object key is not a string.
    NonStringKey(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::UnsupportedType(msg) => write!(f, "unsupported type: {msg}"),
            ValidationError::NonStringKey(msg) => {
                write!(f, "only string keys are supported, got {msg}")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Things that can go wrong when using a database.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The value tree contains something JSON can't hold. Nothing was mutated.
    Validation(ValidationError),
    /// The root (or the key used to address it) is the wrong variant.
    TypeMismatch(String),
    /// The file exists but could not be read or parsed.
    Load(String),
    /// Creating the directory or writing the file failed.
    Save(String),
    /// Position out of range.
    Index(String),
    /// Key absent from an object root.
    Key(String),
    /// Searched-for value is not in the list.
    NotFound(String),
    /// Bad configuration (empty path, etc.).
    Config(String),
}

impl Error {
    /// `true` for [`Error::Validation`].
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Validation(err) => write!(f, "validation error: {err}"),
            Error::TypeMismatch(msg) => write!(f, "type mismatch: {msg}"),
            Error::Load(msg) => write!(f, "load error: {msg}"),
            Error::Save(msg) => write!(f, "save error: {msg}"),
            Error::Index(msg) => write!(f, "index error: {msg}"),
            Error::Key(msg) => write!(f, "key error: {msg}"),
            Error::NotFound(msg) => write!(f, "not found: {msg}"),
            Error::Config(msg) => write!(f, "config error: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

/// Result alias using our [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
