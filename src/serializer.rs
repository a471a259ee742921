//! Serialization layer. Defaults to JSON via serde_json.
//!
//! Implement [`Serializer`] if you need a different text format.

use crate::error::{Error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

/// Converts the root value to/from bytes for persistence.
pub trait Serializer: Send + Sync {
    /// Encode the root value.
    fn serialize(&self, value: &Value) -> Result<Vec<u8>>;

    /// Decode bytes back into a root value.
    fn deserialize(&self, bytes: &[u8]) -> Result<Value>;
}

/// Indent width used unless told otherwise.
pub const DEFAULT_INDENT: usize = 4;

/// JSON serializer, compact or indented by a configurable number of spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonSerializer {
    indent: Option<usize>,
}

impl Default for JsonSerializer {
    fn default() -> Self {
        Self::pretty()
    }
}

impl JsonSerializer {
    /// Compact JSON (single line, no extra whitespace).
    pub fn compact() -> Self {
        Self { indent: None }
    }

    /// Indented JSON, [`DEFAULT_INDENT`] spaces per level.
    pub fn pretty() -> Self {
        Self::with_indent(Some(DEFAULT_INDENT))
    }

    /// `None` means compact, `Some(n)` means `n` spaces per level.
    pub fn with_indent(indent: Option<usize>) -> Self {
        Self { indent }
    }

    /// Current indent width.
    #[must_use]
    pub fn indent(&self) -> Option<usize> {
        self.indent
    }
}

impl Serializer for JsonSerializer {
    fn serialize(&self, value: &Value) -> Result<Vec<u8>> {
        let Some(width) = self.indent else {
            return serde_json::to_vec(value).map_err(|e| Error::Save(e.to_string()));
        };
        let pad = vec![b' '; width];
        let mut out = Vec::new();
        let mut ser =
            serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(&pad));
        value
            .serialize(&mut ser)
            .map_err(|e| Error::Save(e.to_string()))?;
        Ok(out)
    }

    fn deserialize(&self, bytes: &[u8]) -> Result<Value> {
        serde_json::from_slice(bytes).map_err(|e| Error::Load(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_indent_is_four_spaces() {
        let bytes = JsonSerializer::default().serialize(&json!({"a": 1})).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "{\n    \"a\": 1\n}");
    }

    #[test]
    fn compact_is_one_line() {
        let bytes = JsonSerializer::compact().serialize(&json!([1, 2])).unwrap();
        assert_eq!(bytes, b"[1,2]");
    }

    #[test]
    fn custom_indent() {
        let bytes = JsonSerializer::with_indent(Some(2))
            .serialize(&json!({"a": [true]}))
            .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "{\n  \"a\": [\n    true\n  ]\n}"
        );
    }

    #[test]
    fn garbage_is_a_load_error() {
        let err = JsonSerializer::default().deserialize(b"{nope").unwrap_err();
        assert!(matches!(err, Error::Load(_)));
    }
}
