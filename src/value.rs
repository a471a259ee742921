//! The value universe: null, bool, number, string, array, string-keyed object.
//!
//! Anything that implements [`Serialize`] can be offered to a database. It is
//! walked by a strict serializer that builds a [`Value`] and refuses the whole
//! tree the moment it meets something JSON can't represent faithfully: raw
//! bytes, non-finite floats, integers wider than 64 bits, or object keys that
//! aren't strings. `serde_json::to_value` is deliberately not used here since
//! it quietly stringifies integer keys and turns NaN into `null`.
//!
//! The walk is depth-first with no cycle detection. A `Serialize` impl that
//! recurses forever will overflow the stack; that's on the impl.

use crate::error::{Result, ValidationError};
use serde::ser::{self, Impossible, Serialize};
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// Runtime variant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// `null`
    Null,
    /// `true` / `false`
    Bool,
    /// Integer or finite float.
    Number,
    /// UTF-8 string.
    String,
    /// Ordered sequence.
    Array,
    /// String-keyed map, insertion ordered.
    Object,
}

impl Kind {
    /// Variant of `value`.
    #[must_use]
    pub fn of(value: &Value) -> Kind {
        match value {
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Bool,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Lowercase name used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Bool => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Convert `candidate` into a [`Value`], rejecting the whole tree if any node
/// falls outside the supported universe.
pub fn to_value<T>(candidate: &T) -> Result<Value>
where
    T: Serialize + ?Sized,
{
    candidate.serialize(ValueSerializer).map_err(Into::into)
}

/// Check `candidate` without keeping the converted tree.
pub fn validate<T>(candidate: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    to_value(candidate).map(|_| ())
}

/// Ordering used by list sorting. Numbers and booleans compare numerically,
/// strings lexicographically, arrays element-wise. Everything else (null,
/// objects, mixed families) is incomparable.
#[must_use]
pub fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Array(x), Value::Array(y)) => {
            for (l, r) in x.iter().zip(y.iter()) {
                match compare(l, r)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(x.len().cmp(&y.len()))
        }
        (Value::Number(_) | Value::Bool(_), Value::Number(_) | Value::Bool(_)) => {
            compare_numeric(a, b)
        }
        _ => None,
    }
}

fn compare_numeric(a: &Value, b: &Value) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_i64(a), as_i64(b)) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    as_f64(a)?.partial_cmp(&as_f64(b)?)
}

fn as_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Bool(b) => Some(i64::from(*b)),
        other => other.as_i64(),
    }
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        other => other.as_f64(),
    }
}

// ---------------------------------------------------------------------------
// Strict serializer
// ---------------------------------------------------------------------------

impl ser::Error for ValidationError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        ValidationError::UnsupportedType(msg.to_string())
    }
}

type VResult<T> = std::result::Result<T, ValidationError>;

fn float(v: f64) -> VResult<Value> {
    Number::from_f64(v)
        .map(Value::Number)
        .ok_or_else(|| ValidationError::UnsupportedType(format!("non-finite number {v}")))
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ValidationError;
    type SerializeSeq = SeqBuilder;
    type SerializeTuple = SeqBuilder;
    type SerializeTupleStruct = SeqBuilder;
    type SerializeTupleVariant = VariantSeqBuilder;
    type SerializeMap = MapBuilder;
    type SerializeStruct = MapBuilder;
    type SerializeStructVariant = VariantMapBuilder;

    fn serialize_bool(self, v: bool) -> VResult<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> VResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> VResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> VResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> VResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i128(self, v: i128) -> VResult<Value> {
        if let Ok(n) = i64::try_from(v) {
            Ok(Value::from(n))
        } else if let Ok(n) = u64::try_from(v) {
            Ok(Value::from(n))
        } else {
            Err(ValidationError::UnsupportedType(format!(
                "integer {v} does not fit in 64 bits"
            )))
        }
    }

    fn serialize_u8(self, v: u8) -> VResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> VResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> VResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> VResult<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> VResult<Value> {
        u64::try_from(v).map(Value::from).map_err(|_| {
            ValidationError::UnsupportedType(format!("integer {v} does not fit in 64 bits"))
        })
    }

    fn serialize_f32(self, v: f32) -> VResult<Value> {
        float(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> VResult<Value> {
        float(v)
    }

    fn serialize_char(self, v: char) -> VResult<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> VResult<Value> {
        Ok(Value::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> VResult<Value> {
        Err(ValidationError::UnsupportedType(format!(
            "raw bytes ({} bytes)",
            v.len()
        )))
    }

    fn serialize_none(self) -> VResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> VResult<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> VResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> VResult<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> VResult<Value> {
        Ok(Value::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> VResult<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> VResult<Value>
    where
        T: ?Sized + Serialize,
    {
        let mut map = Map::new();
        map.insert(variant.to_owned(), value.serialize(ValueSerializer)?);
        Ok(Value::Object(map))
    }

    fn serialize_seq(self, len: Option<usize>) -> VResult<SeqBuilder> {
        Ok(SeqBuilder {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> VResult<SeqBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> VResult<SeqBuilder> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> VResult<VariantSeqBuilder> {
        Ok(VariantSeqBuilder {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> VResult<MapBuilder> {
        Ok(MapBuilder {
            map: Map::new(),
            next_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> VResult<MapBuilder> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> VResult<VariantMapBuilder> {
        Ok(VariantMapBuilder {
            variant,
            map: Map::new(),
        })
    }
}

struct SeqBuilder {
    items: Vec<Value>,
}

impl SeqBuilder {
    fn push<T: ?Sized + Serialize>(&mut self, value: &T) -> VResult<()> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }
}

impl ser::SerializeSeq for SeqBuilder {
    type Ok = Value;
    type Error = ValidationError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> VResult<()> {
        self.push(value)
    }

    fn end(self) -> VResult<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTuple for SeqBuilder {
    type Ok = Value;
    type Error = ValidationError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> VResult<()> {
        self.push(value)
    }

    fn end(self) -> VResult<Value> {
        Ok(Value::Array(self.items))
    }
}

impl ser::SerializeTupleStruct for SeqBuilder {
    type Ok = Value;
    type Error = ValidationError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> VResult<()> {
        self.push(value)
    }

    fn end(self) -> VResult<Value> {
        Ok(Value::Array(self.items))
    }
}

struct VariantSeqBuilder {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for VariantSeqBuilder {
    type Ok = Value;
    type Error = ValidationError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> VResult<()> {
        self.items.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> VResult<Value> {
        let mut map = Map::new();
        map.insert(self.variant.to_owned(), Value::Array(self.items));
        Ok(Value::Object(map))
    }
}

struct MapBuilder {
    map: Map<String, Value>,
    next_key: Option<String>,
}

impl ser::SerializeMap for MapBuilder {
    type Ok = Value;
    type Error = ValidationError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> VResult<()> {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> VResult<()> {
        let key = self.next_key.take().ok_or_else(|| {
            ValidationError::UnsupportedType("map value without a key".to_owned())
        })?;
        self.map.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> VResult<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for MapBuilder {
    type Ok = Value;
    type Error = ValidationError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> VResult<()> {
        self.map
            .insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> VResult<Value> {
        Ok(Value::Object(self.map))
    }
}

struct VariantMapBuilder {
    variant: &'static str,
    map: Map<String, Value>,
}

impl ser::SerializeStructVariant for VariantMapBuilder {
    type Ok = Value;
    type Error = ValidationError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> VResult<()> {
        self.map
            .insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> VResult<Value> {
        let mut outer = Map::new();
        outer.insert(self.variant.to_owned(), Value::Object(self.map));
        Ok(Value::Object(outer))
    }
}

// ---- keys --------------------------------------------------------------------

/// Accepts only string-like keys. Everything else is a `NonStringKey`.
struct KeySerializer;

fn non_string_key<T>(what: &str) -> VResult<T> {
    Err(ValidationError::NonStringKey(what.to_owned()))
}

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = ValidationError;
    type SerializeSeq = Impossible<String, ValidationError>;
    type SerializeTuple = Impossible<String, ValidationError>;
    type SerializeTupleStruct = Impossible<String, ValidationError>;
    type SerializeTupleVariant = Impossible<String, ValidationError>;
    type SerializeMap = Impossible<String, ValidationError>;
    type SerializeStruct = Impossible<String, ValidationError>;
    type SerializeStructVariant = Impossible<String, ValidationError>;

    fn serialize_str(self, v: &str) -> VResult<String> {
        Ok(v.to_owned())
    }

    fn serialize_char(self, v: char) -> VResult<String> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> VResult<String> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> VResult<String>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, v: bool) -> VResult<String> {
        non_string_key(&format!("boolean {v}"))
    }

    fn serialize_i8(self, v: i8) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_i16(self, v: i16) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_i32(self, v: i32) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_i64(self, v: i64) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_i128(self, v: i128) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_u8(self, v: u8) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_u16(self, v: u16) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_u32(self, v: u32) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_u64(self, v: u64) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_u128(self, v: u128) -> VResult<String> {
        non_string_key(&format!("integer {v}"))
    }

    fn serialize_f32(self, v: f32) -> VResult<String> {
        non_string_key(&format!("number {v}"))
    }

    fn serialize_f64(self, v: f64) -> VResult<String> {
        non_string_key(&format!("number {v}"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> VResult<String> {
        non_string_key("bytes")
    }

    fn serialize_none(self) -> VResult<String> {
        non_string_key("null")
    }

    fn serialize_some<T>(self, _value: &T) -> VResult<String>
    where
        T: ?Sized + Serialize,
    {
        non_string_key("option")
    }

    fn serialize_unit(self) -> VResult<String> {
        non_string_key("unit")
    }

    fn serialize_unit_struct(self, name: &'static str) -> VResult<String> {
        non_string_key(name)
    }

    fn serialize_newtype_variant<T>(
        self,
        name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> VResult<String>
    where
        T: ?Sized + Serialize,
    {
        non_string_key(name)
    }

    fn serialize_seq(self, _len: Option<usize>) -> VResult<Self::SerializeSeq> {
        non_string_key("sequence")
    }

    fn serialize_tuple(self, _len: usize) -> VResult<Self::SerializeTuple> {
        non_string_key("tuple")
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> VResult<Self::SerializeTupleStruct> {
        non_string_key(name)
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> VResult<Self::SerializeTupleVariant> {
        non_string_key(name)
    }

    fn serialize_map(self, _len: Option<usize>) -> VResult<Self::SerializeMap> {
        non_string_key("map")
    }

    fn serialize_struct(self, name: &'static str, _len: usize) -> VResult<Self::SerializeStruct> {
        non_string_key(name)
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> VResult<Self::SerializeStructVariant> {
        non_string_key(name)
    }
}
