use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use smol_str::SmolStr;
use uuid::Uuid;

use crate::types::date::SaveDate;

/// A node of the parsed document tree.
///
/// The tree is built once by the parser and is read-only afterwards; the
/// serializer and binder only ever borrow it.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// An ordered sequence of `key=value` entries. Keys are not unique:
    /// repeated keys are distinct entries in source order.
    Obj(SaveObject),
    /// An ordered sequence of bare values.
    Arr(Vec<Element>),
    /// A leaf value.
    Scalar(Scalar),
}

impl Element {
    pub const fn is_obj(&self) -> bool {
        matches!(self, Element::Obj(_))
    }

    pub const fn is_arr(&self) -> bool {
        matches!(self, Element::Arr(_))
    }

    pub const fn is_scalar(&self) -> bool {
        matches!(self, Element::Scalar(_))
    }

    pub fn as_obj(&self) -> Option<&SaveObject> {
        match self {
            Element::Obj(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_arr(&self) -> Option<&[Element]> {
        match self {
            Element::Arr(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Element::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// First entry with a matching key, when this element is an `Obj`.
    pub fn get(&self, key: &str) -> Option<&Element> {
        self.as_obj().and_then(|obj| obj.get(key))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Element::Obj(_) => "object",
            Element::Arr(_) => "array",
            Element::Scalar(scalar) => scalar.value().type_name(),
        }
    }
}

/// An ordered multi-map of `key=value` entries.
///
/// Duplicate keys are data in this format (the duplicate-key-as-list
/// pattern), so the entries are a list of pairs rather than a map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveObject {
    entries: Vec<(SmolStr, Element)>,
}

impl SaveObject {
    pub fn new<K, I>(entries: I) -> Self
    where
        K: Into<SmolStr>,
        I: IntoIterator<Item = (K, Element)>,
    {
        SaveObject {
            entries: entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry with a matching key.
    pub fn get(&self, key: &str) -> Option<&Element> {
        self.entries
            .iter()
            .find(|(entry_key, _)| entry_key.as_str() == key)
            .map(|(_, value)| value)
    }

    /// Every entry with a matching key, in source order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.entries
            .iter()
            .filter(move |(entry_key, _)| entry_key.as_str() == key)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Element)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }
}

/// A leaf value: the verbatim source text plus the inferred typed value.
///
/// The raw text is retained so re-serialization can reproduce forms the
/// typed value alone cannot (leading zeros, padded date fields).
#[derive(Debug, Clone)]
pub struct Scalar {
    raw: String,
    value: ScalarValue,
}

/// The inferred type of a [`Scalar`].
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    /// A quoted string.
    String(String),
    /// An unquoted bare word.
    Identifier(String),
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float(f64),
    Date(SaveDate),
    Guid(Uuid),
}

impl ScalarValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            ScalarValue::String(_) => "string",
            ScalarValue::Identifier(_) => "identifier",
            ScalarValue::Bool(_) => "bool",
            ScalarValue::Int32(_) => "int32",
            ScalarValue::Int64(_) => "int64",
            ScalarValue::Float(_) => "float",
            ScalarValue::Date(_) => "date",
            ScalarValue::Guid(_) => "guid",
        }
    }
}

impl Scalar {
    pub fn new(raw: impl Into<String>, value: ScalarValue) -> Self {
        Scalar {
            raw: raw.into(),
            value,
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        let value = value.into();
        Scalar {
            raw: value.clone(),
            value: ScalarValue::String(value),
        }
    }

    pub fn identifier(value: impl Into<String>) -> Self {
        let value = value.into();
        Scalar {
            raw: value.clone(),
            value: ScalarValue::Identifier(value),
        }
    }

    pub fn bool(value: bool) -> Self {
        Scalar {
            raw: if value { "yes" } else { "no" }.to_string(),
            value: ScalarValue::Bool(value),
        }
    }

    pub fn int(value: i32) -> Self {
        let mut buffer = itoa::Buffer::new();
        Scalar {
            raw: buffer.format(value).to_string(),
            value: ScalarValue::Int32(value),
        }
    }

    /// A whole-number scalar. Values that fit in 32 bits normalize to
    /// [`ScalarValue::Int32`], matching what the parser infers for the
    /// same text.
    pub fn long(value: i64) -> Self {
        if let Ok(narrow) = i32::try_from(value) {
            return Scalar::int(narrow);
        }
        let mut buffer = itoa::Buffer::new();
        Scalar {
            raw: buffer.format(value).to_string(),
            value: ScalarValue::Int64(value),
        }
    }

    /// A floating-point scalar. Non-finite values cannot appear in the
    /// grammar and render as `0.0`.
    pub fn float(value: f64) -> Self {
        if !value.is_finite() {
            return Scalar {
                raw: "0.0".to_string(),
                value: ScalarValue::Float(0.0),
            };
        }
        let mut buffer = ryu::Buffer::new();
        Scalar {
            raw: buffer.format(value).to_string(),
            value: ScalarValue::Float(value),
        }
    }

    pub fn date(value: SaveDate) -> Self {
        Scalar {
            raw: value.to_string(),
            value: ScalarValue::Date(value),
        }
    }

    pub fn guid(value: Uuid) -> Self {
        Scalar {
            raw: value.to_string(),
            value: ScalarValue::Guid(value),
        }
    }

    /// The verbatim source text of the scalar.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> &ScalarValue {
        &self.value
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            ScalarValue::String(text) | ScalarValue::Identifier(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            ScalarValue::Bool(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self.value {
            ScalarValue::Int32(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            ScalarValue::Int32(value) => Some(i64::from(value)),
            ScalarValue::Int64(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            ScalarValue::Int32(value) => Some(f64::from(value)),
            ScalarValue::Int64(value) => Some(value as f64),
            ScalarValue::Float(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<SaveDate> {
        match self.value {
            ScalarValue::Date(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_guid(&self) -> Option<Uuid> {
        match self.value {
            ScalarValue::Guid(value) => Some(value),
            _ => None,
        }
    }
}

// Structural equality compares typed values only. The raw text is a
// serialization aid and may legitimately differ between a parsed `YES`
// and its normalized round trip `yes`.
impl PartialEq for Scalar {
    fn eq(&self, other: &Scalar) -> bool {
        self.value == other.value
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for Element {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Element::Obj(obj) => obj.serialize(serializer),
            Element::Arr(items) => serializer.collect_seq(items),
            Element::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

impl Serialize for SaveObject {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Duplicate keys become repeated map entries; JSON emitters accept
        // and emit them in order.
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match &self.value {
            ScalarValue::String(text) | ScalarValue::Identifier(text) => {
                serializer.serialize_str(text)
            }
            ScalarValue::Bool(value) => serializer.serialize_bool(*value),
            ScalarValue::Int32(value) => serializer.serialize_i32(*value),
            ScalarValue::Int64(value) => serializer.serialize_i64(*value),
            ScalarValue::Float(value) => serializer.serialize_f64(*value),
            ScalarValue::Date(value) => serializer.collect_str(value),
            ScalarValue::Guid(value) => serializer.collect_str(value),
        }
    }
}
