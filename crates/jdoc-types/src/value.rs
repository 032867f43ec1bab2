//! The in-memory document model.
//!
//! [`Value`] is what a [`ValueBuilder`](crate::ValueBuilder) produces from
//! an event stream, and [`Value::dump`] turns it back into one. Objects
//! keep their members in insertion order.

use indexmap::IndexMap;

use crate::event::SemanticTag;
use crate::handler::{ContentHandler, HandlerResult};

/// Object members in insertion order.
pub type Object = IndexMap<String, Value>;

/// A byte string, distinct from a sequence of small integers.
///
/// `Vec<u8>` already converts as an array of numbers; wrap it in
/// `ByteString` to get a byte-string event instead.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ByteString(pub Vec<u8>);

impl ByteString {
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for ByteString {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for ByteString {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A document value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int64(i64),
    Uint64(u64, SemanticTag),
    Double(f64),
    String(String),
    ByteString(Vec<u8>),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    /// Name of the value's kind, matching [`Event::kind`](crate::Event::kind)
    /// for scalars.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int64(_) => "int64",
            Self::Uint64(..) => "uint64",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::ByteString(_) => "byte-string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value as an `i64`, if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int64(v) => Some(*v),
            Self::Uint64(v, _) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    /// The value as a `u64`, if it is a non-negative integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int64(v) => u64::try_from(*v).ok(),
            Self::Uint64(v, _) => Some(*v),
            _ => None,
        }
    }

    /// The value as an `f64`. Integers widen, possibly losing precision.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            Self::Int64(v) => Some(*v as f64),
            Self::Uint64(v, _) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::ByteString(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Member lookup on objects; `None` for anything else.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|map| map.get(key))
    }

    /// Emit this value as a well-formed event stream (without the final
    /// `flush`).
    ///
    /// # Errors
    ///
    /// Stops at and returns the first handler error.
    pub fn dump<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult {
        const NONE: SemanticTag = SemanticTag::None;
        match self {
            Self::Null => handler.null_value(NONE),
            Self::Bool(b) => handler.bool_value(*b, NONE),
            Self::Int64(v) => handler.int64_value(*v, NONE),
            Self::Uint64(v, tag) => handler.uint64_value(*v, *tag),
            Self::Double(v) => handler.double_value(*v, NONE),
            Self::String(s) => handler.string_value(s, NONE),
            Self::ByteString(b) => handler.byte_string_value(b, NONE),
            Self::Array(items) => {
                handler.begin_array(NONE)?;
                for item in items {
                    item.dump(handler)?;
                }
                handler.end_array()
            }
            Self::Object(map) => {
                handler.begin_object(NONE)?;
                for (key, value) in map {
                    handler.name(key)?;
                    value.dump(handler)?;
                }
                handler.end_object()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int64(i64::from(v))
    }
}

impl From<u64> for Value {
    fn from(v: u64) -> Self {
        Self::Uint64(v, SemanticTag::None)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<ByteString> for Value {
    fn from(b: ByteString) -> Self {
        Self::ByteString(b.0)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::Array(items)
    }
}

impl From<Object> for Value {
    fn from(map: Object) -> Self {
        Self::Object(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Value {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;
    use crate::handler::EventBuffer;

    #[test]
    fn dump_emits_names_only_inside_objects() {
        let value: Value = [
            ("a", Value::from(vec![Value::from(1i64), Value::Null])),
            ("b", Value::from("x")),
        ]
        .into_iter()
        .collect();

        let mut buf = EventBuffer::new();
        value.dump(&mut buf).unwrap();
        let none = SemanticTag::None;
        assert_eq!(
            buf.into_events(),
            vec![
                Event::BeginObject(none),
                Event::Name("a".into()),
                Event::BeginArray(none),
                Event::Int64(1, none),
                Event::Null(none),
                Event::EndArray,
                Event::Name("b".into()),
                Event::String("x".into(), none),
                Event::EndObject,
            ]
        );
    }

    #[test]
    fn dump_keeps_uint64_tag() {
        let mut buf = EventBuffer::new();
        Value::Uint64(9, SemanticTag::EpochTime).dump(&mut buf).unwrap();
        assert_eq!(buf.into_events(), vec![Event::Uint64(9, SemanticTag::EpochTime)]);
    }

    #[test]
    fn numeric_accessors() {
        assert_eq!(Value::Int64(-1).as_u64(), None);
        assert_eq!(Value::Uint64(u64::MAX, SemanticTag::None).as_i64(), None);
        assert_eq!(Value::Uint64(7, SemanticTag::None).as_i64(), Some(7));
        assert_eq!(Value::Int64(2).as_f64(), Some(2.0));
        assert_eq!(Value::from("s").as_f64(), None);
    }

    #[test]
    fn object_lookup() {
        let value: Value = [("k", 1i64)].into_iter().collect();
        assert_eq!(value.get("k"), Some(&Value::Int64(1)));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::Null.get("k"), None);
    }
}
