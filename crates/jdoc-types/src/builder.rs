use crate::error::HandlerError;
use crate::event::SemanticTag;
use crate::handler::{ContentHandler, HandlerResult};
use crate::value::{Object, Value};

#[derive(Debug)]
enum Frame {
    Object { members: Object, key: Option<String> },
    Array(Vec<Value>),
}

/// Content handler that assembles a [`Value`].
///
/// Open structures live on an explicit stack, so arbitrarily deep input
/// costs heap, not call stack. A repeated object key keeps its first
/// position and takes the last value.
#[derive(Debug, Default)]
pub struct ValueBuilder {
    stack: Vec<Frame>,
    root: Option<Value>,
}

impl ValueBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` once a root value has been completed.
    pub fn is_complete(&self) -> bool {
        self.stack.is_empty() && self.root.is_some()
    }

    /// Take the finished value.
    ///
    /// # Errors
    ///
    /// [`HandlerError::Incomplete`] if no root value was produced or some
    /// structure is still open.
    pub fn into_value(self) -> Result<Value, HandlerError> {
        match self.root {
            Some(value) if self.stack.is_empty() => Ok(value),
            _ => Err(HandlerError::Incomplete {
                open: self.stack.len().max(1),
            }),
        }
    }

    fn push_value(&mut self, value: Value, event: &'static str) -> HandlerResult {
        match self.stack.last_mut() {
            None if self.root.is_some() => Err(HandlerError::UnexpectedEvent {
                event,
                reason: "document already has a root value",
            }),
            None => {
                self.root = Some(value);
                Ok(())
            }
            Some(Frame::Array(items)) => {
                items.push(value);
                Ok(())
            }
            Some(Frame::Object { members, key }) => {
                let key = key.take().ok_or(HandlerError::UnexpectedEvent {
                    event,
                    reason: "object member without a name",
                })?;
                members.insert(key, value);
                Ok(())
            }
        }
    }
}

impl ContentHandler for ValueBuilder {
    fn begin_object(&mut self, _tag: SemanticTag) -> HandlerResult {
        self.stack.push(Frame::Object {
            members: Object::new(),
            key: None,
        });
        Ok(())
    }

    fn end_object(&mut self) -> HandlerResult {
        match self.stack.pop() {
            Some(Frame::Object { members, key: None }) => {
                self.push_value(Value::Object(members), "end-object")
            }
            Some(Frame::Object { key: Some(_), .. }) => Err(HandlerError::UnexpectedEvent {
                event: "end-object",
                reason: "name without a value",
            }),
            _ => Err(HandlerError::UnexpectedEvent {
                event: "end-object",
                reason: "no open object",
            }),
        }
    }

    fn begin_array(&mut self, _tag: SemanticTag) -> HandlerResult {
        self.stack.push(Frame::Array(Vec::new()));
        Ok(())
    }

    fn end_array(&mut self) -> HandlerResult {
        match self.stack.pop() {
            Some(Frame::Array(items)) => self.push_value(Value::Array(items), "end-array"),
            _ => Err(HandlerError::UnexpectedEvent {
                event: "end-array",
                reason: "no open array",
            }),
        }
    }

    fn name(&mut self, name: &str) -> HandlerResult {
        match self.stack.last_mut() {
            Some(Frame::Object { key: key @ None, .. }) => {
                *key = Some(name.to_owned());
                Ok(())
            }
            _ => Err(HandlerError::UnexpectedEvent {
                event: "name",
                reason: "names are only valid between object members",
            }),
        }
    }

    fn null_value(&mut self, _tag: SemanticTag) -> HandlerResult {
        self.push_value(Value::Null, "null")
    }

    fn bool_value(&mut self, value: bool, _tag: SemanticTag) -> HandlerResult {
        self.push_value(Value::Bool(value), "bool")
    }

    fn int64_value(&mut self, value: i64, _tag: SemanticTag) -> HandlerResult {
        self.push_value(Value::Int64(value), "int64")
    }

    fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> HandlerResult {
        self.push_value(Value::Uint64(value, tag), "uint64")
    }

    fn double_value(&mut self, value: f64, _tag: SemanticTag) -> HandlerResult {
        self.push_value(Value::Double(value), "double")
    }

    fn string_value(&mut self, value: &str, _tag: SemanticTag) -> HandlerResult {
        self.push_value(Value::String(value.to_owned()), "string")
    }

    fn byte_string_value(&mut self, value: &[u8], _tag: SemanticTag) -> HandlerResult {
        self.push_value(Value::ByteString(value.to_vec()), "byte-string")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: SemanticTag = SemanticTag::None;

    #[test]
    fn builds_nested_document() {
        let mut b = ValueBuilder::new();
        b.begin_object(NONE).unwrap();
        b.name("list").unwrap();
        b.begin_array(NONE).unwrap();
        b.int64_value(1, NONE).unwrap();
        b.begin_object(NONE).unwrap();
        b.end_object().unwrap();
        b.end_array().unwrap();
        b.name("t").unwrap();
        b.uint64_value(5, SemanticTag::EpochTime).unwrap();
        b.end_object().unwrap();

        assert!(b.is_complete());
        let value = b.into_value().unwrap();
        let list = value.get("list").and_then(Value::as_array).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1], Value::Object(Object::new()));
        assert_eq!(value.get("t"), Some(&Value::Uint64(5, SemanticTag::EpochTime)));
    }

    #[test]
    fn duplicate_key_keeps_position_takes_last_value() {
        let mut b = ValueBuilder::new();
        b.begin_object(NONE).unwrap();
        for (k, v) in [("a", 1), ("b", 2), ("a", 3)] {
            b.name(k).unwrap();
            b.int64_value(v, NONE).unwrap();
        }
        b.end_object().unwrap();

        let value = b.into_value().unwrap();
        let members: Vec<_> = value.as_object().unwrap().iter().collect();
        assert_eq!(members[0], (&"a".to_owned(), &Value::Int64(3)));
        assert_eq!(members[1], (&"b".to_owned(), &Value::Int64(2)));
    }

    #[test]
    fn scalar_root() {
        let mut b = ValueBuilder::new();
        b.string_value("hi", NONE).unwrap();
        assert_eq!(b.into_value().unwrap(), Value::from("hi"));
    }

    #[test]
    fn rejects_value_without_name() {
        let mut b = ValueBuilder::new();
        b.begin_object(NONE).unwrap();
        let err = b.int64_value(1, NONE).unwrap_err();
        assert!(matches!(err, HandlerError::UnexpectedEvent { event: "int64", .. }));
    }

    #[test]
    fn rejects_mismatched_end() {
        let mut b = ValueBuilder::new();
        b.begin_array(NONE).unwrap();
        assert!(b.end_object().is_err());
    }

    #[test]
    fn rejects_second_root() {
        let mut b = ValueBuilder::new();
        b.null_value(NONE).unwrap();
        assert!(b.null_value(NONE).is_err());
    }

    #[test]
    fn incomplete_document() {
        let mut b = ValueBuilder::new();
        b.begin_array(NONE).unwrap();
        b.begin_array(NONE).unwrap();
        assert!(!b.is_complete());
        let err = b.into_value().unwrap_err();
        assert!(matches!(err, HandlerError::Incomplete { open: 2 }));

        let err = ValueBuilder::new().into_value().unwrap_err();
        assert!(matches!(err, HandlerError::Incomplete { open: 1 }));
    }
}
