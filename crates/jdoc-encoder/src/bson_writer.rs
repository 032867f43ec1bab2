use jdoc_types::{ContentHandler, HandlerError, HandlerResult, SemanticTag};
use jdoc_wire::ElementType;
use jdoc_wire::element::TERMINATOR;
use jdoc_wire::endian::encode_le;
use log::{debug, trace};

use crate::error::EncodeError;

/// Largest document the format can describe: its length prefix is an
/// `i32`.
#[allow(clippy::cast_sign_loss)]
const MAX_DOCUMENT_LEN: usize = i32::MAX as usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Kind {
    Document,
    Array,
}

#[derive(Debug)]
struct Open {
    kind: Kind,
    /// Offset of the placeholder length prefix.
    start: usize,
    /// Next index key, for arrays.
    next_index: usize,
}

/// Content handler that produces BSON bytes.
///
/// Each document or array starts with a zeroed length prefix that is
/// patched once the structure closes. Array elements get their index as
/// key (`"0"`, `"1"`, ...).
///
/// Value events map onto element types as follows:
///
/// ```text
/// ┌──────────────────────────────┬────────────────────────────────┐
/// │ Event                        │ Element                        │
/// ├──────────────────────────────┼────────────────────────────────┤
/// │ int64 within i32             │ 0x10 int32                     │
/// │ int64 otherwise              │ 0x12 int64                     │
/// │ uint64 tagged EpochTime      │ 0x11 timestamp                 │
/// │ uint64 within i64            │ 0x10 / 0x12 as for int64       │
/// │ uint64 above i64::MAX        │ rejected                       │
/// │ double                       │ 0x01                           │
/// │ string                       │ 0x02                           │
/// │ byte string                  │ 0x05 (no subtype byte)         │
/// │ bool / null                  │ 0x08 / 0x0A                    │
/// └──────────────────────────────┴────────────────────────────────┘
/// ```
///
/// The root of every document must be an object. Several root objects in
/// a row produce concatenated documents.
#[derive(Debug, Default)]
pub struct BsonWriter {
    buf: Vec<u8>,
    stack: Vec<Open>,
    pending_key: Option<String>,
    documents: usize,
}

impl BsonWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of root documents completed so far.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Take the encoded output.
    ///
    /// # Errors
    ///
    /// [`EncodeError::Incomplete`] if a structure is still open or no
    /// document was written.
    pub fn into_bytes(self) -> Result<Vec<u8>, EncodeError> {
        if !self.stack.is_empty() || self.documents == 0 {
            return Err(EncodeError::Incomplete {
                open: self.stack.len().max(1),
            });
        }
        Ok(self.buf)
    }

    /// Type code and key for the next element in the open structure.
    fn element_header(&mut self, ty: ElementType, event: &'static str) -> HandlerResult {
        let key = match self.stack.last_mut() {
            None => {
                return Err(HandlerError::Unsupported(format!(
                    "bson document root must be an object, found {event}"
                )));
            }
            Some(Open {
                kind: Kind::Document,
                ..
            }) => self.pending_key.take().ok_or(HandlerError::UnexpectedEvent {
                event,
                reason: "object member without a name",
            })?,
            Some(Open {
                kind: Kind::Array,
                next_index,
                ..
            }) => {
                let key = next_index.to_string();
                *next_index += 1;
                key
            }
        };
        self.buf.push(ty.code());
        self.buf.extend_from_slice(key.as_bytes());
        self.buf.push(TERMINATOR);
        Ok(())
    }

    fn open(&mut self, kind: Kind, ty: ElementType, event: &'static str) -> HandlerResult {
        if !self.stack.is_empty() || kind == Kind::Array {
            self.element_header(ty, event)?;
        }
        trace!("open {kind:?} at offset {}", self.buf.len());
        self.stack.push(Open {
            kind,
            start: self.buf.len(),
            next_index: 0,
        });
        encode_le(0i32, &mut self.buf);
        Ok(())
    }

    fn close(&mut self, kind: Kind, event: &'static str) -> HandlerResult {
        if self.pending_key.is_some() {
            return Err(HandlerError::UnexpectedEvent {
                event,
                reason: "name without a value",
            });
        }
        let open = match self.stack.pop() {
            Some(open) if open.kind == kind => open,
            _ => {
                return Err(HandlerError::UnexpectedEvent {
                    event,
                    reason: "does not match the open structure",
                });
            }
        };
        self.buf.push(TERMINATOR);
        let size = self.buf.len() - open.start;
        let len = i32::try_from(size).map_err(|_| HandlerError::TooLarge {
            size,
            limit: MAX_DOCUMENT_LEN,
        })?;
        self.buf[open.start..open.start + 4].copy_from_slice(&len.to_le_bytes());
        if self.stack.is_empty() {
            self.documents += 1;
            debug!("bson document of {size} bytes written");
        }
        Ok(())
    }

    fn write_integer(&mut self, value: i64, event: &'static str) -> HandlerResult {
        match i32::try_from(value) {
            Ok(small) => {
                self.element_header(ElementType::Int32, event)?;
                encode_le(small, &mut self.buf);
            }
            Err(_) => {
                self.element_header(ElementType::Int64, event)?;
                encode_le(value, &mut self.buf);
            }
        }
        Ok(())
    }

    fn write_length(&mut self, len: usize) -> HandlerResult {
        let len = i32::try_from(len).map_err(|_| HandlerError::TooLarge {
            size: len,
            limit: MAX_DOCUMENT_LEN,
        })?;
        encode_le(len, &mut self.buf);
        Ok(())
    }
}

impl ContentHandler for BsonWriter {
    fn begin_object(&mut self, _tag: SemanticTag) -> HandlerResult {
        self.open(Kind::Document, ElementType::Document, "begin-object")
    }

    fn end_object(&mut self) -> HandlerResult {
        self.close(Kind::Document, "end-object")
    }

    fn begin_array(&mut self, _tag: SemanticTag) -> HandlerResult {
        self.open(Kind::Array, ElementType::Array, "begin-array")
    }

    fn end_array(&mut self) -> HandlerResult {
        self.close(Kind::Array, "end-array")
    }

    fn name(&mut self, name: &str) -> HandlerResult {
        match self.stack.last() {
            Some(Open {
                kind: Kind::Document,
                ..
            }) if self.pending_key.is_none() => {}
            _ => {
                return Err(HandlerError::UnexpectedEvent {
                    event: "name",
                    reason: "names are only valid between object members",
                });
            }
        }
        if name.as_bytes().contains(&TERMINATOR) {
            return Err(HandlerError::Unsupported(format!(
                "bson keys cannot contain NUL: {name:?}"
            )));
        }
        self.pending_key = Some(name.to_owned());
        Ok(())
    }

    fn null_value(&mut self, _tag: SemanticTag) -> HandlerResult {
        self.element_header(ElementType::Null, "null")
    }

    fn bool_value(&mut self, value: bool, _tag: SemanticTag) -> HandlerResult {
        self.element_header(ElementType::Bool, "bool")?;
        self.buf.push(u8::from(value));
        Ok(())
    }

    fn int64_value(&mut self, value: i64, _tag: SemanticTag) -> HandlerResult {
        self.write_integer(value, "int64")
    }

    fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> HandlerResult {
        if tag == SemanticTag::EpochTime {
            self.element_header(ElementType::Timestamp, "uint64")?;
            encode_le(value, &mut self.buf);
            return Ok(());
        }
        let signed = i64::try_from(value).map_err(|_| {
            HandlerError::Unsupported(format!("uint64 {value} is outside the int64 range"))
        })?;
        self.write_integer(signed, "uint64")
    }

    fn double_value(&mut self, value: f64, _tag: SemanticTag) -> HandlerResult {
        self.element_header(ElementType::Double, "double")?;
        encode_le(value, &mut self.buf);
        Ok(())
    }

    fn string_value(&mut self, value: &str, _tag: SemanticTag) -> HandlerResult {
        self.element_header(ElementType::String, "string")?;
        self.write_length(value.len() + 1)?;
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(TERMINATOR);
        Ok(())
    }

    fn byte_string_value(&mut self, value: &[u8], _tag: SemanticTag) -> HandlerResult {
        self.element_header(ElementType::Binary, "byte-string")?;
        self.write_length(value.len())?;
        self.buf.extend_from_slice(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdoc_decoder::BsonReader;
    use jdoc_types::{Event, EventBuffer};

    const NONE: SemanticTag = SemanticTag::None;

    fn write(events: &[Event]) -> Result<Vec<u8>, EncodeError> {
        let mut writer = BsonWriter::new();
        for event in events {
            event.send_to(&mut writer)?;
        }
        writer.into_bytes()
    }

    #[test]
    fn empty_document() {
        let bytes = write(&[Event::BeginObject(NONE), Event::EndObject]).unwrap();
        assert_eq!(bytes, [5, 0, 0, 0, 0]);
    }

    #[test]
    fn small_int64_becomes_int32() {
        let bytes = write(&[
            Event::BeginObject(NONE),
            Event::Name("x".into()),
            Event::Int64(42, NONE),
            Event::EndObject,
        ])
        .unwrap();
        assert_eq!(bytes, [0x0C, 0, 0, 0, 0x10, b'x', 0, 0x2A, 0, 0, 0, 0]);
    }

    #[test]
    fn wide_int64_stays_int64() {
        let bytes = write(&[
            Event::BeginObject(NONE),
            Event::Name("n".into()),
            Event::Int64(1 << 40, NONE),
            Event::EndObject,
        ])
        .unwrap();
        assert_eq!(bytes[4], ElementType::Int64.code());
        assert_eq!(bytes.len(), 4 + 3 + 8 + 1);
    }

    #[test]
    fn array_keys_are_indices() {
        let bytes = write(&[
            Event::BeginObject(NONE),
            Event::Name("a".into()),
            Event::BeginArray(NONE),
            Event::Bool(true, NONE),
            Event::Null(NONE),
            Event::EndArray,
            Event::EndObject,
        ])
        .unwrap();
        let expected: &[u8] = b"\x14\x00\x00\x00\x04a\x00\x0C\x00\x00\x00\x080\x00\x01\x0A1\x00\x00\x00";
        assert_eq!(bytes, expected);
    }

    #[test]
    fn roundtrip_through_reader() {
        let events = vec![
            Event::BeginObject(NONE),
            Event::Name("d".into()),
            Event::Double(1.5, NONE),
            Event::Name("s".into()),
            Event::String("héllo".into(), NONE),
            Event::Name("b".into()),
            Event::ByteString(vec![0, 1, 2], NONE),
            Event::Name("t".into()),
            Event::Uint64(1_700_000_000_000, SemanticTag::EpochTime),
            Event::Name("o".into()),
            Event::BeginObject(NONE),
            Event::EndObject,
            Event::EndObject,
        ];
        let bytes = write(&events).unwrap();
        let mut buffer = EventBuffer::new();
        BsonReader::from_slice(&bytes).read(&mut buffer).unwrap();
        assert_eq!(buffer.into_events(), events);
    }

    #[test]
    fn root_must_be_object() {
        let err = write(&[Event::Int64(1, NONE)]).unwrap_err();
        assert!(matches!(err, EncodeError::Handler(HandlerError::Unsupported(_))));

        let err = write(&[Event::BeginArray(NONE), Event::EndArray]).unwrap_err();
        assert!(matches!(err, EncodeError::Handler(HandlerError::Unsupported(_))));
    }

    #[test]
    fn huge_uint64_rejected() {
        let err = write(&[
            Event::BeginObject(NONE),
            Event::Name("u".into()),
            Event::Uint64(u64::MAX, NONE),
        ])
        .unwrap_err();
        assert!(matches!(err, EncodeError::Handler(HandlerError::Unsupported(_))));
    }

    #[test]
    fn key_with_nul_rejected() {
        let mut writer = BsonWriter::new();
        writer.begin_object(NONE).unwrap();
        assert!(writer.name("a\0b").is_err());
    }

    #[test]
    fn mismatched_close_rejected() {
        let mut writer = BsonWriter::new();
        writer.begin_object(NONE).unwrap();
        writer.name("a").unwrap();
        writer.begin_array(NONE).unwrap();
        assert!(writer.end_object().is_err());
    }

    #[test]
    fn incomplete_output() {
        let mut writer = BsonWriter::new();
        writer.begin_object(NONE).unwrap();
        assert!(matches!(writer.into_bytes(), Err(EncodeError::Incomplete { open: 1 })));
        assert!(matches!(BsonWriter::new().into_bytes(), Err(EncodeError::Incomplete { .. })));
    }

    #[test]
    fn concatenated_documents() {
        let mut writer = BsonWriter::new();
        for _ in 0..2 {
            writer.begin_object(NONE).unwrap();
            writer.end_object().unwrap();
        }
        assert_eq!(writer.documents(), 2);
        assert_eq!(writer.into_bytes().unwrap(), [5, 0, 0, 0, 0, 5, 0, 0, 0, 0]);
    }
}
