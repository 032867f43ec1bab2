//! Document-level entry points.
//!
//! Each call builds a fresh reader or writer, hands it to the type's
//! [`Convert`] implementation and drops it on return.
//!
//! BSON decodes straight off the incremental [`BsonCursor`]. JSON is
//! tokenized by `serde_json` into an event buffer first, then converted.

use std::io;

use jdoc_decoder::{BsonCursor, BufferedReader, DecodeOptions, JsonReader, StreamReader};
use jdoc_encoder::{BsonWriter, EncodeError, EncodeOptions, Indenting, JsonPrinter};
use jdoc_types::{ContentHandler, ErrorState, EventBuffer};
use jdoc_wire::{IoSource, SliceSource};

use crate::error::ConvertError;
use crate::traits::Convert;

/// Convert the root value and make sure nothing follows it.
fn decode_root<T: Convert, R: StreamReader>(reader: &mut R) -> Result<T, ConvertError> {
    let value = T::decode(reader)?;
    match reader.current() {
        None => Ok(value),
        Some(event) => Err(ConvertError::shape("end of document", event.kind())),
    }
}

/// Decode a `T` from JSON text.
///
/// # Errors
///
/// [`ConvertError::Decode`] for malformed JSON, or a shape/range error if
/// the document doesn't describe a `T`.
pub fn decode_json<T: Convert>(text: &str) -> Result<T, ConvertError> {
    decode_json_with_options(text, DecodeOptions::default())
}

/// [`decode_json`] with explicit limits.
///
/// # Errors
///
/// See [`decode_json`].
pub fn decode_json_with_options<T: Convert>(
    text: &str,
    options: DecodeOptions,
) -> Result<T, ConvertError> {
    let mut buffer = EventBuffer::new();
    JsonReader::with_options(options).read_str(text, &mut buffer)?;
    decode_root(&mut BufferedReader::from(buffer))
}

/// Decode a `T` from a JSON byte stream.
///
/// # Errors
///
/// See [`decode_json`].
pub fn decode_json_from_reader<T: Convert, R: io::Read>(reader: R) -> Result<T, ConvertError> {
    let mut buffer = EventBuffer::new();
    JsonReader::new().read_from(reader, &mut buffer)?;
    decode_root(&mut BufferedReader::from(buffer))
}

/// Decode a `T` from one BSON document. Bytes after the document are
/// ignored.
///
/// # Errors
///
/// [`ConvertError::Decode`] for malformed BSON, or a shape/range error if
/// the document doesn't describe a `T`.
pub fn decode_bson<T: Convert>(bytes: &[u8]) -> Result<T, ConvertError> {
    decode_bson_with_options(bytes, DecodeOptions::default())
}

/// [`decode_bson`] with explicit limits.
///
/// # Errors
///
/// See [`decode_bson`].
pub fn decode_bson_with_options<T: Convert>(
    bytes: &[u8],
    options: DecodeOptions,
) -> Result<T, ConvertError> {
    let mut cursor = BsonCursor::new(SliceSource::new(bytes), options)?;
    decode_root(&mut cursor)
}

/// Decode a `T` from one BSON document read off a stream.
///
/// # Errors
///
/// See [`decode_bson`].
pub fn decode_bson_from_reader<T: Convert, R: io::Read>(reader: R) -> Result<T, ConvertError> {
    let mut cursor = BsonCursor::new(IoSource::new(reader), DecodeOptions::default())?;
    decode_root(&mut cursor)
}

/// [`decode_bson`] for the `ErrorState` family. Returns `None` and
/// leaves the first error in `state` on failure; does nothing if `state`
/// already holds an error.
pub fn decode_bson_with_state<T: Convert>(
    bytes: &[u8],
    state: &mut ErrorState<ConvertError>,
) -> Option<T> {
    if state.is_set() {
        return None;
    }
    let mut cursor = state.record(BsonCursor::new(
        SliceSource::new(bytes),
        DecodeOptions::default(),
    ))?;
    T::decode_with_state(&mut cursor, state)
}

/// Send `value`'s events to `handler`, then flush it.
///
/// # Errors
///
/// Whatever the handler rejects.
pub fn encode_json<T: Convert, H: ContentHandler + ?Sized>(
    value: &T,
    handler: &mut H,
) -> Result<(), EncodeError> {
    value.encode(handler)?;
    handler.flush()?;
    Ok(())
}

/// Write `value` as JSON to `writer`.
///
/// # Errors
///
/// I/O failures, or values JSON can't hold (non-finite doubles with
/// `nan_to_null` off).
pub fn encode_json_to_writer<T: Convert, W: io::Write>(
    value: &T,
    writer: W,
    indenting: Indenting,
) -> Result<(), EncodeError> {
    encode_json_to_writer_with_options(value, writer, EncodeOptions::default(), indenting)
}

/// [`encode_json_to_writer`] with explicit formatting options.
///
/// # Errors
///
/// See [`encode_json_to_writer`].
pub fn encode_json_to_writer_with_options<T: Convert, W: io::Write>(
    value: &T,
    writer: W,
    options: EncodeOptions,
    indenting: Indenting,
) -> Result<(), EncodeError> {
    let mut printer = JsonPrinter::with_options(writer, options, indenting);
    encode_json(value, &mut printer)
}

/// Render `value` as a JSON string.
///
/// # Errors
///
/// See [`encode_json_to_writer`].
pub fn encode_json_to_string<T: Convert>(
    value: &T,
    indenting: Indenting,
) -> Result<String, EncodeError> {
    encode_json_to_string_with_options(value, EncodeOptions::default(), indenting)
}

/// [`encode_json_to_string`] with explicit formatting options.
///
/// # Errors
///
/// See [`encode_json_to_writer`].
pub fn encode_json_to_string_with_options<T: Convert>(
    value: &T,
    options: EncodeOptions,
    indenting: Indenting,
) -> Result<String, EncodeError> {
    let mut printer = JsonPrinter::with_options(Vec::new(), options, indenting);
    encode_json(value, &mut printer)?;
    String::from_utf8(printer.into_inner())
        .map_err(|e| EncodeError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Encode `value` as one BSON document.
///
/// # Errors
///
/// `T` must encode as an object: anything else at the root is rejected,
/// as are unsigned integers above `i64::MAX` and keys containing NUL.
pub fn encode_bson<T: Convert>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut writer = BsonWriter::new();
    value.encode(&mut writer)?;
    writer.flush()?;
    writer.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use jdoc_decoder::DecodeError;
    use jdoc_types::Value;
    use jdoc_wire::WireError;

    const X_42: [u8; 12] = [0x0C, 0, 0, 0, 0x10, b'x', 0, 0x2A, 0, 0, 0, 0];

    #[test]
    fn bson_to_map() {
        let map: BTreeMap<String, i32> = decode_bson(&X_42).unwrap();
        assert_eq!(map, BTreeMap::from([("x".to_owned(), 42)]));
        assert_eq!(encode_bson(&map).unwrap(), X_42);
    }

    #[test]
    fn empty_document() {
        let value: Value = decode_bson(&[5, 0, 0, 0, 0]).unwrap();
        assert_eq!(value, Value::Object(jdoc_types::Object::new()));
    }

    #[test]
    fn json_to_bson_and_back() {
        let value: Value = decode_json(r#"{"a": [1, 2.5, "s"], "b": {"c": null}}"#).unwrap();
        let bytes = encode_bson(&value).unwrap();
        let back: Value = decode_bson(&bytes).unwrap();
        assert_eq!(back, value);
        assert_eq!(
            encode_json_to_string(&back, Indenting::Flat).unwrap(),
            r#"{"a":[1,2.5,"s"],"b":{"c":null}}"#
        );
    }

    #[test]
    fn non_object_root_cannot_be_bson() {
        assert!(encode_bson(&vec![1, 2]).is_err());
    }

    #[test]
    fn state_family_records_first_error() {
        let mut state = ErrorState::new();
        let none: Option<Value> = decode_bson_with_state(&X_42[..6], &mut state);
        assert!(none.is_none());
        assert!(matches!(
            state.get(),
            Some(ConvertError::Decode(DecodeError::Wire(WireError::UnexpectedEof { .. })))
        ));

        // A later call sees the recorded error and reads nothing.
        let skipped: Option<Value> = decode_bson_with_state(&X_42, &mut state);
        assert!(skipped.is_none());
    }

    #[test]
    fn state_family_success() {
        let mut state = ErrorState::new();
        let map: Option<BTreeMap<String, i64>> = decode_bson_with_state(&X_42, &mut state);
        assert_eq!(map.unwrap()["x"], 42);
        assert!(!state.is_set());
    }

    #[test]
    fn json_from_reader() {
        let v: Vec<String> = decode_json_from_reader(&br#"["a", "b"]"#[..]).unwrap();
        assert_eq!(v, ["a", "b"]);
    }

    #[test]
    fn bson_from_reader() {
        let v: Value = decode_bson_from_reader(&X_42[..]).unwrap();
        assert_eq!(v.get("x"), Some(&Value::Int64(42)));
    }

    #[test]
    fn json_shape_error() {
        let err = decode_json::<Vec<i32>>(r#"{"a": 1}"#).unwrap_err();
        assert!(matches!(err, ConvertError::Shape { .. }));
    }

    #[test]
    fn json_depth_limit() {
        let options = DecodeOptions::default().with_max_depth(2);
        let err = decode_json_with_options::<Value>("[[[1]]]", options).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::Decode(DecodeError::DepthExceeded { depth: 3, limit: 2 })
        ));
    }
}
