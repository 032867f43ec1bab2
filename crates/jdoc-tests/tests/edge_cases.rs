//! Edge cases: malformed input, limits, and lossy conversions.

use std::collections::BTreeMap;

use jdoc_convert::{
    ConvertError, decode_bson, decode_bson_with_options, decode_bson_with_state, decode_json,
    encode_bson,
};
use jdoc_decoder::{BsonReader, DecodeError, DecodeOptions, DocumentStream, JsonReader};
use jdoc_tests::fixtures;
use jdoc_types::{ErrorState, Object, Value, ValueBuilder};
use jdoc_wire::{SliceSource, WireError};

fn decode_value(bytes: &[u8]) -> Result<Value, ConvertError> {
    decode_bson(bytes)
}

fn is_eof(e: &ConvertError) -> bool {
    matches!(e, ConvertError::Decode(d) if d.is_eof())
}

// ── Minimal documents ─────────────────────────────────────────────────────────

#[test]
fn empty_document_is_empty_object() {
    assert_eq!(decode_value(&[5, 0, 0, 0, 0]).unwrap(), Value::Object(Object::new()));
    let map: BTreeMap<String, i32> = decode_bson(&fixtures::empty()).unwrap();
    assert!(map.is_empty());
}

#[test]
fn int32_document_reencodes_identically() {
    let bytes = fixtures::single_int32();
    let value = decode_value(&bytes).unwrap();
    assert_eq!(value.get("x"), Some(&Value::Int64(42)));

    let again = encode_bson(&value).unwrap();
    assert_eq!(again, bytes);
    assert_eq!(decode_value(&again).unwrap(), value);
}

// ── Truncation ────────────────────────────────────────────────────────────────

#[test]
fn every_truncation_is_eof() {
    for fixture in [fixtures::scalars(), fixtures::nested()] {
        for len in 0..fixture.len() {
            let err = decode_value(&fixture[..len]).unwrap_err();
            assert!(is_eof(&err), "prefix of {len} bytes: {err}");
        }
    }
}

#[test]
fn truncation_without_length_checks_is_still_an_error() {
    let options = DecodeOptions::default().with_check_lengths(false);
    let bytes = fixtures::nested();
    for len in 0..bytes.len() {
        let mut reader = BsonReader::with_options(SliceSource::new(&bytes[..len]), options);
        let err = reader.read(&mut ValueBuilder::new()).unwrap_err();
        assert!(err.is_eof(), "prefix of {len} bytes: {err}");
    }
}

#[test]
fn stream_ending_inside_a_prefix_is_eof() {
    let mut bytes = fixtures::single_int32();
    bytes.extend_from_slice(&[7, 0]);
    let mut stream = DocumentStream::from_slice(&bytes);
    assert!(stream.next().unwrap().is_ok());
    let err = stream.next().unwrap().unwrap_err();
    assert!(err.is_eof());
    assert!(stream.next().is_none());
}

// ── Malformed input ───────────────────────────────────────────────────────────

#[test]
fn unknown_type_code_is_rejected() {
    let err = decode_value(&fixtures::unknown_type()).unwrap_err();
    assert!(
        matches!(
            err,
            ConvertError::Decode(DecodeError::Wire(WireError::UnsupportedType { code: 0x13, offset: 4 }))
        ),
        "{err}"
    );
}

#[test]
fn every_malformed_fixture_is_rejected() {
    for fixture in fixtures::malformed() {
        assert!(decode_value(&fixture.bytes).is_err(), "{}", fixture.name);
        assert!(
            BsonReader::from_slice(&fixture.bytes)
                .read(&mut ValueBuilder::new())
                .is_err(),
            "{}",
            fixture.name
        );
        let mut stream = DocumentStream::from_slice(&fixture.bytes);
        assert!(stream.next().unwrap().is_err(), "{}", fixture.name);
    }
}

#[test]
fn short_length_prefix_is_invalid() {
    let bytes = fixtures::malformed()
        .into_iter()
        .find(|f| f.name == "short_prefix")
        .unwrap()
        .bytes;
    let err = BsonReader::from_slice(&bytes)
        .read(&mut ValueBuilder::new())
        .unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Wire(WireError::InvalidLength { declared: 4, offset: 0 })
    ));
}

// ── Nesting limits ────────────────────────────────────────────────────────────

#[test]
fn depth_at_limit_decodes_and_beyond_fails() {
    let options = DecodeOptions::default().with_max_depth(8);

    let ok = fixtures::deep(8);
    BsonReader::with_options(SliceSource::new(&ok), options)
        .read(&mut ValueBuilder::new())
        .unwrap();

    let deep = fixtures::deep(9);
    let err = BsonReader::with_options(SliceSource::new(&deep), options)
        .read(&mut ValueBuilder::new())
        .unwrap_err();
    assert!(matches!(err, DecodeError::DepthExceeded { depth: 9, limit: 8 }));
}

#[test]
fn default_limit_through_the_cursor() {
    let ok = fixtures::deep(1024);
    assert!(decode_value(&ok).is_ok());

    let err = decode_value(&fixtures::deep(1025)).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Decode(DecodeError::DepthExceeded { limit: 1024, .. })
    ));
}

#[test]
fn very_deep_input_fails_without_overflowing() {
    let bytes = fixtures::deep(2000);
    let err = decode_value(&bytes).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::Decode(DecodeError::DepthExceeded { depth: 1025, limit: 1024 })
    ));

    let options = DecodeOptions::default().with_max_depth(64);
    let err = BsonReader::with_options(SliceSource::new(&bytes), options)
        .read(&mut ValueBuilder::new())
        .unwrap_err();
    assert!(matches!(err, DecodeError::DepthExceeded { depth: 65, limit: 64 }));
}

#[test]
fn custom_limit_through_entry_point() {
    let options = DecodeOptions::default().with_max_depth(2);
    let err = decode_bson_with_options::<Value>(&fixtures::nested(), options).unwrap_err();
    assert!(matches!(err, ConvertError::Decode(DecodeError::DepthExceeded { .. })));
}

#[test]
fn json_depth_limit() {
    let reader = JsonReader::with_options(DecodeOptions::default().with_max_depth(3));
    reader.read_str("[[[]]]", &mut ValueBuilder::new()).unwrap();
    let err = reader
        .read_str("[[[[]]]]", &mut ValueBuilder::new())
        .unwrap_err();
    assert!(matches!(err, DecodeError::DepthExceeded { limit: 3, .. }));
}

// ── Lossy and failing conversions ─────────────────────────────────────────────

#[test]
fn fixed_array_discards_surplus_elements() {
    let short: BTreeMap<String, [i32; 3]> = decode_bson(&fixtures::five_ints()).unwrap();
    assert_eq!(short["a"], [1, 2, 3]);

    let long: BTreeMap<String, [i32; 7]> = decode_bson(&fixtures::five_ints()).unwrap();
    assert_eq!(long["a"], [1, 2, 3, 4, 5, 0, 0]);
}

#[test]
fn shape_mismatch() {
    let err = decode_bson::<BTreeMap<String, String>>(&fixtures::single_int32()).unwrap_err();
    assert!(matches!(err, ConvertError::Shape { .. }), "{err}");

    let err = decode_json::<Vec<i32>>("{}").unwrap_err();
    assert!(matches!(err, ConvertError::Shape { .. }), "{err}");
}

#[test]
fn narrowing_out_of_range() {
    let err = decode_json::<u8>("300").unwrap_err();
    assert!(matches!(err, ConvertError::OutOfRange { target: "u8", .. }), "{err}");
}

#[test]
fn json_syntax_error_has_position() {
    let err = decode_json::<Value>("{\n  \"a\": }").unwrap_err();
    match err {
        ConvertError::Decode(DecodeError::Json { line, column, .. }) => {
            assert_eq!(line, 2);
            assert!(column > 0);
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn json_trailing_characters() {
    assert!(decode_json::<i32>("1 2").is_err());
}

#[test]
fn bson_root_must_be_an_object() {
    assert!(encode_bson(&vec![1, 2]).is_err());
    assert!(encode_bson(&Value::Null).is_err());
}

#[test]
fn uint64_beyond_int64_cannot_be_written() {
    let value = BTreeMap::from([("u".to_owned(), u64::MAX)]);
    assert!(encode_bson(&value).is_err());
}

// ── Error-state entry point ───────────────────────────────────────────────────

#[test]
fn error_state_keeps_first_error() {
    let mut state = ErrorState::new();
    let first: Option<Value> = decode_bson_with_state(&fixtures::unknown_type(), &mut state);
    assert!(first.is_none());
    assert!(state.is_set());

    // once set, later calls do nothing, even on valid input
    let second: Option<Value> = decode_bson_with_state(&fixtures::single_int32(), &mut state);
    assert!(second.is_none());
    assert!(matches!(
        state.take(),
        Some(ConvertError::Decode(DecodeError::Wire(WireError::UnsupportedType { .. })))
    ));
}

#[test]
fn error_state_success() {
    let mut state = ErrorState::new();
    let value: Option<BTreeMap<String, i64>> =
        decode_bson_with_state(&fixtures::single_int32(), &mut state);
    assert_eq!(value.unwrap()["x"], 42);
    assert!(!state.is_set());
}
