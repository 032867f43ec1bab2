//! Conformance tests: golden fixtures rendered to insta inline snapshots.
//!
//! Each fixture from [`jdoc_tests::fixtures`] is decoded and rendered as
//! JSON text, an event trace, or a hex dump, and compared against the
//! snapshot written next to the assertion. A diff signals either a
//! deliberate format change (accept via `cargo insta review`) or an
//! accidental regression.
//!
//! `generate_golden` writes the same fixtures to `tests/golden/` for use
//! by other implementations; these tests build them in memory.

use std::collections::BTreeMap;

use insta::assert_snapshot;
use jdoc_convert::{decode_bson, encode_bson};
use jdoc_decoder::{BsonReader, DocumentStream, JsonReader};
use jdoc_encoder::{BsonWriter, EncodeOptions, Indenting, JsonPrinter};
use jdoc_tests::fixtures;
use jdoc_types::{ByteString, EventBuffer, SemanticTag, Value};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Stream every document in `bytes` through a JSON printer.
fn to_json(bytes: &[u8], indenting: Indenting) -> String {
    let mut printer = JsonPrinter::with_options(Vec::new(), EncodeOptions::default(), indenting);
    let mut stream = DocumentStream::from_slice(bytes);
    while stream
        .read_next(&mut printer)
        .unwrap_or_else(|e| panic!("decode failed: {e}"))
    {}
    String::from_utf8(printer.into_inner()).unwrap()
}

/// One `Debug`-formatted event per line.
fn trace(bytes: &[u8]) -> String {
    let mut buffer = EventBuffer::new();
    BsonReader::from_slice(bytes).read(&mut buffer).unwrap();
    buffer
        .events()
        .iter()
        .map(|e| format!("{e:?}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse JSON text straight into BSON bytes.
fn json_to_bson(text: &str) -> Vec<u8> {
    let mut writer = BsonWriter::new();
    JsonReader::new().read_str(text, &mut writer).unwrap();
    writer.into_bytes().unwrap()
}

// ── BSON → JSON ───────────────────────────────────────────────────────────────

#[test]
fn empty_document_json() {
    assert_snapshot!(to_json(&fixtures::empty(), Indenting::Flat), @"{}");
}

#[test]
fn single_int32_json() {
    assert_snapshot!(to_json(&fixtures::single_int32(), Indenting::Flat), @r#"{"x":42}"#);
}

#[test]
fn scalars_json() {
    assert_snapshot!(
        to_json(&fixtures::scalars(), Indenting::Flat),
        @r#"{"d":1.5,"s":"hi","b":"AQID","t":true,"n":null,"i":-7,"ts":1700000000,"l":5000000000}"#
    );
}

#[test]
fn nested_json_flat() {
    assert_snapshot!(
        to_json(&fixtures::nested(), Indenting::Flat),
        @r#"{"outer":{"list":[1,{"k":"v"},[]]}}"#
    );
}

#[test]
fn nested_json_indented() {
    assert_snapshot!(to_json(&fixtures::nested(), Indenting::Indent), @r#"
{
    "outer": {
        "list": [
            1,
            {
                "k": "v"
            },
            []
        ]
    }
}
"#);
}

#[test]
fn concatenated_documents_one_per_line() {
    assert_snapshot!(to_json(&fixtures::concatenated(), Indenting::Flat), @r#"
{"x":42}
{"s":"second"}
"#);
}

// ── Event traces ──────────────────────────────────────────────────────────────

#[test]
fn scalars_trace() {
    assert_snapshot!(trace(&fixtures::scalars()), @r#"
BeginObject(None)
Name("d")
Double(1.5, None)
Name("s")
String("hi", None)
Name("b")
ByteString([1, 2, 3], None)
Name("t")
Bool(true, None)
Name("n")
Null(None)
Name("i")
Int64(-7, None)
Name("ts")
Uint64(1700000000, EpochTime)
Name("l")
Int64(5000000000, None)
EndObject
"#);
}

#[test]
fn array_keys_are_not_reported() {
    assert_snapshot!(trace(&fixtures::five_ints()), @r#"
BeginObject(None)
Name("a")
BeginArray(None)
Int64(1, None)
Int64(2, None)
Int64(3, None)
Int64(4, None)
Int64(5, None)
EndArray
EndObject
"#);
}

// ── Native values → BSON bytes ────────────────────────────────────────────────

#[test]
fn sequence_bytes() {
    let value = BTreeMap::from([("a".to_owned(), vec![1i32, 2])]);
    assert_snapshot!(
        hex::encode(encode_bson(&value).unwrap()),
        @"1b0000000461001300000010300001000000103100020000000000"
    );
}

#[test]
fn tuple_bytes() {
    let value = BTreeMap::from([("p".to_owned(), ("x".to_owned(), 2.5f64, true))]);
    assert_snapshot!(
        hex::encode(encode_bson(&value).unwrap()),
        @"250000000470001d0000000230000200000078000131000000000000000440083200010000"
    );
}

#[test]
fn binary_has_no_subtype_byte() {
    let value = BTreeMap::from([("blob".to_owned(), ByteString(vec![1, 2, 3]))]);
    assert_snapshot!(
        hex::encode(encode_bson(&value).unwrap()),
        @"1200000005626c6f62000300000001020300"
    );
}

#[test]
fn epoch_time_becomes_timestamp() {
    let value: Value = [("t", Value::Uint64(5, SemanticTag::EpochTime))]
        .into_iter()
        .collect();
    assert_snapshot!(
        hex::encode(encode_bson(&value).unwrap()),
        @"10000000117400050000000000000000"
    );
}

#[test]
fn wide_integer_stays_int64() {
    let value = BTreeMap::from([("big".to_owned(), 1i64 << 40)]);
    assert_snapshot!(
        hex::encode(encode_bson(&value).unwrap()),
        @"120000001262696700000000000001000000"
    );
}

// ── Cross-format agreement ────────────────────────────────────────────────────

#[test]
fn json_text_produces_golden_bytes() {
    assert_eq!(json_to_bson("{}"), fixtures::empty());
    assert_eq!(json_to_bson(r#"{"x": 42}"#), fixtures::single_int32());
    assert_eq!(
        json_to_bson(r#"{"outer": {"list": [1, {"k": "v"}, []]}}"#),
        fixtures::nested()
    );
}

#[test]
fn bson_pipe_preserves_bytes() {
    for fixture in fixtures::golden() {
        if fixture.name == "concatenated" {
            continue;
        }
        let mut writer = BsonWriter::new();
        BsonReader::from_slice(&fixture.bytes)
            .read(&mut writer)
            .unwrap_or_else(|e| panic!("{}: {e}", fixture.name));
        assert_eq!(writer.into_bytes().unwrap(), fixture.bytes, "{}", fixture.name);
    }
}

#[test]
fn value_roundtrip_preserves_bytes() {
    let value: Value = decode_bson(&fixtures::scalars()).unwrap();
    assert_eq!(encode_bson(&value).unwrap(), fixtures::scalars());
}
