#![no_main]

use std::collections::BTreeMap;

use arbitrary::Arbitrary;
use jdoc_types::ByteString;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzValue {
    Int(i64),
    Text(String),
    Flag(Option<bool>),
    Bytes(Vec<u8>),
    List(Vec<i32>),
    Pair((u16, String)),
    Fixed([i8; 4]),
}

type Record = BTreeMap<String, (Vec<i64>, Vec<String>, Vec<Option<bool>>, ByteString)>;

// Fuzz target: native values → BSON → native values.
//
// Builds a typed record from arbitrary input, encodes it, and checks that
// decoding gives back exactly the same record.
fuzz_target!(|input: Vec<(String, Vec<FuzzValue>)>| {
    let mut record = Record::new();
    for (key, values) in input {
        if key.contains('\0') {
            continue;
        }
        let entry = record.entry(key).or_default();
        for value in values {
            match value {
                FuzzValue::Int(v) => entry.0.push(v),
                FuzzValue::Text(s) => entry.1.push(s),
                FuzzValue::Flag(f) => entry.2.push(f),
                FuzzValue::Bytes(b) => entry.3 .0.extend(b),
                FuzzValue::List(items) => entry.0.extend(items.into_iter().map(i64::from)),
                FuzzValue::Pair((n, s)) => {
                    entry.0.push(i64::from(n));
                    entry.1.push(s);
                }
                FuzzValue::Fixed(items) => entry.0.extend(items.map(i64::from)),
            }
        }
    }

    let bytes = jdoc_convert::encode_bson(&record).unwrap();
    let back: Record = jdoc_convert::decode_bson(&bytes).unwrap();
    assert_eq!(back, record);
});
