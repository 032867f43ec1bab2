#![no_main]

use jdoc_decoder::JsonReader;
use jdoc_encoder::{BsonWriter, JsonPrinter};
use jdoc_types::{Value, ValueBuilder};
use libfuzzer_sys::fuzz_target;

// Fuzz target: JSON reader over arbitrary text.
//
// Anything the reader accepts must print back to JSON that parses to the
// same value. Object roots are also pushed through the BSON writer.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let mut builder = ValueBuilder::new();
    if JsonReader::new().read_str(text, &mut builder).is_err() {
        return;
    }
    let value = builder.into_value().unwrap();

    let mut printer = JsonPrinter::new(Vec::new());
    value.dump(&mut printer).unwrap();
    let printed = String::from_utf8(printer.into_inner()).unwrap();

    let reparsed: Value = jdoc_convert::decode_json(&printed).unwrap();
    assert_eq!(reparsed, value);

    if matches!(value, Value::Object(_)) {
        let mut writer = BsonWriter::new();
        if value.dump(&mut writer).is_ok() {
            let _ = writer.into_bytes();
        }
    }
});
