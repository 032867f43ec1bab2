#![no_main]

use jdoc_decoder::{BsonReader, DecodeOptions, DocumentStream};
use jdoc_types::{EventBuffer, Value};
use jdoc_wire::SliceSource;
use libfuzzer_sys::fuzz_target;

// Fuzz target: BSON readers over arbitrary bytes.
//
// Runs the push reader, the pull cursor (through `decode_bson`) and the
// document stream over the same input. None may panic, and the push
// reader and the cursor must agree on whether the first document is
// well formed.
fuzz_target!(|data: &[u8]| {
    let push = BsonReader::from_slice(data).read(&mut EventBuffer::new());
    let pull = jdoc_convert::decode_bson::<Value>(data);
    assert_eq!(push.is_ok(), pull.is_ok());

    let lenient = DecodeOptions::default().with_check_lengths(false);
    let _ = BsonReader::with_options(SliceSource::new(data), lenient).read(&mut EventBuffer::new());

    for document in DocumentStream::from_slice(data) {
        if document.is_err() {
            break;
        }
    }
});
