#![warn(clippy::pedantic)]

//! Conversion between native Rust values and JSON/BSON documents.
//!
//! Every convertible type implements [`Convert`], whose
//! [`CATEGORY`](Convert::CATEGORY) fixes how it travels through the event
//! stream: as an array of elements, an object of members, a fixed array,
//! a fixed tuple, or through an intermediate [`Value`](jdoc_types::Value).
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use jdoc_convert::{decode_bson, decode_json, encode_bson};
//!
//! let scores: BTreeMap<String, (i32, f64)> =
//!     decode_json(r#"{"ada": [3, 0.5], "bob": [1, 2.0]}"#).unwrap();
//! let bytes = encode_bson(&scores).unwrap();
//! assert_eq!(decode_bson::<BTreeMap<String, (i32, f64)>>(&bytes).unwrap(), scores);
//! ```

pub mod array;
pub mod cursor;
pub mod entry;
pub mod error;
pub mod fallback;
pub mod map;
pub mod sequence;
pub mod traits;
pub mod tuple;

pub use cursor::{ArrayCursor, ObjectCursor};
pub use entry::{
    decode_bson, decode_bson_from_reader, decode_bson_with_options, decode_bson_with_state,
    decode_json, decode_json_from_reader, decode_json_with_options, encode_bson, encode_json,
    encode_json_to_string, encode_json_to_string_with_options, encode_json_to_writer,
    encode_json_to_writer_with_options,
};
pub use error::ConvertError;
pub use fallback::{FromValue, ToValue, read_value};
pub use map::MapKey;
pub use traits::{Category, Convert};

// Re-exported for `convert_via_value!` expansions in downstream crates.
pub use jdoc_decoder::StreamReader;
pub use jdoc_types::{ContentHandler, HandlerResult};
