#![warn(clippy::pedantic)]

pub mod bson_cursor;
pub mod bson_reader;
pub mod config;
pub mod error;
pub mod json_reader;
pub mod reader;
pub mod streaming;

mod element;

pub use bson_cursor::BsonCursor;
pub use bson_reader::BsonReader;
pub use config::DecodeOptions;
pub use error::DecodeError;
pub use json_reader::JsonReader;
pub use reader::{BufferedReader, StreamReader};
pub use streaming::DocumentStream;
