#![warn(clippy::pedantic)]

pub mod bson_writer;
pub mod error;
pub mod json_printer;
pub mod options;

pub use bson_writer::BsonWriter;
pub use error::EncodeError;
pub use json_printer::JsonPrinter;
pub use options::{ByteStringFormat, EncodeOptions, Indenting};
