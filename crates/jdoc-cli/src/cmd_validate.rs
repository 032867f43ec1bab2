/// Implementation of `jdoc validate`.
///
/// Decodes every document in a BSON file into a discarding handler and
/// reports either a summary or the first diagnostic.
///
/// # Success output
///
/// ```text
/// ✓ Documents: 3 decoded successfully
/// ✓ Bytes: 412 consumed, no trailing data
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: document 1: unexpected end of input at offset 57
/// ```
///
/// With `--json` the same information is printed as a single object:
///
/// ```text
/// {"valid":false,"documents":1,"bytes":57,"error":"document 1: ..."}
/// ```
use anyhow::{Result, anyhow};
use jdoc_decoder::{DecodeError, DocumentStream};
use jdoc_types::{ContentHandler, HandlerResult, SemanticTag};
use jdoc_wire::{IoSource, WireError};
use serde::Serialize;

use crate::{ValidateArgs, decode_options, open_input};

#[derive(Debug, Serialize)]
struct Report {
    valid: bool,
    documents: usize,
    bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Handler that accepts any event and keeps nothing.
struct Discard;

impl ContentHandler for Discard {
    fn begin_object(&mut self, _tag: SemanticTag) -> HandlerResult {
        Ok(())
    }
    fn end_object(&mut self) -> HandlerResult {
        Ok(())
    }
    fn begin_array(&mut self, _tag: SemanticTag) -> HandlerResult {
        Ok(())
    }
    fn end_array(&mut self) -> HandlerResult {
        Ok(())
    }
    fn name(&mut self, _name: &str) -> HandlerResult {
        Ok(())
    }
    fn null_value(&mut self, _tag: SemanticTag) -> HandlerResult {
        Ok(())
    }
    fn bool_value(&mut self, _value: bool, _tag: SemanticTag) -> HandlerResult {
        Ok(())
    }
    fn int64_value(&mut self, _value: i64, _tag: SemanticTag) -> HandlerResult {
        Ok(())
    }
    fn uint64_value(&mut self, _value: u64, _tag: SemanticTag) -> HandlerResult {
        Ok(())
    }
    fn double_value(&mut self, _value: f64, _tag: SemanticTag) -> HandlerResult {
        Ok(())
    }
    fn string_value(&mut self, _value: &str, _tag: SemanticTag) -> HandlerResult {
        Ok(())
    }
    fn byte_string_value(&mut self, _value: &[u8], _tag: SemanticTag) -> HandlerResult {
        Ok(())
    }
}

/// Run the `jdoc validate` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, or if any document
/// fails to decode (after printing the diagnostic).
pub fn run(args: &ValidateArgs) -> Result<()> {
    let options = decode_options(args.max_depth).with_check_lengths(!args.lenient);
    let mut stream = DocumentStream::new(IoSource::new(open_input(&args.file)?), options);

    let error = loop {
        let index = stream.documents_read();
        match stream.read_next(&mut Discard) {
            Ok(true) => {}
            Ok(false) => break None,
            Err(e) => break Some(format!("document {index}: {}", diagnostic(&e))),
        }
    };

    let report = Report {
        valid: error.is_none(),
        documents: stream.documents_read(),
        bytes: stream.position(),
        error,
    };
    print_report(&report, args.json)?;

    if report.valid {
        Ok(())
    } else {
        Err(anyhow!("validation failed"))
    }
}

fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(report)?);
        return Ok(());
    }
    match &report.error {
        None => {
            println!(
                "✓ Documents: {} decoded successfully",
                report.documents
            );
            println!("✓ Bytes: {} consumed, no trailing data", report.bytes);
        }
        Some(error) => println!("✗ Error: {error}"),
    }
    Ok(())
}

// ── Error formatting ──────────────────────────────────────────────────────────

/// Converts a `DecodeError` into a human-readable diagnostic string.
///
/// ```text
/// ┌───────────────────────────┬─────────────────────────────────────────┐
/// │ DecodeError variant       │ Diagnostic                              │
/// ├───────────────────────────┼─────────────────────────────────────────┤
/// │ Wire(UnexpectedEof)       │ "truncated input at offset N"           │
/// │ Wire(UnsupportedType)     │ "unknown element type 0xNN at offset N" │
/// │ DepthExceeded             │ "nested deeper than N levels"           │
/// │ anything else             │ "<error Display>"                       │
/// └───────────────────────────┴─────────────────────────────────────────┘
/// ```
fn diagnostic(e: &DecodeError) -> String {
    match e {
        DecodeError::Wire(WireError::UnexpectedEof { offset }) => {
            format!("truncated input at offset {offset}")
        }
        DecodeError::Wire(WireError::UnsupportedType { code, offset }) => {
            format!("unknown element type 0x{code:02X} at offset {offset}")
        }
        DecodeError::DepthExceeded { limit, .. } => format!("nested deeper than {limit} levels"),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eof_diagnostic_names_offset() {
        let e = DecodeError::Wire(WireError::UnexpectedEof { offset: 9 });
        assert_eq!(diagnostic(&e), "truncated input at offset 9");
    }

    #[test]
    fn unknown_type_diagnostic_is_hex() {
        let e = DecodeError::Wire(WireError::UnsupportedType {
            code: 0x13,
            offset: 4,
        });
        assert_eq!(diagnostic(&e), "unknown element type 0x13 at offset 4");
    }

    #[test]
    fn discard_accepts_a_whole_stream() {
        let bytes = [0x0C, 0, 0, 0, 0x10, b'x', 0, 0x2A, 0, 0, 0, 0];
        let mut stream = DocumentStream::from_slice(&bytes);
        assert!(stream.read_next(&mut Discard).unwrap());
        assert!(!stream.read_next(&mut Discard).unwrap());
        assert_eq!(stream.position(), 12);
    }

    #[test]
    fn report_skips_missing_error() {
        let report = Report {
            valid: true,
            documents: 2,
            bytes: 10,
            error: None,
        };
        assert_eq!(
            serde_json::to_string(&report).unwrap(),
            r#"{"valid":true,"documents":2,"bytes":10}"#
        );
    }
}
