/// Implementation of `jdoc inspect`.
///
/// Streams the BSON documents of a file and prints each one's event
/// sequence, indented by nesting level.
///
/// # Output format
///
/// ```text
/// Document 0 (offset 0, 12 bytes)
///   begin-object
///     name "x"
///     int64 42
///   end-object
/// ---
/// 1 document
/// ```
use std::fmt::{self, Write as _};

use anyhow::{Context, Result};
use jdoc_decoder::DocumentStream;
use jdoc_types::{Event, EventBuffer, SemanticTag};
use jdoc_wire::IoSource;

use crate::{InspectArgs, decode_options, open_input};

/// Run the `jdoc inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any document fails
/// to decode. Documents before the failing one have already been printed.
pub fn run(args: &InspectArgs) -> Result<()> {
    let input = open_input(&args.file)?;
    let mut stream = DocumentStream::new(IoSource::new(input), decode_options(args.max_depth));
    let mut buffer = EventBuffer::new();

    loop {
        let index = stream.documents_read();
        let start = stream.position();
        buffer.clear();
        let more = stream
            .read_next(&mut buffer)
            .with_context(|| format!("document {index} starting at offset {start}"))?;
        if !more {
            break;
        }
        if args.doc.is_some_and(|wanted| wanted != index) {
            continue;
        }
        println!(
            "Document {index} (offset {start}, {} bytes)",
            stream.position() - start
        );
        print!("{}", render_events(buffer.events())?);
    }

    let count = stream.documents_read();
    println!("---");
    println!("{count} document{}", if count == 1 { "" } else { "s" });
    Ok(())
}

/// One line per event, two spaces per nesting level.
fn render_events(events: &[Event]) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let mut depth = 1usize;
    for event in events {
        if event.is_end() {
            depth = depth.saturating_sub(1);
        }
        writeln!(out, "{:width$}{}", "", describe(event), width = depth * 2)?;
        if event.is_begin() {
            depth += 1;
        }
    }
    Ok(out)
}

fn describe(event: &Event) -> String {
    let detail = match event {
        Event::Name(name) => format!(" {name:?}"),
        Event::Bool(v, _) => format!(" {v}"),
        Event::Int64(v, _) => format!(" {v}"),
        Event::Uint64(v, _) => format!(" {v}"),
        Event::Double(v, _) => format!(" {v}"),
        Event::String(v, _) => format!(" {v:?}"),
        Event::ByteString(v, _) => format!(" ({} bytes)", v.len()),
        _ => String::new(),
    };
    let tag = match event {
        Event::BeginObject(tag)
        | Event::BeginArray(tag)
        | Event::Null(tag)
        | Event::Bool(_, tag)
        | Event::Int64(_, tag)
        | Event::Uint64(_, tag)
        | Event::Double(_, tag)
        | Event::String(_, tag)
        | Event::ByteString(_, tag) => tag_label(*tag),
        Event::EndObject | Event::EndArray | Event::Name(_) => "",
    };
    format!("{}{detail}{tag}", event.kind())
}

fn tag_label(tag: SemanticTag) -> &'static str {
    match tag {
        SemanticTag::None => "",
        SemanticTag::EpochTime => " [epoch-time]",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_events() {
        let none = SemanticTag::None;
        let events = [
            Event::BeginObject(none),
            Event::Name("t".into()),
            Event::Uint64(7, SemanticTag::EpochTime),
            Event::Name("a".into()),
            Event::BeginArray(none),
            Event::ByteString(vec![1, 2, 3], none),
            Event::EndArray,
            Event::EndObject,
        ];
        let expected = "  begin-object\n    name \"t\"\n    uint64 7 [epoch-time]\n    name \"a\"\n    begin-array\n      byte-string (3 bytes)\n    end-array\n  end-object\n";
        assert_eq!(render_events(&events).unwrap(), expected);
    }
}
