/// Implementation of `jdoc to-json`.
///
/// Streams each BSON document straight into a JSON printer, so no
/// document is materialised in memory. Documents are separated by
/// newlines; with `--pretty` each one spans several lines.
use std::io::Write;

use anyhow::{Context, Result};
use jdoc_decoder::DocumentStream;
use jdoc_encoder::{ByteStringFormat, EncodeOptions, Indenting, JsonPrinter};
use jdoc_wire::IoSource;
use log::info;

use crate::{ToJsonArgs, decode_options, open_input, open_output};

/// Run the `jdoc to-json` command.
///
/// # Errors
///
/// Returns an error if a file cannot be opened, a document fails to
/// decode, or the output cannot be written.
pub fn run(args: &ToJsonArgs) -> Result<()> {
    let input = open_input(&args.file)?;
    let mut stream = DocumentStream::new(IoSource::new(input), decode_options(args.max_depth));
    let mut output = open_output(args.output.as_deref())?;

    let mut printer =
        JsonPrinter::with_options(&mut output, encode_options(args), indenting(args.pretty));
    while stream.read_next(&mut printer).with_context(|| {
        format!(
            "document {} in {}",
            stream.documents_read(),
            args.file.display()
        )
    })? {}
    drop(printer);

    if stream.documents_read() > 0 {
        output.write_all(b"\n")?;
    }
    output.flush().context("cannot write output")?;
    info!(
        "converted {} document(s), {} bytes",
        stream.documents_read(),
        stream.position()
    );
    Ok(())
}

fn indenting(pretty: bool) -> Indenting {
    if pretty {
        Indenting::Indent
    } else {
        Indenting::Flat
    }
}

fn encode_options(args: &ToJsonArgs) -> EncodeOptions {
    let mut options = EncodeOptions::default().with_indent_size(args.indent);
    if let Some(digits) = args.precision {
        options = options.with_float_precision(digits);
    }
    if args.url_safe {
        options = options.with_byte_string_format(ByteStringFormat::Base64Url);
    }
    options
}
