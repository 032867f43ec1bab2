/// Implementation of `jdoc from-json`.
///
/// Parses one JSON document, writes it through a BSON writer, and saves
/// the bytes. The JSON root must be an object; other roots have no BSON
/// document form and are rejected.
use std::fs;

use anyhow::{Context, Result};
use jdoc_decoder::JsonReader;
use jdoc_encoder::BsonWriter;
use log::info;

use crate::{FromJsonArgs, decode_options, open_input};

/// Run the `jdoc from-json` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or parsed, the root is
/// not an object, or the output file cannot be written.
pub fn run(args: &FromJsonArgs) -> Result<()> {
    let input = open_input(&args.file)?;
    let mut writer = BsonWriter::new();
    JsonReader::with_options(decode_options(args.max_depth))
        .read_from(input, &mut writer)
        .with_context(|| format!("cannot convert {}", args.file.display()))?;

    let bytes = writer.into_bytes()?;
    fs::write(&args.output, &bytes)
        .with_context(|| format!("cannot write {}", args.output.display()))?;
    info!("wrote {} bytes to {}", bytes.len(), args.output.display());
    Ok(())
}
