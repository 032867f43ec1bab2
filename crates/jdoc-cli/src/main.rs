/// `jdoc` command-line tool: inspect, validate, and convert BSON and JSON
/// documents.
///
/// # Command overview
///
/// ```text
/// jdoc <COMMAND> [OPTIONS]
///
/// Commands:
///   inspect    Print the event stream of every document in a BSON file
///   validate   Check that a BSON file decodes cleanly
///   to-json    Convert BSON documents to JSON text
///   from-json  Convert a JSON document to BSON
///   help       Print help information
///
/// Global options:
///   -v, --verbose    Increase log output (-v debug, -vv trace)
///   -h, --help       Print help
///   -V, --version    Print version
/// ```
///
/// # Exit codes
///
/// | Code | Meaning                                    |
/// |------|--------------------------------------------|
/// | 0    | Success                                    |
/// | 1    | Error (I/O failure, malformed input, etc.) |
///
/// All error details are written to stderr so stdout can be piped cleanly.
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jdoc_decoder::DecodeOptions;

mod cmd_from_json;
mod cmd_inspect;
mod cmd_to_json;
mod cmd_validate;
mod logging;

// ── CLI root ──────────────────────────────────────────────────────────────────

/// BSON / JSON document tool.
#[derive(Parser)]
#[command(name = "jdoc", version, about = "BSON and JSON document tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (repeat for more).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ── Sub-commands ──────────────────────────────────────────────────────────────

#[derive(Subcommand)]
enum Commands {
    /// Print the event stream of every document in a BSON file.
    Inspect(InspectArgs),
    /// Check that every document in a BSON file decodes cleanly.
    Validate(ValidateArgs),
    /// Convert concatenated BSON documents to JSON, one per line.
    ToJson(ToJsonArgs),
    /// Convert one JSON document to BSON.
    FromJson(FromJsonArgs),
}

// ── Argument structs ──────────────────────────────────────────────────────────

/// Arguments for `jdoc inspect`.
///
/// ```text
/// ┌─────────────┬──────────────────────────────────────────────┐
/// │ Flag        │ Effect                                       │
/// ├─────────────┼──────────────────────────────────────────────┤
/// │ --doc N     │ Show only the document at index N            │
/// │ --max-depth │ Nesting limit while decoding (default 1024)  │
/// └─────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct InspectArgs {
    /// Path to the BSON file.
    pub file: PathBuf,

    /// Inspect only the document at this zero-based index.
    #[arg(long)]
    pub doc: Option<usize>,

    /// Maximum nesting depth.
    #[arg(long)]
    pub max_depth: Option<usize>,
}

/// Arguments for `jdoc validate`.
///
/// Decodes every document and reports either a summary or the first
/// diagnostic. Exits with code 1 on any structural problem.
#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Path to the BSON file.
    pub file: PathBuf,

    /// Maximum nesting depth.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Don't compare declared lengths with bytes consumed.
    #[arg(long)]
    pub lenient: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `jdoc to-json`.
///
/// ```text
/// ┌───────────────┬──────────────────────────────────────────────┐
/// │ Flag          │ Values / default                             │
/// ├───────────────┼──────────────────────────────────────────────┤
/// │ --pretty      │ indent nested structures                     │
/// │ --indent      │ spaces per level (default 4)                 │
/// │ --precision   │ fixed digits after the decimal point         │
/// │ --url-safe    │ base64url for byte strings                   │
/// │ --max-depth   │ nesting limit (default 1024)                 │
/// │ -o / --output │ write to file instead of stdout              │
/// └───────────────┴──────────────────────────────────────────────┘
/// ```
#[derive(clap::Args)]
pub struct ToJsonArgs {
    /// Path to the BSON file.
    pub file: PathBuf,

    /// Indent nested structures.
    #[arg(long)]
    pub pretty: bool,

    /// Spaces per indentation level.
    #[arg(long, default_value_t = 4)]
    pub indent: usize,

    /// Print doubles with this many digits after the decimal point.
    #[arg(long)]
    pub precision: Option<usize>,

    /// Encode byte strings as unpadded base64url.
    #[arg(long)]
    pub url_safe: bool,

    /// Maximum nesting depth.
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Write JSON to this file instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for `jdoc from-json`.
///
/// The JSON root must be an object.
#[derive(clap::Args)]
pub struct FromJsonArgs {
    /// Path to the JSON file.
    pub file: PathBuf,

    /// Output BSON file path.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Maximum nesting depth.
    #[arg(long)]
    pub max_depth: Option<usize>,
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Open an input file for buffered reading.
pub(crate) fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    Ok(BufReader::new(file))
}

/// Buffered writer to a file, or to stdout when no path is given.
pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("cannot create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

/// Decode options with an optional depth override.
pub(crate) fn decode_options(max_depth: Option<usize>) -> DecodeOptions {
    max_depth.map_or_else(DecodeOptions::default, |limit| {
        DecodeOptions::default().with_max_depth(limit)
    })
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(logging::level_for(cli.verbose)) {
        eprintln!("warning: {e:#}");
    }

    let result = match cli.command {
        Commands::Inspect(args) => cmd_inspect::run(&args),
        Commands::Validate(args) => cmd_validate::run(&args),
        Commands::ToJson(args) => cmd_to_json::run(&args),
        Commands::FromJson(args) => cmd_from_json::run(&args),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}
