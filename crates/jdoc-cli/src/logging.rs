//! Console logging for the `jdoc` binary.
//!
//! Library crates only emit through the `log` facade; the binary decides
//! where records go. Everything is written to stderr so stdout stays
//! clean for piped output.

use anyhow::{Context, Result};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;

const PATTERN: &str = "[{l:<5} {t}] {m}{n}";

/// Map the number of `-v` flags to a level filter.
///
/// ```text
/// ┌───────┬────────┐
/// │ Flags │ Level  │
/// ├───────┼────────┤
/// │ none  │ warn   │
/// │ -v    │ debug  │
/// │ -vv   │ trace  │
/// └───────┴────────┘
/// ```
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// Install a stderr logger at the given level.
///
/// # Errors
///
/// Fails if the configuration is rejected or a logger is already set.
pub fn init(level: LevelFilter) -> Result<()> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(PATTERN)))
        .build();

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(level))
        .context("invalid logging configuration")?;

    log4rs::init_config(config).context("logger already initialised")?;
    Ok(())
}
