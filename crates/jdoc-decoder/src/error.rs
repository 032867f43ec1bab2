use jdoc_types::HandlerError;
use jdoc_wire::WireError;

/// Errors that can occur while reading a BSON or JSON document.
///
/// ```text
///   DecodeError
///   ├── Wire(WireError)        ← short read, bad length, unknown type code
///   ├── DepthExceeded          ← nesting deeper than the configured limit
///   ├── Json                   ← JSON syntax error with line and column
///   ├── UnexpectedEvent        ← pull reader asked for the wrong shape
///   ├── Halted                 ← pull reader already failed
///   └── Handler(HandlerError)  ← the receiving handler refused an event
/// ```
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error(transparent)]
    Wire(#[from] WireError),

    /// Entering a structure would exceed `DecodeOptions::max_depth`.
    #[error("nesting depth {depth} exceeds limit {limit}")]
    DepthExceeded { depth: usize, limit: usize },

    /// Malformed JSON text. `line` and `column` are 1-based; both are 0
    /// when the error is not tied to a position (e.g. an I/O failure).
    #[error("{message} at line {line} column {column}")]
    Json {
        message: String,
        line: usize,
        column: usize,
    },

    /// A pull reader was asked for something its current event can't
    /// provide, e.g. `accept` while positioned on an end event, or a read
    /// past the end of the document.
    #[error("unexpected {found} event, expected {expected}")]
    UnexpectedEvent {
        expected: &'static str,
        found: &'static str,
    },

    /// A pull reader was used again after it reported a read failure.
    /// `offset` is where reading stopped.
    #[error("reader halted by an earlier error at offset {offset}")]
    Halted { offset: usize },

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl DecodeError {
    /// `true` if decoding failed because input ran out.
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Wire(e) if e.is_eof())
    }
}

impl From<std::io::Error> for DecodeError {
    fn from(e: std::io::Error) -> Self {
        Self::Wire(WireError::Io(e))
    }
}
