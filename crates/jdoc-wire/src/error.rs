/// Errors raised while reading the raw BSON byte layout.
///
/// Every variant that can be traced to a position carries the byte offset
/// (from the start of the source) where the problem was detected. When a
/// binary payload fails to decode, that offset is usually the fastest way
/// to find the corruption in a hex dump.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// The source ran out before a fixed-width value, length-prefixed run,
    /// or terminator could be read in full.
    #[error("unexpected end of input at offset {offset}")]
    UnexpectedEof { offset: usize },

    /// A length prefix that can never be valid (negative, or too small to
    /// hold its own framing).
    #[error("invalid length prefix {declared} at offset {offset}")]
    InvalidLength { declared: i64, offset: usize },

    /// A document or array's length prefix disagrees with the number of
    /// bytes its element list actually occupied.
    #[error("length prefix {declared} at offset {offset} does not match {consumed} consumed bytes")]
    LengthMismatch {
        declared: usize,
        consumed: usize,
        offset: usize,
    },

    /// An element type byte outside the supported set.
    #[error("unsupported element type {code:#04X} at offset {offset}")]
    UnsupportedType { code: u8, offset: usize },

    /// A string payload was not followed by its NUL terminator.
    #[error("string at offset {offset} is missing its NUL terminator")]
    MissingTerminator { offset: usize },

    /// A key or string payload contained invalid UTF-8.
    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },

    /// I/O error from a stream-backed source.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WireError {
    /// `true` for errors caused by input that ended too early.
    pub fn is_eof(&self) -> bool {
        match self {
            Self::UnexpectedEof { .. } => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}
