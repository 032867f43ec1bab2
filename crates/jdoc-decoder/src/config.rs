/// Nesting limit applied when no other is configured.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Limits and checks applied while reading a document.
///
/// ```text
/// ┌───────────────┬─────────┬──────────────────────────────────────────┐
/// │ Field         │ Default │ Purpose                                  │
/// ├───────────────┼─────────┼──────────────────────────────────────────┤
/// │ max_depth     │ 1024    │ Deepest allowed object/array nesting.    │
/// │               │         │ The root structure is depth 1.           │
/// │ check_lengths │ true    │ Cross-check BSON length prefixes against │
/// │               │         │ the remaining input and the bytes the    │
/// │               │         │ element list actually consumed.          │
/// └───────────────┴─────────┴──────────────────────────────────────────┘
/// ```
///
/// With `check_lengths` off, a length prefix is still read and must be
/// at least 5, but otherwise ignored. Truncated input is still reported
/// as [`WireError::UnexpectedEof`](jdoc_wire::WireError::UnexpectedEof)
/// once a read comes up short.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    pub max_depth: usize,
    pub check_lengths: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            check_lengths: true,
        }
    }
}

impl DecodeOptions {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    #[must_use]
    pub fn with_check_lengths(mut self, check_lengths: bool) -> Self {
        self.check_lengths = check_lengths;
        self
    }
}
