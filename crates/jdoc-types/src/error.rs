/// Errors a [`ContentHandler`](crate::ContentHandler) can report back to
/// whatever is driving it.
///
/// Handlers sit at the end of every pipeline (document builder, JSON
/// printer, BSON writer), so this type covers both malformed event
/// sequences and sink failures.
///
/// ```text
/// ┌─────────────────────────────────────────────────────────┐
/// │ HandlerError                                            │
/// │   ├── UnexpectedEvent  ← event not valid in its context │
/// │   ├── Incomplete       ← structures left open at finish │
/// │   ├── Unsupported      ← sink can't represent a value   │
/// │   ├── TooLarge         ← encoded output over its limit  │
/// │   └── Io               ← underlying writer failed       │
/// └─────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// An event arrived where the event grammar doesn't allow it, e.g. a
    /// value inside an object without a preceding name, or an `end_array`
    /// closing an object.
    #[error("unexpected {event} event: {reason}")]
    UnexpectedEvent {
        event: &'static str,
        reason: &'static str,
    },

    /// The result was requested before every begun structure was closed.
    #[error("document ended with {open} unclosed structure(s)")]
    Incomplete { open: usize },

    /// The sink has no representation for a value (e.g. a BSON document
    /// root that is not an object).
    #[error("unsupported by this handler: {0}")]
    Unsupported(String),

    /// The encoded output would exceed the format's size limit.
    #[error("encoded size {size} exceeds limit {limit}")]
    TooLarge { size: usize, limit: usize },

    /// The underlying writer failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
