use jdoc_types::HandlerError;

/// Errors that can occur when finishing an encoded document.
///
/// Event-level failures are [`HandlerError`]s raised while the writer is
/// being driven; this type adds the checks made when the output is taken.
///
/// ```text
///   EncodeError
///   ├── Incomplete            ← output taken while structures are open
///   ├── Handler(HandlerError) ← from a handler method
///   └── Io(std::io::Error)    ← from the underlying writer
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("output taken with {open} structure(s) still open")]
    Incomplete { open: usize },

    #[error(transparent)]
    Handler(#[from] HandlerError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
