use jdoc_decoder::DecodeError;
use jdoc_types::HandlerError;

/// Errors from converting between documents and native values.
///
/// ```text
///   ConvertError
///   ├── Shape                 ← document shape differs from the target type
///   ├── OutOfRange            ← number doesn't fit the target type
///   ├── Base64                ← byte string text that isn't base64
///   ├── Decode(DecodeError)   ← from reading the document
///   └── Handler(HandlerError) ← from building an intermediate value
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// The document holds something other than what the target type
    /// needs: an object where an array was expected, a tuple of the wrong
    /// arity, a string for an integer.
    #[error("expected {expected}, found {found}")]
    Shape { expected: String, found: String },

    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },

    #[error("invalid base64 byte string: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Handler(#[from] HandlerError),
}

impl ConvertError {
    pub fn shape(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::Shape {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn out_of_range(value: impl ToString, target: &'static str) -> Self {
        Self::OutOfRange {
            value: value.to_string(),
            target,
        }
    }
}
