use jdoc_decoder::StreamReader;
use jdoc_types::{ContentHandler, ErrorState, HandlerResult};

use crate::error::ConvertError;

/// How a type travels through the event stream. Fixed per type.
///
/// ```text
/// ┌──────────────┬───────────────────────────────┬──────────────────────────┐
/// │ Category     │ Types                         │ Wire shape               │
/// ├──────────────┼───────────────────────────────┼──────────────────────────┤
/// │ Sequence     │ Vec, VecDeque                 │ array, any length        │
/// │ Map          │ HashMap, BTreeMap, IndexMap   │ object                   │
/// │ FixedArray   │ [T; N]                        │ array, extras discarded, │
/// │              │                               │ missing slots default    │
/// │ Tuple        │ (A,) .. (A, .., H)            │ array of exact arity     │
/// │ ViaDocument  │ scalars, String, Value,       │ whatever the Value holds │
/// │              │ ByteString, opted-in types    │                          │
/// └──────────────┴───────────────────────────────┴──────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Sequence,
    Map,
    FixedArray,
    Tuple,
    ViaDocument,
}

/// Native type that can be read from a [`StreamReader`] and written to a
/// [`ContentHandler`].
///
/// `decode` expects the reader to sit on the first event of a value and
/// leaves it on the event after that value.
pub trait Convert: Sized {
    const CATEGORY: Category;

    /// # Errors
    ///
    /// [`ConvertError`] when reading fails or the value has the wrong
    /// shape for `Self`.
    fn decode<R: StreamReader>(reader: &mut R) -> Result<Self, ConvertError>;

    /// Decode without an early return: once `state` holds an error,
    /// nothing more is read and `None` comes back. A new failure is
    /// recorded in `state`.
    fn decode_with_state<R: StreamReader>(
        reader: &mut R,
        state: &mut ErrorState<ConvertError>,
    ) -> Option<Self> {
        if state.is_set() {
            return None;
        }
        state.record(Self::decode(reader))
    }

    /// # Errors
    ///
    /// Whatever the handler rejects.
    fn encode<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult;
}
