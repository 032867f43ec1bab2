//! Element-level parsing shared by the push reader and the pull cursor.
//!
//! Both readers walk the same layout:
//!
//! ```text
//! document ::= int32 length, element*, 0x00
//! element  ::= type code (1 byte), key (NUL-terminated), payload
//! ```
//!
//! The functions here read one piece at a time and leave structure
//! handling (depth, handler events, the frame stack) to the caller.

use jdoc_types::{Event, SemanticTag};
use jdoc_wire::element::{MIN_DOCUMENT_LEN, TERMINATOR};
use jdoc_wire::{ElementType, Source, WireError};

/// Width of a length prefix.
const PREFIX_LEN: usize = 4;

/// The two element kinds that open a nested element list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Structure {
    Document,
    Array,
}

impl Structure {
    pub(crate) fn begin_event(self) -> Event {
        match self {
            Self::Document => Event::BeginObject(SemanticTag::None),
            Self::Array => Event::BeginArray(SemanticTag::None),
        }
    }

    pub(crate) fn end_event(self) -> Event {
        match self {
            Self::Document => Event::EndObject,
            Self::Array => Event::EndArray,
        }
    }
}

/// A parsed element payload: either a complete scalar or the start of a
/// nested structure whose length prefix has not been read yet.
pub(crate) enum Element {
    Scalar(Event),
    Structure(Structure),
}

/// An open document or array: where its length prefix sits and what it
/// declared.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Frame {
    pub start: usize,
    pub declared: usize,
}

impl Frame {
    /// Validate a raw length prefix read at `start`.
    ///
    /// The prefix must be at least [`MIN_DOCUMENT_LEN`]. With
    /// `check_lengths`, a bounded source must also still hold the rest of
    /// the declared bytes; otherwise the document is truncated and the
    /// error is a short read at `start`.
    pub(crate) fn from_prefix<S: Source>(
        source: &S,
        start: usize,
        declared: i32,
        check_lengths: bool,
    ) -> Result<Self, WireError> {
        let declared = usize::try_from(declared)
            .ok()
            .filter(|&n| n >= MIN_DOCUMENT_LEN)
            .ok_or(WireError::InvalidLength {
                declared: i64::from(declared),
                offset: start,
            })?;
        let body = declared - PREFIX_LEN;
        if check_lengths && source.remaining().is_some_and(|left| left < body) {
            return Err(WireError::UnexpectedEof { offset: start });
        }
        Ok(Self { start, declared })
    }

    /// Read and validate the length prefix at the cursor.
    pub(crate) fn read<S: Source>(source: &mut S, check_lengths: bool) -> Result<Self, WireError> {
        let start = source.position();
        let declared = source.read_fixed::<i32>()?;
        Self::from_prefix(source, start, declared, check_lengths)
    }

    /// Called after the terminator: the element list must have used
    /// exactly the declared number of bytes.
    pub(crate) fn finish<S: Source>(&self, source: &S, check_lengths: bool) -> Result<(), WireError> {
        let consumed = source.position() - self.start;
        if check_lengths && consumed != self.declared {
            return Err(WireError::LengthMismatch {
                declared: self.declared,
                consumed,
                offset: self.start,
            });
        }
        Ok(())
    }
}

/// Read the next element's type code and key. `None` at the list
/// terminator.
pub(crate) fn read_header<S: Source>(source: &mut S) -> Result<Option<(ElementType, String)>, WireError> {
    let offset = source.position();
    let code = source.read_byte()?;
    if code == TERMINATOR {
        return Ok(None);
    }
    let ty = ElementType::from_code(code, offset)?;
    let key = read_cstring(source)?;
    Ok(Some((ty, key)))
}

/// Read the payload for `ty`. Structures are only identified; the caller
/// reads their prefix and element list.
pub(crate) fn read_value<S: Source>(source: &mut S, ty: ElementType) -> Result<Element, WireError> {
    const NONE: SemanticTag = SemanticTag::None;
    let event = match ty {
        ElementType::Document => return Ok(Element::Structure(Structure::Document)),
        ElementType::Array => return Ok(Element::Structure(Structure::Array)),
        ElementType::Double => Event::Double(source.read_fixed::<f64>()?, NONE),
        ElementType::String => Event::String(read_string(source)?, NONE),
        ElementType::Binary => Event::ByteString(read_binary(source)?, NONE),
        ElementType::Bool => Event::Bool(source.read_byte()? != 0, NONE),
        ElementType::Null => Event::Null(NONE),
        ElementType::Int32 => Event::Int64(i64::from(source.read_fixed::<i32>()?), NONE),
        ElementType::Timestamp => Event::Uint64(source.read_fixed::<u64>()?, SemanticTag::EpochTime),
        ElementType::Int64 => Event::Int64(source.read_fixed::<i64>()?, NONE),
    };
    Ok(Element::Scalar(event))
}

/// NUL-terminated UTF-8 key.
pub(crate) fn read_cstring<S: Source>(source: &mut S) -> Result<String, WireError> {
    let start = source.position();
    let mut bytes = Vec::new();
    loop {
        match source.get()? {
            Some(TERMINATOR) => break,
            Some(b) => bytes.push(b),
            None => {
                return Err(WireError::UnexpectedEof {
                    offset: source.position(),
                });
            }
        }
    }
    String::from_utf8(bytes).map_err(|_| WireError::InvalidUtf8 { offset: start })
}

/// `int32 length (including NUL), UTF-8 bytes, 0x00`.
fn read_string<S: Source>(source: &mut S) -> Result<String, WireError> {
    let offset = source.position();
    let declared = source.read_fixed::<i32>()?;
    let len = usize::try_from(declared)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or(WireError::InvalidLength {
            declared: i64::from(declared),
            offset,
        })?;
    let payload_offset = source.position();
    let payload = source.read_vec(len - 1)?;
    let terminator_offset = source.position();
    if source.read_byte()? != TERMINATOR {
        return Err(WireError::MissingTerminator {
            offset: terminator_offset,
        });
    }
    String::from_utf8(payload).map_err(|_| WireError::InvalidUtf8 {
        offset: payload_offset,
    })
}

/// `int32 length, raw bytes`. No subtype byte.
fn read_binary<S: Source>(source: &mut S) -> Result<Vec<u8>, WireError> {
    let offset = source.position();
    let declared = source.read_fixed::<i32>()?;
    let len = usize::try_from(declared).map_err(|_| WireError::InvalidLength {
        declared: i64::from(declared),
        offset,
    })?;
    source.read_vec(len)
}
