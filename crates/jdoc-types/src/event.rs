use crate::handler::{ContentHandler, HandlerResult};

/// Auxiliary hint attached to a value event.
///
/// The storage kind of a value (integer, string, bytes) doesn't always
/// say what it means. A tag carries that meaning to downstream consumers
/// so they can rebuild the right thing: a BSON timestamp arrives as an
/// unsigned integer tagged [`EpochTime`](Self::EpochTime), and the BSON
/// writer turns it back into a timestamp element rather than an int64.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SemanticTag {
    #[default]
    None,
    /// Seconds (or milliseconds) since the Unix epoch.
    EpochTime,
}

/// One owned event from a document's event stream.
///
/// Push readers call [`ContentHandler`] methods directly; pull readers
/// hand out `Event` values instead. [`send_to`](Self::send_to) bridges the
/// two.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    BeginObject(SemanticTag),
    EndObject,
    BeginArray(SemanticTag),
    EndArray,
    Name(String),
    Null(SemanticTag),
    Bool(bool, SemanticTag),
    Int64(i64, SemanticTag),
    Uint64(u64, SemanticTag),
    Double(f64, SemanticTag),
    String(String, SemanticTag),
    ByteString(Vec<u8>, SemanticTag),
}

impl Event {
    /// Replay this event into a handler.
    ///
    /// # Errors
    ///
    /// Whatever the handler returns.
    pub fn send_to<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult {
        match self {
            Self::BeginObject(tag) => handler.begin_object(*tag),
            Self::EndObject => handler.end_object(),
            Self::BeginArray(tag) => handler.begin_array(*tag),
            Self::EndArray => handler.end_array(),
            Self::Name(name) => handler.name(name),
            Self::Null(tag) => handler.null_value(*tag),
            Self::Bool(v, tag) => handler.bool_value(*v, *tag),
            Self::Int64(v, tag) => handler.int64_value(*v, *tag),
            Self::Uint64(v, tag) => handler.uint64_value(*v, *tag),
            Self::Double(v, tag) => handler.double_value(*v, *tag),
            Self::String(v, tag) => handler.string_value(v, *tag),
            Self::ByteString(v, tag) => handler.byte_string_value(v, *tag),
        }
    }

    /// Short name of the event kind, for diagnostics and shape errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BeginObject(_) => "begin-object",
            Self::EndObject => "end-object",
            Self::BeginArray(_) => "begin-array",
            Self::EndArray => "end-array",
            Self::Name(_) => "name",
            Self::Null(_) => "null",
            Self::Bool(..) => "bool",
            Self::Int64(..) => "int64",
            Self::Uint64(..) => "uint64",
            Self::Double(..) => "double",
            Self::String(..) => "string",
            Self::ByteString(..) => "byte-string",
        }
    }

    /// `true` for begin-object and begin-array.
    pub fn is_begin(&self) -> bool {
        matches!(self, Self::BeginObject(_) | Self::BeginArray(_))
    }

    /// `true` for end-object and end-array.
    pub fn is_end(&self) -> bool {
        matches!(self, Self::EndObject | Self::EndArray)
    }

    /// `true` for events that complete a value on their own: scalars and
    /// the end of a structure.
    pub fn completes_value(&self) -> bool {
        !self.is_begin() && !matches!(self, Self::Name(_))
    }
}
