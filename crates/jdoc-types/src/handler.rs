use crate::error::HandlerError;
use crate::event::{Event, SemanticTag};

pub type HandlerResult = Result<(), HandlerError>;

/// Receiver of a document's event stream.
///
/// Readers call these methods in document order. A well-formed stream
/// has one root value; inside an object every value is preceded by a
/// [`name`](Self::name) event, and inside an array values come without
/// names. Every `begin_*` is matched by the corresponding `end_*`.
///
/// ```text
/// { "a": [1, null] }
///
///   begin_object
///   name("a")
///   begin_array
///   int64_value(1)
///   null_value
///   end_array
///   end_object
///   flush
/// ```
///
/// Every method can fail. A failure aborts the producer; whatever the
/// handler already received stays partial.
///
/// The trait is object-safe. Readers take `&mut dyn ContentHandler` or a
/// generic `H: ContentHandler + ?Sized` interchangeably.
pub trait ContentHandler {
    fn begin_object(&mut self, tag: SemanticTag) -> HandlerResult;
    fn end_object(&mut self) -> HandlerResult;
    fn begin_array(&mut self, tag: SemanticTag) -> HandlerResult;
    fn end_array(&mut self) -> HandlerResult;
    fn name(&mut self, name: &str) -> HandlerResult;
    fn null_value(&mut self, tag: SemanticTag) -> HandlerResult;
    fn bool_value(&mut self, value: bool, tag: SemanticTag) -> HandlerResult;
    fn int64_value(&mut self, value: i64, tag: SemanticTag) -> HandlerResult;
    fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> HandlerResult;
    fn double_value(&mut self, value: f64, tag: SemanticTag) -> HandlerResult;
    fn string_value(&mut self, value: &str, tag: SemanticTag) -> HandlerResult;
    fn byte_string_value(&mut self, value: &[u8], tag: SemanticTag) -> HandlerResult;

    /// Called once after the root value is complete.
    fn flush(&mut self) -> HandlerResult {
        Ok(())
    }
}

impl<H: ContentHandler + ?Sized> ContentHandler for &mut H {
    fn begin_object(&mut self, tag: SemanticTag) -> HandlerResult {
        (**self).begin_object(tag)
    }
    fn end_object(&mut self) -> HandlerResult {
        (**self).end_object()
    }
    fn begin_array(&mut self, tag: SemanticTag) -> HandlerResult {
        (**self).begin_array(tag)
    }
    fn end_array(&mut self) -> HandlerResult {
        (**self).end_array()
    }
    fn name(&mut self, name: &str) -> HandlerResult {
        (**self).name(name)
    }
    fn null_value(&mut self, tag: SemanticTag) -> HandlerResult {
        (**self).null_value(tag)
    }
    fn bool_value(&mut self, value: bool, tag: SemanticTag) -> HandlerResult {
        (**self).bool_value(value, tag)
    }
    fn int64_value(&mut self, value: i64, tag: SemanticTag) -> HandlerResult {
        (**self).int64_value(value, tag)
    }
    fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> HandlerResult {
        (**self).uint64_value(value, tag)
    }
    fn double_value(&mut self, value: f64, tag: SemanticTag) -> HandlerResult {
        (**self).double_value(value, tag)
    }
    fn string_value(&mut self, value: &str, tag: SemanticTag) -> HandlerResult {
        (**self).string_value(value, tag)
    }
    fn byte_string_value(&mut self, value: &[u8], tag: SemanticTag) -> HandlerResult {
        (**self).byte_string_value(value, tag)
    }
    fn flush(&mut self) -> HandlerResult {
        (**self).flush()
    }
}

/// A handler that records every event it receives.
///
/// Captured events feed pull readers that work from memory, and tests
/// compare event streams with it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventBuffer {
    events: Vec<Event>,
    flushed: bool,
}

impl EventBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    /// Whether [`flush`](ContentHandler::flush) has been called.
    pub fn is_flushed(&self) -> bool {
        self.flushed
    }

    pub fn clear(&mut self) {
        self.events.clear();
        self.flushed = false;
    }

    fn push(&mut self, event: Event) -> HandlerResult {
        self.events.push(event);
        Ok(())
    }
}

impl ContentHandler for EventBuffer {
    fn begin_object(&mut self, tag: SemanticTag) -> HandlerResult {
        self.push(Event::BeginObject(tag))
    }
    fn end_object(&mut self) -> HandlerResult {
        self.push(Event::EndObject)
    }
    fn begin_array(&mut self, tag: SemanticTag) -> HandlerResult {
        self.push(Event::BeginArray(tag))
    }
    fn end_array(&mut self) -> HandlerResult {
        self.push(Event::EndArray)
    }
    fn name(&mut self, name: &str) -> HandlerResult {
        self.push(Event::Name(name.to_owned()))
    }
    fn null_value(&mut self, tag: SemanticTag) -> HandlerResult {
        self.push(Event::Null(tag))
    }
    fn bool_value(&mut self, value: bool, tag: SemanticTag) -> HandlerResult {
        self.push(Event::Bool(value, tag))
    }
    fn int64_value(&mut self, value: i64, tag: SemanticTag) -> HandlerResult {
        self.push(Event::Int64(value, tag))
    }
    fn uint64_value(&mut self, value: u64, tag: SemanticTag) -> HandlerResult {
        self.push(Event::Uint64(value, tag))
    }
    fn double_value(&mut self, value: f64, tag: SemanticTag) -> HandlerResult {
        self.push(Event::Double(value, tag))
    }
    fn string_value(&mut self, value: &str, tag: SemanticTag) -> HandlerResult {
        self.push(Event::String(value.to_owned(), tag))
    }
    fn byte_string_value(&mut self, value: &[u8], tag: SemanticTag) -> HandlerResult {
        self.push(Event::ByteString(value.to_vec(), tag))
    }
    fn flush(&mut self) -> HandlerResult {
        self.flushed = true;
        Ok(())
    }
}
