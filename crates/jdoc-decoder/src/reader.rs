use std::collections::VecDeque;

use jdoc_types::{ContentHandler, ErrorState, Event, EventBuffer, Value};

use crate::error::DecodeError;

/// Pull-style cursor over a document's event stream.
///
/// A reader is always positioned on one event (or on nothing, once the
/// document is exhausted). [`next_event`](Self::next_event) takes the
/// current event and advances; [`accept`](Self::accept) forwards the
/// whole value starting at the current event to a push handler.
pub trait StreamReader {
    /// The event the reader is positioned on. `None` when done.
    fn current(&self) -> Option<&Event>;

    /// Take the current event and move to the next one.
    ///
    /// # Errors
    ///
    /// Whatever reading the following event fails with.
    fn next_event(&mut self) -> Result<Option<Event>, DecodeError>;

    /// Skip the current event.
    ///
    /// # Errors
    ///
    /// Same as [`next_event`](Self::next_event).
    fn increment(&mut self) -> Result<(), DecodeError> {
        self.next_event().map(drop)
    }

    fn done(&self) -> bool {
        self.current().is_none()
    }

    /// Forward the value at the current position to `handler`: a single
    /// scalar, or a begin event through its matching end. Leaves the
    /// reader on the event after the value.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::UnexpectedEvent`] if the reader is not at the
    ///   start of a value (on a name, an end event, or past the end).
    /// - Read errors and handler errors as they occur.
    fn accept(&mut self, handler: &mut dyn ContentHandler) -> Result<(), DecodeError> {
        let mut depth = 0usize;
        loop {
            let event = self.next_event()?.ok_or(DecodeError::UnexpectedEvent {
                expected: "value",
                found: "end of input",
            })?;
            if depth == 0 && (event.is_end() || matches!(event, Event::Name(_))) {
                return Err(DecodeError::UnexpectedEvent {
                    expected: "value",
                    found: event.kind(),
                });
            }
            if event.is_begin() {
                depth += 1;
            } else if event.is_end() {
                depth -= 1;
            }
            event.send_to(handler)?;
            if depth == 0 && event.completes_value() {
                return Ok(());
            }
        }
    }

    /// [`accept`](Self::accept) for the `ErrorState` family: does nothing
    /// once `state` holds an error, and records a failure instead of
    /// returning it. Returns `true` on success.
    fn accept_with_state<E: From<DecodeError>>(
        &mut self,
        handler: &mut dyn ContentHandler,
        state: &mut ErrorState<E>,
    ) -> bool
    where
        Self: Sized,
    {
        if state.is_set() {
            return false;
        }
        state.record(self.accept(handler)).is_some()
    }
}

impl<R: StreamReader + ?Sized> StreamReader for &mut R {
    fn current(&self) -> Option<&Event> {
        (**self).current()
    }

    fn next_event(&mut self) -> Result<Option<Event>, DecodeError> {
        (**self).next_event()
    }
}

/// Pull reader over events already in memory.
///
/// Built from a recorded [`EventBuffer`] or straight from a [`Value`];
/// reading never fails.
#[derive(Clone, Debug, Default)]
pub struct BufferedReader {
    events: VecDeque<Event>,
}

impl BufferedReader {
    pub fn new(events: impl Into<VecDeque<Event>>) -> Self {
        Self {
            events: events.into(),
        }
    }

    /// A reader that replays `value`'s events.
    ///
    /// # Errors
    ///
    /// Never in practice; the signature matches [`Value::dump`].
    pub fn from_value(value: &Value) -> Result<Self, DecodeError> {
        let mut buffer = EventBuffer::new();
        value.dump(&mut buffer)?;
        Ok(Self::new(buffer.into_events()))
    }

    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl From<EventBuffer> for BufferedReader {
    fn from(buffer: EventBuffer) -> Self {
        Self::new(buffer.into_events())
    }
}

impl StreamReader for BufferedReader {
    fn current(&self) -> Option<&Event> {
        self.events.front()
    }

    fn next_event(&mut self) -> Result<Option<Event>, DecodeError> {
        Ok(self.events.pop_front())
    }
}
