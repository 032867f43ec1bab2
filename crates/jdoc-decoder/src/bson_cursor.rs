use jdoc_types::Event;
use jdoc_wire::{SliceSource, Source};
use log::{trace, warn};

use crate::config::DecodeOptions;
use crate::element::{self, Element, Frame, Structure};
use crate::error::DecodeError;
use crate::reader::StreamReader;

/// Incremental pull reader over one BSON document.
///
/// Reads exactly as much input as the next event needs. Open documents
/// and arrays sit on an explicit stack instead of the call stack, so
/// nesting costs heap only; the same depth limit and length checks as
/// [`BsonReader`](crate::BsonReader) apply.
///
/// Inside a document, an element yields two events: the `Name` and then
/// its value. The value is parsed together with the name and held back
/// until the name has been taken.
///
/// The cursor reads one event ahead. If that read fails, the event already
/// in hand is still delivered; the failure comes back from the following
/// call, and every call after that fails with
/// [`DecodeError::Halted`] without touching the source again.
pub struct BsonCursor<S> {
    source: S,
    options: DecodeOptions,
    stack: Vec<(Structure, Frame)>,
    current: Option<Event>,
    pending: Option<Event>,
    started: bool,
    failure: Failure,
}

/// Read-ahead failure bookkeeping.
#[derive(Debug)]
enum Failure {
    Clear,
    /// Not yet handed to the caller.
    Pending { error: DecodeError, offset: usize },
    /// Already handed out once; later calls get `Halted`.
    Reported { offset: usize },
}

impl<'a> BsonCursor<SliceSource<'a>> {
    /// Cursor over an in-memory buffer with default options.
    ///
    /// # Errors
    ///
    /// If the first event (the root document's start) can't be read.
    pub fn from_slice(bytes: &'a [u8]) -> Result<Self, DecodeError> {
        Self::new(SliceSource::new(bytes), DecodeOptions::default())
    }
}

impl<S: Source> BsonCursor<S> {
    /// Create a cursor and position it on the root `BeginObject`.
    ///
    /// # Errors
    ///
    /// If the root length prefix is missing or invalid.
    pub fn new(source: S, options: DecodeOptions) -> Result<Self, DecodeError> {
        let mut cursor = Self {
            source,
            options,
            stack: Vec::new(),
            current: None,
            pending: None,
            started: false,
            failure: Failure::Clear,
        };
        cursor.current = cursor.advance()?;
        Ok(cursor)
    }

    /// Number of open documents and arrays.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn position(&self) -> usize {
        self.source.position()
    }

    fn advance(&mut self) -> Result<Option<Event>, DecodeError> {
        let result = self.read_event();
        if let Err(e) = &result {
            warn!("bson cursor stopped: {e}");
        }
        result
    }

    fn read_event(&mut self) -> Result<Option<Event>, DecodeError> {
        if let Some(event) = self.pending.take() {
            return Ok(Some(event));
        }
        let Some(&(kind, frame)) = self.stack.last() else {
            if self.started {
                return Ok(None);
            }
            self.started = true;
            return self.open(Structure::Document).map(Some);
        };

        match element::read_header(&mut self.source)? {
            None => {
                frame.finish(&self.source, self.options.check_lengths)?;
                self.stack.pop();
                trace!("close {kind:?} (depth {})", self.stack.len());
                Ok(Some(kind.end_event()))
            }
            Some((ty, key)) => {
                let value = match element::read_value(&mut self.source, ty)? {
                    Element::Scalar(event) => event,
                    Element::Structure(inner) => self.open(inner)?,
                };
                if kind == Structure::Document {
                    self.pending = Some(value);
                    Ok(Some(Event::Name(key)))
                } else {
                    Ok(Some(value))
                }
            }
        }
    }

    /// Read a structure's prefix, push it, and return its begin event.
    fn open(&mut self, kind: Structure) -> Result<Event, DecodeError> {
        let depth = self.stack.len() + 1;
        if depth > self.options.max_depth {
            return Err(DecodeError::DepthExceeded {
                depth,
                limit: self.options.max_depth,
            });
        }
        let frame = Frame::read(&mut self.source, self.options.check_lengths)?;
        trace!("open {kind:?} at offset {} (depth {depth})", frame.start);
        self.stack.push((kind, frame));
        Ok(kind.begin_event())
    }
}

impl<S: Source> StreamReader for BsonCursor<S> {
    fn current(&self) -> Option<&Event> {
        self.current.as_ref()
    }

    fn next_event(&mut self) -> Result<Option<Event>, DecodeError> {
        match std::mem::replace(&mut self.failure, Failure::Clear) {
            Failure::Clear => {}
            Failure::Pending { error, offset } => {
                self.failure = Failure::Reported { offset };
                return Err(error);
            }
            Failure::Reported { offset } => {
                self.failure = Failure::Reported { offset };
                return Err(DecodeError::Halted { offset });
            }
        }
        let Some(event) = self.current.take() else {
            return Ok(None);
        };
        match self.advance() {
            Ok(next) => self.current = next,
            Err(error) => {
                let offset = self.source.position();
                self.failure = Failure::Pending { error, offset };
            }
        }
        Ok(Some(event))
    }

    fn done(&self) -> bool {
        self.current.is_none() && matches!(self.failure, Failure::Clear)
    }
}
