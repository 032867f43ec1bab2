use jdoc_types::ContentHandler;
use jdoc_wire::{SliceSource, Source};
use log::{debug, trace, warn};

use crate::config::DecodeOptions;
use crate::element::{self, Element, Frame, Structure};
use crate::error::DecodeError;

/// Push reader for BSON: walks one document and reports it to a
/// [`ContentHandler`].
///
/// The reader descends recursively, one call frame per nested document
/// or array, so its stack use grows with nesting depth. The depth is
/// bounded by [`DecodeOptions::max_depth`]; the root document counts as
/// depth 1.
///
/// Per document:
///
///   1. Read the 4-byte length prefix and check it (at least 5 bytes,
///      not more than the bounded source still holds).
///   2. `begin_object`, then for each element: type code, key, one value.
///      Keys become `name` events inside documents and are dropped inside
///      arrays.
///   3. At the `0x00` terminator, check that the element list used
///      exactly the declared length, then `end_object`.
///
/// After the root document closes, the handler is flushed. Any error
/// aborts the walk; the handler keeps whatever events it already got.
///
/// # Example
///
/// ```rust
/// use jdoc_decoder::BsonReader;
/// use jdoc_types::{Value, ValueBuilder};
///
/// // { "x": int32 42 }
/// let bytes = [0x0C, 0, 0, 0, 0x10, b'x', 0, 0x2A, 0, 0, 0, 0];
/// let mut builder = ValueBuilder::new();
/// BsonReader::from_slice(&bytes).read(&mut builder).unwrap();
/// let value = builder.into_value().unwrap();
/// assert_eq!(value.get("x"), Some(&Value::Int64(42)));
/// ```
pub struct BsonReader<S> {
    source: S,
    options: DecodeOptions,
    depth: usize,
}

impl<'a> BsonReader<SliceSource<'a>> {
    /// Reader over an in-memory buffer with default options.
    #[must_use]
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Self::new(SliceSource::new(bytes))
    }
}

impl<S: Source> BsonReader<S> {
    pub fn new(source: S) -> Self {
        Self::with_options(source, DecodeOptions::default())
    }

    pub fn with_options(source: S, options: DecodeOptions) -> Self {
        Self {
            source,
            options,
            depth: 0,
        }
    }

    /// Bytes consumed from the source so far.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    pub(crate) fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    /// Read one document and send its events to `handler`.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Wire`] for truncated or malformed input.
    /// - [`DecodeError::DepthExceeded`] if nesting passes the limit.
    /// - [`DecodeError::Handler`] if the handler rejects an event.
    pub fn read<H: ContentHandler + ?Sized>(&mut self, handler: &mut H) -> Result<(), DecodeError> {
        let result = Frame::read(&mut self.source, self.options.check_lengths)
            .map_err(DecodeError::from)
            .and_then(|frame| self.read_root(frame, handler));
        if let Err(e) = &result {
            warn!("bson decode aborted: {e}");
        }
        result
    }

    /// Continue a document whose length prefix the caller already took
    /// off the source at `start`.
    pub(crate) fn read_after_prefix<H: ContentHandler + ?Sized>(
        &mut self,
        start: usize,
        declared: i32,
        handler: &mut H,
    ) -> Result<(), DecodeError> {
        let result = Frame::from_prefix(&self.source, start, declared, self.options.check_lengths)
            .map_err(DecodeError::from)
            .and_then(|frame| self.read_root(frame, handler));
        if let Err(e) = &result {
            warn!("bson decode aborted: {e}");
        }
        result
    }

    fn read_root<H: ContentHandler + ?Sized>(
        &mut self,
        frame: Frame,
        handler: &mut H,
    ) -> Result<(), DecodeError> {
        debug!(
            "bson document at offset {} declares {} bytes",
            frame.start, frame.declared
        );
        self.depth = 0;
        self.read_structure(Structure::Document, frame, handler)?;
        handler.flush()?;
        debug!("bson document complete at offset {}", self.source.position());
        Ok(())
    }

    fn read_structure<H: ContentHandler + ?Sized>(
        &mut self,
        kind: Structure,
        frame: Frame,
        handler: &mut H,
    ) -> Result<(), DecodeError> {
        self.enter()?;
        trace!("{kind:?} at offset {} (depth {})", frame.start, self.depth);
        kind.begin_event().send_to(handler)?;

        while let Some((ty, key)) = element::read_header(&mut self.source)? {
            if kind == Structure::Document {
                handler.name(&key)?;
            }
            match element::read_value(&mut self.source, ty)? {
                Element::Scalar(event) => {
                    trace!("{} element {key:?}", ty.name());
                    event.send_to(handler)?;
                }
                Element::Structure(inner) => {
                    let inner_frame = Frame::read(&mut self.source, self.options.check_lengths)?;
                    self.read_structure(inner, inner_frame, handler)?;
                }
            }
        }

        frame.finish(&self.source, self.options.check_lengths)?;
        kind.end_event().send_to(handler)?;
        self.depth -= 1;
        Ok(())
    }

    fn enter(&mut self) -> Result<(), DecodeError> {
        let depth = self.depth + 1;
        if depth > self.options.max_depth {
            return Err(DecodeError::DepthExceeded {
                depth,
                limit: self.options.max_depth,
            });
        }
        self.depth = depth;
        Ok(())
    }
}
