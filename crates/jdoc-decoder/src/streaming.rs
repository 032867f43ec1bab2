use std::io;

use jdoc_types::{ContentHandler, Value, ValueBuilder};
use jdoc_wire::endian::decode_le;
use jdoc_wire::{IoSource, SliceSource, Source, WireError};
use log::debug;

use crate::bson_reader::BsonReader;
use crate::config::DecodeOptions;
use crate::error::DecodeError;

/// Successive BSON documents from one source, e.g. a dump file of
/// concatenated documents or a socket.
///
/// Running out of input exactly between two documents ends the stream
/// cleanly. Running out anywhere else is an error, and so is anything
/// else that stops a document from decoding; after an error the stream
/// is finished.
///
/// ```text
///   Ready ──(document read)──> Ready
///     │                          
///     ├──(clean EOF)───────────> Done
///     └──(error)───────────────> Done
/// ```
///
/// As an [`Iterator`], each item is one document built into a [`Value`].
/// [`read_next`](Self::read_next) sends the next document to any handler
/// instead.
pub struct DocumentStream<S> {
    reader: BsonReader<S>,
    state: StreamState,
    count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
    Ready,
    Done,
}

impl<R: io::Read> DocumentStream<IoSource<R>> {
    /// Stream over any reader. Wrap files in a `BufReader`.
    pub fn from_reader(reader: R) -> Self {
        Self::new(IoSource::new(reader), DecodeOptions::default())
    }
}

impl<'a> DocumentStream<SliceSource<'a>> {
    #[must_use]
    pub fn from_slice(bytes: &'a [u8]) -> Self {
        Self::new(SliceSource::new(bytes), DecodeOptions::default())
    }
}

impl<S: Source> DocumentStream<S> {
    pub fn new(source: S, options: DecodeOptions) -> Self {
        Self {
            reader: BsonReader::with_options(source, options),
            state: StreamState::Ready,
            count: 0,
        }
    }

    /// Documents successfully read so far.
    pub fn documents_read(&self) -> usize {
        self.count
    }

    /// Bytes consumed from the source so far.
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    /// Read the next document into `handler`.
    ///
    /// Returns `Ok(false)` once the source is exhausted between documents.
    ///
    /// # Errors
    ///
    /// Any [`DecodeError`] from the document; a source that ends inside
    /// the 4-byte length prefix is an
    /// [`UnexpectedEof`](WireError::UnexpectedEof).
    pub fn read_next<H: ContentHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<bool, DecodeError> {
        if self.state == StreamState::Done {
            return Ok(false);
        }
        let result = self.read_document(handler);
        if !matches!(result, Ok(true)) {
            self.state = StreamState::Done;
        }
        result
    }

    fn read_document<H: ContentHandler + ?Sized>(
        &mut self,
        handler: &mut H,
    ) -> Result<bool, DecodeError> {
        let source = self.reader.source_mut();
        let start = source.position();
        let mut prefix = [0u8; 4];
        match source.read(&mut prefix)? {
            0 => {
                debug!("document stream ended after {} document(s)", self.count);
                return Ok(false);
            }
            4 => {}
            _ => {
                return Err(
                    WireError::UnexpectedEof {
                        offset: source.position(),
                    }
                    .into(),
                );
            }
        }
        let declared = decode_le::<i32>(&prefix).map_or(0, |(value, _)| value);
        self.reader.read_after_prefix(start, declared, handler)?;
        self.count += 1;
        Ok(true)
    }
}

impl<S: Source> Iterator for DocumentStream<S> {
    type Item = Result<Value, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut builder = ValueBuilder::new();
        match self.read_next(&mut builder) {
            Ok(true) => Some(builder.into_value().map_err(DecodeError::from)),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY: [u8; 5] = [5, 0, 0, 0, 0];
    const X_42: [u8; 12] = [0x0C, 0, 0, 0, 0x10, b'x', 0, 0x2A, 0, 0, 0, 0];

    fn concatenated() -> Vec<u8> {
        let mut bytes = X_42.to_vec();
        bytes.extend_from_slice(&EMPTY);
        bytes.extend_from_slice(&X_42);
        bytes
    }

    #[test]
    fn reads_all_documents_then_ends() {
        let bytes = concatenated();
        let mut stream = DocumentStream::from_slice(&bytes);
        let docs: Vec<Value> = stream.by_ref().collect::<Result<_, _>>().unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs[0].get("x"), Some(&Value::Int64(42)));
        assert_eq!(docs[1], Value::Object(jdoc_types::Object::new()));
        assert_eq!(stream.documents_read(), 3);
        assert_eq!(stream.position(), bytes.len());
        assert!(stream.next().is_none());
    }

    #[test]
    fn io_reader_behaves_like_slice() {
        let bytes = concatenated();
        let stream = DocumentStream::from_reader(io::Cursor::new(bytes));
        assert_eq!(stream.filter(Result::is_ok).count(), 3);
    }

    #[test]
    fn empty_input_is_an_empty_stream() {
        assert!(DocumentStream::from_slice(&[]).next().is_none());
    }

    #[test]
    fn eof_inside_prefix_is_error() {
        let mut bytes = X_42.to_vec();
        bytes.extend_from_slice(&[5, 0]);
        let mut stream = DocumentStream::from_slice(&bytes);
        assert!(stream.next().unwrap().is_ok());
        let err = stream.next().unwrap().unwrap_err();
        assert!(err.is_eof());
        assert!(stream.next().is_none());
    }

    #[test]
    fn eof_inside_document_is_error() {
        let bytes = &X_42[..9];
        let mut stream = DocumentStream::from_reader(bytes);
        assert!(stream.next().unwrap().unwrap_err().is_eof());
        assert!(stream.next().is_none());
    }
}
