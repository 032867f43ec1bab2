//! Byte sources the readers pull from.
//!
//! A [`Source`] hands out bytes and reports how many it actually produced.
//! It never treats a short read as an error by itself: the reader decides
//! that a short read means malformed input. The checked helpers at the
//! bottom of the trait ([`read_fixed`](Source::read_fixed) and friends) turn
//! short reads into [`WireError::UnexpectedEof`] with the offset at which
//! input ran out.

use std::io::{self, Read as _};

use crate::endian::{FixedWidth, MAX_WIDTH};
use crate::error::WireError;

/// Largest allocation made up front for a length-prefixed run read from an
/// unbounded stream. Longer runs grow as bytes actually arrive, so a bogus
/// length prefix can't force a huge allocation.
const STREAM_PREALLOC: usize = 0x1000;

/// A bounded or streaming byte source with a read cursor.
pub trait Source {
    /// Fill as much of `buf` as possible. Returns the number of bytes read;
    /// a value below `buf.len()` means the source is exhausted.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Read one byte, or `None` at end of input.
    fn get(&mut self) -> io::Result<Option<u8>>;

    /// Append up to `len` bytes to `out`. Returns the number appended.
    fn read_to_vec(&mut self, len: usize, out: &mut Vec<u8>) -> io::Result<usize>;

    /// Number of bytes consumed so far.
    fn position(&self) -> usize;

    /// Bytes left, when the source knows (slices do, streams don't).
    fn remaining(&self) -> Option<usize> {
        None
    }

    /// Read exactly one byte.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] at end of input, [`WireError::Io`] on
    /// stream failure.
    fn read_byte(&mut self) -> Result<u8, WireError> {
        self.get()?.ok_or(WireError::UnexpectedEof {
            offset: self.position(),
        })
    }

    /// Read and decode one little-endian primitive.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than `T::WIDTH` bytes remain.
    fn read_fixed<T: FixedWidth>(&mut self) -> Result<T, WireError>
    where
        Self: Sized,
    {
        let mut buf = [0u8; MAX_WIDTH];
        let span = &mut buf[..T::WIDTH];
        if self.read(span)? != T::WIDTH {
            return Err(WireError::UnexpectedEof {
                offset: self.position(),
            });
        }
        T::from_le_span(span)
            .map(|(value, _)| value)
            .ok_or(WireError::UnexpectedEof {
                offset: self.position(),
            })
    }

    /// Read exactly `len` bytes into a new buffer.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if the source holds fewer than `len`
    /// bytes.
    fn read_vec(&mut self, len: usize) -> Result<Vec<u8>, WireError> {
        if self.remaining().is_some_and(|left| left < len) {
            return Err(WireError::UnexpectedEof {
                offset: self.position(),
            });
        }
        let mut out = Vec::new();
        if self.read_to_vec(len, &mut out)? != len {
            return Err(WireError::UnexpectedEof {
                offset: self.position(),
            });
        }
        Ok(out)
    }
}

// this implementation is required so sources can be reborrowed
impl<S: Source + ?Sized> Source for &mut S {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read(buf)
    }

    fn get(&mut self) -> io::Result<Option<u8>> {
        (**self).get()
    }

    fn read_to_vec(&mut self, len: usize, out: &mut Vec<u8>) -> io::Result<usize> {
        (**self).read_to_vec(len, out)
    }

    fn position(&self) -> usize {
        (**self).position()
    }

    fn remaining(&self) -> Option<usize> {
        (**self).remaining()
    }
}

/// A source over an in-memory byte slice.
#[derive(Debug, Clone)]
pub struct SliceSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SliceSource<'a> {
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The bytes not yet consumed.
    #[must_use]
    pub fn rest(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}

impl Source for SliceSource<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let rest = self.rest();
        let n = buf.len().min(rest.len());
        buf[..n].copy_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn get(&mut self) -> io::Result<Option<u8>> {
        let byte = self.data.get(self.pos).copied();
        if byte.is_some() {
            self.pos += 1;
        }
        Ok(byte)
    }

    fn read_to_vec(&mut self, len: usize, out: &mut Vec<u8>) -> io::Result<usize> {
        let rest = self.rest();
        let n = len.min(rest.len());
        out.extend_from_slice(&rest[..n]);
        self.pos += n;
        Ok(n)
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.data.len() - self.pos)
    }
}

/// A source over any [`io::Read`] implementation.
///
/// The reader is not buffered here; wrap files in a
/// [`BufReader`](std::io::BufReader) first.
#[derive(Debug)]
pub struct IoSource<R> {
    inner: R,
    pos: usize,
}

impl<R: io::Read> IoSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner, pos: 0 }
    }

    /// Give back the wrapped reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: io::Read> Source for IoSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        self.pos += filled;
        Ok(filled)
    }

    fn get(&mut self) -> io::Result<Option<u8>> {
        let mut byte = [0u8; 1];
        Ok((self.read(&mut byte)? == 1).then_some(byte[0]))
    }

    fn read_to_vec(&mut self, len: usize, out: &mut Vec<u8>) -> io::Result<usize> {
        out.reserve(len.min(STREAM_PREALLOC));
        let limit = u64::try_from(len).unwrap_or(u64::MAX);
        let n = self.inner.by_ref().take(limit).read_to_end(out)?;
        self.pos += n;
        Ok(n)
    }

    fn position(&self) -> usize {
        self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_short_read_reports_count() {
        let mut src = SliceSource::new(&[1, 2, 3]);
        let mut buf = [0u8; 4];
        assert_eq!(src.read(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], &[1, 2, 3]);
        assert_eq!(src.remaining(), Some(0));
    }

    #[test]
    fn slice_get_until_exhausted() {
        let mut src = SliceSource::new(&[7]);
        assert_eq!(src.get().unwrap(), Some(7));
        assert_eq!(src.get().unwrap(), None);
        assert_eq!(src.position(), 1);
    }

    #[test]
    fn read_fixed_decodes_little_endian() {
        let mut src = SliceSource::new(&[0x2A, 0, 0, 0, 0xFF]);
        assert_eq!(src.read_fixed::<i32>().unwrap(), 42);
        assert_eq!(src.position(), 4);
        assert_eq!(src.read_byte().unwrap(), 0xFF);
    }

    #[test]
    fn read_fixed_short_is_eof() {
        let mut src = SliceSource::new(&[0x2A, 0]);
        let err = src.read_fixed::<i32>().unwrap_err();
        assert!(matches!(err, WireError::UnexpectedEof { offset: 2 }));
    }

    #[test]
    fn read_vec_checks_remaining_before_allocating() {
        let mut src = SliceSource::new(b"abc");
        let err = src.read_vec(1 << 30).unwrap_err();
        assert!(matches!(err, WireError::UnexpectedEof { offset: 0 }));
        assert_eq!(src.read_vec(3).unwrap(), b"abc");
    }

    #[test]
    fn io_source_matches_slice_source() {
        let data = [0x05, 0x00, 0x00, 0x00, 0x00];
        let mut src = IoSource::new(&data[..]);
        assert_eq!(src.read_fixed::<i32>().unwrap(), 5);
        assert_eq!(src.read_byte().unwrap(), 0);
        assert!(src.read_byte().unwrap_err().is_eof());
        assert_eq!(src.position(), 5);
        assert_eq!(src.remaining(), None);
    }

    #[test]
    fn io_source_read_vec_short() {
        let mut src = IoSource::new(&b"xy"[..]);
        let err = src.read_vec(5).unwrap_err();
        assert!(matches!(err, WireError::UnexpectedEof { offset: 2 }));
    }
}
