//! Single-pass iterators over the members of the array or object a
//! reader is positioned on.
//!
//! Creating a cursor consumes the begin event; the cursor ends after
//! consuming the matching end event. After the first error it yields
//! nothing more.

use std::marker::PhantomData;

use jdoc_decoder::StreamReader;
use jdoc_types::Event;

use crate::error::ConvertError;
use crate::traits::Convert;

fn found(event: Option<&Event>) -> &'static str {
    event.map_or("end of input", Event::kind)
}

/// Take the begin event the reader is on, or fail with a shape error.
fn expect_begin<R: StreamReader>(
    reader: &mut R,
    is_begin: fn(&Event) -> bool,
    expected: &'static str,
) -> Result<(), ConvertError> {
    match reader.current() {
        Some(event) if is_begin(event) => {
            reader.increment()?;
            Ok(())
        }
        other => Err(ConvertError::shape(expected, found(other))),
    }
}

/// Elements of an array, each decoded as `T`.
pub struct ArrayCursor<'r, R, T> {
    reader: &'r mut R,
    done: bool,
    _item: PhantomData<fn() -> T>,
}

impl<'r, R: StreamReader, T: Convert> ArrayCursor<'r, R, T> {
    /// # Errors
    ///
    /// [`ConvertError::Shape`] unless the reader is on a begin-array.
    pub fn begin(reader: &'r mut R) -> Result<Self, ConvertError> {
        expect_begin(reader, |e| matches!(e, Event::BeginArray(_)), "array")?;
        Ok(Self {
            reader,
            done: false,
            _item: PhantomData,
        })
    }

    fn step(&mut self) -> Result<Option<T>, ConvertError> {
        match self.reader.current() {
            Some(Event::EndArray) => {
                self.reader.increment()?;
                Ok(None)
            }
            Some(_) => T::decode(self.reader).map(Some),
            None => Err(ConvertError::shape("end-array", "end of input")),
        }
    }
}

impl<R: StreamReader, T: Convert> Iterator for ArrayCursor<'_, R, T> {
    type Item = Result<T, ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.step().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

/// Members of an object as `(key, value)` pairs, each value decoded as
/// `V`.
pub struct ObjectCursor<'r, R, V> {
    reader: &'r mut R,
    done: bool,
    _value: PhantomData<fn() -> V>,
}

impl<'r, R: StreamReader, V: Convert> ObjectCursor<'r, R, V> {
    /// # Errors
    ///
    /// [`ConvertError::Shape`] unless the reader is on a begin-object.
    pub fn begin(reader: &'r mut R) -> Result<Self, ConvertError> {
        expect_begin(reader, |e| matches!(e, Event::BeginObject(_)), "object")?;
        Ok(Self {
            reader,
            done: false,
            _value: PhantomData,
        })
    }

    fn step(&mut self) -> Result<Option<(String, V)>, ConvertError> {
        match self.reader.next_event()? {
            Some(Event::EndObject) => Ok(None),
            Some(Event::Name(key)) => Ok(Some((key, V::decode(self.reader)?))),
            other => Err(ConvertError::shape("member name", found(other.as_ref()))),
        }
    }
}

impl<R: StreamReader, V: Convert> Iterator for ObjectCursor<'_, R, V> {
    type Item = Result<(String, V), ConvertError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let result = self.step().transpose();
        if !matches!(result, Some(Ok(_))) {
            self.done = true;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jdoc_decoder::BufferedReader;
    use jdoc_types::SemanticTag;

    const NONE: SemanticTag = SemanticTag::None;

    #[test]
    fn array_cursor_stops_at_matching_end() {
        let mut reader = BufferedReader::new(vec![
            Event::BeginArray(NONE),
            Event::Int64(1, NONE),
            Event::Int64(2, NONE),
            Event::EndArray,
            Event::Null(NONE),
        ]);
        let items: Vec<i64> = ArrayCursor::begin(&mut reader)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(items, [1, 2]);
        assert_eq!(reader.current(), Some(&Event::Null(NONE)));
    }

    #[test]
    fn array_cursor_rejects_object() {
        let mut reader = BufferedReader::new(vec![Event::BeginObject(NONE), Event::EndObject]);
        let err = ArrayCursor::<_, i64>::begin(&mut reader).err().unwrap();
        assert!(matches!(err, ConvertError::Shape { .. }));
    }

    #[test]
    fn array_cursor_fuses_after_error() {
        let mut reader = BufferedReader::new(vec![
            Event::BeginArray(NONE),
            Event::String("x".into(), NONE),
            Event::Int64(2, NONE),
            Event::EndArray,
        ]);
        let mut cursor = ArrayCursor::<_, i64>::begin(&mut reader).unwrap();
        assert!(cursor.next().unwrap().is_err());
        assert!(cursor.next().is_none());
    }

    #[test]
    fn object_cursor_yields_pairs() {
        let mut reader = BufferedReader::new(vec![
            Event::BeginObject(NONE),
            Event::Name("a".into()),
            Event::Bool(true, NONE),
            Event::EndObject,
        ]);
        let pairs: Vec<(String, bool)> = ObjectCursor::begin(&mut reader)
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(pairs, [("a".to_owned(), true)]);
        assert!(reader.done());
    }

    #[test]
    fn truncated_array() {
        let mut reader = BufferedReader::new(vec![Event::BeginArray(NONE), Event::Int64(1, NONE)]);
        let result: Result<Vec<i64>, _> = ArrayCursor::begin(&mut reader).unwrap().collect();
        assert!(matches!(result, Err(ConvertError::Shape { .. })));
    }
}
