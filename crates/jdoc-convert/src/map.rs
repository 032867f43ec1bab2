use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};

use indexmap::IndexMap;
use jdoc_decoder::StreamReader;
use jdoc_types::{ContentHandler, HandlerResult, SemanticTag};

use crate::cursor::ObjectCursor;
use crate::error::ConvertError;
use crate::traits::{Category, Convert};

/// A map key. Object member names are strings; integer keys are written
/// and parsed in decimal.
pub trait MapKey: Sized {
    /// # Errors
    ///
    /// [`ConvertError::Shape`] if the member name doesn't parse as `Self`.
    fn from_key(key: String) -> Result<Self, ConvertError>;

    fn to_key(&self) -> Cow<'_, str>;
}

impl MapKey for String {
    fn from_key(key: String) -> Result<Self, ConvertError> {
        Ok(key)
    }

    fn to_key(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }
}

macro_rules! integer_key {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl MapKey for $ty {
                fn from_key(key: String) -> Result<Self, ConvertError> {
                    key.parse()
                        .map_err(|_| ConvertError::shape(concat!(stringify!($ty), " key"), key))
                }

                fn to_key(&self) -> Cow<'_, str> {
                    Cow::Owned(self.to_string())
                }
            }
        )+
    };
}

integer_key!(i32, i64, u32, u64, usize);

fn encode_entries<'a, H, K, V, I>(handler: &mut H, entries: I) -> HandlerResult
where
    H: ContentHandler + ?Sized,
    K: MapKey + 'a,
    V: Convert + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    handler.begin_object(SemanticTag::None)?;
    for (key, value) in entries {
        handler.name(&key.to_key())?;
        value.encode(handler)?;
    }
    handler.end_object()
}

fn decode_entries<R, K, V, F>(reader: &mut R, mut insert: F) -> Result<(), ConvertError>
where
    R: StreamReader,
    K: MapKey,
    V: Convert,
    F: FnMut(K, V),
{
    for entry in ObjectCursor::<R, V>::begin(reader)? {
        let (key, value) = entry?;
        insert(K::from_key(key)?, value);
    }
    Ok(())
}

impl<K, V, S> Convert for HashMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Convert,
    S: BuildHasher + Default,
{
    const CATEGORY: Category = Category::Map;

    fn decode<R: StreamReader>(reader: &mut R) -> Result<Self, ConvertError> {
        let mut out = Self::default();
        decode_entries(reader, |k, v| {
            out.insert(k, v);
        })?;
        Ok(out)
    }

    fn encode<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult {
        encode_entries(handler, self)
    }
}

impl<K, V> Convert for BTreeMap<K, V>
where
    K: MapKey + Ord,
    V: Convert,
{
    const CATEGORY: Category = Category::Map;

    fn decode<R: StreamReader>(reader: &mut R) -> Result<Self, ConvertError> {
        let mut out = Self::new();
        decode_entries(reader, |k, v| {
            out.insert(k, v);
        })?;
        Ok(out)
    }

    fn encode<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult {
        encode_entries(handler, self)
    }
}

impl<K, V, S> Convert for IndexMap<K, V, S>
where
    K: MapKey + Eq + Hash,
    V: Convert,
    S: BuildHasher + Default,
{
    const CATEGORY: Category = Category::Map;

    fn decode<R: StreamReader>(reader: &mut R) -> Result<Self, ConvertError> {
        let mut out = Self::default();
        decode_entries(reader, |k, v| {
            out.insert(k, v);
        })?;
        Ok(out)
    }

    fn encode<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult {
        encode_entries(handler, self)
    }
}
