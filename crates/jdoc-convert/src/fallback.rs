//! Conversion through the in-memory document model.
//!
//! Types without a structural category go through a [`Value`]: decoding
//! builds the value from the reader and converts it with [`FromValue`],
//! encoding converts with [`ToValue`] and dumps the value's events.
//!
//! User types opt in by implementing both traits and invoking
//! [`convert_via_value!`](crate::convert_via_value).

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use jdoc_decoder::StreamReader;
use jdoc_types::{ByteString, ContentHandler, Event, HandlerResult, SemanticTag, Value, ValueBuilder};

use crate::error::ConvertError;
use crate::traits::{Category, Convert};

pub trait FromValue: Sized {
    /// # Errors
    ///
    /// [`ConvertError::Shape`] or [`ConvertError::OutOfRange`] when
    /// `value` doesn't represent a `Self`.
    fn from_value(value: Value) -> Result<Self, ConvertError>;
}

pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Materialise the value the reader is positioned on.
///
/// # Errors
///
/// Read errors, or a malformed event sequence.
pub fn read_value<R: StreamReader>(reader: &mut R) -> Result<Value, ConvertError> {
    let mut builder = ValueBuilder::new();
    reader.accept(&mut builder)?;
    Ok(builder.into_value()?)
}

/// Implement [`Convert`](crate::Convert) for types that already implement
/// [`FromValue`] and [`ToValue`].
///
/// ```rust
/// use jdoc_convert::{ConvertError, FromValue, ToValue, convert_via_value};
/// use jdoc_types::Value;
///
/// struct Celsius(f64);
///
/// impl FromValue for Celsius {
///     fn from_value(value: Value) -> Result<Self, ConvertError> {
///         f64::from_value(value).map(Celsius)
///     }
/// }
///
/// impl ToValue for Celsius {
///     fn to_value(&self) -> Value {
///         Value::Double(self.0)
///     }
/// }
///
/// convert_via_value!(Celsius);
///
/// let t: Celsius = jdoc_convert::decode_json("21.5").unwrap();
/// assert_eq!(t.0, 21.5);
/// ```
#[macro_export]
macro_rules! convert_via_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::Convert for $ty {
                const CATEGORY: $crate::Category = $crate::Category::ViaDocument;

                fn decode<R: $crate::StreamReader>(
                    reader: &mut R,
                ) -> ::std::result::Result<Self, $crate::ConvertError> {
                    <$ty as $crate::FromValue>::from_value($crate::read_value(reader)?)
                }

                fn encode<H: $crate::ContentHandler + ?Sized>(
                    &self,
                    handler: &mut H,
                ) -> $crate::HandlerResult {
                    $crate::ToValue::to_value(self).dump(handler)
                }
            }
        )+
    };
}

fn shape(expected: &'static str, value: &Value) -> ConvertError {
    ConvertError::shape(expected, value.type_name())
}

macro_rules! integer_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl FromValue for $ty {
                fn from_value(value: Value) -> Result<Self, ConvertError> {
                    let target = stringify!($ty);
                    match value {
                        Value::Int64(v) => {
                            <$ty>::try_from(v).map_err(|_| ConvertError::out_of_range(v, target))
                        }
                        Value::Uint64(v, _) => {
                            <$ty>::try_from(v).map_err(|_| ConvertError::out_of_range(v, target))
                        }
                        other => Err(shape("integer", &other)),
                    }
                }
            }
        )+
    };
}

integer_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! signed_to_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl ToValue for $ty {
                fn to_value(&self) -> Value {
                    Value::Int64(i64::from(*self))
                }
            }
        )+
    };
}

signed_to_value!(i8, i16, i32, i64, u8, u16, u32);

impl ToValue for isize {
    #[allow(clippy::cast_possible_truncation)]
    fn to_value(&self) -> Value {
        Value::Int64(*self as i64)
    }
}

impl ToValue for u64 {
    fn to_value(&self) -> Value {
        i64::try_from(*self).map_or(Value::Uint64(*self, SemanticTag::None), Value::Int64)
    }
}

impl ToValue for usize {
    #[allow(clippy::cast_possible_truncation)]
    fn to_value(&self) -> Value {
        (*self as u64).to_value()
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        value.as_f64().ok_or_else(|| shape("number", &value))
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> Value {
        Value::Double(*self)
    }
}

impl FromValue for f32 {
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> Value {
        Value::Double(f64::from(*self))
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        value.as_bool().ok_or_else(|| shape("bool", &value))
    }
}

impl ToValue for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(shape("string", &other)),
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(value)
    }
}

impl ToValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

/// Binary formats carry bytes natively; text formats carry them as base64
/// strings (standard alphabet, or URL-safe without padding).
impl FromValue for ByteString {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::ByteString(bytes) => Ok(Self(bytes)),
            Value::String(text) => STANDARD
                .decode(&text)
                .or_else(|_| URL_SAFE_NO_PAD.decode(&text))
                .map(Self)
                .map_err(ConvertError::from),
            other => Err(shape("byte string", &other)),
        }
    }
}

impl ToValue for ByteString {
    fn to_value(&self) -> Value {
        Value::ByteString(self.0.clone())
    }
}

convert_via_value!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, ByteString
);

// Value skips the ToValue clone on encode.
impl Convert for Value {
    const CATEGORY: Category = Category::ViaDocument;

    fn decode<R: StreamReader>(reader: &mut R) -> Result<Self, ConvertError> {
        read_value(reader)
    }

    fn encode<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult {
        self.dump(handler)
    }
}

/// `null` decodes to `None`; anything else decodes as `T`. Classified
/// like `T`.
impl<T: Convert> Convert for Option<T> {
    const CATEGORY: Category = T::CATEGORY;

    fn decode<R: StreamReader>(reader: &mut R) -> Result<Self, ConvertError> {
        if matches!(reader.current(), Some(Event::Null(_))) {
            reader.increment()?;
            return Ok(None);
        }
        T::decode(reader).map(Some)
    }

    fn encode<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult {
        match self {
            Some(value) => value.encode(handler),
            None => handler.null_value(SemanticTag::None),
        }
    }
}
