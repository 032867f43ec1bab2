use jdoc_decoder::{BufferedReader, StreamReader};
use jdoc_types::{ContentHandler, HandlerResult, SemanticTag, Value};

use crate::error::ConvertError;
use crate::fallback::read_value;
use crate::traits::{Category, Convert};

/// Decode one tuple component from its materialised value.
fn component<T: Convert>(item: Option<Value>) -> Result<T, ConvertError> {
    let item = item.ok_or_else(|| ConvertError::shape("tuple component", "nothing"))?;
    T::decode(&mut BufferedReader::from_value(&item)?)
}

macro_rules! tuple_convert {
    ($($len:literal => ($($name:ident $idx:tt),+)),+ $(,)?) => {
        $(
            impl<$($name: Convert),+> Convert for ($($name,)+) {
                const CATEGORY: Category = Category::Tuple;

                fn decode<R: StreamReader>(reader: &mut R) -> Result<Self, ConvertError> {
                    let items = match read_value(reader)? {
                        Value::Array(items) => items,
                        other => {
                            return Err(ConvertError::shape(
                                concat!("array of ", $len),
                                other.type_name(),
                            ));
                        }
                    };
                    if items.len() != $len {
                        return Err(ConvertError::shape(
                            concat!("array of ", $len),
                            format!("array of {}", items.len()),
                        ));
                    }
                    let mut items = items.into_iter();
                    Ok(($(component::<$name>(items.next())?,)+))
                }

                fn encode<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult {
                    handler.begin_array(SemanticTag::None)?;
                    $(self.$idx.encode(handler)?;)+
                    handler.end_array()
                }
            }
        )+
    };
}

tuple_convert!(
    1 => (T0 0),
    2 => (T0 0, T1 1),
    3 => (T0 0, T1 1, T2 2),
    4 => (T0 0, T1 1, T2 2, T3 3),
    5 => (T0 0, T1 1, T2 2, T3 3, T4 4),
    6 => (T0 0, T1 1, T2 2, T3 3, T4 4, T5 5),
    7 => (T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6),
    8 => (T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7),
);
