use std::collections::VecDeque;

use jdoc_decoder::StreamReader;
use jdoc_types::{ContentHandler, HandlerResult, SemanticTag};

use crate::cursor::ArrayCursor;
use crate::error::ConvertError;
use crate::traits::{Category, Convert};

macro_rules! sequence_convert {
    ($($seq:ident => $push:ident),+ $(,)?) => {
        $(
            impl<T: Convert> Convert for $seq<T> {
                const CATEGORY: Category = Category::Sequence;

                fn decode<R: StreamReader>(reader: &mut R) -> Result<Self, ConvertError> {
                    let mut out = $seq::new();
                    for item in ArrayCursor::<R, T>::begin(reader)? {
                        out.$push(item?);
                    }
                    Ok(out)
                }

                fn encode<H: ContentHandler + ?Sized>(&self, handler: &mut H) -> HandlerResult {
                    handler.begin_array(SemanticTag::None)?;
                    for item in self {
                        item.encode(handler)?;
                    }
                    handler.end_array()
                }
            }
        )+
    };
}

sequence_convert!(Vec => push, VecDeque => push_back);
