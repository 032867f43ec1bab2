use jdoc_decoder::StreamReader;
use jdoc_types::{ContentHandler, HandlerResult, SemanticTag};
use log::debug;

use crate::cursor::ArrayCursor;
use crate::error::ConvertError;
use crate::traits::{Category, Convert};

/// Fixed-length arrays read any wire array. Elements past `N` are still
/// decoded (so the reader stays in step) and then dropped; slots the wire
/// array doesn't reach keep `T::default()`.
impl<T: Convert + Default, const N: usize> Convert for [T; N] {
    const CATEGORY: Category = Category::FixedArray;

    fn decode<R: StreamReader>(reader: &mut R) -> Result<Self, ConvertError> {
        let mut out: [T; N] = std::array::from_fn(|_| T::default());
        let mut count = 0usize;
        for item in ArrayCursor::<R, T>::begin(reader)? {
            let item = item?;
            if let Some(slot) = out.get_mut(count) {
                *slot = item;
            }
            count += 1;
        }
        if count > N {
            debug!("discarded {} array element(s) past length {N}", count - N);
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
