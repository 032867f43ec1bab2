//! Fixed-width little-endian primitives.
//!
//! BSON stores every integer and float in little-endian byte order. The
//! decoder here is total over its input: a span that is too short yields
//! `None` instead of panicking, so callers can surface a short read as a
//! proper error.

/// Widest primitive in the format (`i64`, `u64`, `f64`).
pub const MAX_WIDTH: usize = 8;

/// A primitive with a fixed little-endian wire width.
pub trait FixedWidth: Sized + Copy {
    /// Number of bytes the value occupies on the wire.
    const WIDTH: usize;

    /// Decode a value from the front of `span`.
    ///
    /// Returns the value and the unconsumed remainder of `span`, or `None`
    /// when `span` is shorter than [`Self::WIDTH`].
    fn from_le_span(span: &[u8]) -> Option<(Self, &[u8])>;

    /// Append the little-endian bytes of `self` to `out`.
    fn write_le(self, out: &mut Vec<u8>);
}

macro_rules! fixed_width {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FixedWidth for $ty {
                const WIDTH: usize = size_of::<$ty>();

                #[inline]
                fn from_le_span(span: &[u8]) -> Option<(Self, &[u8])> {
                    let (head, rest) = span.split_first_chunk::<{ size_of::<$ty>() }>()?;
                    Some((<$ty>::from_le_bytes(*head), rest))
                }

                #[inline]
                fn write_le(self, out: &mut Vec<u8>) {
                    out.extend_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

fixed_width!(i32, u32, i64, u64, f64);

/// Decode a `T` from the front of `span`.
///
/// Thin wrapper over [`FixedWidth::from_le_span`] that reads better at call
/// sites: `decode_le::<i32>(buf)`.
#[inline]
pub fn decode_le<T: FixedWidth>(span: &[u8]) -> Option<(T, &[u8])> {
    T::from_le_span(span)
}

/// Append the little-endian encoding of `value` to `out`.
#[inline]
pub fn encode_le<T: FixedWidth>(value: T, out: &mut Vec<u8>) {
    value.write_le(out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_i32_forty_two() {
        let (value, rest) = decode_le::<i32>(&[0x2A, 0x00, 0x00, 0x00]).unwrap();
        assert_eq!(value, 42);
        assert!(rest.is_empty());
    }

    #[test]
    fn decode_negative_i32() {
        let (value, _) = decode_le::<i32>(&[0xFF, 0xFF, 0xFF, 0xFF]).unwrap();
        assert_eq!(value, -1);
    }

    #[test]
    fn decode_leaves_trailing_bytes() {
        let buf = [0x05, 0x00, 0x00, 0x00, 0xAA, 0xBB];
        let (value, rest) = decode_le::<i32>(&buf).unwrap();
        assert_eq!(value, 5);
        assert_eq!(rest, &[0xAA, 0xBB]);
    }

    #[test]
    fn decode_f64_one_point_five() {
        // 1.5 = 0x3FF8_0000_0000_0000
        let buf = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF8, 0x3F];
        let (value, _) = decode_le::<f64>(&buf).unwrap();
        assert!((value - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn decode_u64_high_bit() {
        let buf = [0, 0, 0, 0, 0, 0, 0, 0x80];
        let (value, _) = decode_le::<u64>(&buf).unwrap();
        assert_eq!(value, 1 << 63);
    }

    #[test]
    fn short_span_is_none() {
        assert!(decode_le::<i64>(&[1, 2, 3, 4, 5, 6, 7]).is_none());
        assert!(decode_le::<i32>(&[]).is_none());
    }

    #[test]
    fn encode_matches_decode() {
        let mut out = Vec::new();
        encode_le(-2_i64, &mut out);
        encode_le(7_i32, &mut out);
        assert_eq!(out.len(), 12);

        let (a, rest) = decode_le::<i64>(&out).unwrap();
        let (b, rest) = decode_le::<i32>(rest).unwrap();
        assert_eq!((a, b), (-2, 7));
        assert!(rest.is_empty());
    }

    #[test]
    fn widths() {
        assert_eq!(<i32 as FixedWidth>::WIDTH, 4);
        assert_eq!(<f64 as FixedWidth>::WIDTH, MAX_WIDTH);
    }
}
