//! Shared fixtures for the jdoc integration tests, benches and the golden
//! file generator.
//!
//! [`bson`] assembles BSON bytes by hand, independently of
//! `jdoc-encoder`, so tests can check the writer against bytes it didn't
//! produce. [`fixtures`] names the documents the suites share.

#![allow(clippy::pedantic)]

pub mod bson {
    //! Hand-assembled BSON elements.
    //!
    //! Each element helper returns `type code, key, 0x00, payload`;
    //! [`document`] wraps a list of them in a length prefix and the
    //! terminator.

    use jdoc_wire::element::type_code;

    /// `int32 total length, elements..., 0x00`.
    pub fn document(elements: &[Vec<u8>]) -> Vec<u8> {
        let body = elements.concat();
        let len = i32::try_from(body.len() + 5).expect("fixture larger than 2 GiB");
        let mut out = len.to_le_bytes().to_vec();
        out.extend_from_slice(&body);
        out.push(0);
        out
    }

    fn element(code: u8, key: &str, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![code];
        out.extend_from_slice(key.as_bytes());
        out.push(0);
        out.extend_from_slice(payload);
        out
    }

    pub fn double(key: &str, value: f64) -> Vec<u8> {
        element(type_code::DOUBLE, key, &value.to_le_bytes())
    }

    pub fn string(key: &str, value: &str) -> Vec<u8> {
        let len = i32::try_from(value.len() + 1).expect("string too long");
        let mut payload = len.to_le_bytes().to_vec();
        payload.extend_from_slice(value.as_bytes());
        payload.push(0);
        element(type_code::STRING, key, &payload)
    }

    pub fn embedded(key: &str, elements: &[Vec<u8>]) -> Vec<u8> {
        element(type_code::DOCUMENT, key, &document(elements))
    }

    /// Array whose members are keyed `"0"`, `"1"`, ... by `make`.
    pub fn array(key: &str, items: &[fn(&str) -> Vec<u8>]) -> Vec<u8> {
        let elements: Vec<Vec<u8>> = items
            .iter()
            .enumerate()
            .map(|(i, make)| make(&i.to_string()))
            .collect();
        element(type_code::ARRAY, key, &document(&elements))
    }

    pub fn binary(key: &str, bytes: &[u8]) -> Vec<u8> {
        let len = i32::try_from(bytes.len()).expect("binary too long");
        let mut payload = len.to_le_bytes().to_vec();
        payload.extend_from_slice(bytes);
        element(type_code::BINARY, key, &payload)
    }

    pub fn boolean(key: &str, value: bool) -> Vec<u8> {
        element(type_code::BOOL, key, &[u8::from(value)])
    }

    pub fn null(key: &str) -> Vec<u8> {
        element(type_code::NULL, key, &[])
    }

    pub fn int32(key: &str, value: i32) -> Vec<u8> {
        element(type_code::INT32, key, &value.to_le_bytes())
    }

    pub fn timestamp(key: &str, value: u64) -> Vec<u8> {
        element(type_code::TIMESTAMP, key, &value.to_le_bytes())
    }

    pub fn int64(key: &str, value: i64) -> Vec<u8> {
        element(type_code::INT64, key, &value.to_le_bytes())
    }

    /// An element with an arbitrary type code and payload.
    pub fn raw(code: u8, key: &str, payload: &[u8]) -> Vec<u8> {
        element(code, key, payload)
    }
}

pub mod fixtures {
    //! Named documents shared by the suites.

    use crate::bson::*;

    /// A named BSON payload.
    pub struct Fixture {
        pub name: &'static str,
        pub bytes: Vec<u8>,
    }

    /// `05 00 00 00 00`.
    pub fn empty() -> Vec<u8> {
        document(&[])
    }

    /// `{ "x": int32 42 }`.
    pub fn single_int32() -> Vec<u8> {
        document(&[int32("x", 42)])
    }

    /// One element of every scalar type.
    pub fn scalars() -> Vec<u8> {
        document(&[
            double("d", 1.5),
            string("s", "hi"),
            binary("b", &[1, 2, 3]),
            boolean("t", true),
            null("n"),
            int32("i", -7),
            timestamp("ts", 1_700_000_000),
            int64("l", 5_000_000_000),
        ])
    }

    /// `{ "outer": { "list": [1, { "k": "v" }, []] } }`.
    pub fn nested() -> Vec<u8> {
        document(&[embedded(
            "outer",
            &[array(
                "list",
                &[
                    |k| int32(k, 1),
                    |k| embedded(k, &[string("k", "v")]),
                    |k| array(k, &[]),
                ],
            )],
        )])
    }

    /// `{ "a": [1, 2, 3, 4, 5] }`, for fixed-array truncation.
    pub fn five_ints() -> Vec<u8> {
        document(&[array(
            "a",
            &[
                |k| int32(k, 1),
                |k| int32(k, 2),
                |k| int32(k, 3),
                |k| int32(k, 4),
                |k| int32(k, 5),
            ],
        )])
    }

    /// Array nested `depth - 1` levels inside the root document, so the
    /// whole document has nesting depth `depth`.
    pub fn deep(depth: usize) -> Vec<u8> {
        let mut inner = document(&[]);
        for _ in 1..depth {
            let mut element = vec![jdoc_wire::element::type_code::ARRAY, b'0', 0];
            element.extend_from_slice(&inner);
            inner = document(&[element]);
        }
        inner
    }

    /// Two documents back to back.
    pub fn concatenated() -> Vec<u8> {
        [single_int32(), document(&[string("s", "second")])].concat()
    }

    /// `{ "x": <code 0x13> }`.
    pub fn unknown_type() -> Vec<u8> {
        document(&[raw(0x13, "x", &[0; 4])])
    }

    /// Every well-formed fixture, in a stable order.
    pub fn golden() -> Vec<Fixture> {
        vec![
            Fixture { name: "empty", bytes: empty() },
            Fixture { name: "single_int32", bytes: single_int32() },
            Fixture { name: "scalars", bytes: scalars() },
            Fixture { name: "nested", bytes: nested() },
            Fixture { name: "five_ints", bytes: five_ints() },
            Fixture { name: "concatenated", bytes: concatenated() },
        ]
    }

    /// Malformed payloads every decoder must reject.
    pub fn malformed() -> Vec<Fixture> {
        let mut short_prefix = single_int32();
        short_prefix[0] = 4;
        let mut long_prefix = single_int32();
        long_prefix[0] = 13;
        let mut bad_string = document(&[string("s", "ab")]);
        let last = bad_string.len() - 2;
        bad_string[last] = b'!';
        vec![
            Fixture { name: "unknown_type", bytes: unknown_type() },
            Fixture { name: "short_prefix", bytes: short_prefix },
            Fixture { name: "long_prefix", bytes: long_prefix },
            Fixture { name: "truncated", bytes: single_int32()[..9].to_vec() },
            Fixture { name: "unterminated_string", bytes: bad_string },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn hand_built_bytes_match_the_wire_layout() {
        assert_eq!(empty(), [5, 0, 0, 0, 0]);
        assert_eq!(single_int32(), [0x0C, 0, 0, 0, 0x10, b'x', 0, 0x2A, 0, 0, 0, 0]);
    }

    #[test]
    fn deep_document_prefixes() {
        // 5 bytes innermost, each level adds type code, "0\0", prefix and terminator
        assert_eq!(deep(1).len(), 5);
        assert_eq!(deep(2).len(), 5 + 3 + 5);
        assert_eq!(deep(3).len(), 5 + 3 + 13);
    }
}
