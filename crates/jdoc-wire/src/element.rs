use crate::error::WireError;

/// Byte that ends every element list.
pub const TERMINATOR: u8 = 0x00;

/// Smallest possible document: a 4-byte length prefix plus the terminator.
pub const MIN_DOCUMENT_LEN: usize = 5;

/// Raw type codes as they appear on the wire.
pub mod type_code {
    pub const DOUBLE: u8 = 0x01;
    pub const STRING: u8 = 0x02;
    pub const DOCUMENT: u8 = 0x03;
    pub const ARRAY: u8 = 0x04;
    pub const BINARY: u8 = 0x05;
    pub const BOOL: u8 = 0x08;
    pub const NULL: u8 = 0x0A;
    pub const INT32: u8 = 0x10;
    pub const TIMESTAMP: u8 = 0x11;
    pub const INT64: u8 = 0x12;
}

/// Element kinds this reader understands.
///
/// ```text
/// ┌──────┬───────────┬──────────────────────────────────────────┐
/// │ Code │ Variant   │ Payload                                  │
/// ├──────┼───────────┼──────────────────────────────────────────┤
/// │ 0x01 │ Double    │ 8 bytes, IEEE-754 little-endian          │
/// │ 0x02 │ String    │ i32 length (incl. NUL) + UTF-8 + 0x00    │
/// │ 0x03 │ Document  │ embedded document                        │
/// │ 0x04 │ Array     │ embedded document with index keys        │
/// │ 0x05 │ Binary    │ i32 length + raw bytes                   │
/// │ 0x08 │ Bool      │ 1 byte, nonzero = true                   │
/// │ 0x0A │ Null      │ none                                     │
/// │ 0x10 │ Int32     │ 4 bytes little-endian                    │
/// │ 0x11 │ Timestamp │ 8 bytes little-endian, unsigned epoch    │
/// │ 0x12 │ Int64     │ 8 bytes little-endian                    │
/// └──────┴───────────┴──────────────────────────────────────────┘
/// ```
///
/// The set is closed. An unknown element can't be skipped because its
/// payload length depends on its type, so [`ElementType::from_code`]
/// rejects it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementType {
    Double,
    String,
    Document,
    Array,
    Binary,
    Bool,
    Null,
    Int32,
    Timestamp,
    Int64,
}

impl ElementType {
    /// Parse a wire type code.
    ///
    /// `offset` is the position of the code byte, used for the error.
    ///
    /// # Errors
    ///
    /// [`WireError::UnsupportedType`] for any byte outside the table above
    /// (including the `0x00` terminator, which callers check first).
    pub fn from_code(code: u8, offset: usize) -> Result<Self, WireError> {
        match code {
            type_code::DOUBLE => Ok(Self::Double),
            type_code::STRING => Ok(Self::String),
            type_code::DOCUMENT => Ok(Self::Document),
            type_code::ARRAY => Ok(Self::Array),
            type_code::BINARY => Ok(Self::Binary),
            type_code::BOOL => Ok(Self::Bool),
            type_code::NULL => Ok(Self::Null),
            type_code::INT32 => Ok(Self::Int32),
            type_code::TIMESTAMP => Ok(Self::Timestamp),
            type_code::INT64 => Ok(Self::Int64),
            code => Err(WireError::UnsupportedType { code, offset }),
        }
    }

    /// The wire byte for this element type.
    pub fn code(self) -> u8 {
        match self {
            Self::Double => type_code::DOUBLE,
            Self::String => type_code::STRING,
            Self::Document => type_code::DOCUMENT,
            Self::Array => type_code::ARRAY,
            Self::Binary => type_code::BINARY,
            Self::Bool => type_code::BOOL,
            Self::Null => type_code::NULL,
            Self::Int32 => type_code::INT32,
            Self::Timestamp => type_code::TIMESTAMP,
            Self::Int64 => type_code::INT64,
        }
    }

    /// Human-readable name for diagnostics.
    pub fn name(self) -> &'static str {
        match self {
            Self::Double => "double",
            Self::String => "string",
            Self::Document => "document",
            Self::Array => "array",
            Self::Binary => "binary",
            Self::Bool => "bool",
            Self::Null => "null",
            Self::Int32 => "int32",
            Self::Timestamp => "timestamp",
            Self::Int64 => "int64",
        }
    }
}
