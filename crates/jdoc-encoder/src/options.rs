/// Layout of JSON output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Indenting {
    /// Everything on one line, no insignificant whitespace.
    #[default]
    Flat,
    /// One member or element per line, nested levels indented by
    /// [`EncodeOptions::indent_size`] spaces.
    Indent,
}

/// Alphabet used for byte strings in text output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ByteStringFormat {
    /// RFC 4648 standard alphabet, padded.
    #[default]
    Base64,
    /// RFC 4648 URL-safe alphabet, unpadded.
    Base64Url,
}

/// Formatting options for the JSON printer.
///
/// ```text
/// ┌────────────────────┬─────────┬───────────────────────────────────────┐
/// │ Field              │ Default │ Effect                                │
/// ├────────────────────┼─────────┼───────────────────────────────────────┤
/// │ indent_size        │ 4       │ Spaces per level with Indent          │
/// │ float_precision    │ None    │ Fixed digits after the point; None    │
/// │                    │         │ prints the shortest round-trip form   │
/// │ nan_to_null        │ true    │ NaN and ±inf print as null; when off  │
/// │                    │         │ they are rejected                     │
/// │ byte_string_format │ Base64  │ Alphabet for byte strings             │
/// └────────────────────┴─────────┴───────────────────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub indent_size: usize,
    pub float_precision: Option<usize>,
    pub nan_to_null: bool,
    pub byte_string_format: ByteStringFormat,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            indent_size: 4,
            float_precision: None,
            nan_to_null: true,
            byte_string_format: ByteStringFormat::default(),
        }
    }
}

impl EncodeOptions {
    #[must_use]
    pub fn with_indent_size(mut self, indent_size: usize) -> Self {
        self.indent_size = indent_size;
        self
    }

    #[must_use]
    pub fn with_float_precision(mut self, digits: usize) -> Self {
        self.float_precision = Some(digits);
        self
    }

    #[must_use]
    pub fn with_nan_to_null(mut self, nan_to_null: bool) -> Self {
        self.nan_to_null = nan_to_null;
        self
    }

    #[must_use]
    pub fn with_byte_string_format(mut self, format: ByteStringFormat) -> Self {
        self.byte_string_format = format;
        self
    }
}
