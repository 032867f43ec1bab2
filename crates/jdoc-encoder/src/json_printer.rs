use std::io::{self, Write};

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use jdoc_types::{ContentHandler, HandlerError, HandlerResult, SemanticTag};

use crate::options::{ByteStringFormat, EncodeOptions, Indenting};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

#[derive(Debug)]
struct Level {
    container: Container,
    count: usize,
}

/// Content handler that writes JSON text.
///
/// Strings and keys are escaped by `serde_json`; doubles print in their
/// shortest round-trip form unless a fixed precision is configured.
/// Byte strings print as base64 strings. Semantic tags don't change the
/// output.
///
/// With [`Indenting::Indent`]:
///
/// ```text
/// {
///     "name": "x",
///     "list": [
///         1,
///         2
///     ],
///     "empty": {}
/// }
/// ```
pub struct JsonPrinter<W> {
    writer: W,
    options: EncodeOptions,
    indenting: Indenting,
    stack: Vec<Level>,
    after_name: bool,
    roots: usize,
}

impl<W: Write> JsonPrinter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_options(writer, EncodeOptions::default(), Indenting::Flat)
    }

    pub fn with_options(writer: W, options: EncodeOptions, indenting: Indenting) -> Self {
        Self {
            writer,
            options,
            indenting,
            stack: Vec::new(),
            after_name: false,
            roots: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn indented(&self) -> bool {
        self.indenting == Indenting::Indent
    }

    fn newline(&mut self) -> io::Result<()> {
        if self.indented() {
            let width = self.stack.len() * self.options.indent_size;
            write!(self.writer, "\n{:width$}", "")?;
        }
        Ok(())
    }

    /// Separator and indentation before a value.
    fn before_value(&mut self, event: &'static str) -> HandlerResult {
        if self.after_name {
            self.after_name = false;
            return Ok(());
        }
        match self.stack.last_mut() {
            None => {
                if self.roots > 0 {
                    self.writer.write_all(b"\n")?;
                }
            }
            Some(Level {
                container: Container::Array,
                count,
            }) => {
                if *count > 0 {
                    self.writer.write_all(b",")?;
                }
                *count += 1;
                self.newline()?;
            }
            Some(Level {
                container: Container::Object,
                ..
            }) => {
                return Err(HandlerError::UnexpectedEvent {
                    event,
                    reason: "object member without a name",
                });
            }
        }
        Ok(())
    }

    /// Bookkeeping after a complete value.
    fn after_value(&mut self) {
        if self.stack.is_empty() {
            self.roots += 1;
        }
    }

    fn scalar(&mut self, event: &'static str, text: &[u8]) -> HandlerResult {
        self.before_value(event)?;
        self.writer.write_all(text)?;
        self.after_value();
        Ok(())
    }

    fn open(&mut self, container: Container, event: &'static str) -> HandlerResult {
        self.before_value(event)?;
        self.writer.write_all(match container {
            Container::Object => b"{",
            Container::Array => b"[",
        })?;
        self.stack.push(Level {
            container,
            count: 0,
        });
        Ok(())
    }

    fn close(&mut self, container: Container, event: &'static str) -> HandlerResult {
        if self.after_name {
            return Err(HandlerError::UnexpectedEvent {
                event,
                reason: "name without a value",
            });
        }
        let level = match self.stack.pop() {
            Some(level) if level.container == container => level,
            _ => {
                return Err(HandlerError::UnexpectedEvent {
                    event,
                    reason: "does not match the open structure",
                });
            }
        };
        if level.count > 0 {
            self.newline()?;
        }
        self.writer.write_all(match container {
            Container::Object => b"}",
            Container::Array => b"]",
        })?;
        self.after_value();
        Ok(())
    }

    fn quoted(&mut self, event: &'static str, s: &str) -> HandlerResult {
        self.before_value(event)?;
        serde_json::to_writer(&mut self.writer, s).map_err(io::Error::from)?;
        self.after_value();
        Ok(())
    }
}

impl<W: Write> ContentHandler for JsonPrinter<W> {
    fn begin_object(&mut self, _tag: SemanticTag) -> HandlerResult {
        self.open(Container::Object, "begin-object")
    }

    fn end_object(&mut self) -> HandlerResult {
        self.close(Container::Object, "end-object")
    }

    fn begin_array(&mut self, _tag: SemanticTag) -> HandlerResult {
        self.open(Container::Array, "begin-array")
    }

    fn end_array(&mut self) -> HandlerResult {
        self.close(Container::Array, "end-array")
    }

    fn name(&mut self, name: &str) -> HandlerResult {
        let Some(Level {
            container: Container::Object,
            count,
        }) = self.stack.last_mut()
        else {
            return Err(HandlerError::UnexpectedEvent {
                event: "name",
                reason: "names are only valid between object members",
            });
        };
        if self.after_name {
            return Err(HandlerError::UnexpectedEvent {
                event: "name",
                reason: "name without a value",
            });
        }
        let first = *count == 0;
        *count += 1;
        if !first {
            self.writer.write_all(b",")?;
        }
        self.newline()?;
        serde_json::to_writer(&mut self.writer, name).map_err(io::Error::from)?;
        let separator: &[u8] = if self.indented() { b": " } else { b":" };
        self.writer.write_all(separator)?;
        self.after_name = true;
        Ok(())
    }

    fn null_value(&mut self, _tag: SemanticTag) -> HandlerResult {
        self.scalar("null", b"null")
    }

    fn bool_value(&mut self, value: bool, _tag: SemanticTag) -> HandlerResult {
        let text: &[u8] = if value { b"true" } else { b"false" };
        self.scalar("bool", text)
    }

    fn int64_value(&mut self, value: i64, _tag: SemanticTag) -> HandlerResult {
        self.scalar("int64", value.to_string().as_bytes())
    }

    fn uint64_value(&mut self, value: u64, _tag: SemanticTag) -> HandlerResult {
        self.scalar("uint64", value.to_string().as_bytes())
    }

    fn double_value(&mut self, value: f64, _tag: SemanticTag) -> HandlerResult {
        if !value.is_finite() {
            if self.options.nan_to_null {
                return self.scalar("double", b"null");
            }
            return Err(HandlerError::Unsupported(format!(
                "{value} has no JSON representation"
            )));
        }
        let text = match self.options.float_precision {
            Some(digits) => format!("{value:.digits$}"),
            None => serde_json::to_string(&value).map_err(io::Error::from)?,
        };
        self.scalar("double", text.as_bytes())
    }

    fn string_value(&mut self, value: &str, _tag: SemanticTag) -> HandlerResult {
        self.quoted("string", value)
    }

    fn byte_string_value(&mut self, value: &[u8], _tag: SemanticTag) -> HandlerResult {
        let encoded = match self.options.byte_string_format {
            ByteStringFormat::Base64 => STANDARD.encode(value),
            ByteStringFormat::Base64Url => URL_SAFE_NO_PAD.encode(value),
        };
        self.quoted("byte-string", &encoded)
    }

    fn flush(&mut self) -> HandlerResult {
        self.writer.flush()?;
        Ok(())
    }
}
