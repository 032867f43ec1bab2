//! JSON text to handler events.
//!
//! `serde_json` does the tokenizing. Instead of building a
//! `serde_json::Value`, a [`DeserializeSeed`] forwards each token straight
//! into a [`ContentHandler`], so the JSON and BSON readers feed the same
//! handlers.
//!
//! Numbers map onto events as follows: a non-negative integer that fits
//! in `i64`, and any negative integer, becomes `int64_value`; larger
//! unsigned integers become `uint64_value`; everything else is
//! `double_value`.

use std::fmt;
use std::io;

use jdoc_types::{ContentHandler, HandlerResult, SemanticTag};
use log::{trace, warn};
use serde::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_json::de::Read;

use crate::config::DecodeOptions;
use crate::error::DecodeError;

const NONE: SemanticTag = SemanticTag::None;

/// Reads one JSON value and reports it to a handler.
///
/// Nesting is limited by [`DecodeOptions::max_depth`] and, independently,
/// by `serde_json`'s own recursion limit of 128 levels. Trailing
/// non-whitespace after the value is a syntax error.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonReader {
    options: DecodeOptions,
}

impl JsonReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: DecodeOptions) -> Self {
        Self { options }
    }

    /// Read a JSON document from text.
    ///
    /// # Errors
    ///
    /// - [`DecodeError::Json`] for syntax errors, with line and column.
    /// - [`DecodeError::DepthExceeded`] past the configured depth.
    /// - [`DecodeError::Handler`] if the handler rejects an event.
    pub fn read_str<H: ContentHandler + ?Sized>(
        &self,
        text: &str,
        handler: &mut H,
    ) -> Result<(), DecodeError> {
        let mut de = serde_json::Deserializer::from_str(text);
        self.drive(&mut de, handler)
    }

    /// Read a JSON document from a byte stream.
    ///
    /// # Errors
    ///
    /// Same as [`read_str`](Self::read_str); I/O failures surface as
    /// [`DecodeError::Json`] with the position where reading stopped.
    pub fn read_from<R: io::Read, H: ContentHandler + ?Sized>(
        &self,
        reader: R,
        handler: &mut H,
    ) -> Result<(), DecodeError> {
        let mut de = serde_json::Deserializer::from_reader(reader);
        self.drive(&mut de, handler)
    }

    fn drive<'de, R: Read<'de>, H: ContentHandler + ?Sized>(
        &self,
        de: &mut serde_json::Deserializer<R>,
        handler: &mut H,
    ) -> Result<(), DecodeError> {
        let mut handler = handler;
        let mut ctx = Context {
            handler: &mut handler,
            depth: 0,
            limit: self.options.max_depth,
            failure: None,
        };
        let result = Forward { ctx: &mut ctx }
            .deserialize(&mut *de)
            .and_then(|()| de.end());
        let result = match result {
            Ok(()) => ctx.handler.flush().map_err(DecodeError::from),
            Err(e) => Err(ctx.failure.take().unwrap_or_else(|| json_error(&e))),
        };
        if let Err(e) = &result {
            warn!("json decode aborted: {e}");
        }
        result
    }
}

/// Split a `serde_json` error into its message and position.
fn json_error(e: &serde_json::Error) -> DecodeError {
    let mut message = e.to_string();
    if e.line() > 0 {
        if let Some(at) = message.rfind(" at line ") {
            message.truncate(at);
        }
    }
    DecodeError::Json {
        message,
        line: e.line(),
        column: e.column(),
    }
}

/// State shared by every nested seed.
///
/// Handler and depth errors can't travel through serde's error type
/// intact, so the real error is parked in `failure` and a placeholder
/// message unwinds the deserializer.
struct Context<'h> {
    handler: &'h mut dyn ContentHandler,
    depth: usize,
    limit: usize,
    failure: Option<DecodeError>,
}

impl Context<'_> {
    fn emit<E: de::Error>(&mut self, result: HandlerResult) -> Result<(), E> {
        result.map_err(|e| self.fail(e.into()))
    }

    fn fail<E: de::Error>(&mut self, error: DecodeError) -> E {
        let message = error.to_string();
        self.failure = Some(error);
        E::custom(message)
    }

    fn enter<E: de::Error>(&mut self) -> Result<(), E> {
        let depth = self.depth + 1;
        if depth > self.limit {
            let limit = self.limit;
            return Err(self.fail(DecodeError::DepthExceeded { depth, limit }));
        }
        self.depth = depth;
        Ok(())
    }
}

struct Forward<'c, 'h> {
    ctx: &'c mut Context<'h>,
}

impl<'de> DeserializeSeed<'de> for Forward<'_, '_> {
    type Value = ();

    fn deserialize<D: de::Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Visitor<'de> for Forward<'_, '_> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON value")
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        let result = self.ctx.handler.null_value(NONE);
        self.ctx.emit(result)
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<(), E> {
        let result = self.ctx.handler.bool_value(v, NONE);
        self.ctx.emit(result)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<(), E> {
        let result = self.ctx.handler.int64_value(v, NONE);
        self.ctx.emit(result)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<(), E> {
        let result = match i64::try_from(v) {
            Ok(v) => self.ctx.handler.int64_value(v, NONE),
            Err(_) => self.ctx.handler.uint64_value(v, NONE),
        };
        self.ctx.emit(result)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<(), E> {
        let result = self.ctx.handler.double_value(v, NONE);
        self.ctx.emit(result)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<(), E> {
        let result = self.ctx.handler.string_value(v, NONE);
        self.ctx.emit(result)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        self.ctx.enter::<A::Error>()?;
        trace!("json array (depth {})", self.ctx.depth);
        let result = self.ctx.handler.begin_array(NONE);
        self.ctx.emit::<A::Error>(result)?;
        while seq
            .next_element_seed(Forward { ctx: &mut *self.ctx })?
            .is_some()
        {}
        let result = self.ctx.handler.end_array();
        self.ctx.emit::<A::Error>(result)?;
        self.ctx.depth -= 1;
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        self.ctx.enter::<A::Error>()?;
        trace!("json object (depth {})", self.ctx.depth);
        let result = self.ctx.handler.begin_object(NONE);
        self.ctx.emit::<A::Error>(result)?;
        while let Some(key) = map.next_key::<String>()? {
            let result = self.ctx.handler.name(&key);
            self.ctx.emit::<A::Error>(result)?;
            map.next_value_seed(Forward { ctx: &mut *self.ctx })?;
        }
        let result = self.ctx.handler.end_object();
        self.ctx.emit::<A::Error>(result)?;
        self.ctx.depth -= 1;
        Ok(())
    }
}
