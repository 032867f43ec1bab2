#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod builder;
pub mod error;
pub mod event;
pub mod handler;
pub mod state;
pub mod value;

pub use builder::ValueBuilder;
pub use error::HandlerError;
pub use event::{Event, SemanticTag};
pub use handler::{ContentHandler, EventBuffer, HandlerResult};
pub use state::ErrorState;
pub use value::{ByteString, Object, Value};
