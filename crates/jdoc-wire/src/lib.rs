#![warn(clippy::pedantic)]

pub mod element;
pub mod endian;
pub mod error;
pub mod source;

pub use element::ElementType;
pub use endian::FixedWidth;
pub use error::WireError;
pub use source::{IoSource, SliceSource, Source};
