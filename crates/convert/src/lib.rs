//! Converter registry: per-type strategies for turning values into parameter
//! strings and back.
//!
//! Lookup is keyed by exact type identity through [`TypeKey`]. A converter
//! registered for one type never serves another, and a missing registration
//! is always an error rather than a fallback.

pub mod builtins;
mod converter;
mod error;
mod key;
mod registry;


pub use builtins::register_builtins;
pub use converter::{Converter, FnConverter, FromStrConverter, JsonConverter};
pub use error::{ConvertError, Result};
pub use key::TypeKey;
pub use registry::{ConverterRegistry, Replaced};
