//! Error types for envelope parsing.

use thiserror::Error;

/// Errors raised while parsing the canonical text form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnvelopeError {
	/// A `%` not followed by two hex digits.
	#[error("malformed percent escape at byte {offset}")]
	MalformedEscape {
		/// Byte offset of the `%` in the input.
		offset: usize,
	},

	/// A raw `&` or `=` inside the address part.
	#[error("reserved character {ch:?} in address at byte {offset}")]
	ReservedInAddress {
		/// The offending character.
		ch: char,
		/// Byte offset in the input.
		offset: usize,
	},

	/// A component whose escapes decode to bytes that are not UTF-8.
	#[error("escaped bytes are not valid UTF-8 in component at byte {offset}")]
	InvalidUtf8 {
		/// Byte offset of the component's start in the input.
		offset: usize,
	},
}

/// Result type for envelope operations.
pub type Result<T> = std::result::Result<T, EnvelopeError>;
