//! Error types for converter lookup and conversion.

use std::fmt::Display;

use thiserror::Error;

/// Errors raised by converter lookup or by a converter itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
	/// Nothing was registered for the exact requested type.
	#[error("no converter registered for {type_name}")]
	ConverterNotFound {
		/// Name of the requested type.
		type_name: &'static str,
	},

	/// The input string is not a valid encoding of the target type.
	#[error("malformed {type_name} value {input:?}: {reason}")]
	MalformedValue {
		/// Name of the target type.
		type_name: &'static str,
		/// The rejected input.
		input: String,
		/// Why the converter rejected it.
		reason: String,
	},

	/// The value could not be represented as a string.
	#[error("cannot encode {type_name} value: {reason}")]
	Unencodable {
		/// Name of the source type.
		type_name: &'static str,
		/// Why encoding failed.
		reason: String,
	},
}

impl ConvertError {
	/// Builds a [`ConvertError::MalformedValue`] for target type `T`.
	pub fn malformed<T: ?Sized>(input: &str, reason: impl Display) -> Self {
		Self::MalformedValue {
			type_name: std::any::type_name::<T>(),
			input: input.to_string(),
			reason: reason.to_string(),
		}
	}

	/// Builds a [`ConvertError::Unencodable`] for source type `T`.
	pub fn unencodable<T: ?Sized>(reason: impl Display) -> Self {
		Self::Unencodable {
			type_name: std::any::type_name::<T>(),
			reason: reason.to_string(),
		}
	}
}

/// Result type for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
