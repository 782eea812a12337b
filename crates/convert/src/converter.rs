use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ConvertError, Result};

/// Encode/decode strategy for values of type `T`.
///
/// Implementations must be total over `T` on encode once registered; decode
/// may reject input with [`ConvertError::MalformedValue`].
pub trait Converter<T>: Send + Sync + 'static {
	/// Encodes `value` as a parameter string.
	fn encode(&self, value: &T) -> Result<String>;

	/// Decodes a parameter string into a `T`.
	fn decode(&self, text: &str) -> Result<T>;
}

/// Converter backed by [`Display`] and [`FromStr`].
pub struct FromStrConverter<T>(PhantomData<fn() -> T>);

impl<T> FromStrConverter<T> {
	pub const fn new() -> Self {
		Self(PhantomData)
	}
}

impl<T> Default for FromStrConverter<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for FromStrConverter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "FromStrConverter<{}>", std::any::type_name::<T>())
	}
}

impl<T> Converter<T> for FromStrConverter<T>
where
	T: FromStr + Display + 'static,
	T::Err: Display,
{
	fn encode(&self, value: &T) -> Result<String> {
		Ok(value.to_string())
	}

	fn decode(&self, text: &str) -> Result<T> {
		text.parse().map_err(|e| ConvertError::malformed::<T>(text, e))
	}
}

/// Converter that stores values as JSON text.
///
/// Intended for structured domain objects that have no natural scalar form.
pub struct JsonConverter<T>(PhantomData<fn() -> T>);

impl<T> JsonConverter<T> {
	pub const fn new() -> Self {
		Self(PhantomData)
	}
}

impl<T> Default for JsonConverter<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for JsonConverter<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "JsonConverter<{}>", std::any::type_name::<T>())
	}
}

impl<T> Converter<T> for JsonConverter<T>
where
	T: Serialize + DeserializeOwned + 'static,
{
	fn encode(&self, value: &T) -> Result<String> {
		serde_json::to_string(value).map_err(|e| ConvertError::unencodable::<T>(e))
	}

	fn decode(&self, text: &str) -> Result<T> {
		serde_json::from_str(text).map_err(|e| ConvertError::malformed::<T>(text, e))
	}
}

/// Converter built from a pair of closures.
pub struct FnConverter<T, E, D> {
	encode: E,
	decode: D,
	_marker: PhantomData<fn() -> T>,
}

impl<T, E, D> FnConverter<T, E, D>
where
	E: Fn(&T) -> Result<String> + Send + Sync + 'static,
	D: Fn(&str) -> Result<T> + Send + Sync + 'static,
{
	pub fn new(encode: E, decode: D) -> Self {
		Self {
			encode,
			decode,
			_marker: PhantomData,
		}
	}
}

impl<T, E, D> Converter<T> for FnConverter<T, E, D>
where
	T: 'static,
	E: Fn(&T) -> Result<String> + Send + Sync + 'static,
	D: Fn(&str) -> Result<T> + Send + Sync + 'static,
{
	fn encode(&self, value: &T) -> Result<String> {
		(self.encode)(value)
	}

	fn decode(&self, text: &str) -> Result<T> {
		(self.decode)(text)
	}
}
