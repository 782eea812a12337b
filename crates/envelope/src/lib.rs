//! Immutable string-keyed parameter envelopes.
//!
//! An [`Envelope`] carries the parameters of one side of a request/response
//! cycle: the requester's arguments on the way in, the handler's results on
//! the way out. Envelopes never change after construction; every modified
//! copy goes through a [`Builder`].
//!
//! The canonical text form (`[address?]k1=v1&k2=v2`) is the only wire surface
//! and round-trips exactly through [`Envelope::parse`].

mod builder;
mod error;
mod text;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use indexmap::IndexMap;

pub use builder::Builder;
pub use error::{EnvelopeError, Result};
pub use text::ParseMode;

/// Parameter mapping held by an envelope.
///
/// Insertion order is kept for a stable text form; equality ignores it.
pub type Params = IndexMap<String, String>;

/// Immutable, optionally addressed parameter container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
	address: Option<String>,
	params: Arc<Params>,
}

impl Envelope {
	/// Returns an envelope with no address and no parameters.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Starts a fresh builder.
	pub fn builder() -> Builder {
		Builder::new()
	}

	/// Starts a builder pre-populated with this envelope's address and entries.
	pub fn to_builder(&self) -> Builder {
		Builder::from(self)
	}

	/// Route address, if the envelope was built with one.
	pub fn address(&self) -> Option<&str> {
		self.address.as_deref()
	}

	/// Read-only view of the parameters.
	pub fn params(&self) -> &Params {
		&self.params
	}

	/// Owned copy of the parameters.
	pub fn to_params(&self) -> Params {
		(*self.params).clone()
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.params.get(key).map(String::as_str)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		self.params.contains_key(key)
	}

	pub fn len(&self) -> usize {
		self.params.len()
	}

	pub fn is_empty(&self) -> bool {
		self.params.is_empty()
	}

	/// Iterates entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.params.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Returns a new envelope with `params` laid over this one.
	///
	/// Keys present in `params` take the new value; every other key and the
	/// address are carried over unchanged.
	pub fn merged<I, K, V>(&self, params: I) -> Envelope
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let mut builder = self.to_builder();
		builder.extend_params(params);
		builder.build()
	}

	/// Parses the canonical text form strictly.
	pub fn parse(text: &str) -> Result<Envelope> {
		text::parse(text, ParseMode::Strict)
	}

	/// Parses the canonical text form with an explicit [`ParseMode`].
	pub fn parse_with(text: &str, mode: ParseMode) -> Result<Envelope> {
		text::parse(text, mode)
	}

	pub(crate) fn from_parts(address: Option<String>, params: Params) -> Self {
		Self {
			address,
			params: Arc::new(params),
		}
	}
}

impl<'a> IntoIterator for &'a Envelope {
	type Item = (&'a String, &'a String);
	type IntoIter = indexmap::map::Iter<'a, String, String>;

	fn into_iter(self) -> Self::IntoIter {
		self.params.iter()
	}
}
