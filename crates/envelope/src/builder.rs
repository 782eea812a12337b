use crate::{Envelope, Params};

/// Mutable staging area for an [`Envelope`].
///
/// Writes to an existing key replace its value in place. [`Builder::build`]
/// snapshots the current state, so a builder can keep changing after it has
/// produced envelopes without affecting them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Builder {
	address: Option<String>,
	params: Params,
}

impl Builder {
	/// Creates an empty builder.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the route address.
	pub fn address(&mut self, address: impl Into<String>) -> &mut Self {
		self.address = Some(address.into());
		self
	}

	/// Drops the route address.
	pub fn clear_address(&mut self) -> &mut Self {
		self.address = None;
		self
	}

	/// Inserts or overwrites one entry. The last write for a key wins.
	pub fn add_param(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// Owned-chain form of [`Builder::add_param`].
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.add_param(key, value);
		self
	}

	/// Adds every entry from `params`, in iteration order.
	pub fn extend_params<I, K, V>(&mut self, params: I) -> &mut Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		for (key, value) in params {
			self.add_param(key, value);
		}
		self
	}

	/// Removes a key, returning its value.
	///
	/// Absence is expressed by omitting the key; there is no null value.
	pub fn remove_param(&mut self, key: &str) -> Option<String> {
		self.params.shift_remove(key)
	}

	pub fn get(&self, key: &str) -> Option<&str> {
		self.params.get(key).map(String::as_str)
	}

	pub fn len(&self) -> usize {
		self.params.len()
	}

	pub fn is_empty(&self) -> bool {
		self.params.is_empty()
	}

	/// Produces an immutable snapshot of the current state.
	pub fn build(&self) -> Envelope {
		Envelope::from_parts(self.address.clone(), self.params.clone())
	}
}

impl From<&Envelope> for Builder {
	fn from(envelope: &Envelope) -> Self {
		Self {
			address: envelope.address.clone(),
			params: envelope.to_params(),
		}
	}
}
