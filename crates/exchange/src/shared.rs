use std::sync::Arc;

use ferry_envelope::{Envelope, Params};
use parking_lot::Mutex;

use crate::{Completion, Cycle, CycleContext, CycleState, Porter, Result};

/// A [`Cycle`] shared by several publishers.
///
/// Each publish holds the lock across the whole read-merge-write-deliver
/// sequence, so concurrent contributions apply one at a time and the last
/// writer for a key wins deterministically.
#[derive(Debug, Clone, Default)]
pub struct SharedCycle {
	inner: Arc<Mutex<Cycle>>,
}

impl SharedCycle {
	pub fn new(cycle: Cycle) -> Self {
		Self {
			inner: Arc::new(Mutex::new(cycle)),
		}
	}

	pub fn read_incoming(&self, porter: &Porter) -> Result<Params> {
		porter.read_incoming(&*self.inner.lock())
	}

	pub fn read_typed<T: 'static>(&self, porter: &Porter, key: &str) -> Result<T> {
		porter.read_typed(&*self.inner.lock(), key)
	}

	pub fn publish<I, K, V>(&self, porter: &Porter, params: I) -> Result<Envelope>
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let mut cycle = self.inner.lock();
		porter.publish_result(&mut *cycle, params)
	}

	pub fn publish_typed<T: 'static>(&self, porter: &Porter, key: &str, value: &T) -> Result<Envelope> {
		let mut cycle = self.inner.lock();
		porter.publish_typed(&mut *cycle, key, value)
	}

	/// Snapshot of the current outgoing envelope.
	pub fn outgoing(&self) -> Option<Envelope> {
		self.inner.lock().outgoing().cloned()
	}

	pub fn state(&self) -> CycleState {
		self.inner.lock().state()
	}

	pub fn finish(&self) -> Result<Completion> {
		self.inner.lock().finish()
	}

	/// Runs `f` with exclusive access to the cycle.
	pub fn with<R>(&self, f: impl FnOnce(&mut Cycle) -> R) -> R {
		f(&mut self.inner.lock())
	}
}

impl From<Cycle> for SharedCycle {
	fn from(cycle: Cycle) -> Self {
		Self::new(cycle)
	}
}
