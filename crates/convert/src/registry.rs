use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use rustc_hash::FxHashMap as HashMap;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{ConvertError, Converter, JsonConverter, Result, TypeKey};

/// Type-erased `Arc<dyn Converter<T>>`, recovered by downcasting with the
/// same `T` it was keyed under.
type ErasedConverter = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
struct Entry {
	key: TypeKey,
	converter: ErasedConverter,
}

#[derive(Clone, Default)]
struct RegistrySnapshot {
	by_type: HashMap<TypeId, Entry>,
}

/// Report of a registration that displaced an earlier converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Replaced {
	pub key: TypeKey,
}

/// Process-wide table from [`TypeKey`] to converter.
///
/// Reads load an immutable snapshot without locking. Registration copies the
/// snapshot, inserts, and publishes it with compare-and-swap, so readers never
/// see a half-updated table and concurrent writers are serialized.
pub struct ConverterRegistry {
	snap: ArcSwap<RegistrySnapshot>,
}

impl Default for ConverterRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl fmt::Debug for ConverterRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ConverterRegistry")
			.field("types", &self.type_names())
			.finish()
	}
}

impl ConverterRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self {
			snap: ArcSwap::from_pointee(RegistrySnapshot::default()),
		}
	}

	/// Creates a registry pre-populated by [`crate::register_builtins`].
	pub fn with_builtins() -> Self {
		let registry = Self::new();
		crate::register_builtins(&registry);
		registry
	}

	/// Registers `converter` for `T`. Last registration wins.
	pub fn register<T: 'static>(&self, converter: impl Converter<T>) -> Option<Replaced> {
		self.register_arc::<T>(Arc::new(converter))
	}

	/// Registers a [`JsonConverter`] for `T`.
	pub fn register_json<T>(&self) -> Option<Replaced>
	where
		T: Serialize + DeserializeOwned + 'static,
	{
		self.register::<T>(JsonConverter::<T>::new())
	}

	/// Registers an already shared converter for `T`.
	pub fn register_arc<T: 'static>(&self, converter: Arc<dyn Converter<T>>) -> Option<Replaced> {
		let key = TypeKey::of::<T>();
		let entry = Entry {
			key,
			converter: Arc::new(converter),
		};

		loop {
			let cur = self.snap.load_full();
			let mut next = (*cur).clone();
			let previous = next.by_type.insert(key.id(), entry.clone());

			let prev = self.snap.compare_and_swap(&cur, Arc::new(next));
			if Arc::ptr_eq(&prev, &cur) {
				let replaced = previous.map(|e| Replaced { key: e.key });
				if replaced.is_some() {
					tracing::warn!(
						domain = "converters",
						type_name = key.name(),
						"converter replaced by later registration",
					);
				} else {
					tracing::debug!(domain = "converters", type_name = key.name(), "converter registered");
				}
				return replaced;
			}
		}
	}

	/// Returns the converter registered for exactly `T`.
	pub fn find<T: 'static>(&self) -> Result<Arc<dyn Converter<T>>> {
		let key = TypeKey::of::<T>();
		let snap = self.snap.load();
		snap.by_type
			.get(&key.id())
			.and_then(|entry| entry.converter.downcast_ref::<Arc<dyn Converter<T>>>())
			.cloned()
			.ok_or(ConvertError::ConverterNotFound {
				type_name: key.name(),
			})
	}

	/// Encodes `value` with the converter registered for `T`.
	pub fn encode<T: 'static>(&self, value: &T) -> Result<String> {
		self.find::<T>()?.encode(value)
	}

	/// Decodes `text` with the converter registered for `T`.
	pub fn decode<T: 'static>(&self, text: &str) -> Result<T> {
		self.find::<T>()?.decode(text)
	}

	pub fn contains<T: 'static>(&self) -> bool {
		self.snap.load().by_type.contains_key(&TypeId::of::<T>())
	}

	pub fn len(&self) -> usize {
		self.snap.load().by_type.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Names of all registered types, sorted.
	pub fn type_names(&self) -> Vec<&'static str> {
		let snap = self.snap.load();
		let mut names: Vec<_> = snap.by_type.values().map(|e| e.key.name()).collect();
		names.sort_unstable();
		names
	}
}
