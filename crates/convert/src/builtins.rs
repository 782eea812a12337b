//! Built-in converters for scalar types.

use crate::{ConverterRegistry, FromStrConverter};

macro_rules! register_from_str {
	($registry:expr; $($ty:ty),+ $(,)?) => {
		$( $registry.register::<$ty>(FromStrConverter::<$ty>::new()); )+
	};
}

/// Registers [`FromStrConverter`]s for `String`, `bool`, `char`, every
/// integer width and both float widths.
///
/// Domain types are not covered; register them explicitly, typically with
/// [`ConverterRegistry::register_json`].
pub fn register_builtins(registry: &ConverterRegistry) {
	register_from_str!(registry;
		String, bool, char,
		i8, i16, i32, i64, i128, isize,
		u8, u16, u32, u64, u128, usize,
		f32, f64,
	);
	tracing::debug!(domain = "converters", count = registry.len(), "builtin converters registered");
}
