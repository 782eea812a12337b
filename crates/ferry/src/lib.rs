//! Typed parameter exchange between a requester and a handler.
//!
//! This crate ties the pieces together:
//!
//! * [`envelope`]: immutable parameter envelopes and their text form
//! * [`convert`]: the type-keyed converter registry
//! * [`exchange`]: cycles, slots and the [`Porter`]
//!
//! [`Ferry`] bootstraps a registry and porter from a [`Config`].

pub mod config;


use std::sync::Arc;

pub use config::{Config, ConfigError, ConverterConfig, EnvelopeConfig};
pub use ferry_convert as convert;
pub use ferry_convert::{ConvertError, Converter, ConverterRegistry, TypeKey};
pub use ferry_envelope as envelope;
pub use ferry_envelope::{Builder, Envelope, EnvelopeError, ParseMode, Params};
pub use ferry_exchange as exchange;
pub use ferry_exchange::{
	Completion, Cycle, CycleContext, CycleState, ExchangeError, Porter, ResultStatus, SharedCycle,
	Slot,
};

/// Configured registry plus the porter that uses it.
#[derive(Debug, Clone)]
pub struct Ferry {
	registry: Arc<ConverterRegistry>,
	porter: Porter,
}

impl Ferry {
	pub fn new(config: &Config) -> Self {
		let registry = Arc::new(ConverterRegistry::new());
		if config.converters.builtins {
			ferry_convert::register_builtins(&registry);
		}
		let porter = Porter::new(Arc::clone(&registry)).with_parse_mode(config.envelope.parse_mode);

		tracing::debug!(
			domain = "ferry",
			converters = registry.len(),
			parse_mode = ?config.envelope.parse_mode,
			"ferry initialized",
		);
		Self { registry, porter }
	}

	/// Parses `text` as a TOML [`Config`] and bootstraps from it.
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Ok(Self::new(&Config::from_toml_str(text)?))
	}

	/// Registry shared with the porter; registrations here are visible to it.
	pub fn registry(&self) -> &Arc<ConverterRegistry> {
		&self.registry
	}

	pub fn porter(&self) -> &Porter {
		&self.porter
	}
}

impl Default for Ferry {
	fn default() -> Self {
		Self::new(&Config::default())
	}
}
