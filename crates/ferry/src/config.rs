//! TOML configuration for bootstrapping a [`crate::Ferry`].
//!
//! ```toml
//! [converters]
//! builtins = true
//!
//! [envelope]
//! parse_mode = "strict"
//! ```
//!
//! Every field has a default, so an empty document is valid.

use ferry_envelope::ParseMode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// The document is not valid TOML or does not match the schema.
	#[error("invalid ferry configuration: {0}")]
	Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
	pub converters: ConverterConfig,
	pub envelope: EnvelopeConfig,
}

impl Config {
	pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(text)?)
	}
}

/// Converter registry bootstrap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConverterConfig {
	/// Register scalar converters (`String`, `bool`, integers, floats).
	pub builtins: bool,
}

impl Default for ConverterConfig {
	fn default() -> Self {
		Self { builtins: true }
	}
}

/// Envelope text handling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvelopeConfig {
	pub parse_mode: ParseMode,
}
