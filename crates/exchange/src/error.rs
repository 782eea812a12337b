//! Error types for the exchange protocol.

use ferry_convert::ConvertError;
use ferry_envelope::EnvelopeError;
use thiserror::Error;

use crate::{CycleState, Slot};

/// Errors surfaced by [`crate::Porter`] and cycle contexts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExchangeError {
	/// The cycle carries no envelope in the slot the operation needs.
	#[error("no envelope attached to the {slot} slot")]
	MissingEnvelope {
		/// The empty slot.
		slot: Slot,
	},

	/// The incoming envelope lacks a requested parameter.
	#[error("incoming envelope has no parameter {key:?}")]
	MissingParam {
		/// The absent key.
		key: String,
	},

	/// The cycle no longer accepts results.
	#[error("cycle is {state}; no further results accepted")]
	InvalidState {
		/// State the cycle was in when the call arrived.
		state: CycleState,
	},

	#[error(transparent)]
	Convert(#[from] ConvertError),

	#[error(transparent)]
	Envelope(#[from] EnvelopeError),
}

/// Result type for exchange operations.
pub type Result<T> = std::result::Result<T, ExchangeError>;
