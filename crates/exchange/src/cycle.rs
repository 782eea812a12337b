use std::fmt;

use ferry_envelope::Envelope;

use crate::{ExchangeError, Result, SharedCycle};

/// Well-known attachment points on a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
	/// Envelope supplied by the requester.
	RequestData,
	/// Envelope accumulated by the handler's publishers.
	ResponseData,
}

impl Slot {
	/// Wire name of the slot.
	pub const fn name(self) -> &'static str {
		match self {
			Slot::RequestData => "ferry.request_data",
			Slot::ResponseData => "ferry.response_data",
		}
	}
}

impl fmt::Display for Slot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Progress of a single request/response cycle.
///
/// Transitions only move forward: `New` to `Partial` on the first published
/// result, and either of them to `Complete` once the transport has taken the
/// final completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CycleState {
	#[default]
	New,
	Partial,
	Complete,
}

impl fmt::Display for CycleState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			CycleState::New => "new",
			CycleState::Partial => "partial",
			CycleState::Complete => "complete",
		})
	}
}

/// Outcome status relayed to the requester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultStatus {
	Ok,
	/// No result was ever published for the cycle.
	Canceled,
}

impl fmt::Display for ResultStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ResultStatus::Ok => "ok",
			ResultStatus::Canceled => "canceled",
		})
	}
}

/// Status plus serialized outgoing envelope, handed to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
	pub status: ResultStatus,
	pub payload: Option<String>,
}

impl Completion {
	pub fn ok(payload: impl Into<String>) -> Self {
		Self {
			status: ResultStatus::Ok,
			payload: Some(payload.into()),
		}
	}

	pub fn canceled() -> Self {
		Self {
			status: ResultStatus::Canceled,
			payload: None,
		}
	}

	pub fn is_ok(&self) -> bool {
		self.status == ResultStatus::Ok
	}

	pub fn payload(&self) -> Option<&str> {
		self.payload.as_deref()
	}
}

/// Transport-owned view of one cycle, as seen by the exchange core.
pub trait CycleContext {
	/// Envelope in the [`Slot::RequestData`] slot.
	fn incoming(&self) -> Option<&Envelope>;

	/// Envelope in the [`Slot::ResponseData`] slot.
	fn outgoing(&self) -> Option<&Envelope>;

	/// Replaces the [`Slot::ResponseData`] envelope.
	fn set_outgoing(&mut self, envelope: Envelope) -> Result<()>;

	/// Hands a completion to the transport for relay to the requester.
	fn deliver(&mut self, completion: Completion) -> Result<()>;

	fn state(&self) -> CycleState;

	fn slot(&self, slot: Slot) -> Option<&Envelope> {
		match slot {
			Slot::RequestData => self.incoming(),
			Slot::ResponseData => self.outgoing(),
		}
	}
}

/// In-memory cycle that tracks its own state.
///
/// Stands in for a transport in tests and single-process setups. The latest
/// delivered completion is held until [`Cycle::finish`] hands it over.
#[derive(Debug, Clone, Default)]
pub struct Cycle {
	incoming: Option<Envelope>,
	outgoing: Option<Envelope>,
	pending: Option<Completion>,
	state: CycleState,
}

impl Cycle {
	/// Starts a cycle carrying `incoming` as its request data.
	pub fn new(incoming: Envelope) -> Self {
		Self {
			incoming: Some(incoming),
			..Self::default()
		}
	}

	/// Starts a cycle with no request data attached.
	pub fn detached() -> Self {
		Self::default()
	}

	/// Latest completion delivered and not yet taken by [`Cycle::finish`].
	pub fn pending(&self) -> Option<&Completion> {
		self.pending.as_ref()
	}

	/// Completes the cycle and returns what the transport relays.
	///
	/// A cycle that never received a result finishes as
	/// [`ResultStatus::Canceled`].
	pub fn finish(&mut self) -> Result<Completion> {
		self.ensure_open()?;
		self.state = CycleState::Complete;
		let completion = self.pending.take().unwrap_or_else(Completion::canceled);
		tracing::debug!(domain = "exchange", status = %completion.status, "cycle finished");
		Ok(completion)
	}

	/// Wraps the cycle for serialized access from several publishers.
	pub fn into_shared(self) -> SharedCycle {
		SharedCycle::new(self)
	}

	fn ensure_open(&self) -> Result<()> {
		match self.state {
			CycleState::Complete => Err(ExchangeError::InvalidState { state: self.state }),
			_ => Ok(()),
		}
	}
}

impl CycleContext for Cycle {
	fn incoming(&self) -> Option<&Envelope> {
		self.incoming.as_ref()
	}

	fn outgoing(&self) -> Option<&Envelope> {
		self.outgoing.as_ref()
	}

	fn set_outgoing(&mut self, envelope: Envelope) -> Result<()> {
		self.ensure_open()?;
		self.outgoing = Some(envelope);
		self.state = CycleState::Partial;
		Ok(())
	}

	fn deliver(&mut self, completion: Completion) -> Result<()> {
		self.ensure_open()?;
		self.pending = Some(completion);
		Ok(())
	}

	fn state(&self) -> CycleState {
		self.state
	}
}
