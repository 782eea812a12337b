use std::sync::Arc;

use ferry_convert::ConverterRegistry;
use ferry_envelope::{Envelope, ParseMode, Params};

use crate::{Completion, CycleContext, CycleState, ExchangeError, Result, Slot};

/// Reads request parameters and publishes results for a cycle.
///
/// Typed conversions go through the registry the porter was built with;
/// there is no ambient global registry.
#[derive(Debug, Clone)]
pub struct Porter {
	registry: Arc<ConverterRegistry>,
	parse_mode: ParseMode,
}

impl Porter {
	pub fn new(registry: Arc<ConverterRegistry>) -> Self {
		Self {
			registry,
			parse_mode: ParseMode::Strict,
		}
	}

	/// Sets the mode used by [`Porter::parse_envelope`].
	pub fn with_parse_mode(mut self, parse_mode: ParseMode) -> Self {
		self.parse_mode = parse_mode;
		self
	}

	pub fn registry(&self) -> &Arc<ConverterRegistry> {
		&self.registry
	}

	pub fn parse_mode(&self) -> ParseMode {
		self.parse_mode
	}

	/// Returns the parameters of the incoming envelope.
	pub fn read_incoming<C>(&self, cx: &C) -> Result<Params>
	where
		C: CycleContext + ?Sized,
	{
		incoming(cx).map(Envelope::to_params)
	}

	/// Reads one incoming parameter and decodes it as `T`.
	pub fn read_typed<T, C>(&self, cx: &C, key: &str) -> Result<T>
	where
		T: 'static,
		C: CycleContext + ?Sized,
	{
		let raw = incoming(cx)?
			.get(key)
			.ok_or_else(|| ExchangeError::MissingParam { key: key.to_string() })?;
		self.decode(raw).inspect_err(|err| {
			tracing::warn!(domain = "exchange", key, error = %err, "incoming parameter rejected");
		})
	}

	/// Decodes `text` as `T` through the registry.
	pub fn decode<T: 'static>(&self, text: &str) -> Result<T> {
		Ok(self.registry.decode::<T>(text)?)
	}

	/// Encodes `value` through the registry.
	pub fn encode<T: 'static>(&self, value: &T) -> Result<String> {
		Ok(self.registry.encode(value)?)
	}

	/// Merges `params` into the cycle's outgoing envelope and hands the result
	/// to the transport.
	///
	/// Keys in `params` override earlier values; keys absent from `params` are
	/// kept. Returns the envelope now attached to the outgoing slot.
	///
	/// The slot is written before delivery. If `deliver` fails, the merged
	/// envelope stays attached and the error is returned; a later publish or
	/// finish still sees it.
	pub fn publish_result<C, I, K, V>(&self, cx: &mut C, params: I) -> Result<Envelope>
	where
		C: CycleContext + ?Sized,
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		let state = cx.state();
		if state == CycleState::Complete {
			tracing::warn!(domain = "exchange", %state, "publish rejected");
			return Err(ExchangeError::InvalidState { state });
		}

		let merged = match cx.outgoing() {
			Some(previous) => previous.merged(params),
			None => Envelope::empty().merged(params),
		};
		let payload = merged.to_string();

		cx.set_outgoing(merged.clone())?;
		cx.deliver(Completion::ok(payload))?;

		tracing::debug!(
			domain = "exchange",
			slot = %Slot::ResponseData,
			keys = merged.len(),
			"result published",
		);
		Ok(merged)
	}

	/// Encodes `value` and publishes it under `key`.
	pub fn publish_typed<T, C>(&self, cx: &mut C, key: &str, value: &T) -> Result<Envelope>
	where
		T: 'static,
		C: CycleContext + ?Sized,
	{
		let encoded = self.encode(value)?;
		self.publish_result(cx, [(key, encoded)])
	}

	/// Parses relayed text with the configured [`ParseMode`].
	pub fn parse_envelope(&self, text: &str) -> Result<Envelope> {
		Ok(Envelope::parse_with(text, self.parse_mode)?)
	}
}

fn incoming<C>(cx: &C) -> Result<&Envelope>
where
	C: CycleContext + ?Sized,
{
	cx.incoming().ok_or(ExchangeError::MissingEnvelope {
		slot: Slot::RequestData,
	})
}
