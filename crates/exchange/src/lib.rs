//! Parameter exchange between a requester and a handler.
//!
//! A transport owns one [`CycleContext`] per request/response round trip.
//! The handler reads its arguments from the incoming slot through a
//! [`Porter`], and publishes results into the outgoing slot. Each publish
//! merges over what earlier publishers left there and hands the serialized
//! envelope back to the transport as a [`Completion`].

mod cycle;
mod error;
mod porter;
mod shared;


pub use cycle::{Completion, Cycle, CycleContext, CycleState, ResultStatus, Slot};
pub use error::{ExchangeError, Result};
pub use ferry_envelope::{Envelope, Params};
pub use porter::Porter;
pub use shared::SharedCycle;
