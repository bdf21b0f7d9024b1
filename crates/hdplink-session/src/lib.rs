//! Exchange session runtime for HDP manager channels.
//!
//! Ties the pure frame layer to real channels: a state machine decides the
//! canned response to each inbound APDU, a reader thread drives it, and a
//! writer thread serializes responses onto the wire. The embedding host
//! observes everything through the [`EventSink`] capability.

pub mod error;
pub mod events;
pub mod machine;
pub mod manager;
pub mod session;

mod reader;
mod writer;

pub use error::{Result, SessionError};
pub use events::{EventSink, Outcome, Status};
pub use machine::{ExchangeMachine, ExchangeState, Reaction};
pub use manager::Manager;
pub use session::{ExchangeSession, SessionConfig, ASSOCIATION_SETTLE_DELAY};
