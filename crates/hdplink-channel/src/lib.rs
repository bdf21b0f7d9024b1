//! Byte-stream data channel for HDP exchange sessions.
//!
//! A filesystem-path Unix domain socket stands in for the platform's HDP
//! data channel: the exchange engine above only needs a connected byte
//! stream whose read and write halves can live on separate threads.
//!
//! This is the lowest layer of hdplink. Everything else builds on the
//! [`DataChannel`] type provided here.

pub mod error;

#[cfg(unix)]
pub mod listener;
#[cfg(unix)]
pub mod stream;

pub use error::{ChannelError, Result};

#[cfg(unix)]
pub use listener::ChannelListener;
#[cfg(unix)]
pub use stream::DataChannel;
