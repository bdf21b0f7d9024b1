//! Host-facing events.
//!
//! The embedding host sees the exchange through the narrow [`EventSink`]
//! capability: channel lifecycle callbacks, decoded measurements, and
//! numeric status events. Sessions invoke the sink from their own threads.

use hdplink_frame::Measurement;

/// Outcome attached to lifecycle status events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ok,
    Fail,
}

impl Outcome {
    /// Numeric result value of the host protocol.
    pub fn code(self) -> i32 {
        match self {
            Outcome::Ok => 0,
            Outcome::Fail => -1,
        }
    }
}

/// Lifecycle and data-path status events, carrying the host protocol's
/// stable numeric codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The manager bound its listening endpoint.
    AppRegistered(Outcome),
    /// The manager released its listening endpoint.
    AppUnregistered(Outcome),
    /// A data channel came up.
    ChannelCreated(Outcome),
    /// A data channel was torn down.
    ChannelDestroyed(Outcome),
    /// One read completed on a channel.
    DataReceived,
    /// A channel's read loop finished.
    ReadDone,
}

impl Status {
    /// Stable numeric code of the host protocol.
    pub fn code(self) -> u16 {
        match self {
            Status::AppRegistered(_) => 100,
            Status::AppUnregistered(_) => 101,
            Status::ChannelCreated(_) => 102,
            Status::ChannelDestroyed(_) => 103,
            Status::DataReceived => 104,
            Status::ReadDone => 105,
        }
    }

    /// Short name for logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Status::AppRegistered(_) => "app-registered",
            Status::AppUnregistered(_) => "app-unregistered",
            Status::ChannelCreated(_) => "channel-created",
            Status::ChannelDestroyed(_) => "channel-destroyed",
            Status::DataReceived => "data-received",
            Status::ReadDone => "read-done",
        }
    }

    /// The outcome, for events that carry one.
    pub fn outcome(self) -> Option<Outcome> {
        match self {
            Status::AppRegistered(outcome)
            | Status::AppUnregistered(outcome)
            | Status::ChannelCreated(outcome)
            | Status::ChannelDestroyed(outcome) => Some(outcome),
            Status::DataReceived | Status::ReadDone => None,
        }
    }
}

/// Capabilities a host hands to the exchange engine.
///
/// The channel callbacks default to no-ops so simple hosts implement only
/// what they consume. Implementations must tolerate delivery from session
/// threads.
pub trait EventSink: Send + Sync {
    /// A channel was attached and its session started.
    fn on_channel_opened(&self, _channel_id: u32) {}

    /// A channel's session finished and was torn down.
    fn on_channel_closed(&self, _channel_id: u32) {}

    /// A decoded blood-pressure reading.
    fn on_measurement(&self, measurement: &Measurement);

    /// A lifecycle or data-path status event.
    fn on_status(&self, status: Status);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_are_stable() {
        assert_eq!(Status::AppRegistered(Outcome::Ok).code(), 100);
        assert_eq!(Status::AppUnregistered(Outcome::Ok).code(), 101);
        assert_eq!(Status::ChannelCreated(Outcome::Fail).code(), 102);
        assert_eq!(Status::ChannelDestroyed(Outcome::Ok).code(), 103);
        assert_eq!(Status::DataReceived.code(), 104);
        assert_eq!(Status::ReadDone.code(), 105);
    }

    #[test]
    fn test_outcome_codes() {
        assert_eq!(Outcome::Ok.code(), 0);
        assert_eq!(Outcome::Fail.code(), -1);
    }

    #[test]
    fn test_outcome_presence() {
        assert_eq!(
            Status::ChannelCreated(Outcome::Fail).outcome(),
            Some(Outcome::Fail)
        );
        assert_eq!(Status::DataReceived.outcome(), None);
        assert_eq!(Status::ReadDone.outcome(), None);
    }
}
