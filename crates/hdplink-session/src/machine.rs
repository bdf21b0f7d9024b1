//! Exchange state machine.
//!
//! Pure transition logic, no I/O and no clocks: the reader task performs
//! the sends and sleeps the settle delay, the machine only decides what to
//! send and tracks where the exchange stands.

use hdplink_frame::{is_measurement_report, FrameKind, Response};
use tracing::debug;

/// Where the exchange stands, named by the last response issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExchangeState {
    #[default]
    Idle,
    AssociationResponded,
    ConfigurationRequested,
    DataAcknowledged,
    Released,
}

impl ExchangeState {
    /// Selector of the response that entered this state (0 while idle).
    pub fn selector(self) -> u8 {
        match self {
            ExchangeState::Idle => 0,
            ExchangeState::AssociationResponded => 1,
            ExchangeState::ConfigurationRequested => 2,
            ExchangeState::DataAcknowledged => 3,
            ExchangeState::Released => 4,
        }
    }
}

/// What the reader should do with one inbound frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// Nothing to send.
    None,
    /// Send one canned response.
    Send(Response),
    /// Send the association grant, then let the device settle before
    /// fetching the follow-up with [`ExchangeMachine::association_settled`].
    SendThenSettle(Response),
}

/// Drives the four-step canned exchange for one channel.
#[derive(Debug, Default)]
pub struct ExchangeMachine {
    state: ExchangeState,
}

impl ExchangeMachine {
    pub fn new() -> Self {
        Self {
            state: ExchangeState::Idle,
        }
    }

    /// Current exchange state.
    pub fn state(&self) -> ExchangeState {
        self.state
    }

    /// Decide the reaction to one classified inbound frame.
    ///
    /// A fresh association request restarts the exchange from the top; a
    /// release request is answered from any state and never regresses the
    /// exchange once released.
    pub fn on_frame(&mut self, kind: FrameKind, frame: &[u8]) -> Reaction {
        match kind {
            FrameKind::AssociationRequest => {
                self.transition(ExchangeState::AssociationResponded);
                Reaction::SendThenSettle(Response::Association)
            }
            FrameKind::DataTransfer if is_measurement_report(frame) => {
                self.transition(ExchangeState::DataAcknowledged);
                Reaction::Send(Response::Data)
            }
            // Configuration report: attributes only, nothing to answer.
            FrameKind::DataTransfer => Reaction::None,
            FrameKind::ReleaseRequest => {
                self.transition(ExchangeState::Released);
                Reaction::Send(Response::Release)
            }
            FrameKind::Empty | FrameKind::Unknown => Reaction::None,
        }
    }

    /// Advance past the association settle gap.
    ///
    /// Call once after the grant from a [`Reaction::SendThenSettle`] is on
    /// the wire and the delay has elapsed; yields the configuration query.
    pub fn association_settled(&mut self) -> Response {
        self.transition(ExchangeState::ConfigurationRequested);
        Response::Configuration
    }

    fn transition(&mut self, next: ExchangeState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "exchange transition");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdplink_frame::agent;

    #[test]
    fn test_canonical_exchange_order() {
        let mut machine = ExchangeMachine::new();
        assert_eq!(machine.state(), ExchangeState::Idle);

        let reaction = machine.on_frame(
            FrameKind::AssociationRequest,
            &agent::ASSOCIATION_REQUEST,
        );
        assert_eq!(reaction, Reaction::SendThenSettle(Response::Association));
        assert_eq!(machine.state(), ExchangeState::AssociationResponded);

        assert_eq!(machine.association_settled(), Response::Configuration);
        assert_eq!(machine.state(), ExchangeState::ConfigurationRequested);

        let report = agent::measurement_report(120, 80, [0x00, 0x01]);
        let reaction = machine.on_frame(FrameKind::DataTransfer, &report);
        assert_eq!(reaction, Reaction::Send(Response::Data));
        assert_eq!(machine.state(), ExchangeState::DataAcknowledged);

        let reaction = machine.on_frame(FrameKind::ReleaseRequest, &agent::RELEASE_REQUEST);
        assert_eq!(reaction, Reaction::Send(Response::Release));
        assert_eq!(machine.state(), ExchangeState::Released);
    }

    #[test]
    fn test_configuration_report_is_a_no_op() {
        let mut machine = ExchangeMachine::new();
        machine.on_frame(FrameKind::AssociationRequest, &agent::ASSOCIATION_REQUEST);
        machine.association_settled();

        let report = agent::configuration_report();
        let reaction = machine.on_frame(FrameKind::DataTransfer, &report);
        assert_eq!(reaction, Reaction::None);
        assert_eq!(machine.state(), ExchangeState::ConfigurationRequested);
    }

    #[test]
    fn test_short_data_frame_is_a_no_op() {
        let mut machine = ExchangeMachine::new();
        let reaction = machine.on_frame(FrameKind::DataTransfer, &[0xE7, 0x00]);
        assert_eq!(reaction, Reaction::None);
        assert_eq!(machine.state(), ExchangeState::Idle);
    }

    #[test]
    fn test_empty_and_unknown_change_nothing() {
        let mut machine = ExchangeMachine::new();
        machine.on_frame(FrameKind::AssociationRequest, &agent::ASSOCIATION_REQUEST);

        assert_eq!(machine.on_frame(FrameKind::Empty, &[0u8; 200]), Reaction::None);
        assert_eq!(machine.on_frame(FrameKind::Unknown, &agent::ABORT), Reaction::None);
        assert_eq!(machine.state(), ExchangeState::AssociationResponded);
    }

    #[test]
    fn test_release_never_regresses() {
        let mut machine = ExchangeMachine::new();
        machine.on_frame(FrameKind::ReleaseRequest, &agent::RELEASE_REQUEST);
        assert_eq!(machine.state(), ExchangeState::Released);

        // A duplicate request is still answered, state stays put.
        let reaction = machine.on_frame(FrameKind::ReleaseRequest, &agent::RELEASE_REQUEST);
        assert_eq!(reaction, Reaction::Send(Response::Release));
        assert_eq!(machine.state(), ExchangeState::Released);
    }

    #[test]
    fn test_new_association_restarts_exchange() {
        let mut machine = ExchangeMachine::new();
        machine.on_frame(FrameKind::ReleaseRequest, &agent::RELEASE_REQUEST);

        let reaction = machine.on_frame(
            FrameKind::AssociationRequest,
            &agent::ASSOCIATION_REQUEST,
        );
        assert_eq!(reaction, Reaction::SendThenSettle(Response::Association));
        assert_eq!(machine.state(), ExchangeState::AssociationResponded);
    }
}
