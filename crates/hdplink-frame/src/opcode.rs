//! APDU opcodes of the optimized exchange protocol.
//!
//! Every APDU starts with a one-byte opcode, and the manager classifies
//! inbound traffic by that byte alone. Only three opcodes drive the
//! exchange; everything else is ignored.

/// Association request (device to manager).
pub const ASSOCIATION_REQUEST: u8 = 0xE2;

/// Association response (manager to device).
pub const ASSOCIATION_RESPONSE: u8 = 0xE3;

/// Release request.
pub const RELEASE_REQUEST: u8 = 0xE4;

/// Release response.
pub const RELEASE_RESPONSE: u8 = 0xE5;

/// Association abort.
pub const ABORT: u8 = 0xE6;

/// Data APDU (measurement reports, configuration reports, acknowledgements).
pub const DATA: u8 = 0xE7;

/// Classification of an inbound frame by its first byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// The device asks to associate (`0xE2`).
    AssociationRequest,
    /// A data APDU: measurement or configuration report (`0xE7`).
    DataTransfer,
    /// The device asks to release the association (`0xE4`).
    ReleaseRequest,
    /// All-zero read; nothing meaningful arrived.
    Empty,
    /// Any opcode the exchange does not react to (abort included).
    Unknown,
}

impl FrameKind {
    /// Short name for logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            FrameKind::AssociationRequest => "association-request",
            FrameKind::DataTransfer => "data",
            FrameKind::ReleaseRequest => "release-request",
            FrameKind::Empty => "empty",
            FrameKind::Unknown => "unknown",
        }
    }
}

/// Classify a frame by its first byte. Total over all inputs; an empty
/// slice classifies as [`FrameKind::Empty`].
pub fn classify(frame: &[u8]) -> FrameKind {
    match frame.first() {
        Some(&ASSOCIATION_REQUEST) => FrameKind::AssociationRequest,
        Some(&DATA) => FrameKind::DataTransfer,
        Some(&RELEASE_REQUEST) => FrameKind::ReleaseRequest,
        None | Some(0x00) => FrameKind::Empty,
        Some(_) => FrameKind::Unknown,
    }
}
