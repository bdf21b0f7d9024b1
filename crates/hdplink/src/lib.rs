//! Manager-side engine for Bluetooth HDP blood pressure cuffs.
//!
//! hdplink answers the IEEE 11073-20601 optimized exchange a cuff opens over
//! an HDP data channel: it grants the association, queries the device
//! configuration, acknowledges measurement reports, and confirms release,
//! handing decoded readings to the embedding host.
//!
//! # Crate Structure
//!
//! - [`channel`] — Unix socket data channels and the listening endpoint
//! - [`frame`] — APDU classification, response templates, measurement extraction
//! - [`session`] — Exchange state machine and per-channel session threads
//!   (behind the `session` feature)

/// Re-export channel types.
pub mod channel {
    pub use hdplink_channel::*;
}

/// Re-export frame types.
pub mod frame {
    pub use hdplink_frame::*;
}

/// Re-export session types (requires `session` feature).
#[cfg(feature = "session")]
pub mod session {
    pub use hdplink_session::*;
}
