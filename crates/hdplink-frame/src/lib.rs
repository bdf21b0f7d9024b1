//! Frame layer for the IEEE 11073-20601 optimized exchange protocol as
//! spoken by Bluetooth HDP blood-pressure cuffs.
//!
//! Everything in this crate is pure: opcode classification, the fixed
//! response templates, bounds-checked field reads, measurement extraction,
//! and the reusable inbound buffer. I/O, threads, and exchange state live
//! in `hdplink-session`.

pub mod agent;
pub mod buffer;
pub mod error;
pub mod fields;
pub mod measurement;
pub mod opcode;
pub mod templates;

pub use buffer::{ReadBuffer, READ_BUFFER_LEN};
pub use error::{FrameError, Result};
pub use fields::read_u16_le;
pub use measurement::{is_measurement_report, Measurement};
pub use opcode::{classify, FrameKind};
pub use templates::Response;
