//! Device-side frame builders.
//!
//! hdplink implements the manager side of the exchange; the constructors
//! here produce the frames a blood-pressure cuff sends. The simulator and
//! the tests drive full exchanges with them.

use crate::measurement::{DIASTOLIC_OFFSET, INVOKE_ID_OFFSET, SYSTOLIC_OFFSET};
use crate::opcode;

/// Association request as a cuff sends it (48 bytes). Mirrors the grant's
/// parameter block, with the device's EUI-64 system id at bytes 29..37.
pub const ASSOCIATION_REQUEST: [u8; 48] = [
    0xE2, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x50, 0x79, 0x00, 0x26, 0x80, 0x00, 0x00, 0x00, 0x80,
    0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x08,
    0x00, 0x1C, 0x05, 0xFF, 0xFE, 0x00, 0x42, 0x99, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00,
];

/// Release request (6 bytes).
pub const RELEASE_REQUEST: [u8; 6] = [0xE4, 0x00, 0x00, 0x02, 0x00, 0x00];

/// Association abort (6 bytes). Never sent by the manager.
pub const ABORT: [u8; 6] = [0xE6, 0x00, 0x00, 0x02, 0x00, 0x00];

/// Total length of a measurement report.
const MEASUREMENT_REPORT_LEN: usize = 54;
/// Total length of the MDS configuration report: a 218-byte APDU body
/// behind the 4-byte header, so byte 3 reads 0xDA.
const CONFIGURATION_REPORT_LEN: usize = 222;

/// Build a fixed-format measurement report: a confirmed event report
/// carrying one systolic/diastolic pair at the standard offsets.
pub fn measurement_report(systolic: u16, diastolic: u16, invoke: [u8; 2]) -> [u8; 54] {
    let mut frame = [0u8; MEASUREMENT_REPORT_LEN];
    frame[0] = opcode::DATA;
    frame[2..4].copy_from_slice(&((MEASUREMENT_REPORT_LEN as u16) - 4).to_be_bytes());
    frame[4..6].copy_from_slice(&((MEASUREMENT_REPORT_LEN as u16) - 6).to_be_bytes());
    frame[INVOKE_ID_OFFSET..INVOKE_ID_OFFSET + 2].copy_from_slice(&invoke);
    // Roiv-cmip-confirmed-event-report choice.
    frame[8] = 0x01;
    frame[9] = 0x01;
    frame[SYSTOLIC_OFFSET..SYSTOLIC_OFFSET + 2].copy_from_slice(&systolic.to_le_bytes());
    frame[DIASTOLIC_OFFSET..DIASTOLIC_OFFSET + 2].copy_from_slice(&diastolic.to_le_bytes());
    frame
}

/// Build the MDS configuration report answering the configuration query.
///
/// The attribute dump itself is opaque to the manager, so it is left
/// zeroed. The frame is longer than the manager's 200-byte read buffer;
/// every byte past the header is harmless as a read boundary, since a
/// continuation chunk starts with 0x00 and classifies as empty.
pub fn configuration_report() -> [u8; 222] {
    let mut frame = [0u8; CONFIGURATION_REPORT_LEN];
    frame[0] = opcode::DATA;
    frame[2..4].copy_from_slice(&((CONFIGURATION_REPORT_LEN as u16) - 4).to_be_bytes());
    frame
}
