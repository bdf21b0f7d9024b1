//! Measurement extraction from data APDUs.
//!
//! A cuff sends two kinds of data APDU: its MDS configuration report (the
//! attribute dump answering the configuration query) and fixed-format
//! measurement reports. The two are told apart by byte 3, the low byte of
//! the big-endian APDU length field: the configuration report is 218
//! (`0xDA`) bytes long, measurement reports are far shorter.

use crate::error::{FrameError, Result};
use crate::fields::read_u16_le;

/// Offset of the invoke-id bytes within a data APDU.
pub const INVOKE_ID_OFFSET: usize = 6;
/// Offset of the little-endian systolic value in a measurement report.
pub const SYSTOLIC_OFFSET: usize = 45;
/// Offset of the little-endian diastolic value in a measurement report.
pub const DIASTOLIC_OFFSET: usize = 47;
/// Byte 3 of the configuration report.
pub const CONFIGURATION_REPORT_MARKER: u8 = 0xDA;

/// One blood-pressure reading pulled out of a measurement report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Systolic pressure, raw 16-bit value.
    pub systolic: u16,
    /// Diastolic pressure, raw 16-bit value.
    pub diastolic: u16,
    /// Invoke-id bytes of the carrying APDU, verbatim, for correlation.
    pub invoke: [u8; 2],
    /// Lowercase hex dump of the full frame, for diagnostics.
    pub frame_hex: String,
}

/// Whether a data APDU is a measurement report rather than the
/// configuration report. Frames too short to carry byte 3 are neither.
pub fn is_measurement_report(frame: &[u8]) -> bool {
    frame.len() >= 4 && frame[3] != CONFIGURATION_REPORT_MARKER
}

impl Measurement {
    /// Decode a measurement from a data APDU.
    ///
    /// Returns `Ok(None)` for the configuration report, which carries
    /// device attributes rather than a reading.
    pub fn extract(frame: &[u8]) -> Result<Option<Self>> {
        if frame.len() < 4 {
            return Err(FrameError::Truncated {
                need: 4,
                len: frame.len(),
            });
        }
        if frame[3] == CONFIGURATION_REPORT_MARKER {
            return Ok(None);
        }

        let invoke: [u8; 2] = frame
            .get(INVOKE_ID_OFFSET..INVOKE_ID_OFFSET + 2)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(FrameError::FieldOutOfBounds {
                offset: INVOKE_ID_OFFSET,
                len: frame.len(),
            })?;
        let systolic = read_u16_le(frame, SYSTOLIC_OFFSET)?;
        let diastolic = read_u16_le(frame, DIASTOLIC_OFFSET)?;

        Ok(Some(Self {
            systolic,
            diastolic,
            invoke,
            frame_hex: hex::encode(frame),
        }))
    }
}
