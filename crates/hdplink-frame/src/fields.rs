//! Bounds-checked reads of fixed-offset APDU fields.

use crate::error::{FrameError, Result};

/// Read a little-endian u16 at `offset`.
///
/// Measurement values in the fixed-format report are little-endian, unlike
/// the big-endian APDU length fields.
pub fn read_u16_le(frame: &[u8], offset: usize) -> Result<u16> {
    let bytes = offset
        .checked_add(2)
        .and_then(|end| frame.get(offset..end))
        .ok_or(FrameError::FieldOutOfBounds {
            offset,
            len: frame.len(),
        })?;
    Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
}
