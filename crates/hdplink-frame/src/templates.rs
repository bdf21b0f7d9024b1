//! Canned manager responses.
//!
//! The manager never builds APDUs dynamically: the whole exchange is
//! answered out of four fixed templates. Device-side frames live in
//! [`crate::agent`].

/// Association grant, selector 1 (48 bytes).
///
/// Bytes 29..37 carry the manager's EUI-64 system id; the tail is zero
/// padding.
pub const ASSOCIATION_RESPONSE: [u8; 48] = [
    0xE3, 0x00, 0x00, 0x2C, 0x00, 0x00, 0x50, 0x79, 0x00, 0x26, 0x80, 0x00, 0x00, 0x00, 0x80,
    0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00, 0x08,
    0x3C, 0x5A, 0x37, 0xFF, 0xFE, 0x95, 0xEE, 0xE3, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00,
];

/// MDS configuration query, selector 2 (18 bytes).
pub const CONFIGURATION_RESPONSE: [u8; 18] = [
    0xE7, 0x00, 0x00, 0x0E, 0x00, 0x0C, 0x00, 0x24, 0x01, 0x03, 0x00, 0x06, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00,
];

/// Measurement acknowledgement, selector 3 (22 bytes).
pub const DATA_RESPONSE: [u8; 22] = [
    0xE7, 0x00, 0x00, 0x12, 0x00, 0x10, 0x00, 0x24, 0x02, 0x01, 0x00, 0x0A, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x0D, 0x1D, 0x00, 0x00,
];

/// Release grant, selector 4 (6 bytes).
pub const RELEASE_RESPONSE: [u8; 6] = [0xE5, 0x00, 0x00, 0x02, 0x00, 0x00];

/// One of the four canned manager responses, in exchange order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Grants the association.
    Association,
    /// Asks the device for its MDS attributes.
    Configuration,
    /// Acknowledges a measurement report.
    Data,
    /// Grants the release.
    Release,
}

impl Response {
    /// Template bytes sent on the wire.
    pub fn bytes(self) -> &'static [u8] {
        match self {
            Response::Association => &ASSOCIATION_RESPONSE,
            Response::Configuration => &CONFIGURATION_RESPONSE,
            Response::Data => &DATA_RESPONSE,
            Response::Release => &RELEASE_RESPONSE,
        }
    }

    /// Position of this response in the canonical exchange (1-based).
    pub fn selector(self) -> u8 {
        match self {
            Response::Association => 1,
            Response::Configuration => 2,
            Response::Data => 3,
            Response::Release => 4,
        }
    }

    /// Short name for logs and CLI output.
    pub fn name(self) -> &'static str {
        match self {
            Response::Association => "association-response",
            Response::Configuration => "configuration-query",
            Response::Data => "data-response",
            Response::Release => "release-response",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opcode;

    #[test]
    fn test_template_opcodes() {
        assert_eq!(ASSOCIATION_RESPONSE[0], opcode::ASSOCIATION_RESPONSE);
        assert_eq!(CONFIGURATION_RESPONSE[0], opcode::DATA);
        assert_eq!(DATA_RESPONSE[0], opcode::DATA);
        assert_eq!(RELEASE_RESPONSE[0], opcode::RELEASE_RESPONSE);
    }

    #[test]
    fn test_association_response_tail_is_zero_padding() {
        assert!(ASSOCIATION_RESPONSE[40..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_selectors_follow_exchange_order() {
        let order = [
            Response::Association,
            Response::Configuration,
            Response::Data,
            Response::Release,
        ];
        for (i, response) in order.iter().enumerate() {
            assert_eq!(response.selector(), (i + 1) as u8);
        }
    }

    #[test]
    fn test_bytes_match_templates() {
        assert_eq!(Response::Association.bytes().len(), 48);
        assert_eq!(Response::Configuration.bytes().len(), 18);
        assert_eq!(Response::Data.bytes().len(), 22);
        assert_eq!(Response::Release.bytes().len(), 6);
        assert_eq!(Response::Data.bytes()[18..20], [0x0D, 0x1D]);
    }
}
