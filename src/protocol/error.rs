//! Protocol error types

use thiserror::Error;

/// Errors raised while decoding inbound frames or building outbound ones
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Datagram length does not match the fixed frame size
    #[error("bad packet length: {got} bytes, expected {expected}")]
    ShortPacket {
        /// Received byte count
        got: usize,
        /// Expected frame size
        expected: usize,
    },

    /// Datagram id does not identify the expected frame kind
    #[error("bad datagram id: {found:#06x}, expected {expected:#06x}")]
    BadDatagramId {
        /// Id found in the header
        found: u16,
        /// Id the decoder was looking for
        expected: u16,
    },

    /// A per-joint command input did not carry one value per joint
    #[error("size of {field} input is {got}, expected {expected}")]
    FieldLengthMismatch {
        /// Offending input field
        field: &'static str,
        /// Values supplied
        got: usize,
        /// Values required (one per joint)
        expected: usize,
    },

    /// Controller reported a control sub-mode this bridge cannot serve
    #[error("unsupported control mode: {raw:#06x}")]
    UnsupportedControlMode {
        /// Raw sub-mode value from the robot-status block
        raw: u16,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
