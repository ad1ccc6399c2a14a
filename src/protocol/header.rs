//! Datagram header
//!
//! The header is 8 bytes and identical for both frame directions.

use super::{Error, HEADER_SIZE, Result};

/// Datagram header (8 bytes)
///
/// # Wire Format
///
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |        Datagram Id (2)        |        Packet Size (2)        |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     Send Seq Counter (2)      |   Reflected Seq Counter (2)   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The reflected counter echoes the peer's last send counter; the peer uses
/// it to detect dropped or duplicated cycles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DatagramHeader {
    /// Frame kind, [`DATAGRAM_ID_MEASURE`](super::DATAGRAM_ID_MEASURE) or
    /// [`DATAGRAM_ID_COMMAND`](super::DATAGRAM_ID_COMMAND)
    pub datagram_id: u16,
    /// Encoded size of the whole frame in bytes
    pub packet_size: u16,
    /// Sender's monotonically increasing sequence counter
    pub send_seq: u16,
    /// Echo of the peer's last send counter
    pub refl_seq: u16,
}

impl DatagramHeader {
    /// Create a new header
    #[must_use]
    pub const fn new(datagram_id: u16, packet_size: u16, send_seq: u16, refl_seq: u16) -> Self {
        Self {
            datagram_id,
            packet_size,
            send_seq,
            refl_seq,
        }
    }

    /// Reject a header whose id does not match the expected frame kind
    pub fn validate_id(&self, expected: u16) -> Result<()> {
        if self.datagram_id != expected {
            return Err(Error::BadDatagramId {
                found: self.datagram_id,
                expected,
            });
        }
        Ok(())
    }

    /// Convert to bytes (little-endian)
    #[must_use]
    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];

        bytes[0..2].copy_from_slice(&self.datagram_id.to_le_bytes());
        bytes[2..4].copy_from_slice(&self.packet_size.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.send_seq.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.refl_seq.to_le_bytes());

        bytes
    }

    /// Parse from bytes (little-endian)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(Error::ShortPacket {
                got: bytes.len(),
                expected: HEADER_SIZE,
            });
        }

        Ok(Self {
            datagram_id: u16::from_le_bytes(bytes[0..2].try_into().unwrap()),
            packet_size: u16::from_le_bytes(bytes[2..4].try_into().unwrap()),
            send_seq: u16::from_le_bytes(bytes[4..6].try_into().unwrap()),
            refl_seq: u16::from_le_bytes(bytes[6..8].try_into().unwrap()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{DATAGRAM_ID_COMMAND, DATAGRAM_ID_MEASURE};

    #[test]
    fn test_header_roundtrip() {
        let header = DatagramHeader::new(DATAGRAM_ID_COMMAND, 328, 17, 42);
        let bytes = header.to_bytes();
        let decoded = DatagramHeader::from_bytes(&bytes).unwrap();

        assert_eq!(decoded, header);
    }

    #[test]
    fn test_validate_id() {
        let header = DatagramHeader::new(DATAGRAM_ID_MEASURE, 524, 1, 0);
        assert!(header.validate_id(DATAGRAM_ID_MEASURE).is_ok());
        assert!(matches!(
            header.validate_id(DATAGRAM_ID_COMMAND),
            Err(Error::BadDatagramId {
                found: DATAGRAM_ID_MEASURE,
                expected: DATAGRAM_ID_COMMAND,
            })
        ));
    }

    #[test]
    fn test_from_bytes_too_short() {
        let result = DatagramHeader::from_bytes(&[0u8; 4]);
        assert!(matches!(result, Err(Error::ShortPacket { got: 4, .. })));
    }
}
