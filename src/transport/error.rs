//! Transport-level error types covering bind, receive, and send failures

use core::fmt;
use std::io;

/// Unified error type for transport operations
#[derive(Debug)]
pub enum TransportError {
    /// Binding the local port failed; fatal to startup
    Bind(io::Error),
    /// Applying a socket option failed; fatal to startup
    Configure(io::Error),
    /// Underlying receive failure
    Receive(io::Error),
    /// No datagram arrived within the configured read timeout
    Timeout,
    /// Received byte count does not match the expected frame size; the
    /// buffer contents are invalid and must be discarded
    ShortPacket {
        /// Bytes actually received
        got: usize,
        /// Bytes the frame requires
        expected: usize,
    },
    /// Underlying send failure; the reply deadline toward the controller is
    /// unmet, fatal for this cycle
    Send(io::Error),
    /// Send attempted before any sender address was recorded
    NoPeer,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(err) => write!(f, "binding of port failed: {err}"),
            Self::Configure(err) => write!(f, "socket configuration failed: {err}"),
            Self::Receive(err) => write!(f, "receive failed: {err}"),
            Self::Timeout => write!(f, "no datagram within the read timeout"),
            Self::ShortPacket { got, expected } => {
                write!(f, "bad packet length: {got} bytes, expected {expected}")
            }
            Self::Send(err) => write!(f, "sending datagram failed: {err}"),
            Self::NoPeer => write!(f, "no sender address recorded yet"),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bind(err)
            | Self::Configure(err)
            | Self::Receive(err)
            | Self::Send(err) => Some(err),
            Self::Timeout | Self::ShortPacket { .. } | Self::NoPeer => None,
        }
    }
}
