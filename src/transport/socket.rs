//! UDP socket wrapper for the per-cycle exchange

use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::time::Duration;

use tracing::{instrument, trace};

use super::error::TransportError;

/// UDP link to the controller
///
/// Bound to a local port at startup; the controller initiates every cycle,
/// and replies go to whatever address the last datagram came from.
#[derive(Debug)]
pub struct UdpLink {
    socket: UdpSocket,
    peer: Option<SocketAddr>,
}

impl UdpLink {
    /// Bind to `0.0.0.0:local_port`
    ///
    /// A bind failure (port in use, no permission) is fatal to startup.
    pub fn open(local_port: u16) -> Result<Self, TransportError> {
        let addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, local_port);
        let socket = UdpSocket::bind(addr).map_err(TransportError::Bind)?;

        Ok(Self { socket, peer: None })
    }

    /// Set the socket read timeout; `None` blocks until a datagram arrives
    pub fn set_read_timeout(&self, timeout: Option<Duration>) -> Result<(), TransportError> {
        self.socket
            .set_read_timeout(timeout)
            .map_err(TransportError::Configure)
    }

    /// Set the socket write timeout
    pub fn set_write_timeout(&self, timeout: Option<Duration>) -> Result<(), TransportError> {
        self.socket
            .set_write_timeout(timeout)
            .map_err(TransportError::Configure)
    }

    /// Receive at most one datagram into `buf`, recording the sender address
    /// for the reply
    ///
    /// Any byte count other than `expected` is a corrupt or foreign packet:
    /// the buffer must be considered invalid and discarded whole.
    #[instrument(level = "trace", skip(self, buf))]
    pub fn receive(&mut self, buf: &mut [u8], expected: usize) -> Result<usize, TransportError> {
        let (got, sender) = self.socket.recv_from(buf).map_err(|err| {
            if matches!(err.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut) {
                TransportError::Timeout
            } else {
                TransportError::Receive(err)
            }
        })?;

        self.peer = Some(sender);
        trace!(got, %sender, "datagram received");

        if got != expected {
            return Err(TransportError::ShortPacket { got, expected });
        }

        Ok(got)
    }

    /// Send exactly `buf` to the last-recorded sender address
    #[instrument(level = "trace", skip(self, buf))]
    pub fn send(&self, buf: &[u8]) -> Result<(), TransportError> {
        let peer = self.peer.ok_or(TransportError::NoPeer)?;

        self.socket
            .send_to(buf, peer)
            .map_err(TransportError::Send)?;
        trace!(len = buf.len(), %peer, "datagram sent");

        Ok(())
    }

    /// Local address the socket is bound to
    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        self.socket.local_addr().map_err(TransportError::Configure)
    }

    /// Sender address of the last received datagram
    #[must_use]
    pub fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Release the socket
    ///
    /// Dropping the link has the same effect; consuming here makes a second
    /// close unrepresentable.
    pub fn close(self) {}
}
