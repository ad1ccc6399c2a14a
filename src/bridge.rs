//! Bridge facade: one socket, one session, one call per cycle

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::engine::{CommandInputs, Session, SessionEvent, run_cycle};
use crate::protocol::{self, COMMAND_FRAME_SIZE, MEASURE_FRAME_SIZE, MeasureFrame};
use crate::transport::{TransportError, UdpLink};

/// Bridge configuration options
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeConfig {
    /// Local UDP port the controller sends measurement datagrams to
    pub local_port: u16,
    /// Optional read timeout; `None` blocks until a datagram arrives
    pub read_timeout: Option<Duration>,
    /// Optional write timeout for the reply
    pub write_timeout: Option<Duration>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            local_port: crate::DEFAULT_PORT,
            read_timeout: None,
            write_timeout: None,
        }
    }
}

/// Errors surfaced by the bridge to the cycle driver
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Socket-level failure
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Wire-format failure on the inbound frame
    #[error("protocol error: {0}")]
    Protocol(#[from] protocol::Error),
}

/// What one driven cycle produced, beyond the reply already sent
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// The validated measurement frame, the cycle's publication of measured
    /// joint, robot, and interface state
    pub measure: MeasureFrame,
    /// Session transition observed this cycle
    pub event: Option<SessionEvent>,
    /// Non-fatal degradations; offending inputs were ignored
    pub warnings: Vec<protocol::Error>,
    /// Cycle-level control fault; the reply was still sent
    pub fault: Option<protocol::Error>,
}

/// Running totals over the life of the bridge
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BridgeStats {
    /// Cycles attempted
    pub cycles: u64,
    /// Inbound datagrams rejected for a bad byte count
    pub short_packets: u64,
    /// Cycles that completed with a control fault
    pub faulted_cycles: u64,
    /// Session transitions observed
    pub transitions: u64,
}

/// UDP bridge to the robot-arm controller
///
/// Owns the socket, the session state, and the frame buffers. The external
/// scheduler drives it one [`cycle`](Bridge::cycle) at a time; there is no
/// internal concurrency and no state survives a restart.
#[derive(Debug)]
pub struct Bridge {
    link: UdpLink,
    session: Session,
    stats: BridgeStats,
    recv_buf: [u8; MEASURE_FRAME_SIZE],
    send_buf: [u8; COMMAND_FRAME_SIZE],
}

impl Bridge {
    /// Bind the local port and prepare a fresh session
    #[instrument(level = "info", skip(config), fields(port = config.local_port))]
    pub fn open(config: &BridgeConfig) -> Result<Self, BridgeError> {
        let link = UdpLink::open(config.local_port)?;
        link.set_read_timeout(config.read_timeout)?;
        link.set_write_timeout(config.write_timeout)?;

        debug!(addr = %link.local_addr()?, "bridge listening");

        Ok(Self {
            link,
            session: Session::new(),
            stats: BridgeStats::default(),
            recv_buf: [0u8; MEASURE_FRAME_SIZE],
            send_buf: [0u8; COMMAND_FRAME_SIZE],
        })
    }

    /// Run one cycle: receive, validate, arbitrate, reply
    ///
    /// On a [`TransportError::ShortPacket`] the inbound data is discarded, no
    /// reply is produced, and the session is untouched; the driver is
    /// expected to keep cycling. A send failure means the reply deadline
    /// toward the controller was missed and is fatal for this cycle.
    #[instrument(level = "debug", skip(self, inputs))]
    pub fn cycle(&mut self, inputs: &CommandInputs) -> Result<CycleReport, BridgeError> {
        self.stats.cycles += 1;

        let received = self.link.receive(&mut self.recv_buf, MEASURE_FRAME_SIZE);
        if let Err(TransportError::ShortPacket { .. }) = &received {
            self.stats.short_packets += 1;
        }
        received?;

        let measure = protocol::decode_measure(&self.recv_buf)?;

        let outcome = run_cycle(&measure, inputs, &mut self.session);

        let len = protocol::encode_command(&outcome.command, &mut self.send_buf)?;
        self.link.send(&self.send_buf[..len])?;

        if outcome.event.is_some() {
            self.stats.transitions += 1;
        }
        if outcome.fault.is_some() {
            self.stats.faulted_cycles += 1;
        }

        Ok(CycleReport {
            measure,
            event: outcome.event,
            warnings: outcome.warnings,
            fault: outcome.fault,
        })
    }

    /// Session state owned by this bridge
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Running totals since the bridge was opened
    #[must_use]
    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    /// Local address the bridge is bound to
    pub fn local_addr(&self) -> Result<SocketAddr, BridgeError> {
        Ok(self.link.local_addr()?)
    }
}
