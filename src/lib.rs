//! frilink - Real-time UDP bridge to a robot-arm low-level controller
//!
//! Once per control cycle the remote controller sends a fixed-layout
//! measurement datagram and expects a command datagram back within the same
//! cycle. This crate owns that exchange: wire-format parsing, session-state
//! tracking with discrete mode-change events, and the control-mode
//! arbitration that decides which command fields may be populated.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use frilink::{Bridge, BridgeConfig, CommandInputs};
//!
//! let mut bridge = Bridge::open(&BridgeConfig::default())?;
//!
//! loop {
//!     // Latest targets from the control pipeline, `None` = stale this cycle.
//!     let inputs = CommandInputs::default();
//!
//!     let report = bridge.cycle(&inputs)?;
//!     if let Some(event) = report.event {
//!         println!("session changed: {event}");
//!     }
//! }
//! # Ok::<(), frilink::BridgeError>(())
//! ```
//!
//! # Design
//!
//! - **`protocol`** - fixed-size little-endian wire format shared with the
//!   controller: one measurement frame in, one command frame out.
//! - **`engine`** - the per-cycle state machine as a pure function,
//!   drivable without a socket by any scheduler, test harness, or simulator.
//! - **`transport`** - a UDP socket performing exactly one receive and one
//!   send per cycle, replying to the last-seen sender.
//!
//! Each cycle is independent: no retransmission, no reconnection, no state
//! survives a restart.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod bridge;
pub mod engine;
pub mod protocol;
pub mod transport;

pub use bridge::{Bridge, BridgeConfig, BridgeError, BridgeStats, CycleReport};
pub use engine::{CommandInputs, CycleOutcome, JointImpedance, Session, SessionEvent, run_cycle};
pub use protocol::{
    COMMAND_FRAME_SIZE, CommandFlags, CommandFrame, ControlMode, Error, InterfaceState,
    JOINT_COUNT, MEASURE_FRAME_SIZE, MeasureFrame, Result, UserData,
};
pub use transport::{TransportError, UdpLink};

/// Bridge protocol revision implemented by this crate
pub const VERSION: &str = "1.0.0";

/// Default local UDP port the controller sends measurement datagrams to
pub const DEFAULT_PORT: u16 = 49938;
