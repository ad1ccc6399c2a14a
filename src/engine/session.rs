//! Session state and mode-change events

use std::fmt;

use crate::protocol::{InterfaceState, JOINT_COUNT};

/// Raw interface-state value assumed before the first valid frame arrives
const STATE_UNKNOWN: u16 = 0;

/// Discrete event emitted when the session state changes
///
/// The session is entirely driven by the remote controller; the engine never
/// forces a transition, it only reports one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionEvent {
    /// Controller granted monitor (read-only) access
    EnteredMonitor,
    /// Controller granted command access
    EnteredCommand,
    /// Controller reported a state outside the known enumerants
    EnteredUnknownMode,
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::EnteredMonitor => "entered-monitor",
            Self::EnteredCommand => "entered-command",
            Self::EnteredUnknownMode => "entered-unknown-mode",
        };
        write!(f, "{name}")
    }
}

/// Per-session engine state
///
/// Owned by the caller and threaded through [`run_cycle`](super::run_cycle),
/// never ambient. One value per controller link.
#[derive(Debug, Clone)]
pub struct Session {
    last_state: u16,
    send_seq: u16,
    held_jnt_pos: [f32; JOINT_COUNT],
}

impl Session {
    /// Create a fresh session: counter at zero, state unknown
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_state: STATE_UNKNOWN,
            send_seq: 0,
            held_jnt_pos: [0.0; JOINT_COUNT],
        }
    }

    /// Compare the received interface state against the last known one,
    /// returning the transition event if it changed
    ///
    /// The raw value is compared, so two distinct unrecognized values still
    /// count as a transition.
    pub fn observe_state(&mut self, state_raw: u16) -> Option<SessionEvent> {
        if state_raw == self.last_state {
            return None;
        }

        let event = match InterfaceState::from_u16(state_raw) {
            Some(InterfaceState::Monitor) => SessionEvent::EnteredMonitor,
            Some(InterfaceState::Command) => SessionEvent::EnteredCommand,
            None => SessionEvent::EnteredUnknownMode,
        };
        self.last_state = state_raw;
        Some(event)
    }

    /// Advance and return the outgoing sequence counter
    ///
    /// Called exactly once per built frame, so the counter moves even when
    /// the send later fails. Wraps at the wire width.
    pub(crate) fn next_seq(&mut self) -> u16 {
        self.send_seq = self.send_seq.wrapping_add(1);
        self.send_seq
    }

    /// Last interface state seen, `None` before the first known-state frame
    #[must_use]
    pub fn last_state(&self) -> Option<InterfaceState> {
        InterfaceState::from_u16(self.last_state)
    }

    /// Joint setpoint carried between cycles
    ///
    /// Refreshed from the measured commanded position while the session is in
    /// monitor mode, so a switch to command mode starts from a continuous
    /// setpoint. Fresh position input overwrites it; velocity integration
    /// advances it.
    #[must_use]
    pub fn held_setpoint(&self) -> &[f32; JOINT_COUNT] {
        &self.held_jnt_pos
    }

    pub(crate) fn hold_setpoint(&mut self, setpoint: [f32; JOINT_COUNT]) {
        self.held_jnt_pos = setpoint;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
