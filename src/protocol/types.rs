//! Session states, control sub-modes, and command flags

use std::fmt;

/// Session state granted by the remote controller
///
/// MONITOR is read-only telemetry; COMMAND accepts joint/impedance targets.
/// Any other raw value on the wire is treated as an unknown sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum InterfaceState {
    /// Controller mirrors measurements; commands are ignored
    Monitor = 1,
    /// Controller applies command fields legal for the active sub-mode
    Command = 2,
}

impl InterfaceState {
    /// Convert from the raw wire value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::Monitor),
            2 => Some(Self::Command),
            _ => None,
        }
    }

    /// Convert to the raw wire value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for InterfaceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Monitor => "monitor",
            Self::Command => "command",
        };
        write!(f, "{name}")
    }
}

/// Control law the remote arm controller is currently running
///
/// Determines which outgoing command fields are legal this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum ControlMode {
    /// No recognized control law; commanding faults the cycle
    Other = 0,
    /// Joint position control
    Position = 1,
    /// Cartesian impedance control (placeholder, not commanded yet)
    CartesianImpedance = 2,
    /// Joint impedance control
    JointImpedance = 3,
    /// Cartesian force control (placeholder, not commanded yet)
    CartesianForce = 4,
}

impl ControlMode {
    /// Convert from the raw wire value; unrecognized values map to `Other`
    #[must_use]
    pub fn from_u16(value: u16) -> Self {
        match value {
            1 => Self::Position,
            2 => Self::CartesianImpedance,
            3 => Self::JointImpedance,
            4 => Self::CartesianForce,
            _ => Self::Other,
        }
    }

    /// Convert to the raw wire value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }

    /// Check whether per-joint position/velocity targets are legal
    #[must_use]
    pub const fn accepts_joint_targets(self) -> bool {
        matches!(self, Self::Position | Self::JointImpedance)
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Other => "other",
            Self::Position => "position",
            Self::CartesianImpedance => "cartesian-impedance",
            Self::JointImpedance => "joint-impedance",
            Self::CartesianForce => "cartesian-force",
        };
        write!(f, "{name}")
    }
}

/// Link quality classification reported by the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u16)]
pub enum LinkQuality {
    /// Reply deadlines missed badly; controller may drop the session
    Unacceptable = 0,
    /// Frequent deadline misses
    Bad = 1,
    /// Occasional deadline misses
    Ok = 2,
    /// No deadline misses observed
    Perfect = 3,
}

impl LinkQuality {
    /// Convert from the raw wire value
    #[must_use]
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::Unacceptable),
            1 => Some(Self::Bad),
            2 => Some(Self::Ok),
            3 => Some(Self::Perfect),
            _ => None,
        }
    }

    /// Convert to the raw wire value
    #[must_use]
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

/// Bitmask of command fields populated this cycle
///
/// Recomputed from scratch every cycle; a set bit tells the controller the
/// matching value array is live.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandFlags(u32);

impl CommandFlags {
    /// Joint position array is live
    pub const JOINT_POSITION: u32 = 1 << 0;
    /// Additional joint torque array is live
    pub const JOINT_TORQUE: u32 = 1 << 1;
    /// Cartesian pose array is live
    pub const CART_POSE: u32 = 1 << 2;
    /// Additional TCP force/torque array is live
    pub const TCP_WRENCH: u32 = 1 << 3;
    /// Joint stiffness array is live
    pub const JOINT_STIFFNESS: u32 = 1 << 4;
    /// Joint damping array is live
    pub const JOINT_DAMPING: u32 = 1 << 5;

    /// Create an empty flag set
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create a flag set from raw bits
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Return the underlying bit representation
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Check whether the given flag is set
    #[must_use]
    pub const fn contains(self, flag: u32) -> bool {
        (self.0 & flag) != 0
    }

    /// Insert a flag into the set
    pub fn insert(&mut self, flag: u32) {
        self.0 |= flag;
    }

    /// Clear a flag from the set
    pub fn remove(&mut self, flag: u32) {
        self.0 &= !flag;
    }

    /// Check whether no flags are set
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for CommandFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if self.contains(Self::JOINT_POSITION) {
            parts.push("JOINT_POSITION");
        }
        if self.contains(Self::JOINT_TORQUE) {
            parts.push("JOINT_TORQUE");
        }
        if self.contains(Self::CART_POSE) {
            parts.push("CART_POSE");
        }
        if self.contains(Self::TCP_WRENCH) {
            parts.push("TCP_WRENCH");
        }
        if self.contains(Self::JOINT_STIFFNESS) {
            parts.push("JOINT_STIFFNESS");
        }
        if self.contains(Self::JOINT_DAMPING) {
            parts.push("JOINT_DAMPING");
        }
        if parts.is_empty() {
            write!(f, "NONE")
        } else {
            write!(f, "{}", parts.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interface_state_roundtrip() {
        for state in [InterfaceState::Monitor, InterfaceState::Command] {
            assert_eq!(InterfaceState::from_u16(state.as_u16()), Some(state));
        }
        assert_eq!(InterfaceState::from_u16(0), None);
        assert_eq!(InterfaceState::from_u16(99), None);
    }

    #[test]
    fn test_control_mode_unrecognized_maps_to_other() {
        assert_eq!(ControlMode::from_u16(1), ControlMode::Position);
        assert_eq!(ControlMode::from_u16(3), ControlMode::JointImpedance);
        assert_eq!(ControlMode::from_u16(0), ControlMode::Other);
        assert_eq!(ControlMode::from_u16(0xFFFF), ControlMode::Other);
    }

    #[test]
    fn test_joint_target_gating() {
        assert!(ControlMode::Position.accepts_joint_targets());
        assert!(ControlMode::JointImpedance.accepts_joint_targets());
        assert!(!ControlMode::CartesianImpedance.accepts_joint_targets());
        assert!(!ControlMode::Other.accepts_joint_targets());
    }

    #[test]
    fn test_command_flags() {
        let mut flags = CommandFlags::new();
        assert!(flags.is_empty());

        flags.insert(CommandFlags::JOINT_POSITION);
        flags.insert(CommandFlags::JOINT_STIFFNESS | CommandFlags::JOINT_DAMPING);

        assert!(flags.contains(CommandFlags::JOINT_POSITION));
        assert!(flags.contains(CommandFlags::JOINT_STIFFNESS));
        assert!(flags.contains(CommandFlags::JOINT_DAMPING));
        assert!(!flags.contains(CommandFlags::JOINT_TORQUE));

        flags.remove(CommandFlags::JOINT_POSITION);
        assert!(!flags.contains(CommandFlags::JOINT_POSITION));
    }
}
