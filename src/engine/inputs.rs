//! Per-cycle command inputs from the control pipeline

use crate::protocol::UserData;

/// Desired joint impedance: one stiffness/damping pair per joint
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JointImpedance {
    /// Per-joint stiffness, Nm/rad
    pub stiffness: Vec<f64>,
    /// Per-joint damping, normalized
    pub damping: Vec<f64>,
}

/// Latest-known targets supplied by external collaborators
///
/// `Some` means the value arrived fresh this cycle, `None` that it is stale
/// and must not touch the outgoing frame. The engine borrows the inputs
/// read-only for exactly one cycle; they are a snapshot, never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandInputs {
    /// Desired joint positions, rad
    pub joint_position: Option<Vec<f64>>,
    /// Desired joint velocities, rad/s, integrated onto the position target
    pub joint_velocity: Option<Vec<f64>>,
    /// Desired additional joint torques, Nm
    pub joint_effort: Option<Vec<f64>>,
    /// Desired joint impedance
    pub joint_impedance: Option<JointImpedance>,
    /// Outbound variable exchange block for the controller-side program
    pub user: Option<UserData>,
}

impl CommandInputs {
    /// Check whether every input is stale this cycle
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.joint_position.is_none()
            && self.joint_velocity.is_none()
            && self.joint_effort.is_none()
            && self.joint_impedance.is_none()
            && self.user.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_stale() {
        assert!(CommandInputs::default().is_stale());

        let inputs = CommandInputs {
            joint_velocity: Some(vec![0.0; 7]),
            ..CommandInputs::default()
        };
        assert!(!inputs.is_stale());
    }
}
