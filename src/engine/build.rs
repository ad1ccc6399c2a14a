//! Command build and control-mode arbitration
//!
//! Builds exactly one command frame per cycle. In monitor mode the frame
//! tracks the controller's own commanded position so a later switch to
//! command mode starts from a continuous setpoint; in command mode, and only
//! then, fresh external targets may touch the frame, gated by the active
//! control sub-mode.

use tracing::warn;

use crate::protocol::{
    COMMAND_FRAME_SIZE, CommandFlags, CommandFrame, ControlMode, DATAGRAM_ID_COMMAND,
    DatagramHeader, Error, InterfaceState, JOINT_COUNT, MeasureFrame,
};

use super::inputs::CommandInputs;
use super::session::Session;

pub(crate) struct BuildResult {
    pub(crate) frame: CommandFrame,
    pub(crate) warnings: Vec<Error>,
    pub(crate) fault: Option<Error>,
}

/// Assemble the outgoing command frame for this cycle
///
/// The sequence counter advances here, before any send is attempted, so a
/// later send failure still consumes a sequence number.
pub(crate) fn build_command(
    measure: &MeasureFrame,
    inputs: &CommandInputs,
    session: &mut Session,
) -> BuildResult {
    let mut warnings = Vec::new();
    let mut fault = None;

    let mut frame = CommandFrame {
        head: DatagramHeader::new(
            DATAGRAM_ID_COMMAND,
            COMMAND_FRAME_SIZE as u16,
            session.next_seq(),
            measure.head.send_seq,
        ),
        ..CommandFrame::default()
    };

    // Flags start empty every cycle; the position field is primed from the
    // held setpoint so carry-over is explicit state, not buffer reuse.
    frame.cmd.jnt_pos = *session.held_setpoint();

    let mode = measure.robot.control_mode();

    match measure.intf.state() {
        Some(InterfaceState::Monitor) => match mode {
            ControlMode::Position | ControlMode::JointImpedance => {
                session.hold_setpoint(measure.data.cmd_jnt_pos);
                frame.cmd.jnt_pos = measure.data.cmd_jnt_pos;
                frame.cmd.flags.insert(CommandFlags::JOINT_POSITION);
            }
            ControlMode::CartesianImpedance => {
                frame.cmd.cart_pose = measure.data.cmd_cart_pose;
                frame.cmd.flags.insert(CommandFlags::CART_POSE);
            }
            _ => {
                warn!(%mode, "unknown control mode, mirroring nothing");
            }
        },
        Some(InterfaceState::Command) => match mode {
            ControlMode::Position => {
                apply_joint_targets(&mut frame, measure, inputs, session, &mut warnings);
            }
            ControlMode::JointImpedance => {
                apply_joint_targets(&mut frame, measure, inputs, session, &mut warnings);
                apply_impedance_targets(&mut frame, inputs, &mut warnings);
            }
            ControlMode::CartesianImpedance | ControlMode::CartesianForce => {
                // Cartesian command path not active. A future implementation
                // integrates delta-pose from a twist over
                // desired_cmd_sample_time, with the same length and mode
                // gating as the joint paths.
            }
            ControlMode::Other => {
                fault = Some(Error::UnsupportedControlMode {
                    raw: measure.robot.control_raw,
                });
            }
        },
        // Session state outside the known enumerants: the stamped, empty
        // frame is still sent to keep the sequence protocol alive.
        None => {}
    }

    if let Some(user) = &inputs.user {
        frame.user = *user;
    }

    BuildResult {
        frame,
        warnings,
        fault,
    }
}

/// Joint position/velocity targets, legal in position and joint-impedance
/// sub-modes
fn apply_joint_targets(
    frame: &mut CommandFrame,
    measure: &MeasureFrame,
    inputs: &CommandInputs,
    session: &mut Session,
    warnings: &mut Vec<Error>,
) {
    if let Some(position) = &inputs.joint_position {
        if let Some(position) = checked_joints("joint position", position, warnings) {
            for (out, value) in frame.cmd.jnt_pos.iter_mut().zip(position) {
                *out = *value as f32;
            }
            frame.cmd.flags.insert(CommandFlags::JOINT_POSITION);
        }
    }

    if let Some(velocity) = &inputs.joint_velocity {
        if let Some(velocity) = checked_joints("joint velocity", velocity, warnings) {
            // Integrated over the controller's reply deadline, on top of the
            // fresh position if one arrived, otherwise on the held setpoint.
            let dt = measure.intf.desired_cmd_sample_time;
            for (out, value) in frame.cmd.jnt_pos.iter_mut().zip(velocity) {
                *out += *value as f32 * dt;
            }
            frame.cmd.flags.insert(CommandFlags::JOINT_POSITION);
        }
    }

    if frame.cmd.flags.contains(CommandFlags::JOINT_POSITION) {
        session.hold_setpoint(frame.cmd.jnt_pos);
    }
}

/// Torque and stiffness/damping targets, legal in joint-impedance sub-mode
/// only
fn apply_impedance_targets(
    frame: &mut CommandFrame,
    inputs: &CommandInputs,
    warnings: &mut Vec<Error>,
) {
    if let Some(effort) = &inputs.joint_effort {
        if let Some(effort) = checked_joints("joint effort", effort, warnings) {
            for (out, value) in frame.cmd.add_jnt_trq.iter_mut().zip(effort) {
                *out = *value as f32;
            }
            frame.cmd.flags.insert(CommandFlags::JOINT_TORQUE);
        }
    }

    if let Some(impedance) = &inputs.joint_impedance {
        let stiffness = checked_joints("joint stiffness", &impedance.stiffness, warnings);
        let damping = checked_joints("joint damping", &impedance.damping, warnings);

        // Stiffness and damping travel as a pair: both flags or neither.
        if let (Some(stiffness), Some(damping)) = (stiffness, damping) {
            for (out, value) in frame.cmd.jnt_stiffness.iter_mut().zip(stiffness) {
                *out = *value as f32;
            }
            for (out, value) in frame.cmd.jnt_damping.iter_mut().zip(damping) {
                *out = *value as f32;
            }
            frame
                .cmd
                .flags
                .insert(CommandFlags::JOINT_STIFFNESS | CommandFlags::JOINT_DAMPING);
        }
    }
}

fn checked_joints<'v>(
    field: &'static str,
    values: &'v [f64],
    warnings: &mut Vec<Error>,
) -> Option<&'v [f64]> {
    if values.len() == JOINT_COUNT {
        return Some(values);
    }

    let err = Error::FieldLengthMismatch {
        field,
        got: values.len(),
        expected: JOINT_COUNT,
    };
    warn!("{err}");
    warnings.push(err);
    None
}
