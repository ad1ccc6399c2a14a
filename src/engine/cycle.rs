//! One protocol cycle as a pure function

use crate::protocol::{CommandFrame, Error, MeasureFrame};

use super::build::build_command;
use super::inputs::CommandInputs;
use super::session::{Session, SessionEvent};

/// Everything one cycle produced: the frame to send, the transition event if
/// any, non-fatal warnings, and the cycle fault if any
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    /// Command frame to send back this cycle
    pub command: CommandFrame,
    /// Session transition observed on this frame
    pub event: Option<SessionEvent>,
    /// Non-fatal degradations; the offending inputs were ignored
    pub warnings: Vec<Error>,
    /// Unrecoverable control fault for this cycle; the frame is still sent
    pub fault: Option<Error>,
}

/// Run one cycle of the protocol engine over a validated measurement frame
///
/// Tracks the session state (emitting the transition event when it changed),
/// then arbitrates and builds the command frame. Pure apart from `session`:
/// no socket, no clock, no ambient state, so a test harness or simulator can
/// drive cycles exactly like the real scheduler.
pub fn run_cycle(
    measure: &MeasureFrame,
    inputs: &CommandInputs,
    session: &mut Session,
) -> CycleOutcome {
    let event = session.observe_state(measure.intf.state_raw);

    let result = build_command(measure, inputs, session);

    CycleOutcome {
        command: result.frame,
        event,
        warnings: result.warnings,
        fault: result.fault,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{
        CommandFlags, DATAGRAM_ID_MEASURE, DatagramHeader, InterfaceState, MEASURE_FRAME_SIZE,
    };

    fn measure(state: InterfaceState, send_seq: u16) -> MeasureFrame {
        let mut frame = MeasureFrame {
            head: DatagramHeader::new(
                DATAGRAM_ID_MEASURE,
                MEASURE_FRAME_SIZE as u16,
                send_seq,
                0,
            ),
            ..MeasureFrame::default()
        };
        frame.intf.state_raw = state.as_u16();
        frame.robot.control_raw = 1;
        frame
    }

    #[test]
    fn test_event_fires_once_per_transition() {
        let mut session = Session::new();
        let inputs = CommandInputs::default();

        let outcome = run_cycle(&measure(InterfaceState::Monitor, 1), &inputs, &mut session);
        assert_eq!(outcome.event, Some(SessionEvent::EnteredMonitor));

        let outcome = run_cycle(&measure(InterfaceState::Monitor, 2), &inputs, &mut session);
        assert_eq!(outcome.event, None);

        let outcome = run_cycle(&measure(InterfaceState::Command, 3), &inputs, &mut session);
        assert_eq!(outcome.event, Some(SessionEvent::EnteredCommand));
    }

    #[test]
    fn test_reflected_sequence_echoes_inbound() {
        let mut session = Session::new();
        let inputs = CommandInputs::default();

        for send_seq in [5u16, 6, 7, 1000] {
            let outcome = run_cycle(
                &measure(InterfaceState::Monitor, send_seq),
                &inputs,
                &mut session,
            );
            assert_eq!(outcome.command.head.refl_seq, send_seq);
        }
    }

    #[test]
    fn test_send_sequence_strictly_increases() {
        let mut session = Session::new();
        let inputs = CommandInputs::default();

        for expected in 1u16..=20 {
            let outcome = run_cycle(
                &measure(InterfaceState::Monitor, expected),
                &inputs,
                &mut session,
            );
            assert_eq!(outcome.command.head.send_seq, expected);
        }
    }

    #[test]
    fn test_transition_cycle_still_builds_its_command() {
        // The frame that announces command mode already obeys command-mode
        // arbitration.
        let mut session = Session::new();

        run_cycle(
            &measure(InterfaceState::Monitor, 1),
            &CommandInputs::default(),
            &mut session,
        );

        let inputs = CommandInputs {
            joint_position: Some(vec![0.5; crate::protocol::JOINT_COUNT]),
            ..CommandInputs::default()
        };
        let outcome = run_cycle(&measure(InterfaceState::Command, 2), &inputs, &mut session);

        assert_eq!(outcome.event, Some(SessionEvent::EnteredCommand));
        assert!(outcome.command.cmd.flags.contains(CommandFlags::JOINT_POSITION));
        assert_eq!(outcome.command.cmd.jnt_pos, [0.5; 7]);
    }
}
