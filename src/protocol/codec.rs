//! Frame codec (encode/decode)
//!
//! Both frames are fixed-size with little-endian fields. Decoding validates
//! the byte count and the datagram id before any field is read; a frame that
//! fails either check is rejected whole, nothing is partially consumed.

use super::{
    COMMAND_FRAME_SIZE, CommandData, CommandFrame, DATAGRAM_ID_COMMAND, DATAGRAM_ID_MEASURE,
    DatagramHeader, Error, HEADER_SIZE, INTERFACE_STATUS_SIZE, InterfaceStatus,
    MEASURE_FRAME_SIZE, MeasureData, MeasureFrame, Result, RobotStatus, USER_DATA_SIZE, UserData,
};

const USER_OFFSET: usize = HEADER_SIZE;
const INTF_OFFSET: usize = USER_OFFSET + USER_DATA_SIZE;
const ROBOT_OFFSET: usize = INTF_OFFSET + INTERFACE_STATUS_SIZE;
const DATA_OFFSET: usize = ROBOT_OFFSET + super::ROBOT_STATUS_SIZE;
const CMD_OFFSET: usize = USER_OFFSET + USER_DATA_SIZE;

/// Decode a measurement frame from an exactly sized datagram
///
/// # Errors
///
/// Returns an error if:
/// - Byte count differs from [`MEASURE_FRAME_SIZE`]
/// - The datagram id is not the measurement id
pub fn decode_measure(bytes: &[u8]) -> Result<MeasureFrame> {
    if bytes.len() != MEASURE_FRAME_SIZE {
        return Err(Error::ShortPacket {
            got: bytes.len(),
            expected: MEASURE_FRAME_SIZE,
        });
    }

    let head = DatagramHeader::from_bytes(&bytes[0..HEADER_SIZE])?;
    head.validate_id(DATAGRAM_ID_MEASURE)?;

    Ok(MeasureFrame {
        head,
        user: UserData::decode(&bytes[USER_OFFSET..INTF_OFFSET]),
        intf: InterfaceStatus::decode(&bytes[INTF_OFFSET..ROBOT_OFFSET]),
        robot: RobotStatus::decode(&bytes[ROBOT_OFFSET..DATA_OFFSET]),
        data: MeasureData::decode(&bytes[DATA_OFFSET..MEASURE_FRAME_SIZE]),
    })
}

/// Encode a measurement frame, for simulators and test harnesses standing in
/// for the controller
pub fn encode_measure(frame: &MeasureFrame, out: &mut [u8]) -> Result<usize> {
    if out.len() < MEASURE_FRAME_SIZE {
        return Err(Error::ShortPacket {
            got: out.len(),
            expected: MEASURE_FRAME_SIZE,
        });
    }

    out[0..HEADER_SIZE].copy_from_slice(&frame.head.to_bytes());
    frame.user.encode_into(&mut out[USER_OFFSET..INTF_OFFSET]);
    frame.intf.encode_into(&mut out[INTF_OFFSET..ROBOT_OFFSET]);
    frame.robot.encode_into(&mut out[ROBOT_OFFSET..DATA_OFFSET]);
    frame.data.encode_into(&mut out[DATA_OFFSET..MEASURE_FRAME_SIZE]);

    Ok(MEASURE_FRAME_SIZE)
}

/// Encode a command frame into the provided buffer
pub fn encode_command(frame: &CommandFrame, out: &mut [u8]) -> Result<usize> {
    if out.len() < COMMAND_FRAME_SIZE {
        return Err(Error::ShortPacket {
            got: out.len(),
            expected: COMMAND_FRAME_SIZE,
        });
    }

    out[0..HEADER_SIZE].copy_from_slice(&frame.head.to_bytes());
    frame.user.encode_into(&mut out[USER_OFFSET..CMD_OFFSET]);
    frame.cmd.encode_into(&mut out[CMD_OFFSET..COMMAND_FRAME_SIZE]);

    Ok(COMMAND_FRAME_SIZE)
}

/// Decode a command frame from an exactly sized datagram
pub fn decode_command(bytes: &[u8]) -> Result<CommandFrame> {
    if bytes.len() != COMMAND_FRAME_SIZE {
        return Err(Error::ShortPacket {
            got: bytes.len(),
            expected: COMMAND_FRAME_SIZE,
        });
    }

    let head = DatagramHeader::from_bytes(&bytes[0..HEADER_SIZE])?;
    head.validate_id(DATAGRAM_ID_COMMAND)?;

    Ok(CommandFrame {
        head,
        user: UserData::decode(&bytes[USER_OFFSET..CMD_OFFSET]),
        cmd: CommandData::decode(&bytes[CMD_OFFSET..COMMAND_FRAME_SIZE]),
    })
}

pub(crate) fn read_f32_array<const N: usize>(buf: &[u8]) -> [f32; N] {
    debug_assert_eq!(buf.len(), N * 4);

    let mut out = [0.0_f32; N];
    for (value, chunk) in out.iter_mut().zip(buf.chunks_exact(4)) {
        *value = f32::from_le_bytes(chunk.try_into().unwrap());
    }
    out
}

pub(crate) fn write_f32_array(out: &mut [u8], values: &[f32]) {
    debug_assert_eq!(out.len(), values.len() * 4);

    for (chunk, value) in out.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
}

pub(crate) fn read_i32_array<const N: usize>(buf: &[u8]) -> [i32; N] {
    debug_assert_eq!(buf.len(), N * 4);

    let mut out = [0_i32; N];
    for (value, chunk) in out.iter_mut().zip(buf.chunks_exact(4)) {
        *value = i32::from_le_bytes(chunk.try_into().unwrap());
    }
    out
}

pub(crate) fn write_i32_array(out: &mut [u8], values: &[i32]) {
    debug_assert_eq!(out.len(), values.len() * 4);

    for (chunk, value) in out.chunks_exact_mut(4).zip(values) {
        chunk.copy_from_slice(&value.to_le_bytes());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{CommandFlags, InterfaceState};

    fn sample_measure() -> MeasureFrame {
        let mut frame = MeasureFrame {
            head: DatagramHeader::new(DATAGRAM_ID_MEASURE, MEASURE_FRAME_SIZE as u16, 7, 6),
            ..MeasureFrame::default()
        };
        frame.intf.state_raw = InterfaceState::Monitor.as_u16();
        frame.intf.desired_cmd_sample_time = 0.001;
        frame.robot.control_raw = 1;
        frame.data.msr_jnt_pos = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7];
        frame.data.cmd_jnt_pos = [1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7];
        frame
    }

    #[test]
    fn test_measure_roundtrip() {
        let original = sample_measure();
        let encoded = original.encode();

        assert_eq!(encoded.len(), MEASURE_FRAME_SIZE);

        let decoded = decode_measure(&encoded).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.intf.state(), Some(InterfaceState::Monitor));
    }

    #[test]
    fn test_command_roundtrip() {
        let mut original = CommandFrame {
            head: DatagramHeader::new(DATAGRAM_ID_COMMAND, COMMAND_FRAME_SIZE as u16, 3, 9),
            ..CommandFrame::default()
        };
        original.cmd.flags.insert(CommandFlags::JOINT_POSITION);
        original.cmd.jnt_pos = [0.5; 7];

        let encoded = original.encode();
        assert_eq!(encoded.len(), COMMAND_FRAME_SIZE);

        let decoded = decode_command(&encoded).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_short_packet() {
        let encoded = sample_measure().encode();

        let result = decode_measure(&encoded[..MEASURE_FRAME_SIZE - 1]);
        assert!(matches!(
            result,
            Err(Error::ShortPacket {
                got,
                expected: MEASURE_FRAME_SIZE,
            }) if got == MEASURE_FRAME_SIZE - 1
        ));
    }

    #[test]
    fn test_decode_oversized_packet() {
        let mut encoded = sample_measure().encode();
        encoded.push(0);

        assert!(matches!(
            decode_measure(&encoded),
            Err(Error::ShortPacket { .. })
        ));
    }

    #[test]
    fn test_decode_foreign_datagram_id() {
        let mut frame = sample_measure();
        frame.head.datagram_id = DATAGRAM_ID_COMMAND;

        let result = decode_measure(&frame.encode());
        assert!(matches!(
            result,
            Err(Error::BadDatagramId {
                found: DATAGRAM_ID_COMMAND,
                expected: DATAGRAM_ID_MEASURE,
            })
        ));
    }

    #[test]
    fn test_encode_buffer_too_small() {
        let frame = CommandFrame::default();
        let mut buf = [0u8; COMMAND_FRAME_SIZE - 1];

        assert!(matches!(
            frame.encode_into(&mut buf),
            Err(Error::ShortPacket { .. })
        ));
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn wire_f32() -> impl Strategy<Value = f32> {
            -1.0e6_f32..1.0e6_f32
        }

        prop_compose! {
            fn measure_frame_strategy()(
                send_seq in any::<u16>(),
                refl_seq in any::<u16>(),
                state_raw in 0u16..5,
                control_raw in 0u16..6,
                sample_time in 0.0005f32..0.05,
                msr_jnt_pos in prop::array::uniform7(wire_f32()),
                cmd_jnt_pos in prop::array::uniform7(wire_f32()),
                msr_jnt_trq in prop::array::uniform7(wire_f32()),
                est_ext_jnt_trq in prop::array::uniform7(wire_f32()),
                msr_cart_pose in prop::array::uniform12(wire_f32()),
                real_values in prop::array::uniform16(wire_f32()),
                int_values in prop::array::uniform16(any::<i32>()),
                bool_values in any::<u16>(),
            ) -> MeasureFrame {
                let mut frame = MeasureFrame {
                    head: DatagramHeader::new(
                        DATAGRAM_ID_MEASURE,
                        MEASURE_FRAME_SIZE as u16,
                        send_seq,
                        refl_seq,
                    ),
                    ..MeasureFrame::default()
                };
                frame.user.real_values = real_values;
                frame.user.int_values = int_values;
                frame.user.bool_values = bool_values;
                frame.intf.state_raw = state_raw;
                frame.intf.desired_cmd_sample_time = sample_time;
                frame.robot.control_raw = control_raw;
                frame.data.msr_jnt_pos = msr_jnt_pos;
                frame.data.cmd_jnt_pos = cmd_jnt_pos;
                frame.data.msr_jnt_trq = msr_jnt_trq;
                frame.data.est_ext_jnt_trq = est_ext_jnt_trq;
                frame.data.msr_cart_pose = msr_cart_pose;
                frame
            }
        }

        prop_compose! {
            fn command_frame_strategy()(
                send_seq in any::<u16>(),
                refl_seq in any::<u16>(),
                flag_bits in 0u32..64,
                jnt_pos in prop::array::uniform7(wire_f32()),
                add_jnt_trq in prop::array::uniform7(wire_f32()),
                jnt_stiffness in prop::array::uniform7(wire_f32()),
                jnt_damping in prop::array::uniform7(wire_f32()),
            ) -> CommandFrame {
                let mut frame = CommandFrame {
                    head: DatagramHeader::new(
                        DATAGRAM_ID_COMMAND,
                        COMMAND_FRAME_SIZE as u16,
                        send_seq,
                        refl_seq,
                    ),
                    ..CommandFrame::default()
                };
                frame.cmd.flags = CommandFlags::from_bits(flag_bits);
                frame.cmd.jnt_pos = jnt_pos;
                frame.cmd.add_jnt_trq = add_jnt_trq;
                frame.cmd.jnt_stiffness = jnt_stiffness;
                frame.cmd.jnt_damping = jnt_damping;
                frame
            }
        }

        proptest! {
            /// Property: any valid measurement frame roundtrips exactly
            #[test]
            fn prop_measure_roundtrip(frame in measure_frame_strategy()) {
                let decoded = decode_measure(&frame.encode()).unwrap();
                prop_assert_eq!(decoded, frame);
            }

            /// Property: any valid command frame roundtrips exactly
            #[test]
            fn prop_command_roundtrip(frame in command_frame_strategy()) {
                let decoded = decode_command(&frame.encode()).unwrap();
                prop_assert_eq!(decoded, frame);
            }

            /// Property: any byte count other than the frame size is rejected
            #[test]
            fn prop_wrong_length_rejected(len in 0usize..2048) {
                prop_assume!(len != MEASURE_FRAME_SIZE);

                let bytes = vec![0u8; len];
                let is_short_packet =
                    matches!(decode_measure(&bytes), Err(Error::ShortPacket { .. }));
                prop_assert!(is_short_packet);
            }
        }
    }
}
