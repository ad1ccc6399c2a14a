//! Outbound command frame
//!
//! Built once per cycle from the latest measurement frame and whatever fresh
//! targets the control pipeline supplied. The flags bitmask tells the
//! controller which value arrays are live; everything else is ignored on the
//! far side.

use super::codec::{read_f32_array, write_f32_array};
use super::{
    CART_FRM_LEN, CART_VEC_LEN, COMMAND_DATA_SIZE, CommandFlags, DatagramHeader, JOINT_COUNT,
    Result, UserData,
};

/// Command-data block: flags plus the value arrays they gate
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandData {
    /// Bitmask of live value arrays
    pub flags: CommandFlags,
    /// Joint position target, rad
    pub jnt_pos: [f32; JOINT_COUNT],
    /// Cartesian pose target, flat 3x4 transform (uninterpreted)
    pub cart_pose: [f32; CART_FRM_LEN],
    /// Additional joint torque, Nm
    pub add_jnt_trq: [f32; JOINT_COUNT],
    /// Additional TCP force/torque (uninterpreted)
    pub add_tcp_wrench: [f32; CART_VEC_LEN],
    /// Joint stiffness, Nm/rad
    pub jnt_stiffness: [f32; JOINT_COUNT],
    /// Joint damping, normalized
    pub jnt_damping: [f32; JOINT_COUNT],
}

impl CommandData {
    pub(crate) fn encode_into(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), COMMAND_DATA_SIZE);

        out[0..4].copy_from_slice(&self.flags.bits().to_le_bytes());
        write_f32_array(&mut out[4..32], &self.jnt_pos);
        write_f32_array(&mut out[32..80], &self.cart_pose);
        write_f32_array(&mut out[80..108], &self.add_jnt_trq);
        write_f32_array(&mut out[108..132], &self.add_tcp_wrench);
        write_f32_array(&mut out[132..160], &self.jnt_stiffness);
        write_f32_array(&mut out[160..188], &self.jnt_damping);
    }

    pub(crate) fn decode(buf: &[u8]) -> Self {
        debug_assert_eq!(buf.len(), COMMAND_DATA_SIZE);

        Self {
            flags: CommandFlags::from_bits(u32::from_le_bytes(buf[0..4].try_into().unwrap())),
            jnt_pos: read_f32_array(&buf[4..32]),
            cart_pose: read_f32_array(&buf[32..80]),
            add_jnt_trq: read_f32_array(&buf[80..108]),
            add_tcp_wrench: read_f32_array(&buf[108..132]),
            jnt_stiffness: read_f32_array(&buf[132..160]),
            jnt_damping: read_f32_array(&buf[160..188]),
        }
    }
}

impl Default for CommandData {
    fn default() -> Self {
        Self {
            flags: CommandFlags::new(),
            jnt_pos: [0.0; JOINT_COUNT],
            cart_pose: [0.0; CART_FRM_LEN],
            add_jnt_trq: [0.0; JOINT_COUNT],
            add_tcp_wrench: [0.0; CART_VEC_LEN],
            jnt_stiffness: [0.0; JOINT_COUNT],
            jnt_damping: [0.0; JOINT_COUNT],
        }
    }
}

/// Outbound command frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandFrame {
    /// Datagram header
    pub head: DatagramHeader,
    /// Variable exchange block for the controller-side program
    pub user: UserData,
    /// Command data
    pub cmd: CommandData,
}

impl CommandFrame {
    /// Encode into the provided buffer, returning the encoded length
    pub fn encode_into(&self, out: &mut [u8]) -> Result<usize> {
        super::encode_command(self, out)
    }

    /// Encode into a freshly allocated buffer
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; super::COMMAND_FRAME_SIZE];
        super::encode_command(self, &mut bytes).expect("buffer sized to the frame");
        bytes
    }

    /// Decode a frame from an exactly sized datagram, for test harnesses
    /// standing in for the controller
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        super::decode_command(bytes)
    }
}
