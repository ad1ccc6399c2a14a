//! Inbound measurement frame
//!
//! Sent by the controller once per cycle: interface status, robot status, and
//! the measured joint/Cartesian state. The Cartesian arrays are carried and
//! exposed but never interpreted by the bridge.

use super::codec::{read_f32_array, write_f32_array};
use super::{
    CART_FRM_LEN, CART_VEC_LEN, ControlMode, DatagramHeader, INTERFACE_STATUS_SIZE, InterfaceState,
    JOINT_COUNT, LinkQuality, MEASURE_DATA_SIZE, ROBOT_STATUS_SIZE, Result, UserData,
};

/// Communication statistics kept by the controller for this link
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceStats {
    /// Fraction of cycles answered in time
    pub answer_rate: f32,
    /// Mean reply latency in seconds
    pub latency: f32,
    /// Reply jitter in seconds
    pub jitter: f32,
    /// Fraction of cycles with no reply
    pub miss_rate: f32,
    /// Absolute count of missed replies
    pub miss_counter: u32,
}

/// Interface-status block: session state and cycle timing
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceStatus {
    /// Controller-side timestamp in seconds
    pub timestamp: f32,
    /// Raw session state; see [`InterfaceStatus::state`]
    pub state_raw: u16,
    /// Raw link quality classification
    pub quality_raw: u16,
    /// Cycle period of measurement frames, seconds
    pub desired_msr_sample_time: f32,
    /// Deadline for the command reply, seconds
    pub desired_cmd_sample_time: f32,
    /// Remaining fraction of the configured safety limits
    pub safety_limits: f32,
    /// Link statistics
    pub stats: InterfaceStats,
}

impl InterfaceStatus {
    /// Session state, `None` for values outside the known enumerants
    #[must_use]
    pub fn state(&self) -> Option<InterfaceState> {
        InterfaceState::from_u16(self.state_raw)
    }

    /// Link quality classification, `None` for out-of-range values
    #[must_use]
    pub fn quality(&self) -> Option<LinkQuality> {
        LinkQuality::from_u16(self.quality_raw)
    }

    pub(crate) fn encode_into(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), INTERFACE_STATUS_SIZE);

        out[0..4].copy_from_slice(&self.timestamp.to_le_bytes());
        out[4..6].copy_from_slice(&self.state_raw.to_le_bytes());
        out[6..8].copy_from_slice(&self.quality_raw.to_le_bytes());
        out[8..12].copy_from_slice(&self.desired_msr_sample_time.to_le_bytes());
        out[12..16].copy_from_slice(&self.desired_cmd_sample_time.to_le_bytes());
        out[16..20].copy_from_slice(&self.safety_limits.to_le_bytes());
        out[20..24].copy_from_slice(&self.stats.answer_rate.to_le_bytes());
        out[24..28].copy_from_slice(&self.stats.latency.to_le_bytes());
        out[28..32].copy_from_slice(&self.stats.jitter.to_le_bytes());
        out[32..36].copy_from_slice(&self.stats.miss_rate.to_le_bytes());
        out[36..40].copy_from_slice(&self.stats.miss_counter.to_le_bytes());
    }

    pub(crate) fn decode(buf: &[u8]) -> Self {
        debug_assert_eq!(buf.len(), INTERFACE_STATUS_SIZE);

        Self {
            timestamp: f32::from_le_bytes(buf[0..4].try_into().unwrap()),
            state_raw: u16::from_le_bytes(buf[4..6].try_into().unwrap()),
            quality_raw: u16::from_le_bytes(buf[6..8].try_into().unwrap()),
            desired_msr_sample_time: f32::from_le_bytes(buf[8..12].try_into().unwrap()),
            desired_cmd_sample_time: f32::from_le_bytes(buf[12..16].try_into().unwrap()),
            safety_limits: f32::from_le_bytes(buf[16..20].try_into().unwrap()),
            stats: InterfaceStats {
                answer_rate: f32::from_le_bytes(buf[20..24].try_into().unwrap()),
                latency: f32::from_le_bytes(buf[24..28].try_into().unwrap()),
                jitter: f32::from_le_bytes(buf[28..32].try_into().unwrap()),
                miss_rate: f32::from_le_bytes(buf[32..36].try_into().unwrap()),
                miss_counter: u32::from_le_bytes(buf[36..40].try_into().unwrap()),
            },
        }
    }
}

/// Robot-status block: active control law and drive condition
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotStatus {
    /// Bitmask of powered drives, one bit per joint
    pub power: u16,
    /// Raw control sub-mode; see [`RobotStatus::control_mode`]
    pub control_raw: u16,
    /// Controller error bits
    pub error: u16,
    /// Controller warning bits
    pub warning: u16,
    /// Per-joint drive temperature in degrees Celsius
    pub temperature: [f32; JOINT_COUNT],
}

impl RobotStatus {
    /// Active control sub-mode; unrecognized values map to
    /// [`ControlMode::Other`]
    #[must_use]
    pub fn control_mode(&self) -> ControlMode {
        ControlMode::from_u16(self.control_raw)
    }

    pub(crate) fn encode_into(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), ROBOT_STATUS_SIZE);

        out[0..2].copy_from_slice(&self.power.to_le_bytes());
        out[2..4].copy_from_slice(&self.control_raw.to_le_bytes());
        out[4..6].copy_from_slice(&self.error.to_le_bytes());
        out[6..8].copy_from_slice(&self.warning.to_le_bytes());
        write_f32_array(&mut out[8..36], &self.temperature);
    }

    pub(crate) fn decode(buf: &[u8]) -> Self {
        debug_assert_eq!(buf.len(), ROBOT_STATUS_SIZE);

        Self {
            power: u16::from_le_bytes(buf[0..2].try_into().unwrap()),
            control_raw: u16::from_le_bytes(buf[2..4].try_into().unwrap()),
            error: u16::from_le_bytes(buf[4..6].try_into().unwrap()),
            warning: u16::from_le_bytes(buf[6..8].try_into().unwrap()),
            temperature: read_f32_array(&buf[8..36]),
        }
    }
}

impl Default for RobotStatus {
    fn default() -> Self {
        Self {
            power: 0,
            control_raw: 0,
            error: 0,
            warning: 0,
            temperature: [0.0; JOINT_COUNT],
        }
    }
}

/// Measurement-data block: measured and commanded joint/Cartesian state
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureData {
    /// Measured joint position, rad
    pub msr_jnt_pos: [f32; JOINT_COUNT],
    /// Measured Cartesian pose, flat 3x4 transform (uninterpreted)
    pub msr_cart_pose: [f32; CART_FRM_LEN],
    /// Joint position the controller is currently commanding
    pub cmd_jnt_pos: [f32; JOINT_COUNT],
    /// Interpolator offset already applied to the commanded position
    pub cmd_jnt_pos_offset: [f32; JOINT_COUNT],
    /// Commanded Cartesian pose (uninterpreted)
    pub cmd_cart_pose: [f32; CART_FRM_LEN],
    /// Interpolator offset on the commanded Cartesian pose (uninterpreted)
    pub cmd_cart_pose_offset: [f32; CART_FRM_LEN],
    /// Measured joint torque, Nm
    pub msr_jnt_trq: [f32; JOINT_COUNT],
    /// Estimated external joint torque, Nm
    pub est_ext_jnt_trq: [f32; JOINT_COUNT],
    /// Estimated external TCP force/torque (uninterpreted)
    pub est_ext_tcp_wrench: [f32; CART_VEC_LEN],
}

impl MeasureData {
    pub(crate) fn encode_into(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), MEASURE_DATA_SIZE);

        write_f32_array(&mut out[0..28], &self.msr_jnt_pos);
        write_f32_array(&mut out[28..76], &self.msr_cart_pose);
        write_f32_array(&mut out[76..104], &self.cmd_jnt_pos);
        write_f32_array(&mut out[104..132], &self.cmd_jnt_pos_offset);
        write_f32_array(&mut out[132..180], &self.cmd_cart_pose);
        write_f32_array(&mut out[180..228], &self.cmd_cart_pose_offset);
        write_f32_array(&mut out[228..256], &self.msr_jnt_trq);
        write_f32_array(&mut out[256..284], &self.est_ext_jnt_trq);
        write_f32_array(&mut out[284..308], &self.est_ext_tcp_wrench);
    }

    pub(crate) fn decode(buf: &[u8]) -> Self {
        debug_assert_eq!(buf.len(), MEASURE_DATA_SIZE);

        Self {
            msr_jnt_pos: read_f32_array(&buf[0..28]),
            msr_cart_pose: read_f32_array(&buf[28..76]),
            cmd_jnt_pos: read_f32_array(&buf[76..104]),
            cmd_jnt_pos_offset: read_f32_array(&buf[104..132]),
            cmd_cart_pose: read_f32_array(&buf[132..180]),
            cmd_cart_pose_offset: read_f32_array(&buf[180..228]),
            msr_jnt_trq: read_f32_array(&buf[228..256]),
            est_ext_jnt_trq: read_f32_array(&buf[256..284]),
            est_ext_tcp_wrench: read_f32_array(&buf[284..308]),
        }
    }
}

impl Default for MeasureData {
    fn default() -> Self {
        Self {
            msr_jnt_pos: [0.0; JOINT_COUNT],
            msr_cart_pose: [0.0; CART_FRM_LEN],
            cmd_jnt_pos: [0.0; JOINT_COUNT],
            cmd_jnt_pos_offset: [0.0; JOINT_COUNT],
            cmd_cart_pose: [0.0; CART_FRM_LEN],
            cmd_cart_pose_offset: [0.0; CART_FRM_LEN],
            msr_jnt_trq: [0.0; JOINT_COUNT],
            est_ext_jnt_trq: [0.0; JOINT_COUNT],
            est_ext_tcp_wrench: [0.0; CART_VEC_LEN],
        }
    }
}

/// Inbound measurement frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeasureFrame {
    /// Datagram header
    pub head: DatagramHeader,
    /// Variable exchange block from the controller-side program
    pub user: UserData,
    /// Interface status
    pub intf: InterfaceStatus,
    /// Robot status
    pub robot: RobotStatus,
    /// Measurement data
    pub data: MeasureData,
}

impl MeasureFrame {
    /// Decode a frame from an exactly sized datagram
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        super::decode_measure(bytes)
    }

    /// Encode the frame, for simulators and test harnesses
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; super::MEASURE_FRAME_SIZE];
        super::encode_measure(self, &mut bytes).expect("buffer sized to the frame");
        bytes
    }
}
