//! Wire format shared with the robot-arm controller
//!
//! One fixed-size measurement frame in, one fixed-size command frame out,
//! every control cycle. All multi-byte fields are little-endian; sizes are
//! compile-time constants so a length mismatch always means a corrupt or
//! foreign packet.

mod codec;
mod command;
mod error;
mod header;
mod measure;
mod types;
mod user;

pub use codec::{decode_command, decode_measure, encode_command, encode_measure};
pub use command::{CommandData, CommandFrame};
pub use error::{Error, Result};
pub use header::DatagramHeader;
pub use measure::{InterfaceStats, InterfaceStatus, MeasureData, MeasureFrame, RobotStatus};
pub use types::{CommandFlags, ControlMode, InterfaceState, LinkQuality};
pub use user::UserData;

/// Number of joints of the arm model; every joint array is exactly this long
pub const JOINT_COUNT: usize = 7;

/// Length of a flat Cartesian pose array (3x4 transform, row-major)
pub const CART_FRM_LEN: usize = 12;

/// Length of a Cartesian force/torque vector
pub const CART_VEC_LEN: usize = 6;

/// Floats in the free-form variable exchange block
pub const USER_REAL_LEN: usize = 16;

/// Integers in the free-form variable exchange block
pub const USER_INT_LEN: usize = 16;

/// Datagram id stamped on measurement frames by the controller
pub const DATAGRAM_ID_MEASURE: u16 = 0x1006;

/// Datagram id stamped on command frames by this side
pub const DATAGRAM_ID_COMMAND: u16 = 0x1005;

/// Encoded size of the datagram header
pub const HEADER_SIZE: usize = 8;

/// Encoded size of the variable exchange block
pub const USER_DATA_SIZE: usize = 4 * USER_REAL_LEN + 4 * USER_INT_LEN + 4;

/// Encoded size of the interface-status block
pub const INTERFACE_STATUS_SIZE: usize = 40;

/// Encoded size of the robot-status block
pub const ROBOT_STATUS_SIZE: usize = 36;

/// Encoded size of the measurement-data block
pub const MEASURE_DATA_SIZE: usize = 308;

/// Encoded size of the command-data block
pub const COMMAND_DATA_SIZE: usize = 188;

/// Exact encoded size of an inbound measurement frame
pub const MEASURE_FRAME_SIZE: usize =
    HEADER_SIZE + USER_DATA_SIZE + INTERFACE_STATUS_SIZE + ROBOT_STATUS_SIZE + MEASURE_DATA_SIZE;

/// Exact encoded size of an outbound command frame
pub const COMMAND_FRAME_SIZE: usize = HEADER_SIZE + USER_DATA_SIZE + COMMAND_DATA_SIZE;
