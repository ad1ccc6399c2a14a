//! Free-form variable exchange block
//!
//! Both frame directions carry a fixed block of floats, integers, and boolean
//! flags exchanged with the controller-side program. The bridge passes it
//! through untouched and never interprets the values.

use super::codec::{read_f32_array, read_i32_array, write_f32_array, write_i32_array};
use super::{USER_DATA_SIZE, USER_INT_LEN, USER_REAL_LEN};

/// Variable exchange block (132 bytes on the wire)
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserData {
    /// Floating-point variables
    pub real_values: [f32; USER_REAL_LEN],
    /// Integer variables
    pub int_values: [i32; USER_INT_LEN],
    /// Boolean variables, one per bit
    pub bool_values: u16,
}

impl UserData {
    /// Read one boolean variable; `index` must be below 16
    #[must_use]
    pub const fn bool_value(&self, index: usize) -> bool {
        debug_assert!(index < 16);
        (self.bool_values >> index) & 1 != 0
    }

    /// Set one boolean variable; `index` must be below 16
    pub fn set_bool_value(&mut self, index: usize, value: bool) {
        debug_assert!(index < 16);
        if value {
            self.bool_values |= 1 << index;
        } else {
            self.bool_values &= !(1 << index);
        }
    }

    /// Encode into an exactly sized slice
    pub(crate) fn encode_into(&self, out: &mut [u8]) {
        debug_assert_eq!(out.len(), USER_DATA_SIZE);

        write_f32_array(&mut out[0..64], &self.real_values);
        write_i32_array(&mut out[64..128], &self.int_values);
        out[128..130].copy_from_slice(&self.bool_values.to_le_bytes());
        out[130..132].fill(0);
    }

    /// Decode from an exactly sized slice
    pub(crate) fn decode(buf: &[u8]) -> Self {
        debug_assert_eq!(buf.len(), USER_DATA_SIZE);

        Self {
            real_values: read_f32_array(&buf[0..64]),
            int_values: read_i32_array(&buf[64..128]),
            bool_values: u16::from_le_bytes(buf[128..130].try_into().unwrap()),
        }
    }
}

impl Default for UserData {
    fn default() -> Self {
        Self {
            real_values: [0.0; USER_REAL_LEN],
            int_values: [0; USER_INT_LEN],
            bool_values: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_data_roundtrip() {
        let mut user = UserData::default();
        user.real_values[0] = 1.5;
        user.real_values[15] = -3.25;
        user.int_values[7] = -42;
        user.set_bool_value(0, true);
        user.set_bool_value(9, true);

        let mut buf = [0u8; USER_DATA_SIZE];
        user.encode_into(&mut buf);
        let decoded = UserData::decode(&buf);

        assert_eq!(decoded, user);
        assert!(decoded.bool_value(9));
        assert!(!decoded.bool_value(1));
    }
}
