//! Diagnostic input-viewer frame serialization.
//!
//! One frame is written per controller frame so a host-side visualizer can
//! display the raw input snapshot.
//!
//! # Frame Format
//!
//! ```text
//! I<buttons>:<nx>:<ny>*<checksum>\n
//! ```
//!
//! - `I` - Frame prefix
//! - `buttons` - 6 hex digits, bit `n` set when [`InputField`] index `n` is held
//! - `nx,ny` - Nunchuk stick as signed decimal i8 (0 when no nunchuk is connected)
//! - `checksum` - 2 hex digits (CRC-8/SMBUS of the bytes between `I` and `*`)
//!
//! [`InputField`]: crate::types::InputField

use crate::crc::Crc8Digest;
use crate::format::{write_hex, write_i8};
use crate::types::InputState;

/// Frame prefix byte.
pub const FRAME_PREFIX: u8 = b'I';

/// Maximum size of a serialized frame.
///
/// I(1) + buttons(6) + colon(1) + nx(4) + colon(1) + ny(4) + *(1) + checksum(2) + \n(1) = 21
pub const MAX_FRAME_SIZE: usize = 24;

/// Error type for frame serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SerializeError {
    /// The output buffer is too small to hold a frame.
    BufferTooSmall,
}

impl core::fmt::Display for SerializeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::BufferTooSmall => write!(f, "buffer too small"),
        }
    }
}

/// Writes into the output buffer while accumulating the checksum.
struct FrameBuf<'a> {
    buf: &'a mut [u8],
    pos: usize,
    crc: Crc8Digest,
}

impl<'a> FrameBuf<'a> {
    fn new(buf: &'a mut [u8]) -> Self {
        Self {
            buf,
            pos: 0,
            crc: Crc8Digest::new(),
        }
    }

    fn write_raw(&mut self, byte: u8) {
        self.buf[self.pos] = byte;
        self.pos += 1;
    }

    fn write_slice(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.crc.update(bytes);
        self.pos += bytes.len();
    }

    fn write_hex(&mut self, value: u32, digits: usize) {
        let mut tmp = [0u8; 8];
        let len = write_hex(&mut tmp, value, digits);
        self.write_slice(&tmp[..len]);
    }

    fn write_i8(&mut self, value: i8) {
        let mut tmp = [0u8; 4];
        let len = write_i8(&mut tmp, value);
        self.write_slice(&tmp[..len]);
    }

    fn finalize(mut self) -> usize {
        let checksum = core::mem::take(&mut self.crc).finalize();
        self.write_raw(b'*');
        let mut tmp = [0u8; 2];
        write_hex(&mut tmp, u32::from(checksum), 2);
        self.write_raw(tmp[0]);
        self.write_raw(tmp[1]);
        self.write_raw(b'\n');
        self.pos
    }
}

/// Serialize `state` into `buf`, returning the number of bytes written.
pub fn serialize_frame(state: &InputState, buf: &mut [u8]) -> Result<usize, SerializeError> {
    if buf.len() < MAX_FRAME_SIZE {
        return Err(SerializeError::BufferTooSmall);
    }

    let (nx, ny) = if state.nunchuk_connected {
        (state.nunchuk_x, state.nunchuk_y)
    } else {
        (0, 0)
    };

    let mut out = FrameBuf::new(buf);
    out.write_raw(FRAME_PREFIX);
    out.write_hex(state.button_bits(), 6);
    out.write_slice(b":");
    out.write_i8(nx);
    out.write_slice(b":");
    out.write_i8(ny);
    Ok(out.finalize())
}

/// Serialize `state` into a fixed-capacity vector.
pub fn frame_to_vec(state: &InputState) -> heapless::Vec<u8, MAX_FRAME_SIZE> {
    let mut buf = [0u8; MAX_FRAME_SIZE];
    let mut vec = heapless::Vec::new();
    if let Ok(len) = serialize_frame(state, &mut buf) {
        // len <= MAX_FRAME_SIZE, cannot overflow
        let _ = vec.extend_from_slice(&buf[..len]);
    }
    vec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crc::calculate_crc8;
    use crate::types::InputField;

    fn expected(payload: &[u8]) -> heapless::Vec<u8, 32> {
        let mut out: heapless::Vec<u8, 32> = heapless::Vec::new();
        out.push(b'I').unwrap();
        out.extend_from_slice(payload).unwrap();
        out.push(b'*').unwrap();
        let mut hex = [0u8; 2];
        write_hex(&mut hex, u32::from(calculate_crc8(payload)), 2);
        out.extend_from_slice(&hex).unwrap();
        out.push(b'\n').unwrap();
        out
    }

    #[test]
    fn test_neutral_frame() {
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = serialize_frame(&InputState::neutral(), &mut buf).unwrap();
        assert_eq!(&buf[..len], &expected(b"000000:0:0")[..]);
    }

    #[test]
    fn test_button_bits_follow_field_index() {
        let state = InputState {
            l: true,
            a: true,
            ..InputState::neutral()
        };
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = serialize_frame(&state, &mut buf).unwrap();
        // L = bit 0, A = bit 12
        assert_eq!(&buf[..len], &expected(b"001001:0:0")[..]);
    }

    #[test]
    fn test_nunchuk_axes_only_when_connected() {
        let mut state = InputState {
            nunchuk_x: -100,
            nunchuk_y: 42,
            ..InputState::neutral()
        };
        let disconnected = frame_to_vec(&state);
        assert_eq!(&disconnected[..], &expected(b"000000:0:0")[..]);

        state.nunchuk_connected = true;
        let connected = frame_to_vec(&state);
        assert_eq!(&connected[..], &expected(b"000000:-100:42")[..]);
    }

    #[test]
    fn test_widest_frame_fits_one_vec() {
        let mut state = InputState {
            nunchuk_connected: true,
            nunchuk_x: -128,
            nunchuk_y: -128,
            ..InputState::neutral()
        };
        for field in InputField::ALL {
            state.set(field, true);
        }
        let mut buf = [0u8; MAX_FRAME_SIZE];
        let len = serialize_frame(&state, &mut buf).unwrap();
        let frame = frame_to_vec(&state);
        assert_eq!(&frame[..], &buf[..len]);
        assert_eq!(frame.last(), Some(&b'\n'));
    }

    #[test]
    fn test_buffer_too_small() {
        let mut buf = [0u8; 8];
        assert_eq!(
            serialize_frame(&InputState::neutral(), &mut buf),
            Err(SerializeError::BufferTooSmall)
        );
    }
}
