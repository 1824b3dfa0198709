//! No-std number formatting for text frames.
//!
//! These functions write directly into byte buffers without allocation.

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

/// Write the low `digits` nibbles of `value` as uppercase hex, most significant first.
///
/// Returns the number of bytes written.
///
/// # Panics
///
/// Panics if `buf.len() < digits`.
#[inline]
pub fn write_hex(buf: &mut [u8], value: u32, digits: usize) -> usize {
    debug_assert!(digits <= 8, "u32 has at most 8 hex digits");
    for (i, slot) in buf[..digits].iter_mut().enumerate() {
        let shift = 4 * (digits - 1 - i);
        *slot = HEX_DIGITS[((value >> shift) & 0xF) as usize];
    }
    digits
}

/// Write an i8 as a signed decimal string.
///
/// Returns the number of bytes written (1-4).
///
/// # Panics
///
/// Panics if `buf.len() < 4` (max size: "-128").
#[inline]
pub fn write_i8(buf: &mut [u8], value: i8) -> usize {
    debug_assert!(buf.len() >= 4, "buffer too small for i8");

    let mut pos = 0;
    if value < 0 {
        buf[0] = b'-';
        pos = 1;
    }
    let mut n = value.unsigned_abs();

    let mut temp = [0u8; 3];
    let mut len = 0;
    loop {
        temp[len] = b'0' + n % 10;
        n /= 10;
        len += 1;
        if n == 0 {
            break;
        }
    }

    for i in 0..len {
        buf[pos + i] = temp[len - 1 - i];
    }
    pos + len
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_hex_six_digits() {
        let mut buf = [0u8; 6];
        assert_eq!(write_hex(&mut buf, 0x00A1F3, 6), 6);
        assert_eq!(&buf, b"00A1F3");
    }

    #[test]
    fn test_write_hex_truncates_high_nibbles() {
        let mut buf = [0u8; 2];
        write_hex(&mut buf, 0x1234, 2);
        assert_eq!(&buf, b"34");
    }

    #[test]
    fn test_write_i8_values() {
        let mut buf = [0u8; 4];
        let len = write_i8(&mut buf, 0);
        assert_eq!(&buf[..len], b"0");
        let len = write_i8(&mut buf, 127);
        assert_eq!(&buf[..len], b"127");
        let len = write_i8(&mut buf, -5);
        assert_eq!(&buf[..len], b"-5");
        let len = write_i8(&mut buf, i8::MIN);
        assert_eq!(&buf[..len], b"-128");
    }
}
