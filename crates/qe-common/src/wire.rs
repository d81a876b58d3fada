//! ---
//! qe_section: "02-messaging-ipc-data-model"
//! qe_subsection: "module"
//! qe_type: "source"
//! qe_scope: "code"
//! qe_description: "Binary wire codec shared by inter-node protocols."
//! qe_version: "v0.0.0-prealpha"
//! qe_owner: "tbd"
//! ---
//! Varint and length-prefixed string encoding.
//!
//! Unsigned integers are written as LEB128: seven payload bits per byte,
//! least significant group first, high bit set on every byte but the last.
//! Strings are a varint byte length followed by the raw UTF-8 bytes.
use bytes::{Buf, BufMut};

/// Largest string payload accepted on either side of the wire.
pub const MAX_STRING_SIZE: u64 = 0x00FF_FFFF;

/// Longest possible varint encoding of a `u64`.
const MAX_VARINT_LEN: usize = 10;

/// Errors raised while encoding or decoding wire data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// The reader ran out of bytes mid-value.
    #[error("unexpected end of stream: needed {needed} bytes, {remaining} remaining")]
    Truncated {
        /// Bytes required to finish the current value.
        needed: usize,
        /// Bytes left in the reader.
        remaining: usize,
    },
    /// A varint continued past the 64-bit range.
    #[error("varint does not fit in 64 bits")]
    VarintOverflow,
    /// A string length exceeded [`MAX_STRING_SIZE`].
    #[error("string of {len} bytes exceeds the {limit} byte limit")]
    StringTooLong {
        /// Declared or actual length.
        len: u64,
        /// Configured limit.
        limit: u64,
    },
    /// A decoded string payload was not UTF-8.
    #[error("string payload is not valid utf-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    /// The writer cannot hold the encoded value.
    #[error("write buffer full: needed {needed} bytes, {remaining} remaining")]
    BufferFull {
        /// Bytes the encoding requires.
        needed: usize,
        /// Capacity left in the writer.
        remaining: usize,
    },
}

/// Number of bytes [`write_var_u64`] emits for `value`.
pub fn var_u64_len(value: u64) -> usize {
    let bits = 64 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}

/// Append `value` as a varint.
pub fn write_var_u64<B: BufMut + ?Sized>(value: u64, buf: &mut B) -> Result<(), WireError> {
    ensure_capacity(buf, var_u64_len(value))?;
    put_var_u64(value, buf);
    Ok(())
}

/// Consume one varint from the front of `buf`.
pub fn read_var_u64<B: Buf + ?Sized>(buf: &mut B) -> Result<u64, WireError> {
    let mut value = 0u64;
    for index in 0..MAX_VARINT_LEN {
        if !buf.has_remaining() {
            return Err(WireError::Truncated {
                needed: 1,
                remaining: 0,
            });
        }
        let byte = buf.get_u8();
        let group = u64::from(byte & 0x7F);
        // The tenth byte may only contribute the single remaining bit.
        if index == MAX_VARINT_LEN - 1 && group > 1 {
            return Err(WireError::VarintOverflow);
        }
        value |= group << (7 * index);
        if byte & 0x80 == 0 {
            return Ok(value);
        }
    }
    Err(WireError::VarintOverflow)
}

/// Append `value` as a length-prefixed string.
pub fn write_string<B: BufMut + ?Sized>(value: &str, buf: &mut B) -> Result<(), WireError> {
    let len = value.len() as u64;
    if len > MAX_STRING_SIZE {
        return Err(WireError::StringTooLong {
            len,
            limit: MAX_STRING_SIZE,
        });
    }
    ensure_capacity(buf, var_u64_len(len) + value.len())?;
    put_var_u64(len, buf);
    buf.put_slice(value.as_bytes());
    Ok(())
}

/// Consume one length-prefixed string from the front of `buf`.
pub fn read_string<B: Buf + ?Sized>(buf: &mut B) -> Result<String, WireError> {
    let len = read_var_u64(buf)?;
    if len > MAX_STRING_SIZE {
        return Err(WireError::StringTooLong {
            len,
            limit: MAX_STRING_SIZE,
        });
    }
    // Bounded by MAX_STRING_SIZE above, so the cast cannot truncate.
    let len = len as usize;
    if buf.remaining() < len {
        return Err(WireError::Truncated {
            needed: len,
            remaining: buf.remaining(),
        });
    }
    let mut bytes = vec![0u8; len];
    buf.copy_to_slice(&mut bytes);
    Ok(String::from_utf8(bytes)?)
}

fn ensure_capacity<B: BufMut + ?Sized>(buf: &B, needed: usize) -> Result<(), WireError> {
    let remaining = buf.remaining_mut();
    if remaining < needed {
        return Err(WireError::BufferFull { needed, remaining });
    }
    Ok(())
}

fn put_var_u64<B: BufMut + ?Sized>(mut value: u64, buf: &mut B) {
    while value > 0x7F {
        buf.put_u8((value as u8 & 0x7F) | 0x80);
        value >>= 7;
    }
    buf.put_u8(value as u8);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: u64) -> Vec<u8> {
        let mut buf = Vec::new();
        write_var_u64(value, &mut buf).expect("vec grows");
        buf
    }

    #[test]
    fn varint_layout_matches_leb128() {
        assert_eq!(encode(0), vec![0x00]);
        assert_eq!(encode(1), vec![0x01]);
        assert_eq!(encode(127), vec![0x7F]);
        assert_eq!(encode(128), vec![0x80, 0x01]);
        assert_eq!(encode(300), vec![0xAC, 0x02]);
        assert_eq!(
            encode(u64::MAX),
            vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
    }

    #[test]
    fn varint_len_tracks_encoding() {
        for value in [0, 1, 127, 128, 16_383, 16_384, 1 << 35, u64::MAX] {
            assert_eq!(var_u64_len(value), encode(value).len(), "value {value}");
        }
    }

    #[test]
    fn read_consumes_exactly_one_value() {
        let mut bytes: &[u8] = &[0xAC, 0x02, 0x05];
        assert_eq!(read_var_u64(&mut bytes).expect("first"), 300);
        assert_eq!(read_var_u64(&mut bytes).expect("second"), 5);
        assert!(bytes.is_empty());
    }

    #[test]
    fn truncated_varint_is_reported() {
        let mut bytes: &[u8] = &[0x80, 0x80];
        assert_eq!(
            read_var_u64(&mut bytes),
            Err(WireError::Truncated {
                needed: 1,
                remaining: 0
            })
        );
    }

    #[test]
    fn overlong_varint_is_rejected() {
        let mut too_wide: &[u8] = &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x02];
        assert_eq!(read_var_u64(&mut too_wide), Err(WireError::VarintOverflow));

        let mut endless: &[u8] = &[0x80; 11];
        assert_eq!(read_var_u64(&mut endless), Err(WireError::VarintOverflow));
    }

    #[test]
    fn string_is_length_prefixed() {
        let mut buf = Vec::new();
        write_string("break", &mut buf).expect("vec grows");
        assert_eq!(buf, b"\x05break");

        let mut reader: &[u8] = &buf;
        assert_eq!(read_string(&mut reader).expect("decode"), "break");
        assert!(reader.is_empty());
    }

    #[test]
    fn short_string_payload_is_truncation() {
        let mut reader: &[u8] = b"\x05brk";
        assert_eq!(
            read_string(&mut reader),
            Err(WireError::Truncated {
                needed: 5,
                remaining: 3
            })
        );
    }

    #[test]
    fn oversized_length_prefix_is_rejected_before_allocating() {
        let mut buf = Vec::new();
        write_var_u64(MAX_STRING_SIZE + 1, &mut buf).expect("vec grows");
        let mut reader: &[u8] = &buf;
        assert!(matches!(
            read_string(&mut reader),
            Err(WireError::StringTooLong { .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut reader: &[u8] = &[0x02, 0xC3, 0x28];
        assert!(matches!(
            read_string(&mut reader),
            Err(WireError::InvalidUtf8(_))
        ));
    }

    #[test]
    fn fixed_buffer_overflow_writes_nothing() {
        let mut storage = [0u8; 3];
        let mut window: &mut [u8] = &mut storage;
        let err = write_string("throw", &mut window).expect_err("does not fit");
        assert_eq!(
            err,
            WireError::BufferFull {
                needed: 6,
                remaining: 3
            }
        );
        assert_eq!(storage, [0u8; 3]);
    }
}
