//! Variable-length integer encoding (big-endian VLQ / ZigZag)
//!
//! Groups of seven bits are written most significant first; every byte except
//! the last carries the continuation bit. This is the opposite group order of
//! LEB128.

use smallvec::SmallVec;

use crate::constants::{VLQ_CONTINUATION, VLQ_MAX_LEN, VLQ_PAYLOAD_MASK};
use crate::error::{Result, SbvjError};

/// Encode a u64 as a minimal big-endian VLQ
pub fn encode_vlq(val: u64) -> SmallVec<[u8; VLQ_MAX_LEN]> {
    let mut groups = [0u8; VLQ_MAX_LEN];
    let mut start = VLQ_MAX_LEN - 1;
    let mut x = val;

    groups[start] = (x & VLQ_PAYLOAD_MASK as u64) as u8;
    x >>= 7;
    while x != 0 {
        start -= 1;
        groups[start] = (x & VLQ_PAYLOAD_MASK as u64) as u8 | VLQ_CONTINUATION;
        x >>= 7;
    }

    SmallVec::from_slice(&groups[start..])
}

/// Encode a signed quantity that must not be negative (lengths, counts, tags)
pub fn try_encode_vlq(val: i64) -> Result<SmallVec<[u8; VLQ_MAX_LEN]>> {
    if val < 0 {
        return Err(SbvjError::NegativeValue(val));
    }
    Ok(encode_vlq(val as u64))
}

/// Decode a big-endian VLQ starting at `offset`, returning the value and the new offset
pub fn decode_vlq(bytes: &[u8], offset: usize) -> Result<(u64, usize)> {
    let mut value = 0u64;
    let mut pos = offset;

    loop {
        let byte = *bytes.get(pos).ok_or_else(|| SbvjError::truncated(pos, 1))?;

        if value > (u64::MAX >> 7) {
            return Err(SbvjError::LimitExceeded(format!(
                "VLQ at offset {offset} exceeds 64 bits"
            )));
        }

        value = (value << 7) | (byte & VLQ_PAYLOAD_MASK) as u64;
        pos += 1;

        if byte & VLQ_CONTINUATION == 0 {
            return Ok((value, pos));
        }
    }
}

/// ZigZag encode a signed integer (-1 -> 1, 1 -> 2, -2 -> 3, ...)
pub fn zigzag_encode(v: i64) -> u64 {
    ((v << 1) ^ (v >> 63)) as u64
}

/// ZigZag decode to signed integer
pub fn zigzag_decode(u: u64) -> i64 {
    ((u >> 1) as i64) ^ -((u & 1) as i64)
}

/// Encode a signed integer as a zig-zag VLQ
pub fn encode_signed(val: i64) -> SmallVec<[u8; VLQ_MAX_LEN]> {
    encode_vlq(zigzag_encode(val))
}

/// Decode a zig-zag VLQ starting at `offset`
pub fn decode_signed(bytes: &[u8], offset: usize) -> Result<(i64, usize)> {
    let (raw, offset) = decode_vlq(bytes, offset)?;
    Ok((zigzag_decode(raw), offset))
}
