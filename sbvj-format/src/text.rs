//! String payloads: VLQ byte length followed by ASCII (or, opt-in, UTF-8) bytes

use tracing::{error, warn};

use crate::config::Config;
use crate::error::{Result, SbvjError};
use crate::limits::Limits;
use crate::varint::{decode_vlq, encode_vlq};

/// Check that `s` may be written under the active string policy
pub fn check_encodable(s: &str, config: &Config) -> Result<()> {
    if s.is_ascii() {
        return Ok(());
    }
    if config.utf8_fallback {
        warn!(value = %s, "string is not ASCII, encoding as UTF-8");
        return Ok(());
    }
    error!(value = %s, "string is not ASCII and UTF-8 fallback is disabled");
    Err(SbvjError::EncodingError(format!("{s:?} is not ASCII")))
}

/// Interpret raw string bytes found at `offset` under the active string policy
pub fn decode_text(bytes: &[u8], offset: usize, config: &Config) -> Result<String> {
    if bytes.is_ascii() {
        // ASCII is a subset of UTF-8, so this never fails
        return Ok(String::from_utf8_lossy(bytes).into_owned());
    }
    if !config.utf8_fallback {
        error!(offset, len = bytes.len(), "string bytes are not ASCII");
        return Err(SbvjError::DecodingError {
            offset,
            message: "string bytes are not ASCII".to_string(),
        });
    }
    match std::str::from_utf8(bytes) {
        Ok(text) => {
            warn!(offset, value = %text, "string bytes are not ASCII, decoded as UTF-8");
            Ok(text.to_string())
        }
        Err(err) => {
            error!(offset, %err, "string bytes are neither ASCII nor UTF-8");
            Err(SbvjError::DecodingError {
                offset,
                message: format!("string bytes are neither ASCII nor UTF-8: {err}"),
            })
        }
    }
}

/// Append a string payload (no tag) to `out`
pub fn encode_string_into(s: &str, config: &Config, out: &mut Vec<u8>) -> Result<()> {
    check_encodable(s, config)?;
    out.extend_from_slice(&encode_vlq(s.len() as u64));
    out.extend_from_slice(s.as_bytes());
    Ok(())
}

/// Encode a string payload (no tag)
pub fn encode_string(s: &str, config: &Config) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(s.len() + 1);
    encode_string_into(s, config, &mut out)?;
    Ok(out)
}

/// Decode a string payload (no tag) at `offset`, returning the string and the new offset
pub fn decode_string(bytes: &[u8], offset: usize, config: &Config) -> Result<(String, usize)> {
    decode_string_with_limits(bytes, offset, config, &Limits::default())
}

/// [`decode_string`] with explicit limits
pub fn decode_string_with_limits(
    bytes: &[u8],
    offset: usize,
    config: &Config,
    limits: &Limits,
) -> Result<(String, usize)> {
    let (len, start) = decode_vlq(bytes, offset)?;
    if len > limits.max_string_len as u64 {
        return Err(SbvjError::LimitExceeded(format!(
            "string of {len} bytes at offset {offset} exceeds {}",
            limits.max_string_len
        )));
    }
    let len = len as usize;
    let available = bytes.len().saturating_sub(start);
    if len > available {
        return Err(SbvjError::truncated(start, len - available));
    }
    let end = start + len;
    let text = decode_text(&bytes[start..end], start, config)?;
    Ok((text, end))
}
