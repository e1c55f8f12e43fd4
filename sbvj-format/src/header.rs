//! Save file header: format marker, entity name and raw flags

use crate::config::Config;
use crate::constants::{FLAGS_LEN, FORMAT_LEN, FORMAT_SBVJ01};
use crate::error::Result;
use crate::layout::take;
use crate::text::{decode_string, encode_string_into};

/// Envelope preceding the single typed value of a save file.
///
/// The header carries no length or checksum of its own; the 6 and 5 byte
/// widths of `format` and `flags` are its only structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Format identifier, copied verbatim
    pub format: [u8; FORMAT_LEN],
    /// Entity name
    pub entity: String,
    /// Raw flag bytes, not interpreted here
    pub flags: [u8; FLAGS_LEN],
}

impl Header {
    /// `SBVJ01` header for `entity` with the given flags
    pub fn sbvj01(entity: impl Into<String>, flags: [u8; FLAGS_LEN]) -> Self {
        Self {
            format: FORMAT_SBVJ01,
            entity: entity.into(),
            flags,
        }
    }

    /// Check whether the format identifier is `SBVJ01`
    pub fn is_sbvj01(&self) -> bool {
        self.format == FORMAT_SBVJ01
    }

    /// Format identifier as text, with invalid bytes replaced
    pub fn format_lossy(&self) -> String {
        String::from_utf8_lossy(&self.format).into_owned()
    }

    /// Encode header to bytes
    pub fn encode(&self, config: &Config) -> Result<Vec<u8>> {
        encode_header(&self.format, &self.entity, &self.flags, config)
    }

    /// Decode header at `offset`, returning it and the offset of the payload
    pub fn decode(bytes: &[u8], offset: usize, config: &Config) -> Result<(Self, usize)> {
        decode_header(bytes, offset, config)
    }
}

/// Concatenate format, string-encoded entity name and flags
pub fn encode_header(
    format: &[u8; FORMAT_LEN],
    entity: &str,
    flags: &[u8; FLAGS_LEN],
    config: &Config,
) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(FORMAT_LEN + entity.len() + 1 + FLAGS_LEN);

    result.extend_from_slice(format);
    encode_string_into(entity, config, &mut result)?;
    result.extend_from_slice(flags);

    Ok(result)
}

/// Decode a header at `offset`, returning it and the offset of the payload
pub fn decode_header(bytes: &[u8], offset: usize, config: &Config) -> Result<(Header, usize)> {
    let mut pos = offset;

    let mut format = [0u8; FORMAT_LEN];
    format.copy_from_slice(take(bytes, pos, FORMAT_LEN)?);
    pos += FORMAT_LEN;

    let (entity, next) = decode_string(bytes, pos, config)?;
    pos = next;

    let mut flags = [0u8; FLAGS_LEN];
    flags.copy_from_slice(take(bytes, pos, FLAGS_LEN)?);
    pos += FLAGS_LEN;

    Ok((
        Header {
            format,
            entity,
            flags,
        },
        pos,
    ))
}
