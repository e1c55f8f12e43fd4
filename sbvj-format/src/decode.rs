//! Tagged value decoder
//!
//! Decoding is offset-passing: every step takes the cursor and returns the
//! advanced one, so several values (e.g. a header and its payload) can be read
//! from the same buffer.

use tracing::{error, warn};

use crate::config::Config;
use crate::error::{Result, SbvjError};
use crate::layout::{read_f64_be, take};
use crate::limits::Limits;
use crate::text::decode_string_with_limits;
use crate::types::TypeTag;
use crate::value::{Map, Value};
use crate::varint::{decode_signed, decode_vlq};

/// Decode one tagged value at `offset`, returning it and the offset just past it
pub fn decode_value(bytes: &[u8], offset: usize, config: &Config) -> Result<(Value, usize)> {
    decode_value_with_limits(bytes, offset, config, &Limits::default())
}

/// [`decode_value`] with explicit limits
pub fn decode_value_with_limits(
    bytes: &[u8],
    offset: usize,
    config: &Config,
    limits: &Limits,
) -> Result<(Value, usize)> {
    let decoder = Decoder {
        bytes,
        config,
        limits,
    };
    decoder.read_value(offset, 0).inspect_err(|err| {
        error!(offset, %err, "failed to decode value");
    })
}

struct Decoder<'a> {
    bytes: &'a [u8],
    config: &'a Config,
    limits: &'a Limits,
}

impl Decoder<'_> {
    fn read_value(&self, offset: usize, depth: usize) -> Result<(Value, usize)> {
        let (raw_tag, offset) = decode_vlq(self.bytes, offset)?;
        let tag = TypeTag::from_u64(raw_tag)?;

        match tag {
            TypeTag::Null => Ok((Value::Null, offset)),
            TypeTag::Float => {
                let (f, offset) = read_f64_be(self.bytes, offset)?;
                Ok((Value::Float(f), offset))
            }
            TypeTag::Bool => {
                let raw = take(self.bytes, offset, 1)?;
                Ok((Value::Bool(raw[0] != 0), offset + 1))
            }
            TypeTag::Int => {
                let (i, offset) = decode_signed(self.bytes, offset)?;
                Ok((Value::Int(i), offset))
            }
            TypeTag::String => {
                let (s, offset) =
                    decode_string_with_limits(self.bytes, offset, self.config, self.limits)?;
                Ok((Value::String(s), offset))
            }
            TypeTag::List => self.read_list(offset, self.enter(depth)?),
            TypeTag::Map => self.read_map(offset, self.enter(depth)?),
        }
    }

    fn read_list(&self, offset: usize, depth: usize) -> Result<(Value, usize)> {
        let (count, mut offset) = self.read_count(offset, 1)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            let (item, next) = self.read_value(offset, depth)?;
            items.push(item);
            offset = next;
        }
        Ok((Value::List(items), offset))
    }

    fn read_map(&self, offset: usize, depth: usize) -> Result<(Value, usize)> {
        // smallest entry: empty key (1 byte) + null value (1 byte)
        let (count, mut offset) = self.read_count(offset, 2)?;
        let mut map = Map::with_capacity(count);
        for _ in 0..count {
            let key_offset = offset;
            let (key, next) =
                decode_string_with_limits(self.bytes, offset, self.config, self.limits)?;
            let (item, next) = self.read_value(next, depth)?;
            if map.insert(key, item).is_some() {
                warn!(offset = key_offset, "duplicate map key, keeping the last value");
            }
            offset = next;
        }
        if !self.config.preserve_map_order {
            map.sort_unstable_keys();
        }
        Ok((Value::Map(map), offset))
    }

    /// Read a collection count, rejecting counts the remaining input cannot hold
    fn read_count(&self, offset: usize, min_entry_len: usize) -> Result<(usize, usize)> {
        let (count, start) = decode_vlq(self.bytes, offset)?;
        if count > self.limits.max_collection_len as u64 {
            return Err(SbvjError::LimitExceeded(format!(
                "collection of {count} entries at offset {offset} exceeds {}",
                self.limits.max_collection_len
            )));
        }
        let count = count as usize;
        let needed = count.saturating_mul(min_entry_len);
        let available = self.bytes.len().saturating_sub(start);
        if needed > available {
            return Err(SbvjError::truncated(start, needed - available));
        }
        Ok((count, start))
    }

    fn enter(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.limits.max_depth {
            return Err(SbvjError::DepthExceeded(self.limits.max_depth));
        }
        Ok(depth)
    }
}
