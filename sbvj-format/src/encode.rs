//! Tagged value encoder

use tracing::error;

use crate::config::Config;
use crate::error::{Result, SbvjError};
use crate::limits::Limits;
use crate::text::encode_string_into;
use crate::value::{Map, Value};
use crate::varint::{encode_signed, encode_vlq};

/// Encode a tagged value (tag + payload)
pub fn encode_value(value: &Value, config: &Config) -> Result<Vec<u8>> {
    encode_value_with_limits(value, config, &Limits::default())
}

/// [`encode_value`] with explicit limits
pub fn encode_value_with_limits(value: &Value, config: &Config, limits: &Limits) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    encode_value_into(value, config, limits, &mut out)?;
    Ok(out)
}

/// Append a tagged value to `out`; on error `out` may hold a partial encoding
pub fn encode_value_into(
    value: &Value,
    config: &Config,
    limits: &Limits,
    out: &mut Vec<u8>,
) -> Result<()> {
    let mut encoder = Encoder {
        config,
        limits,
        out,
    };
    encoder.write_value(value, 0).inspect_err(|err| {
        error!(%err, "failed to encode value");
    })
}

struct Encoder<'a> {
    config: &'a Config,
    limits: &'a Limits,
    out: &'a mut Vec<u8>,
}

impl Encoder<'_> {
    fn write_value(&mut self, value: &Value, depth: usize) -> Result<()> {
        self.out.extend_from_slice(&encode_vlq(value.tag() as u64));

        match value {
            Value::Null => {}
            Value::Float(f) => self.out.extend_from_slice(&f.to_be_bytes()),
            Value::Bool(b) => self.out.push(u8::from(*b)),
            Value::Int(i) => self.out.extend_from_slice(&encode_signed(*i)),
            Value::String(s) => encode_string_into(s, self.config, self.out)?,
            Value::List(items) => {
                let depth = self.enter(depth)?;
                self.out.extend_from_slice(&encode_vlq(items.len() as u64));
                for item in items {
                    self.write_value(item, depth)?;
                }
            }
            Value::Map(map) => {
                let depth = self.enter(depth)?;
                self.write_map(map, depth)?;
            }
        }

        Ok(())
    }

    fn write_map(&mut self, map: &Map, depth: usize) -> Result<()> {
        self.out.extend_from_slice(&encode_vlq(map.len() as u64));

        if self.config.preserve_map_order {
            for (key, value) in map {
                self.write_entry(key, value, depth)?;
            }
        } else {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
            for (key, value) in entries {
                self.write_entry(key, value, depth)?;
            }
        }

        Ok(())
    }

    fn write_entry(&mut self, key: &str, value: &Value, depth: usize) -> Result<()> {
        encode_string_into(key, self.config, self.out)?;
        self.write_value(value, depth)
    }

    fn enter(&self, depth: usize) -> Result<usize> {
        let depth = depth + 1;
        if depth > self.limits.max_depth {
            return Err(SbvjError::DepthExceeded(self.limits.max_depth));
        }
        Ok(depth)
    }
}
