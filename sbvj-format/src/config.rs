//! Codec behaviour switches

use crate::constants::{ENV_BYTE_STRUCT, ENV_ORDERED_MAP, ENV_UTF8};

/// Immutable switches consulted by every encode/decode entry point.
///
/// None of them alter the structural wire rules; they only decide how strings
/// are interpreted, whether multi-field struct reads are accepted and in which
/// order map entries are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Accept (with a warning) strings that are not 7-bit ASCII by treating them as UTF-8
    pub utf8_fallback: bool,
    /// Let the struct reader return several non-byte fields instead of failing
    pub tolerate_multi_byte_struct: bool,
    /// Keep map entries in insertion/wire order; otherwise order by key
    pub preserve_map_order: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            utf8_fallback: false,
            tolerate_multi_byte_struct: false,
            preserve_map_order: true,
        }
    }
}

impl Config {
    /// Read the switches from `SBVJ_UTF8`, `SBVJ_BYTE_STRUCT` and `SBVJ_ORDERED_MAP`
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the switches from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let flag = |name: &str, default: bool| match lookup(name) {
            Some(raw) => parse_flag(&raw),
            None => default,
        };

        Self {
            utf8_fallback: flag(ENV_UTF8, defaults.utf8_fallback),
            tolerate_multi_byte_struct: flag(
                ENV_BYTE_STRUCT,
                defaults.tolerate_multi_byte_struct,
            ),
            preserve_map_order: flag(ENV_ORDERED_MAP, defaults.preserve_map_order),
        }
    }

    /// Set the UTF-8 fallback switch
    pub fn with_utf8_fallback(mut self, enabled: bool) -> Self {
        self.utf8_fallback = enabled;
        self
    }

    /// Set the multi-field struct tolerance switch
    pub fn with_tolerate_multi_byte_struct(mut self, enabled: bool) -> Self {
        self.tolerate_multi_byte_struct = enabled;
        self
    }

    /// Set the map order preservation switch
    pub fn with_preserve_map_order(mut self, enabled: bool) -> Self {
        self.preserve_map_order = enabled;
        self
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_uppercase().as_str(), "1" | "T" | "TRUE")
}
