//! SBVJ Format - Core primitives for versioned-JSON save files
//!
//! This crate provides the encoding/decoding engine for the SBVJ binary format
//! with no I/O dependencies. It includes:
//!
//! - Magic numbers and constants
//! - Variable-length integer encoding (big-endian VLQ / ZigZag)
//! - String payloads with an opt-in UTF-8 fallback
//! - The recursive tagged value codec
//! - The header envelope
//! - Fixed-layout struct reads
//! - Error types, configuration switches and resource limits

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod decode;
pub mod encode;
pub mod error;
pub mod header;
pub mod json;
pub mod layout;
pub mod limits;
pub mod text;
pub mod types;
pub mod value;
pub mod varint;

// Re-export commonly used types
pub use config::Config;
pub use decode::{decode_value, decode_value_with_limits};
pub use encode::{encode_value, encode_value_into, encode_value_with_limits};
pub use error::{Result, SbvjError};
pub use header::{decode_header, encode_header, Header};
pub use layout::{read_struct, Endian, Field, Scalar, StructValue};
pub use limits::Limits;
pub use types::TypeTag;
pub use value::{Map, Value};
