//! Constants and magic numbers for the SBVJ format

/// Format marker of versioned-JSON save files: "SBVJ01"
pub const FORMAT_SBVJ01: [u8; FORMAT_LEN] = *b"SBVJ01";

/// Length of the format identifier that opens every header.
pub const FORMAT_LEN: usize = 6;

/// Length of the raw flag block that closes every header.
pub const FLAGS_LEN: usize = 5;

/// Width of an encoded float payload.
pub const FLOAT_LEN: usize = 8;

/// Type tag representing a null value.
pub const TAG_NULL: u8 = 1;
/// Type tag representing a double-precision float.
pub const TAG_FLOAT: u8 = 2;
/// Type tag representing a boolean value.
pub const TAG_BOOL: u8 = 3;
/// Type tag representing a zig-zag signed integer.
pub const TAG_INT: u8 = 4;
/// Type tag representing a length-prefixed string.
pub const TAG_STRING: u8 = 5;
/// Type tag representing a list of tagged values.
pub const TAG_LIST: u8 = 6;
/// Type tag representing a map of string keys to tagged values.
pub const TAG_MAP: u8 = 7;

/// Continuation bit of a VLQ byte.
pub const VLQ_CONTINUATION: u8 = 0x80;
/// Payload bits of a VLQ byte.
pub const VLQ_PAYLOAD_MASK: u8 = 0x7F;
/// Longest VLQ sequence able to carry a u64.
pub const VLQ_MAX_LEN: usize = 10;

/// Environment switch enabling the UTF-8 string fallback.
pub const ENV_UTF8: &str = "SBVJ_UTF8";
/// Environment switch tolerating multi-field struct reads.
pub const ENV_BYTE_STRUCT: &str = "SBVJ_BYTE_STRUCT";
/// Environment switch preserving map key order.
pub const ENV_ORDERED_MAP: &str = "SBVJ_ORDERED_MAP";
