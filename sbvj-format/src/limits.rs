//! Resource limits for hostile input

/// Limits guarding the recursive codec against adversarial buffers
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum nesting depth of lists and maps (default: 512)
    pub max_depth: usize,
    /// Maximum byte length of a single string (default: 16 MiB)
    pub max_string_len: usize,
    /// Maximum entries in a single list or map (default: 16 Mi)
    pub max_collection_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_string_len: 16 * 1024 * 1024,
            max_collection_len: 16 * 1024 * 1024,
        }
    }
}
