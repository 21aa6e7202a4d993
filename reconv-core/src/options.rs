//! Conversion settings

/// Default limit on capturing groups in one pattern
pub const DEFAULT_MAX_GROUPS: usize = 50;

/// Default bound on the accumulated body of one character class
pub const DEFAULT_MAX_CLASS_BYTES: usize = 64 * 1024;

/// Settings for [`PatternConverter`](crate::PatternConverter)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Maximum number of capturing groups
    pub max_groups: usize,
    /// Maximum size in bytes of a character class body
    pub max_class_bytes: usize,
}

impl ConvertOptions {
    /// Create the default settings
    pub fn new() -> Self {
        ConvertOptions {
            max_groups: DEFAULT_MAX_GROUPS,
            max_class_bytes: DEFAULT_MAX_CLASS_BYTES,
        }
    }

    /// Set the capturing group limit
    pub fn max_groups(mut self, limit: usize) -> Self {
        self.max_groups = limit;
        self
    }

    /// Set the character class bound
    pub fn max_class_bytes(mut self, limit: usize) -> Self {
        self.max_class_bytes = limit;
        self
    }
}

impl Default for ConvertOptions {
    fn default() -> Self {
        ConvertOptions::new()
    }
}
