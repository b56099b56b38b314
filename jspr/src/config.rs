// SPDX-License-Identifier: Apache-2.0

/// Default nesting limit, matching a 32-bit nesting stack.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Scanner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Maximum number of nested object levels, counting the root object as 1.
    ///
    /// Every nested object is scanned by a recursive call, so this also bounds the
    /// scanner's stack usage.
    pub max_depth: usize,
}

impl ScanConfig {
    pub const fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}
