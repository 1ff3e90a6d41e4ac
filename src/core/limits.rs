use serde::{Deserialize, Serialize};

/// Resource bounds applied before and while building the XML tree.
///
/// Real CFDI documents are a few kilobytes and rarely nest deeper than
/// eight levels; the defaults leave generous headroom for large payroll
/// or payment-complement files while refusing pathological input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseLimits {
    /// Maximum input size in bytes, checked before parsing.
    pub max_bytes: usize,
    /// Maximum element nesting depth.
    pub max_depth: usize,
    /// Maximum number of elements in the tree.
    pub max_elements: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_bytes: 16 * 1024 * 1024,
            max_depth: 64,
            max_elements: 200_000,
        }
    }
}

impl ParseLimits {
    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }
}
