//! Per-instance extraction configuration.
//!
//! Unlike a global settings object, [`ExtractionConfig`] is a plain value the
//! caller constructs and hands to [`crate::extractor::pages::PagesExtractor::new`].
//! There is no process-wide mutable configuration state.

/// Tunables for a single [`crate::extractor::pages::PagesExtractor`] instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionConfig {
    /// Fallback space-width sentinel used when a font supplies no width
    /// information at all (no `/Widths`, `/W`, `/DW`, or FontDescriptor
    /// metrics).
    pub default_space_width_sentinel: f32,
    /// Tolerance used when comparing floating-point page-space coordinates,
    /// e.g. in matrix-composition and round-trip tests.
    pub float_epsilon: f32,
    /// Maximum depth for page-tree and Form XObject recursion. Exceeding it
    /// raises [`crate::error::ExtractError::Cycle`] instead of overflowing
    /// the call stack.
    pub max_recursion_depth: u32,
}

impl ExtractionConfig {
    /// Construct a config with explicit values.
    pub fn new(default_space_width_sentinel: f32, float_epsilon: f32, max_recursion_depth: u32) -> Self {
        Self {
            default_space_width_sentinel,
            float_epsilon,
            max_recursion_depth,
        }
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            default_space_width_sentinel: 100.0,
            float_epsilon: 1e-4,
            max_recursion_depth: 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec_sentinels() {
        let cfg = ExtractionConfig::default();
        assert_eq!(cfg.default_space_width_sentinel, 100.0);
        assert_eq!(cfg.max_recursion_depth, 64);
    }

    #[test]
    fn new_overrides_defaults() {
        let cfg = ExtractionConfig::new(50.0, 1e-6, 8);
        assert_eq!(cfg.default_space_width_sentinel, 50.0);
        assert_eq!(cfg.max_recursion_depth, 8);
    }
}
