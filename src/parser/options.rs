//! Parsing options and configuration.

use super::cleanup::{CleanupOptions, CleanupPreset};

/// Options for parsing raw input text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Reject currency-like `$..$` spans as inline math
    pub strict_inline_math: bool,

    /// Input cleanup applied before parsing
    pub cleanup: CleanupOptions,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the currency guard for inline math.
    pub fn with_strict_inline_math(mut self, strict: bool) -> Self {
        self.strict_inline_math = strict;
        self
    }

    /// Match every single-line `$..$` pair as inline math.
    pub fn compat_inline_math(mut self) -> Self {
        self.strict_inline_math = false;
        self
    }

    /// Set cleanup options.
    pub fn with_cleanup(mut self, cleanup: CleanupOptions) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Set cleanup options from a preset.
    pub fn with_cleanup_preset(mut self, preset: CleanupPreset) -> Self {
        self.cleanup = CleanupOptions::from_preset(preset);
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict_inline_math: true,
            cleanup: CleanupOptions::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new()
            .compat_inline_math()
            .with_cleanup_preset(CleanupPreset::Standard);

        assert!(!options.strict_inline_math);
        assert!(options.cleanup.normalize_unicode);
    }

    #[test]
    fn test_default_is_strict() {
        let options = ParseOptions::default();
        assert!(options.strict_inline_math);
        assert_eq!(options.cleanup, CleanupOptions::minimal());
    }
}
