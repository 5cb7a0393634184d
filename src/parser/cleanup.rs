//! Input cleanup applied to pasted text before parsing.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

use super::protect::is_sentinel;

/// Cleanup preset levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPreset {
    /// Line endings and reserved characters only
    #[default]
    Minimal,
    /// Minimal + NFC, zero-width removal, NBSP replacement, trailing whitespace trim
    Standard,
}

/// Options for input cleanup.
///
/// Line-ending normalization and removal of the parser's reserved
/// sentinel characters always run; the flags below are optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupOptions {
    /// Normalize Unicode to NFC form
    pub normalize_unicode: bool,

    /// Remove zero-width characters (ZWSP, ZWNJ, ZWJ, BOM)
    pub remove_zero_width: bool,

    /// Replace non-breaking spaces with plain spaces
    pub replace_nbsp: bool,

    /// Strip trailing whitespace from every line
    pub trim_trailing_whitespace: bool,

    /// Expand tabs to four spaces
    pub expand_tabs: bool,
}

impl CleanupOptions {
    /// Create options from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        match preset {
            CleanupPreset::Minimal => Self::minimal(),
            CleanupPreset::Standard => Self::standard(),
        }
    }

    /// Minimal cleanup options.
    pub fn minimal() -> Self {
        Self {
            normalize_unicode: false,
            remove_zero_width: false,
            replace_nbsp: false,
            trim_trailing_whitespace: false,
            expand_tabs: false,
        }
    }

    /// Standard cleanup options for text pasted from chat interfaces.
    pub fn standard() -> Self {
        Self {
            normalize_unicode: true,
            remove_zero_width: true,
            replace_nbsp: true,
            trim_trailing_whitespace: true,
            expand_tabs: false,
        }
    }
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self::minimal()
    }
}

/// Input cleanup pipeline.
#[derive(Debug, Clone, Default)]
pub struct CleanupPipeline {
    options: CleanupOptions,
}

impl CleanupPipeline {
    /// Create a new cleanup pipeline with the given options.
    pub fn new(options: CleanupOptions) -> Self {
        Self { options }
    }

    /// Create a pipeline from a preset.
    pub fn from_preset(preset: CleanupPreset) -> Self {
        Self::new(CleanupOptions::from_preset(preset))
    }

    /// Process text through the cleanup pipeline.
    pub fn process(&self, text: &str) -> String {
        let mut result = normalize_line_endings(text);

        // Sentinels would be mistaken for protected-span tokens
        if result.chars().any(is_sentinel) {
            result = result.chars().filter(|c| !is_sentinel(*c)).collect();
        }

        if self.options.normalize_unicode {
            result = result.nfc().collect();
        }

        if self.options.remove_zero_width {
            result = result
                .chars()
                .filter(|c| !matches!(c, '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}'))
                .collect();
        }

        if self.options.replace_nbsp {
            result = result.replace('\u{00A0}', " ");
        }

        if self.options.expand_tabs {
            result = result.replace('\t', "    ");
        }

        if self.options.trim_trailing_whitespace {
            result = result
                .split('\n')
                .map(str::trim_end)
                .collect::<Vec<_>>()
                .join("\n");
        }

        result
    }
}

fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
