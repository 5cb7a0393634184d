//! Configuration loaded from TOML files.
//!
//! ```toml
//! style = "academic"
//!
//! [math]
//! strict_inline = true
//!
//! [cleanup]
//! preset = "standard"
//!
//! [render]
//! preserve_list_start = false
//! wrap_container = true
//! ```
//!
//! Every field is optional. The style name is validated when the file is
//! loaded, so an unknown style never reaches a transform.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::StyleContext;
use crate::parser::{CleanupPreset, ParseOptions};
use crate::render::RenderOptions;

/// Transformer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Style context name
    pub style: String,

    /// Math extraction settings
    pub math: MathConfig,

    /// Input cleanup settings
    pub cleanup: CleanupConfig,

    /// Output settings
    pub render: RenderConfig,
}

/// `[math]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MathConfig {
    /// Reject currency-like `$..$` spans
    pub strict_inline: bool,
}

impl Default for MathConfig {
    fn default() -> Self {
        Self {
            strict_inline: true,
        }
    }
}

/// `[cleanup]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Cleanup preset
    pub preset: CleanupPreset,
}

/// `[render]` table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Emit `start="N"` on ordered lists
    pub preserve_list_start: bool,

    /// Wrap output in a styled document container
    pub wrap_container: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            style: StyleContext::default().name().to_string(),
            math: MathConfig::default(),
            cleanup: CleanupConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

impl Config {
    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = toml::from_str(text)?;
        config.style()?;
        Ok(config)
    }

    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading config from: {}", path.display());

        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents).map_err(|e| {
            log::warn!("Config file at {} is invalid: {}", path.display(), e);
            e
        })?;

        log::info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::Other(format!("TOML serialization error: {}", e)))
    }

    /// The validated style context.
    pub fn style(&self) -> Result<StyleContext> {
        self.style.parse()
    }

    /// Parse options described by this configuration.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::new()
            .with_strict_inline_math(self.math.strict_inline)
            .with_cleanup_preset(self.cleanup.preset)
    }

    /// Render options described by this configuration.
    pub fn render_options(&self) -> Result<RenderOptions> {
        Ok(RenderOptions::new()
            .with_style(self.style()?)
            .with_list_start(self.render.preserve_list_start)
            .with_container(self.render.wrap_container))
    }
}
