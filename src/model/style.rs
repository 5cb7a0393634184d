//! Style contexts: named presets controlling heading, accent and container classes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Presentational attribute bundles for one style context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleBundle {
    /// Extra classes on level-1 headings
    pub h1: &'static str,
    /// Accent classes (level-3 headings, citation links)
    pub accent: &'static str,
    /// Classes on the document container
    pub container: &'static str,
}

/// A named style preset.
///
/// The set is closed; every variant defines all three bundles, so a lookup
/// can never fail once a `StyleContext` value exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleContext {
    /// Clean sans-serif look with indigo accents
    #[default]
    Modern,
    /// Serif, justified, uppercase centered title
    Academic,
    /// Bold violet headings
    Creative,
}

impl StyleContext {
    /// All style contexts in display order.
    pub fn all() -> &'static [StyleContext] {
        &[
            StyleContext::Modern,
            StyleContext::Academic,
            StyleContext::Creative,
        ]
    }

    /// Lowercase name used in configuration files and on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            StyleContext::Modern => "modern",
            StyleContext::Academic => "academic",
            StyleContext::Creative => "creative",
        }
    }

    /// Attribute bundles for this style.
    pub fn bundle(&self) -> StyleBundle {
        match self {
            StyleContext::Modern => StyleBundle {
                h1: "text-slate-900 border-slate-100",
                accent: "text-indigo-600",
                container: "font-sans text-slate-800",
            },
            StyleContext::Academic => StyleBundle {
                h1: "text-black border-black/20 uppercase tracking-widest text-center",
                accent: "text-black italic",
                container: "font-serif text-black leading-loose text-justify",
            },
            StyleContext::Creative => StyleBundle {
                h1: "text-violet-700 border-violet-100 font-black tracking-tight",
                accent: "text-violet-600",
                container: "font-sans text-slate-900",
            },
        }
    }
}

impl fmt::Display for StyleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StyleContext {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        StyleContext::all()
            .iter()
            .copied()
            .find(|style| style.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::InvalidStyleVariant(name.to_string()))
    }
}
