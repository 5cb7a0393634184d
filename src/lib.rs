//! # doxy
//!
//! Turns loosely Markdown-flavored text, as pasted from a chat assistant,
//! into styled HTML markup for an editable document surface.
//!
//! ## Quick Start
//!
//! ```
//! use doxy::{transform, StyleContext};
//!
//! let html = transform("# Notes\n\nSee [Paper](https://example.com).", StyleContext::Modern);
//! assert!(html.starts_with("<h1 "));
//! assert!(html.contains("class=\"citation-link"));
//! ```
//!
//! ## Features
//!
//! - **Headings, emphasis, code, quotes, links, lists, tables**
//! - **Math**: `$$display$$` and `$inline$` spans, rendered by an injected
//!   [`MathRenderer`] or emitted as escaped source
//! - **Idempotent**: markup this crate produced passes through unchanged
//! - **Bibliography and cover page** helpers
//! - **Parallel batches**: uses Rayon for many documents
//!
//! Transforming text is total: any input produces markup, and blank input
//! produces an empty string. Errors only come from configuration, I/O and
//! serialization.

pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod render;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use model::{
    Alignment, Block, Citation, CodeBlock, Document, Inline, ListKind, MathMode, MathSpan,
    Metadata, StyleBundle, StyleContext, Table,
};
pub use parser::{CleanupOptions, CleanupPreset, ParseOptions, TextParser};
pub use render::{
    Bibliography, CoverPage, DocumentStats, HtmlRenderer, JsonFormat, MathRenderer,
    RenderOptions, RenderResult,
};

use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;

/// Transform raw text into HTML markup.
///
/// # Example
///
/// ```
/// use doxy::{transform, StyleContext};
///
/// let html = transform("**Only This**", StyleContext::Academic);
/// assert_eq!(html, transform("### Only This", StyleContext::Academic));
/// assert_eq!(transform("  \n ", StyleContext::Modern), "");
/// ```
pub fn transform(raw: &str, style: StyleContext) -> String {
    Transformer::new(style).transform(raw)
}

/// Transform raw text with custom options.
pub fn transform_with_options(
    raw: &str,
    parse_options: &ParseOptions,
    render_options: &RenderOptions,
) -> String {
    let doc = TextParser::with_options(parse_options.clone()).parse(raw);
    HtmlRenderer::new(render_options.clone()).render_markup(&doc)
}

/// Parse raw text into a document tree.
pub fn parse(raw: &str) -> Document {
    TextParser::new().parse(raw)
}

/// Read a UTF-8 text file and transform it.
///
/// # Example
///
/// ```no_run
/// use doxy::{transform_file, StyleContext};
///
/// let html = transform_file("notes.md", StyleContext::Modern)?;
/// std::fs::write("notes.html", html)?;
/// # Ok::<(), doxy::Error>(())
/// ```
pub fn transform_file<P: AsRef<Path>>(path: P, style: StyleContext) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    Ok(transform(&text, style))
}

/// Reusable transformer holding parse and render options.
///
/// A transformer is `Send + Sync`; one instance can serve many threads.
///
/// # Example
///
/// ```
/// use doxy::{StyleContext, Transformer};
///
/// let transformer = Transformer::new(StyleContext::Creative)
///     .with_list_start(true)
///     .compat_inline_math();
///
/// let outputs = transformer.transform_batch(&["# One", "5. five"]);
/// assert_eq!(outputs.len(), 2);
/// assert!(outputs[1].starts_with("<ol start=\"5\""));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    parse_options: ParseOptions,
    render_options: RenderOptions,
}

impl Transformer {
    /// Create a transformer for a style context.
    pub fn new(style: StyleContext) -> Self {
        Self {
            parse_options: ParseOptions::default(),
            render_options: RenderOptions::new().with_style(style),
        }
    }

    /// Create a transformer from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            parse_options: config.parse_options(),
            render_options: config.render_options()?,
        })
    }

    /// Set parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse_options = options;
        self
    }

    /// Set render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Set the style context.
    pub fn with_style(mut self, style: StyleContext) -> Self {
        self.render_options = self.render_options.with_style(style);
        self
    }

    /// Set the math renderer.
    pub fn with_math_renderer(mut self, renderer: Arc<dyn MathRenderer>) -> Self {
        self.render_options = self.render_options.with_math_renderer(renderer);
        self
    }

    /// Match every single-line `$..$` pair as inline math.
    pub fn compat_inline_math(mut self) -> Self {
        self.parse_options = self.parse_options.compat_inline_math();
        self
    }

    /// Set cleanup preset.
    pub fn with_cleanup(mut self, preset: CleanupPreset) -> Self {
        self.parse_options = self.parse_options.with_cleanup_preset(preset);
        self
    }

    /// Keep the written number of the first ordered list item.
    pub fn with_list_start(mut self, preserve: bool) -> Self {
        self.render_options = self.render_options.with_list_start(preserve);
        self
    }

    /// Wrap output in a styled document container.
    pub fn with_container(mut self, wrap: bool) -> Self {
        self.render_options = self.render_options.with_container(wrap);
        self
    }

    /// Get the parse options.
    pub fn parse_options(&self) -> &ParseOptions {
        &self.parse_options
    }

    /// Get the render options.
    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Parse raw text and return a result wrapper.
    pub fn parse(&self, raw: &str) -> Transformed {
        Transformed {
            document: TextParser::with_options(self.parse_options.clone()).parse(raw),
            render_options: self.render_options.clone(),
        }
    }

    /// Transform raw text into HTML markup.
    pub fn transform(&self, raw: &str) -> String {
        transform_with_options(raw, &self.parse_options, &self.render_options)
    }

    /// Transform raw text, collecting document statistics.
    pub fn transform_with_stats(&self, raw: &str) -> RenderResult {
        let doc = TextParser::with_options(self.parse_options.clone()).parse(raw);
        let renderer = HtmlRenderer::new(self.render_options.clone());
        let content = renderer.render_markup(&doc);
        RenderResult::new(content, doc.metadata.clone(), DocumentStats::from_document(&doc))
    }

    /// Transform many inputs in parallel, preserving order.
    pub fn transform_batch<S>(&self, inputs: &[S]) -> Vec<String>
    where
        S: AsRef<str> + Sync,
    {
        log::debug!("transforming batch of {} inputs", inputs.len());
        inputs
            .par_iter()
            .map(|input| self.transform(input.as_ref()))
            .collect()
    }
}

/// A parsed document together with the options to render it.
#[derive(Debug, Clone)]
pub struct Transformed {
    /// The parsed document
    pub document: Document,
    /// Render options to use
    render_options: RenderOptions,
}

impl Transformed {
    /// Convert to HTML markup.
    pub fn to_html(&self) -> Result<String> {
        render::to_html(&self.document, &self.render_options)
    }

    /// Convert to HTML markup with statistics.
    pub fn to_html_with_stats(&self) -> Result<RenderResult> {
        render::to_html_with_stats(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Citation links in document order.
    pub fn citations(&self) -> Vec<Citation> {
        self.document.citations()
    }

    /// Reference list built from the document's citations.
    pub fn bibliography(&self) -> Bibliography {
        Bibliography::from_document(&self.document)
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_empty_input() {
        assert_eq!(transform("", StyleContext::Modern), "");
        assert_eq!(transform("\n\n   \n", StyleContext::Creative), "");
    }

    #[test]
    fn test_transformer_builder() {
        let transformer = Transformer::new(StyleContext::Academic)
            .compat_inline_math()
            .with_cleanup(CleanupPreset::Standard)
            .with_container(true);

        assert!(!transformer.parse_options().strict_inline_math);
        assert!(transformer.parse_options().cleanup.remove_zero_width);
        assert_eq!(transformer.render_options().style, StyleContext::Academic);
        assert!(transformer.render_options().wrap_container);
    }

    #[test]
    fn test_transformer_from_config() {
        let config = Config::from_toml_str("style = \"creative\"\n[render]\nwrap_container = true")
            .unwrap();
        let transformer = Transformer::from_config(&config).unwrap();
        let html = transformer.transform("hi");
        assert!(html.starts_with("<div class=\"doxy-document font-sans text-slate-900\">"));
    }

    #[test]
    fn test_transformer_from_config_rejects_bad_style() {
        let config = Config {
            style: "gothic".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            Transformer::from_config(&config),
            Err(Error::InvalidStyleVariant(_))
        ));
    }

    #[test]
    fn test_transformed_outputs() {
        let result = Transformer::default().parse("# T\n\n[a](https://a.example) and [b](https://b.example)");
        assert_eq!(result.citations().len(), 2);
        assert_eq!(result.bibliography().len(), 2);
        assert_eq!(result.document().title(), Some("T".to_string()));
        assert!(result.to_text().unwrap().starts_with("T\n\n"));
        assert!(result.to_json(JsonFormat::Compact).unwrap().contains("\"link\""));
        assert!(result.to_html().unwrap().contains("citation-link"));
    }

    #[test]
    fn test_transform_with_stats() {
        let result = Transformer::default().transform_with_stats("word ".repeat(401).as_str());
        assert_eq!(result.stats.word_count, 401);
        assert_eq!(result.stats.reading_minutes, 3);
        assert_eq!(result.stats.paragraph_count, 1);
    }

    #[test]
    fn test_batch_preserves_order() {
        let inputs: Vec<String> = (0..32).map(|i| format!("# Heading {}", i)).collect();
        let outputs = Transformer::default().transform_batch(&inputs);
        assert_eq!(outputs.len(), 32);
        for (i, html) in outputs.iter().enumerate() {
            assert!(html.ends_with(&format!(">Heading {}</h1>", i)));
        }
    }

    #[test]
    fn test_transformer_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Transformer>();
    }
}
