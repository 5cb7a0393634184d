//! Rendering options and configuration.

use std::fmt;
use std::sync::Arc;

use crate::model::StyleContext;

use super::MathRenderer;

/// Options for rendering document content.
#[derive(Clone, Default)]
pub struct RenderOptions {
    /// Style context selecting heading, accent and container classes
    pub style: StyleContext,

    /// Optional math renderer; `None` emits escaped source
    pub math_renderer: Option<Arc<dyn MathRenderer>>,

    /// Emit `start="N"` on ordered lists that do not start at 1
    pub preserve_list_start: bool,

    /// Wrap the output in a styled document container
    pub wrap_container: bool,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style context.
    pub fn with_style(mut self, style: StyleContext) -> Self {
        self.style = style;
        self
    }

    /// Set the math renderer.
    pub fn with_math_renderer(mut self, renderer: Arc<dyn MathRenderer>) -> Self {
        self.math_renderer = Some(renderer);
        self
    }

    /// Keep the written number of the first ordered list item.
    pub fn with_list_start(mut self, preserve: bool) -> Self {
        self.preserve_list_start = preserve;
        self
    }

    /// Enable or disable the document container.
    pub fn with_container(mut self, wrap: bool) -> Self {
        self.wrap_container = wrap;
        self
    }

    pub(crate) fn math_renderer(&self) -> Option<&dyn MathRenderer> {
        self.math_renderer.as_deref()
    }
}

impl fmt::Debug for RenderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderOptions")
            .field("style", &self.style)
            .field("math_renderer", &self.math_renderer.is_some())
            .field("preserve_list_start", &self.preserve_list_start)
            .field("wrap_container", &self.wrap_container)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::model::MathMode;

    #[test]
    fn test_render_options_builder() {
        let options = RenderOptions::new()
            .with_style(StyleContext::Academic)
            .with_list_start(true)
            .with_container(true);

        assert_eq!(options.style, StyleContext::Academic);
        assert!(options.preserve_list_start);
        assert!(options.wrap_container);
        assert!(options.math_renderer().is_none());
    }

    #[test]
    fn test_debug_hides_renderer() {
        let renderer = |s: &str, _: MathMode| -> Result<String> { Ok(s.to_string()) };
        let options = RenderOptions::new().with_math_renderer(Arc::new(renderer));
        let debug = format!("{:?}", options);
        assert!(debug.contains("math_renderer: true"));
    }
}
