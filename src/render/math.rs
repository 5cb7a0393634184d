//! Math rendering capability.
//!
//! The transformer never renders TeX itself. A [`MathRenderer`] may be
//! injected through [`RenderOptions`](super::RenderOptions); without one,
//! or when it fails, the escaped source is emitted inside the same
//! non-editable wrapper so the surrounding structure is unaffected.

use crate::error::Result;
use crate::model::{MathMode, MathSpan};

use super::html::{escape_html, markup};

/// Renders TeX-like source into markup.
///
/// Implementations must be thread-safe: a single renderer is shared across
/// parallel batch transforms.
pub trait MathRenderer: Send + Sync {
    /// Render `source`. Errors are recovered by the caller.
    fn render(&self, source: &str, mode: MathMode) -> Result<String>;
}

impl<F> MathRenderer for F
where
    F: Fn(&str, MathMode) -> Result<String> + Send + Sync,
{
    fn render(&self, source: &str, mode: MathMode) -> Result<String> {
        self(source, mode)
    }
}

/// Render a math span's interior, falling back to the escaped source.
pub(crate) fn render_math_body(span: &MathSpan, renderer: Option<&dyn MathRenderer>) -> String {
    let Some(renderer) = renderer else {
        return escape_html(&span.source);
    };
    match renderer.render(&span.source, span.mode) {
        Ok(rendered) => rendered,
        Err(e) => {
            log::warn!(
                "Math render failed for {:?}, using source: {}",
                span.source,
                e
            );
            escape_html(&span.source)
        }
    }
}

/// Render a math span with its wrapper.
pub(crate) fn render_math(span: &MathSpan, renderer: Option<&dyn MathRenderer>) -> String {
    let body = render_math_body(span, renderer);
    if span.mode.is_display() {
        format!("{}{}</div>", markup::MATH_BLOCK_OPEN, body)
    } else {
        format!("{}{}</span>", markup::MATH_INLINE_OPEN, body)
    }
}
