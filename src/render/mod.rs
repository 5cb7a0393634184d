//! Rendering module for converting documents to various output formats.

mod bibliography;
mod cover;
mod html;
mod json;
mod math;
mod options;
mod result;
mod text;

pub use bibliography::{collect_citations, Bibliography, ACCESSED_FORMAT};
pub use cover::CoverPage;
pub use html::{
    escape_html, markup, render_table, to_html, to_html_with_stats, wrap_container, HtmlRenderer,
};
pub use json::{from_json, to_json, JsonFormat};
pub use math::MathRenderer;
pub use options::RenderOptions;
pub use result::{reading_minutes, DocumentStats, RenderResult, WORDS_PER_MINUTE};
pub use text::to_text;
