//! HTML markup rendering for transformed documents.
//!
//! Output is a sequence of block elements joined by newlines. Class names
//! are part of the output contract: `citation-link` on anchors and the
//! `math-block`/`math-inline` wrappers are consumed by bibliography
//! generation and by editing surfaces.

use crate::error::Result;
use crate::model::{
    Block, CodeBlock, Document, Inline, ListKind, StyleBundle, StyleContext, Table,
};
use crate::parser::parse_table_block;

use super::math::render_math;
use super::{DocumentStats, RenderOptions, RenderResult};

/// Fixed class strings and element openers.
pub mod markup {
    /// Class marking anchors as citation sources.
    pub const CITATION_CLASS: &str = "citation-link";

    /// Opening tag of a display math wrapper.
    pub const MATH_BLOCK_OPEN: &str =
        "<div class=\"math-block my-6 text-center select-none\" contenteditable=\"false\">";

    /// Opening tag of an inline math wrapper.
    pub const MATH_INLINE_OPEN: &str =
        "<span class=\"math-inline px-1 select-none\" contenteditable=\"false\">";

    pub(crate) const H1: &str = "text-3xl font-bold mt-8 mb-6 pb-2 border-b-2";
    pub(crate) const H2: &str = "text-2xl font-bold mt-8 mb-4 opacity-90";
    pub(crate) const H3: &str = "text-xl font-bold mt-6 mb-3";
    pub(crate) const H4: &str = "text-lg font-bold mt-5 mb-2 opacity-85";

    pub(crate) const PARAGRAPH: &str = "mb-4 leading-relaxed opacity-90 text-lg";
    pub(crate) const BLOCKQUOTE: &str =
        "border-l-4 border-current pl-4 py-2 my-6 italic opacity-70 bg-opacity-5 bg-slate-500 rounded-r-lg";
    pub(crate) const PRE: &str =
        "bg-slate-900 text-slate-50 p-4 rounded-lg my-6 font-mono text-sm overflow-x-auto shadow-inner";
    pub(crate) const CODE: &str =
        "bg-slate-100 px-1.5 py-0.5 rounded text-sm font-mono text-pink-600 border border-slate-200";

    pub(crate) const STRONG: &str = "font-bold";
    pub(crate) const STRONG_EMPHASIS: &str = "font-bold bg-yellow-100/50 px-1 rounded";
    pub(crate) const EMPHASIS: &str = "opacity-80";
    pub(crate) const LINK: &str = "font-medium underline underline-offset-2";

    pub(crate) const LIST: &str = "my-4 space-y-1";
    pub(crate) const UL_ITEM: &str = "ml-6 list-disc pl-1 mb-2 marker:opacity-50";
    pub(crate) const OL_ITEM: &str = "ml-6 list-decimal pl-1 mb-2 font-medium marker:opacity-80";

    pub(crate) const TABLE_WRAPPER: &str =
        "overflow-x-auto my-6 border border-current rounded-lg shadow-sm";
    pub(crate) const TABLE: &str = "w-full text-sm text-left border-collapse";
    pub(crate) const THEAD: &str = "text-xs uppercase bg-black/5 border-b border-current/10";
    pub(crate) const TH: &str = "px-6 py-3 font-bold";
    pub(crate) const TR: &str = "border-b border-current/5 hover:bg-black/5 transition-colors";
    pub(crate) const TD: &str = "px-6 py-3";
    pub(crate) const CELL_BORDER: &str = "border-r border-current/10 last:border-r-0";

    /// Class prefix of the optional document container.
    pub const CONTAINER: &str = "doxy-document";

    pub(crate) const MATH_BLOCK: &str = "math-block my-6 text-center select-none";
    pub(crate) const COVER_PAGE: &str =
        "cover-page mb-16 text-center py-24 border-b-2 border-slate-100";
    pub(crate) const BIBLIOGRAPHY: &str =
        "bibliography mt-16 pt-8 border-t border-slate-200 page-break-before";
}

/// Convert a document to HTML markup.
pub fn to_html(doc: &Document, options: &RenderOptions) -> Result<String> {
    HtmlRenderer::new(options.clone()).render(doc)
}

/// Convert a document to HTML markup with statistics.
pub fn to_html_with_stats(doc: &Document, options: &RenderOptions) -> Result<RenderResult> {
    HtmlRenderer::new(options.clone()).render_with_stats(doc)
}

/// Render a block of pipe-delimited lines as a table.
///
/// A block that is not a valid table is returned unchanged.
pub fn render_table(block: &str, options: &RenderOptions) -> String {
    match parse_table_block(block, true) {
        Some(table) => HtmlRenderer::new(options.clone()).table(&table),
        None => block.to_string(),
    }
}

/// Wrap block markup in the styled document container.
///
/// Blocks added after rendering (a cover page, a reference list) belong
/// inside the container, so callers assembling a page wrap last.
pub fn wrap_container(body: &str, style: StyleContext) -> String {
    format!(
        "<div class=\"{} {}\">\n{}\n</div>",
        markup::CONTAINER,
        style.bundle().container,
        body
    )
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// HTML markup renderer.
pub struct HtmlRenderer {
    options: RenderOptions,
    bundle: StyleBundle,
}

impl HtmlRenderer {
    /// Create a new HTML renderer.
    pub fn new(options: RenderOptions) -> Self {
        let bundle = options.style.bundle();
        Self { options, bundle }
    }

    /// Render a document to HTML markup.
    pub fn render(&self, doc: &Document) -> Result<String> {
        Ok(self.render_markup(doc))
    }

    /// Render a document to HTML markup. Rendering itself cannot fail.
    pub fn render_markup(&self, doc: &Document) -> String {
        if doc.is_empty() {
            return String::new();
        }

        let body = doc
            .blocks
            .iter()
            .map(|block| self.block(block))
            .collect::<Vec<_>>()
            .join("\n");

        log::debug!(
            "rendered {} blocks to {} bytes of markup ({})",
            doc.block_count(),
            body.len(),
            self.options.style
        );

        if self.options.wrap_container {
            wrap_container(&body, self.options.style)
        } else {
            body
        }
    }

    /// Render a document to HTML markup with document statistics.
    pub fn render_with_stats(&self, doc: &Document) -> Result<RenderResult> {
        let content = self.render(doc)?;
        let stats = DocumentStats::from_document(doc);
        Ok(RenderResult::new(content, doc.metadata.clone(), stats))
    }

    fn block(&self, block: &Block) -> String {
        match block {
            Block::Heading { level, content } => self.heading(*level, content),
            Block::Paragraph { lines } => {
                let lines: Vec<String> = lines.iter().map(|line| self.inline(line)).collect();
                format!("<p class=\"{}\">{}</p>", markup::PARAGRAPH, lines.join("<br/>"))
            }
            Block::Text { content } => self.inline(content),
            Block::Blockquote { content } => format!(
                "<blockquote class=\"{}\">{}</blockquote>",
                markup::BLOCKQUOTE,
                self.inline(content)
            ),
            Block::List { kind, start, items } => self.list(*kind, *start, items),
            Block::Code(code) => code_block(code),
            Block::Math(span) => render_math(span, self.options.math_renderer()),
            Block::Table(table) => self.table(table),
            Block::Raw { content } => content.clone(),
        }
    }

    fn heading(&self, level: u8, content: &[Inline]) -> String {
        let class = match level {
            1 => format!("{} {}", markup::H1, self.bundle.h1),
            2 => markup::H2.to_string(),
            3 => format!("{} {}", markup::H3, self.bundle.accent),
            _ => markup::H4.to_string(),
        };
        let level = level.clamp(1, 4);
        format!(
            "<h{} class=\"{}\">{}</h{}>",
            level,
            class,
            self.inline(content),
            level
        )
    }

    fn list(&self, kind: ListKind, start: Option<u64>, items: &[Vec<Inline>]) -> String {
        let (tag, item_class) = match kind {
            ListKind::Unordered => ("ul", markup::UL_ITEM),
            ListKind::Ordered => ("ol", markup::OL_ITEM),
        };

        let start_attr = match (kind, start) {
            (ListKind::Ordered, Some(n)) if self.options.preserve_list_start && n != 1 => {
                format!(" start=\"{}\"", n)
            }
            _ => String::new(),
        };

        let items: Vec<String> = items
            .iter()
            .map(|item| format!("<li class=\"{}\">{}</li>", item_class, self.inline(item)))
            .collect();

        format!(
            "<{}{} class=\"{}\">{}</{}>",
            tag,
            start_attr,
            markup::LIST,
            items.join("\n"),
            tag
        )
    }

    pub(crate) fn table(&self, table: &Table) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "<div class=\"{}\"><table class=\"{}\"><thead class=\"{}\"><tr>",
            markup::TABLE_WRAPPER,
            markup::TABLE,
            markup::THEAD
        ));

        for (i, cell) in table.header.iter().enumerate() {
            out.push_str(&format!(
                "<th class=\"{} text-{} {}\">{}</th>",
                markup::TH,
                table.alignment(i).as_str(),
                markup::CELL_BORDER,
                self.cell(cell)
            ));
        }
        out.push_str("</tr></thead><tbody>");

        for row in &table.rows {
            out.push_str(&format!("<tr class=\"{}\">", markup::TR));
            for (i, cell) in row.iter().enumerate() {
                out.push_str(&format!(
                    "<td class=\"{} text-{} {}\">{}</td>",
                    markup::TD,
                    table.alignment(i).as_str(),
                    markup::CELL_BORDER,
                    self.cell(cell)
                ));
            }
            out.push_str("</tr>");
        }

        out.push_str("</tbody></table></div>");
        out
    }

    fn cell(&self, content: &[Inline]) -> String {
        let html = self.inline(content);
        if html.trim().is_empty() {
            "&nbsp;".to_string()
        } else {
            html
        }
    }

    fn inline(&self, content: &[Inline]) -> String {
        let mut out = String::new();
        for node in content {
            self.inline_node(&mut out, node);
        }
        out
    }

    fn inline_node(&self, out: &mut String, node: &Inline) {
        match node {
            Inline::Text(text) => out.push_str(&escape_html(text)),
            Inline::Strong(children) => {
                out.push_str(&format!("<strong class=\"{}\">", markup::STRONG));
                out.push_str(&self.inline(children));
                out.push_str("</strong>");
            }
            Inline::Emphasis(children) => {
                out.push_str(&format!("<em class=\"{}\">", markup::EMPHASIS));
                out.push_str(&self.inline(children));
                out.push_str("</em>");
            }
            Inline::StrongEmphasis(children) => {
                out.push_str(&format!(
                    "<strong class=\"{}\"><em>",
                    markup::STRONG_EMPHASIS
                ));
                out.push_str(&self.inline(children));
                out.push_str("</em></strong>");
            }
            Inline::Code(code) => {
                out.push_str(&format!(
                    "<code class=\"{}\">{}</code>",
                    markup::CODE,
                    escape_html(code)
                ));
            }
            Inline::Link { text, url } => {
                out.push_str(&format!(
                    "<a href=\"{}\" target=\"_blank\" class=\"{} {} {}\">{}</a>",
                    escape_html(url),
                    markup::CITATION_CLASS,
                    markup::LINK,
                    self.bundle.accent,
                    self.inline(text)
                ));
            }
            Inline::Math(span) => out.push_str(&render_math(span, self.options.math_renderer())),
            Inline::CodeBlock(code) => out.push_str(&code_block(code)),
        }
    }
}

fn code_block(code: &CodeBlock) -> String {
    match &code.language {
        Some(language) => format!(
            "<pre class=\"{}\"><code class=\"language-{}\">{}</code></pre>",
            markup::PRE,
            escape_html(language),
            escape_html(&code.code)
        ),
        None => format!(
            "<pre class=\"{}\"><code>{}</code></pre>",
            markup::PRE,
            escape_html(&code.code)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MathSpan, StyleContext};
    use crate::parser::TextParser;

    fn html(input: &str) -> String {
        let doc = TextParser::new().parse(input);
        to_html(&doc, &RenderOptions::default()).unwrap()
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<a href=\"x\">Tom & Jerry's</a>"),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_render_headings_use_style() {
        let doc = TextParser::new().parse("# Title\n### Sub");
        let options = RenderOptions::new().with_style(StyleContext::Creative);
        let out = to_html(&doc, &options).unwrap();
        assert_eq!(
            out,
            "<h1 class=\"text-3xl font-bold mt-8 mb-6 pb-2 border-b-2 text-violet-700 border-violet-100 font-black tracking-tight\">Title</h1>\n\
             <h3 class=\"text-xl font-bold mt-6 mb-3 text-violet-600\">Sub</h3>"
        );
    }

    #[test]
    fn test_render_paragraph_with_breaks() {
        assert_eq!(
            html("one\ntwo"),
            "<p class=\"mb-4 leading-relaxed opacity-90 text-lg\">one<br/>two</p>"
        );
    }

    #[test]
    fn test_render_escapes_text() {
        assert_eq!(
            html("a < b & c"),
            "<p class=\"mb-4 leading-relaxed opacity-90 text-lg\">a &lt; b &amp; c</p>"
        );
    }

    #[test]
    fn test_render_emphasis() {
        assert_eq!(
            html("***x*** **y** *z*"),
            "<p class=\"mb-4 leading-relaxed opacity-90 text-lg\">\
             <strong class=\"font-bold bg-yellow-100/50 px-1 rounded\"><em>x</em></strong> \
             <strong class=\"font-bold\">y</strong> <em class=\"opacity-80\">z</em></p>"
        );
    }

    #[test]
    fn test_render_link_carries_citation_class() {
        let out = html("[Paper](https://example.com)");
        assert!(out.contains(
            "<a href=\"https://example.com\" target=\"_blank\" class=\"citation-link font-medium underline underline-offset-2 text-indigo-600\">Paper</a>"
        ));
    }

    #[test]
    fn test_render_code() {
        assert_eq!(
            html("```rust\nlet a = 1 < 2;\n```"),
            "<pre class=\"bg-slate-900 text-slate-50 p-4 rounded-lg my-6 font-mono text-sm overflow-x-auto shadow-inner\"><code class=\"language-rust\">let a = 1 &lt; 2;</code></pre>"
        );
        assert!(html("use `x`").contains("<code class=\"bg-slate-100"));
    }

    #[test]
    fn test_render_lists() {
        assert_eq!(
            html("1. a\n2. b"),
            "<ol class=\"my-4 space-y-1\"><li class=\"ml-6 list-decimal pl-1 mb-2 font-medium marker:opacity-80\">a</li>\n\
             <li class=\"ml-6 list-decimal pl-1 mb-2 font-medium marker:opacity-80\">b</li></ol>"
        );
    }

    #[test]
    fn test_list_start_preserved_when_enabled() {
        let doc = TextParser::new().parse("5. five\n6. six");
        let default = to_html(&doc, &RenderOptions::default()).unwrap();
        assert!(default.starts_with("<ol class="));

        let options = RenderOptions::new().with_list_start(true);
        let preserved = to_html(&doc, &options).unwrap();
        assert!(preserved.starts_with("<ol start=\"5\" class="));
    }

    #[test]
    fn test_render_table_alignment_and_empty_cell() {
        let table = "| A | B |\n|:-:|--:|\n| 1 | 2 |\n| 3 |";
        let out = render_table(table, &RenderOptions::default());
        assert!(out.starts_with("<div class=\"overflow-x-auto"));
        assert!(out.contains("<th class=\"px-6 py-3 font-bold text-center border-r border-current/10 last:border-r-0\">A</th>"));
        assert!(out.contains("<td class=\"px-6 py-3 text-right border-r border-current/10 last:border-r-0\">2</td>"));
        assert!(out.ends_with("</tbody></table></div>"));
    }

    #[test]
    fn test_render_table_rejects_passthrough() {
        let block = "| A | B |\n| 1 | 2 |";
        assert_eq!(render_table(block, &RenderOptions::default()), block);
    }

    #[test]
    fn test_empty_table_cell_is_nbsp() {
        let renderer = HtmlRenderer::new(RenderOptions::default());
        assert_eq!(renderer.cell(&[]), "&nbsp;");
    }

    #[test]
    fn test_math_fallback_block() {
        assert_eq!(
            html("$$x=y$$"),
            format!("{}x=y</div>", markup::MATH_BLOCK_OPEN)
        );
    }

    #[test]
    fn test_inline_math_in_paragraph() {
        let out = html("area is $r^2$ here");
        assert!(out.contains(&format!("{}r^2</span>", markup::MATH_INLINE_OPEN)));
    }

    #[test]
    fn test_container_wrap() {
        let doc = TextParser::new().parse("text");
        let options = RenderOptions::new()
            .with_style(StyleContext::Academic)
            .with_container(true);
        let out = to_html(&doc, &options).unwrap();
        assert!(out.starts_with(
            "<div class=\"doxy-document font-serif text-black leading-loose text-justify\">\n"
        ));
        assert!(out.ends_with("\n</div>"));
    }

    #[test]
    fn test_empty_document_renders_empty() {
        let options = RenderOptions::new().with_container(true);
        assert_eq!(to_html(&Document::new(), &options).unwrap(), "");
    }

    #[test]
    fn test_stats_attached() {
        let doc = TextParser::new().parse("# T\n\n$$a$$\n\n- x");
        let result = to_html_with_stats(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(result.stats.heading_count, 1);
        assert_eq!(result.stats.math_count, 1);
        assert_eq!(result.stats.list_item_count, 1);
        assert_eq!(result.metadata.word_count, 5);
    }

    #[test]
    fn test_math_span_inline_renderer_output_is_raw() {
        let renderer = |s: &str, _: crate::model::MathMode| -> Result<String> {
            Ok(format!("<katex>{}</katex>", s))
        };
        let options = RenderOptions::new().with_math_renderer(std::sync::Arc::new(renderer));
        let out = HtmlRenderer::new(options).block(&Block::Math(MathSpan::display("a")));
        assert!(out.contains("<katex>a</katex>"));
    }
}
