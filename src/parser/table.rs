//! Pipe table parsing.
//!
//! A table is a run of lines that each start and end with `|`. The second
//! line is the separator; it fixes column alignment. Cell splitting is
//! deliberately loose: segments that are empty after trimming are dropped,
//! including empty cells in the middle of a row.

use super::inline::InlineParser;
use super::protect::ProtectedText;
use crate::model::{Alignment, Table};

/// A parsed table whose cells are still raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// Header cell texts
    pub header: Vec<String>,
    /// Alignment per separator cell
    pub alignments: Vec<Alignment>,
    /// Body rows; blank lines are skipped
    pub rows: Vec<Vec<String>>,
}

/// Check whether a line is a table row candidate.
pub fn is_table_line(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 2 && line.starts_with('|') && line.ends_with('|')
}

/// Parse a run of table lines.
///
/// Returns `None` for fewer than two lines or when the second line does
/// not look like a separator (it must contain both `-` and `|`).
pub fn parse_table(lines: &[&str]) -> Option<TableSpec> {
    if lines.len() < 2 {
        return None;
    }

    let separator = lines[1];
    if !separator.contains('-') || !separator.contains('|') {
        return None;
    }

    let header = split_cells(lines[0]);
    let alignments = split_cells(separator)
        .iter()
        .map(|cell| Alignment::from_separator(cell))
        .collect();
    let rows = lines[2..]
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| split_cells(line))
        .collect();

    Some(TableSpec {
        header,
        alignments,
        rows,
    })
}

/// Split a row on `|`, trimming cells and dropping blank segments.
pub fn split_cells(line: &str) -> Vec<String> {
    line.split('|')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse table lines and inline-parse every cell.
pub(crate) fn build_table(lines: &[&str], protected: &ProtectedText) -> Option<Table> {
    let spec = parse_table(lines)?;
    let inline = InlineParser::new(protected);

    let header = spec.header.iter().map(|cell| inline.parse(cell)).collect();
    let mut table = Table::new(header, spec.alignments);
    for row in &spec.rows {
        table.add_row(row.iter().map(|cell| inline.parse(cell)).collect());
    }
    Some(table)
}

/// Parse a standalone table block (lines separated by `\n`).
pub(crate) fn parse_table_block(block: &str, strict_inline_math: bool) -> Option<Table> {
    let protected = ProtectedText::protect_fragment(block.trim(), strict_inline_math);
    let lines: Vec<&str> = protected.text.split('\n').collect();
    build_table(&lines, &protected)
}
