//! Table types.

use super::Inline;
use serde::{Deserialize, Serialize};

/// Horizontal alignment of a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left aligned (default)
    #[default]
    Left,
    /// Centered (`:---:`)
    Center,
    /// Right aligned (`---:`)
    Right,
}

impl Alignment {
    /// Derive the alignment from a trimmed separator cell.
    pub fn from_separator(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.starts_with(':') && cell.ends_with(':') {
            Alignment::Center
        } else if cell.ends_with(':') {
            Alignment::Right
        } else {
            Alignment::Left
        }
    }

    /// CSS keyword for this alignment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

/// Inline content of one table cell.
pub type TableCell = Vec<Inline>;

/// A table structure with inline-parsed cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Header cells
    pub header: Vec<TableCell>,

    /// Column alignments; may be shorter than the header
    pub alignments: Vec<Alignment>,

    /// Body rows
    pub rows: Vec<Vec<TableCell>>,
}

impl Table {
    /// Create a table with header cells only.
    pub fn new(header: Vec<TableCell>, alignments: Vec<Alignment>) -> Self {
        Self {
            header,
            alignments,
            rows: Vec::new(),
        }
    }

    /// Add a body row.
    pub fn add_row(&mut self, row: Vec<TableCell>) {
        self.rows.push(row);
    }

    /// Alignment of a column, defaulting to left past the known entries.
    pub fn alignment(&self, column: usize) -> Alignment {
        self.alignments.get(column).copied().unwrap_or_default()
    }

    /// Get the number of columns (based on the header).
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Get the number of body rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get plain text representation of the table.
    pub fn plain_text(&self) -> String {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .map(|row| {
                row.iter()
                    .map(|cell| super::inline::plain_text(cell))
                    .collect::<Vec<_>>()
                    .join("\t")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
