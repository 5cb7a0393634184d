//! Text parsing module.

mod block;
mod cleanup;
mod inline;
mod options;
mod protect;
mod table;
mod text_parser;

pub use cleanup::{CleanupOptions, CleanupPipeline, CleanupPreset};
pub use options::ParseOptions;
pub use table::{parse_table, split_cells, TableSpec};
pub use text_parser::TextParser;

pub(crate) use table::parse_table_block;
