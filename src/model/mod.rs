//! Document model types.
//!
//! This module defines the intermediate representation (IR) that bridges
//! parsing and rendering: a flat sequence of blocks whose inline content
//! is a small tree. The model carries no markup; classes and wrappers are
//! chosen by the renderer.

mod block;
pub(crate) mod document;
pub(crate) mod inline;
mod style;
mod table;

pub use block::{Block, ListKind};
pub use document::{Citation, Document, Metadata};
pub use inline::{plain_text, CodeBlock, Inline, MathMode, MathSpan};
pub use style::{StyleBundle, StyleContext};
pub use table::{Alignment, Table, TableCell};
