//! Input parsing and in-memory table handling.

mod parser;
mod source;

pub use parser::{Parser, ParserConfig};
pub use source::{DataTable, Dataset, NamedTable, SourceMetadata};
