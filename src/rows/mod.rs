//! CSV input and output rows.

/// Lazy input row reader.
pub mod reader;

/// Buffered output row writer.
pub mod writer;

pub use reader::{InputRow, RowReader};
pub use writer::{header_line, RowWriter};
