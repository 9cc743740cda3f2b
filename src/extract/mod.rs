//! Page content extraction
//!
//! Downloads a page, finds its main content block and reduces it to plain
//! text bounded in length.

mod extractor;
mod readability;
mod text;

pub use extractor::{ContentExtractor, PageExtractor};
pub use readability::main_content;
pub use text::{normalize_whitespace, render, truncate_chars};
