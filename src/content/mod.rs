//! Content module - documents, front-matter and Markdown processing

mod document;
mod frontmatter;
pub mod loader;
mod markdown;

pub use document::Document;
pub use frontmatter::{is_layout_name, FrontMatter, FrontMatterFormat};
pub use markdown::{MarkdownRenderer, MORE_MARKER};
