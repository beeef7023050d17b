//! Content module - documents, front-matter and the collection loader

mod document;
mod frontmatter;
pub mod loader;

pub use document::{ContentDocument, Summary};
pub use frontmatter::{parse_document, FrontMatterError, Metadata};
pub use loader::{Collection, DocumentError, NotFound, ScanEntry};
