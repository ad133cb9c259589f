pub mod extract;
pub mod metadata;
pub mod package;
pub mod styles;
pub mod xml;

pub use extract::{parse_document, ParsedDocument};
pub use package::DocxPackage;
pub use styles::StyleCatalog;
