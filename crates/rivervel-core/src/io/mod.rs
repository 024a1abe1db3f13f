pub mod export;
pub mod table;

pub use export::{export, read_endpoints, read_section_aggregates, ExportedFiles, SectionRow};
