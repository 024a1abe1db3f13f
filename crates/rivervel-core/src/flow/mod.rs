pub mod extractor;
pub mod request;
pub mod runner;

pub use extractor::{CommandExtractor, FlowConfig, FlowExtractor};
pub use request::{FlowParams, FlowRequest};
pub use runner::{FlowEvent, FlowHandle, FlowRunner};
