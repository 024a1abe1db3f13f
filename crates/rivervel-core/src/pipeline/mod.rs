pub mod config;
mod orchestrator;
mod types;

pub use orchestrator::{analyze_field, resolve_endpoints, run_analysis};
pub use types::{
    AnalysisOutput, CrossSectionAnalysis, NoOpReporter, PipelineStage, ProgressReporter,
};
