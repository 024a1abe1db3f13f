use crate::field::FieldSummary;
use crate::io::ExportedFiles;
use crate::point::Point2;
use crate::section::{CrossSectionProfile, SectionSummary};

/// Analysis stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Loading,
    Sampling,
    Aggregating,
    Exporting,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading velocity field"),
            Self::Sampling => write!(f, "Sampling cross-section"),
            Self::Aggregating => write!(f, "Averaging sections"),
            Self::Exporting => write!(f, "Writing results"),
        }
    }
}

/// Result of an in-memory analysis of one cross-section.
#[derive(Clone, Debug)]
pub struct CrossSectionAnalysis {
    pub endpoints: (Point2, Point2),
    pub profile: CrossSectionProfile,
    pub sections: SectionSummary,
}

/// Result of a full config-driven run.
#[derive(Clone, Debug)]
pub struct AnalysisOutput {
    pub field: FieldSummary,
    pub analysis: CrossSectionAnalysis,
    pub files: ExportedFiles,
}

/// Progress reporting for the analysis pipeline.
///
/// All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    fn begin_stage(&self, _stage: PipelineStage) {}

    fn finish_stage(&self, _stage: PipelineStage) {}
}

/// No-op progress reporter.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
