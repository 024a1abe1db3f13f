use tracing::info;

use crate::error::{Result, VelocityError};
use crate::field::VelocityField;
use crate::io::{export, read_endpoints};
use crate::section::{aggregate, CrossSectionSampler, SamplerConfig};
use crate::selection::EndpointSelection;

use super::config::{AnalysisConfig, EndpointSource};
use super::types::{AnalysisOutput, CrossSectionAnalysis, PipelineStage, ProgressReporter};

/// Resolve the configured endpoints into a complete selection.
pub fn resolve_endpoints(source: &EndpointSource) -> Result<EndpointSelection> {
    match source {
        EndpointSource::Points { from, to } => Ok(EndpointSelection::from_pair(*from, *to)),
        EndpointSource::File(path) => read_endpoints(path),
    }
}

/// Sample and aggregate one cross-section of an already loaded field.
///
/// The selection must be complete.
pub fn analyze_field(
    field: &VelocityField,
    selection: &EndpointSelection,
    sampling: &SamplerConfig,
    section_count: usize,
    reporter: &dyn ProgressReporter,
) -> Result<CrossSectionAnalysis> {
    let (a, b) = selection
        .pair()
        .ok_or(VelocityError::InsufficientPoints {
            found: selection.len(),
        })?;

    reporter.begin_stage(PipelineStage::Sampling);
    let profile = CrossSectionSampler::new(field).sample(a, b, sampling)?;
    reporter.finish_stage(PipelineStage::Sampling);

    reporter.begin_stage(PipelineStage::Aggregating);
    let sections = aggregate(&profile, section_count)?;
    reporter.finish_stage(PipelineStage::Aggregating);

    Ok(CrossSectionAnalysis {
        endpoints: (a, b),
        profile,
        sections,
    })
}

/// Load, sample, aggregate and export as described by `config`.
pub fn run_analysis(
    config: &AnalysisConfig,
    reporter: &dyn ProgressReporter,
) -> Result<AnalysisOutput> {
    reporter.begin_stage(PipelineStage::Loading);
    let field = VelocityField::load(&config.field)?;
    let selection = resolve_endpoints(&config.endpoints)?;
    reporter.finish_stage(PipelineStage::Loading);

    let analysis = analyze_field(
        &field,
        &selection,
        &config.sampling,
        config.sections,
        reporter,
    )?;

    reporter.begin_stage(PipelineStage::Exporting);
    let files = export(
        &config.output_dir,
        &analysis.profile,
        &analysis.sections,
        analysis.endpoints,
    )?;
    reporter.finish_stage(PipelineStage::Exporting);

    info!(
        mean_speed = analysis.sections.overall_mean_speed.unwrap_or(f64::NAN),
        output = %config.output_dir.display(),
        "Analysis complete"
    );

    Ok(AnalysisOutput {
        field: field.summary(),
        analysis,
        files,
    })
}
