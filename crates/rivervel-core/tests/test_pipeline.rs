#[allow(dead_code)]
mod common;

use std::sync::Mutex;

use approx::assert_relative_eq;

use rivervel_core::error::VelocityError;
use rivervel_core::pipeline::config::{AnalysisConfig, EndpointSource};
use rivervel_core::pipeline::{
    analyze_field, resolve_endpoints, run_analysis, NoOpReporter, PipelineStage, ProgressReporter,
};
use rivervel_core::point::Point2;
use rivervel_core::section::SamplerConfig;
use rivervel_core::selection::EndpointSelection;

#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<(PipelineStage, bool)>>,
}

impl ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: PipelineStage) {
        self.events.lock().unwrap().push((stage, false));
    }

    fn finish_stage(&self, stage: PipelineStage) {
        self.events.lock().unwrap().push((stage, true));
    }
}

fn write_two_point_field(dir: &std::path::Path) -> std::path::PathBuf {
    common::write_table(
        dir,
        "velocity_field.csv",
        "X,Y,Ux_[m.s^{-1}],Uy_[m.s^{-1}]\n0,0,1,0\n10,0,1,0\n",
    )
}

#[test]
fn test_run_analysis_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let field = write_two_point_field(dir.path());
    let config = AnalysisConfig {
        field,
        output_dir: dir.path().to_path_buf(),
        sections: 3,
        endpoints: EndpointSource::Points {
            from: Point2::new(0.0, 0.0),
            to: Point2::new(10.0, 0.0),
        },
        sampling: SamplerConfig::default(),
    };

    let reporter = RecordingReporter::default();
    let output = run_analysis(&config, &reporter).unwrap();

    assert_eq!(output.field.rows, 2);
    assert_eq!(output.analysis.profile.len(), 200);
    assert_eq!(output.analysis.sections.sections.len(), 3);
    assert_relative_eq!(
        output.analysis.sections.overall_mean_speed.unwrap(),
        1.0,
        epsilon = 1e-9
    );
    assert!(output.files.cross_section.is_file());
    assert!(output.files.sections.is_file());
    assert!(output.files.points.is_file());

    let events = reporter.events.lock().unwrap();
    assert_eq!(
        *events,
        vec![
            (PipelineStage::Loading, false),
            (PipelineStage::Loading, true),
            (PipelineStage::Sampling, false),
            (PipelineStage::Sampling, true),
            (PipelineStage::Aggregating, false),
            (PipelineStage::Aggregating, true),
            (PipelineStage::Exporting, false),
            (PipelineStage::Exporting, true),
        ]
    );
}

#[test]
fn test_rerun_from_saved_endpoints() {
    let dir = tempfile::tempdir().unwrap();
    let field = write_two_point_field(dir.path());
    let mut config = AnalysisConfig {
        field,
        output_dir: dir.path().to_path_buf(),
        sections: 2,
        endpoints: EndpointSource::Points {
            from: Point2::new(2.0, 0.0),
            to: Point2::new(8.0, 0.0),
        },
        sampling: SamplerConfig::default(),
    };
    let first = run_analysis(&config, &NoOpReporter).unwrap();

    config.endpoints = EndpointSource::File(first.files.points.clone());
    let second = run_analysis(&config, &NoOpReporter).unwrap();
    assert_eq!(second.analysis.endpoints, first.analysis.endpoints);
    assert_eq!(
        second.analysis.profile.distances(),
        first.analysis.profile.distances()
    );
}

#[test]
fn test_missing_field_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let config = AnalysisConfig {
        field: dir.path().join("absent.csv"),
        output_dir: dir.path().to_path_buf(),
        ..AnalysisConfig::default()
    };
    assert!(matches!(
        run_analysis(&config, &NoOpReporter),
        Err(VelocityError::Io(_))
    ));
}

#[test]
fn test_incomplete_selection_rejected() {
    let field = common::two_point_field();
    let selection = EndpointSelection::new().add_point(Point2::new(0.0, 0.0));
    let result = analyze_field(&field, &selection, &SamplerConfig::default(), 1, &NoOpReporter);
    assert!(matches!(
        result,
        Err(VelocityError::InsufficientPoints { found: 1 })
    ));
}

#[test]
fn test_resolve_inline_endpoints() {
    let source = EndpointSource::Points {
        from: Point2::new(1.0, 1.0),
        to: Point2::new(2.0, 3.0),
    };
    let selection = resolve_endpoints(&source).unwrap();
    assert_eq!(
        selection.pair(),
        Some((Point2::new(1.0, 1.0), Point2::new(2.0, 3.0)))
    );
}

#[test]
fn test_too_many_sections_fails_before_export() {
    let dir = tempfile::tempdir().unwrap();
    let field = write_two_point_field(dir.path());
    let config = AnalysisConfig {
        field,
        output_dir: dir.path().to_path_buf(),
        sections: 500,
        ..AnalysisConfig::default()
    };
    assert!(matches!(
        run_analysis(&config, &NoOpReporter),
        Err(VelocityError::InvalidSectionCount { requested: 500, samples: 200 })
    ));
    assert!(!dir.path().join("velocity_cross_section.csv").exists());
}
