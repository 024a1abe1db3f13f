use std::path::Path;

use console::Style;
use rivervel_core::calibration::{CalibrationModel, MetricExtent};
use rivervel_core::field::{ColumnMap, FieldSummary};
use rivervel_core::pipeline::config::AnalysisConfig;
use rivervel_core::pipeline::AnalysisOutput;
use rivervel_core::section::SampleSource;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    method: Style,
    disabled: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            method: Style::new().green(),
            disabled: Style::new().dim().yellow(),
            path: Style::new().underlined(),
        }
    }
}

fn rule(len: usize) -> String {
    "\u{2550}".repeat(len)
}

fn speed(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.3} m/s"),
        None => "undefined".into(),
    }
}

pub fn print_field_summary(path: &Path, summary: &FieldSummary, columns: &ColumnMap) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Velocity Field"));
    println!("  {}", s.title.apply_to(rule(14)));
    println!();
    println!("  {:<14}{}", s.label.apply_to("File"), s.path.apply_to(path.display()));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Rows"),
        s.value.apply_to(format!("{} ({} valid)", summary.rows, summary.valid_rows))
    );
    println!(
        "  {:<14}{} / {}",
        s.label.apply_to("Velocity"),
        s.method.apply_to(&columns.ux.name),
        s.method.apply_to(&columns.uy.name)
    );
    println!();

    if summary.rows == 0 {
        println!("  {}", s.disabled.apply_to("no data rows"));
        println!();
        return;
    }

    println!("  {}", s.header.apply_to("Extent"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("X"),
        s.value.apply_to(format!("{:.3} .. {:.3} m", summary.x_range.0, summary.x_range.1))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Y"),
        s.value.apply_to(format!("{:.3} .. {:.3} m", summary.y_range.0, summary.y_range.1))
    );
    println!();

    println!("  {}", s.header.apply_to("Speed"));
    if summary.valid_rows == 0 {
        println!("    {}", s.disabled.apply_to("no finite speeds"));
    } else {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Min"),
            s.value.apply_to(format!("{:.3} m/s", summary.min_speed))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Max"),
            s.value.apply_to(format!("{:.3} m/s", summary.max_speed))
        );
        println!(
            "    {:<12}{}",
            s.label.apply_to("Mean"),
            s.value.apply_to(format!("{:.3} m/s", summary.mean_speed))
        );
    }
    println!();
}

pub fn print_calibration(calibration: &CalibrationModel, extent: Option<&MetricExtent>) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Calibration"));
    println!("  {}", s.title.apply_to(rule(11)));
    println!();

    if let Some(points) = calibration.points() {
        println!(
            "  {:<14}{} -> {}",
            s.label.apply_to("Points"),
            s.value.apply_to(points.a),
            s.value.apply_to(points.b)
        );
        println!(
            "  {:<14}{}",
            s.label.apply_to("Pixels"),
            s.value.apply_to(format!("{:.2} px", points.pixel_distance()))
        );
        println!(
            "  {:<14}{}",
            s.label.apply_to("Distance"),
            s.value.apply_to(format!("{} m", points.real_distance))
        );
    }
    match calibration.scale_factor() {
        Ok(scale) => println!(
            "  {:<14}{}",
            s.label.apply_to("Scale"),
            s.method.apply_to(format!("{scale:.6} m/px"))
        ),
        Err(_) => println!(
            "  {:<14}{}",
            s.label.apply_to("Scale"),
            s.disabled.apply_to("not set")
        ),
    }
    if let Some(extent) = extent {
        println!(
            "  {:<14}{}",
            s.label.apply_to("Image"),
            s.value.apply_to(format!("{:.2} x {:.2} m", extent.width(), extent.height()))
        );
    }
    println!();
}

pub fn print_analysis_summary(config: &AnalysisConfig, output: &AnalysisOutput) {
    let s = Styles::new();
    let profile = &output.analysis.profile;
    let sections = &output.analysis.sections;

    println!();
    println!("  {}", s.title.apply_to("Cross-Section Analysis"));
    println!("  {}", s.title.apply_to(rule(22)));
    println!();

    println!(
        "  {:<14}{}",
        s.label.apply_to("Field"),
        s.path.apply_to(config.field.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Endpoints"),
        s.value.apply_to(&config.endpoints)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Length"),
        s.value.apply_to(format!("{:.3} m", profile.length()))
    );
    println!();

    println!("  {}", s.header.apply_to("Sampling"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Samples"),
        s.value.apply_to(profile.len())
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Linear"),
        s.method.apply_to(profile.count(SampleSource::Linear))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Nearest"),
        s.method.apply_to(profile.count(SampleSource::Nearest))
    );
    let unresolved = profile.count(SampleSource::Unresolved);
    if unresolved > 0 {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Undefined"),
            s.disabled.apply_to(unresolved)
        );
    }
    println!();

    println!("  {}", s.header.apply_to("Sections"));
    for section in &sections.sections {
        println!(
            "    {:<12}{}",
            s.label.apply_to(format!("#{} @ {:.2} m", section.index, section.centroid_distance)),
            s.value.apply_to(speed(section.mean_speed))
        );
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Overall"),
        s.method.apply_to(speed(sections.overall_mean_speed))
    );
    println!();

    println!("  {}", s.header.apply_to("Output"));
    for path in [
        &output.files.cross_section,
        &output.files.sections,
        &output.files.points,
    ] {
        println!("    {}", s.path.apply_to(path.display()));
    }
    println!();
}
