use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use rivervel_core::context::SharedContext;
use rivervel_core::error::{Result, VelocityError};
use rivervel_core::flow::{
    CommandExtractor, FlowEvent, FlowExtractor, FlowParams, FlowRequest, FlowRunner,
};
use rivervel_core::point::Point2;

/// Writes a fixed table into the working directory.
struct TableExtractor;

impl FlowExtractor for TableExtractor {
    fn name(&self) -> &str {
        "table"
    }

    fn extract(&self, _request: &FlowRequest, working_dir: &Path) -> Result<()> {
        fs::write(
            working_dir.join("velocity_field.csv"),
            "X,Y,Ux,Uy\n0,0,1,0\n10,0,1,0\n",
        )?;
        Ok(())
    }
}

/// Succeeds without producing anything.
struct SilentExtractor;

impl FlowExtractor for SilentExtractor {
    fn name(&self) -> &str {
        "silent"
    }

    fn extract(&self, _request: &FlowRequest, _working_dir: &Path) -> Result<()> {
        Ok(())
    }
}

struct FailingExtractor;

impl FlowExtractor for FailingExtractor {
    fn name(&self) -> &str {
        "failing"
    }

    fn extract(&self, _request: &FlowRequest, _working_dir: &Path) -> Result<()> {
        Err(VelocityError::Flow("tracking diverged".into()))
    }
}

/// Blocks until released, then writes the table.
struct GatedExtractor {
    gate: Mutex<Receiver<()>>,
}

impl FlowExtractor for GatedExtractor {
    fn name(&self) -> &str {
        "gated"
    }

    fn extract(&self, request: &FlowRequest, working_dir: &Path) -> Result<()> {
        let _ = self.gate.lock().unwrap().recv();
        TableExtractor.extract(request, working_dir)
    }
}

fn request(output_dir: Option<PathBuf>) -> FlowRequest {
    FlowRequest {
        video: PathBuf::from("river.mp4"),
        meters_per_pixel: 0.05,
        params: FlowParams::default(),
        output_dir,
    }
}

fn drain(rx: &Receiver<FlowEvent>) -> Vec<FlowEvent> {
    rx.iter().collect()
}

#[test]
fn test_output_moved_to_output_dir() {
    let work = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let runner = FlowRunner::new(Arc::new(TableExtractor), work.path());

    let (handle, rx) = runner
        .spawn_channel(request(Some(out.path().to_path_buf())))
        .unwrap();
    let csv = handle.wait().unwrap();

    assert_eq!(csv, out.path().join("velocity_field.csv"));
    assert!(csv.is_file());
    assert!(!work.path().join("velocity_field.csv").exists());

    let events = drain(&rx);
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        FlowEvent::Started {
            video: PathBuf::from("river.mp4")
        }
    );
    assert!(matches!(&events[1], FlowEvent::Completed { csv: c, .. } if *c == csv));
}

#[test]
fn test_output_left_in_working_dir() {
    let work = tempfile::tempdir().unwrap();
    let runner = FlowRunner::new(Arc::new(TableExtractor), work.path());
    let handle = runner.spawn(request(None), |_| {}).unwrap();
    let csv = handle.wait().unwrap();
    assert_eq!(csv, work.path().join("velocity_field.csv"));
    let field = rivervel_core::field::VelocityField::load(&csv).unwrap();
    assert_eq!(field.len(), 2);
}

#[test]
fn test_failure_reported_as_event() {
    let work = tempfile::tempdir().unwrap();
    let runner = FlowRunner::new(Arc::new(FailingExtractor), work.path());
    let (handle, rx) = runner.spawn_channel(request(None)).unwrap();

    assert!(matches!(handle.wait(), Err(VelocityError::Flow(_))));
    let events = drain(&rx);
    match events.last() {
        Some(FlowEvent::Failed { message }) => assert!(message.contains("tracking diverged")),
        other => panic!("expected Failed event, got {other:?}"),
    }
    assert!(!runner.is_running());
}

#[test]
fn test_missing_output_is_failure() {
    let work = tempfile::tempdir().unwrap();
    let runner = FlowRunner::new(Arc::new(SilentExtractor), work.path());
    let (handle, rx) = runner.spawn_channel(request(None)).unwrap();
    assert!(matches!(handle.wait(), Err(VelocityError::Flow(_))));
    assert!(matches!(drain(&rx).last(), Some(FlowEvent::Failed { .. })));
}

#[test]
fn test_second_request_rejected_while_running() {
    let work = tempfile::tempdir().unwrap();
    let (release, gate) = mpsc::channel();
    let runner = FlowRunner::new(
        Arc::new(GatedExtractor {
            gate: Mutex::new(gate),
        }),
        work.path(),
    );

    let first = runner.spawn(request(None), |_| {}).unwrap();
    assert!(runner.is_running());
    assert!(matches!(
        runner.spawn(request(None), |_| {}),
        Err(VelocityError::FlowBusy)
    ));

    release.send(()).unwrap();
    first.wait().unwrap();
    assert!(!runner.is_running());

    // A new extraction is accepted once the first has finished.
    release.send(()).unwrap();
    let second = runner.spawn(request(None), |_| {}).unwrap();
    second.wait().unwrap();
}

#[test]
fn test_handle_reports_finished() {
    let work = tempfile::tempdir().unwrap();
    let runner = FlowRunner::new(Arc::new(SilentExtractor), work.path());
    let handle = runner.spawn(request(None), |_| {}).unwrap();
    let mut waited = Duration::ZERO;
    while !handle.is_finished() && waited < Duration::from_secs(5) {
        std::thread::sleep(Duration::from_millis(10));
        waited += Duration::from_millis(10);
    }
    assert!(handle.is_finished());
    let _ = handle.wait();
}

#[test]
fn test_request_from_context() {
    let mut ctx = SharedContext::new();
    assert!(matches!(
        FlowRequest::from_context(&ctx, FlowParams::default()),
        Err(VelocityError::MissingVideo)
    ));

    ctx.video_path = Some(PathBuf::from("clip.mov"));
    assert!(matches!(
        FlowRequest::from_context(&ctx, FlowParams::default()),
        Err(VelocityError::NotCalibrated)
    ));

    ctx.calibrate(Point2::new(0.0, 0.0), Point2::new(100.0, 0.0), 5.0)
        .unwrap();
    ctx.optical_flow_output_dir = Some(PathBuf::from("out"));
    let req = FlowRequest::from_context(&ctx, FlowParams::default()).unwrap();
    assert_eq!(req.video, PathBuf::from("clip.mov"));
    assert!((req.meters_per_pixel - 0.05).abs() < 1e-12);
    assert_eq!(req.output_dir, Some(PathBuf::from("out")));
    assert_eq!(req.params.start_frame, 150);
}

#[test]
fn test_invalid_params_rejected() {
    let mut ctx = SharedContext::new();
    ctx.video_path = Some(PathBuf::from("clip.mov"));
    ctx.calibrate(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 1.0)
        .unwrap();
    let params = FlowParams {
        frames_per_second: 0.0,
        ..FlowParams::default()
    };
    assert!(matches!(
        FlowRequest::from_context(&ctx, params),
        Err(VelocityError::Flow(_))
    ));
}

#[test]
fn test_command_args_substituted() {
    let extractor = CommandExtractor::new(
        "flowtool",
        vec![
            "{video}".into(),
            "--scale={scale}".into(),
            "--from".into(),
            "{start}".into(),
            "--vlim".into(),
            "{vlim}".into(),
            "--fps".into(),
            "{fps}".into(),
            "--out".into(),
            "{workdir}".into(),
        ],
    );
    let args = extractor.render_args(&request(None), Path::new("/tmp/work"));
    assert_eq!(
        args,
        vec![
            "river.mp4",
            "--scale=0.05",
            "--from",
            "150",
            "--vlim",
            "10",
            "--fps",
            "30",
            "--out",
            "/tmp/work",
        ]
    );
    assert_eq!(extractor.name(), "flowtool");
}

#[test]
fn test_missing_program_fails() {
    let work = tempfile::tempdir().unwrap();
    let extractor = CommandExtractor::new("rivervel-no-such-program", Vec::new());
    let result = extractor.extract(&request(None), work.path());
    assert!(matches!(result, Err(VelocityError::Flow(_))));
}
