use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::consts::VELOCITY_FIELD_FILE;
use crate::error::{Result, VelocityError};

use super::extractor::FlowExtractor;
use super::request::FlowRequest;

/// Status updates from a flow worker.
#[derive(Clone, Debug, PartialEq)]
pub enum FlowEvent {
    Started { video: PathBuf },
    Completed { csv: PathBuf, elapsed: Duration },
    Failed { message: String },
}

/// Runs one extraction at a time on a background thread.
///
/// There is no cancellation, timeout or retry. A failure ends that
/// invocation and is reported as [`FlowEvent::Failed`]; the caller may spawn
/// again afterwards.
pub struct FlowRunner {
    extractor: Arc<dyn FlowExtractor>,
    working_dir: PathBuf,
    busy: Arc<AtomicBool>,
}

/// Join handle of a spawned extraction.
pub struct FlowHandle {
    join: JoinHandle<Result<PathBuf>>,
}

impl FlowHandle {
    /// Block until the worker finishes.
    pub fn wait(self) -> Result<PathBuf> {
        self.join
            .join()
            .map_err(|_| VelocityError::Flow("flow worker panicked".into()))?
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
}

/// Clears the in-flight flag when the worker ends, panics included.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl FlowRunner {
    pub fn new(extractor: Arc<dyn FlowExtractor>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            extractor,
            working_dir: working_dir.into(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_running(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Start an extraction. `on_event` is called from the worker thread.
    ///
    /// Fails with [`VelocityError::FlowBusy`] while another extraction from
    /// this runner is in flight.
    pub fn spawn<F>(&self, request: FlowRequest, on_event: F) -> Result<FlowHandle>
    where
        F: Fn(FlowEvent) + Send + 'static,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!("Optical flow already running; request rejected");
            return Err(VelocityError::FlowBusy);
        }
        let guard = BusyGuard(Arc::clone(&self.busy));

        let extractor = Arc::clone(&self.extractor);
        let working_dir = self.working_dir.clone();
        let join = std::thread::Builder::new()
            .name("rivervel-flow".into())
            .spawn(move || {
                let _guard = guard;
                on_event(FlowEvent::Started {
                    video: request.video.clone(),
                });
                let start = Instant::now();
                match run_extraction(extractor.as_ref(), &request, &working_dir) {
                    Ok(csv) => {
                        on_event(FlowEvent::Completed {
                            csv: csv.clone(),
                            elapsed: start.elapsed(),
                        });
                        Ok(csv)
                    }
                    Err(e) => {
                        error!("Optical flow worker failed: {e}");
                        on_event(FlowEvent::Failed {
                            message: e.to_string(),
                        });
                        Err(e)
                    }
                }
            })?;

        Ok(FlowHandle { join })
    }

    /// Like [`spawn`](Self::spawn), delivering events over a channel.
    pub fn spawn_channel(
        &self,
        request: FlowRequest,
    ) -> Result<(FlowHandle, mpsc::Receiver<FlowEvent>)> {
        let (tx, rx) = mpsc::channel();
        let handle = self.spawn(request, move |event| {
            let _ = tx.send(event);
        })?;
        Ok((handle, rx))
    }
}

/// Run the extractor and move its table to the requested output directory.
fn run_extraction(
    extractor: &dyn FlowExtractor,
    request: &FlowRequest,
    working_dir: &Path,
) -> Result<PathBuf> {
    info!(
        extractor = extractor.name(),
        video = %request.video.display(),
        meters_per_pixel = request.meters_per_pixel,
        start_frame = request.params.start_frame,
        "Optical flow worker started"
    );
    extractor.extract(request, working_dir)?;

    let produced = working_dir.join(VELOCITY_FIELD_FILE);
    if !produced.is_file() {
        return Err(VelocityError::Flow(format!(
            "{} did not produce {}",
            extractor.name(),
            produced.display()
        )));
    }

    let destination = match &request.output_dir {
        Some(dir) => dir.join(VELOCITY_FIELD_FILE),
        None => return Ok(produced),
    };
    if destination != produced {
        relocate(&produced, &destination)?;
    }
    info!(csv = %destination.display(), "Optical flow output saved");
    Ok(destination)
}

/// Rename, falling back to copy + remove across filesystems.
fn relocate(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).map_err(|source| VelocityError::Write {
        path: to.to_path_buf(),
        source,
    })?;
    fs::remove_file(from)?;
    Ok(())
}
