use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rivervel_core::pipeline::{PipelineStage, ProgressReporter};

const STAGE_COUNT: u64 = 4;

/// Progress bar advancing once per finished analysis stage.
pub struct StageBar {
    bar: ProgressBar,
}

impl StageBar {
    pub fn new() -> Result<Self> {
        let bar = ProgressBar::new(STAGE_COUNT);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{msg:24} [{bar:40}] {pos}/{len}")?
                .progress_chars("=> "),
        );
        Ok(Self { bar })
    }

    pub fn finish(&self) {
        self.bar.finish_with_message("Done");
    }

    pub fn abandon(&self) {
        self.bar.abandon_with_message("Failed");
    }
}

impl ProgressReporter for StageBar {
    fn begin_stage(&self, stage: PipelineStage) {
        self.bar.set_message(stage.to_string());
    }

    fn finish_stage(&self, _stage: PipelineStage) {
        self.bar.inc(1);
    }
}
