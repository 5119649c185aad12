//! Progress display for the output stage

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static MOSAIC_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] Mosaics: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{prefix}} {{msg}}"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Step of the output stage currently running for a mosaic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStage {
    /// Compositing tiles into one buffer
    Joining,
    /// Trimming join padding
    Cropping,
    /// Writing the lossless encoding
    SavingFull,
    /// Writing the downscaled encoding
    SavingCompressed,
}

impl OutputStage {
    /// Short label shown next to the bar
    pub const fn label(self) -> &'static str {
        match self {
            Self::Joining => "joining",
            Self::Cropping => "cropping",
            Self::SavingFull => "saving full",
            Self::SavingCompressed => "saving compressed",
        }
    }
}

/// Single bar advancing once per written mosaic
pub struct ProgressManager {
    bar: Option<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressManager {
    /// Create an idle progress manager
    pub const fn new() -> Self {
        Self { bar: None }
    }

    /// Prepare the bar for `mosaic_count` mosaics
    pub fn initialize(&mut self, mosaic_count: usize) {
        let bar = ProgressBar::new(mosaic_count as u64);
        bar.set_style(MOSAIC_STYLE.clone());
        self.bar = Some(bar);
    }

    /// Show which mosaic is being written
    pub fn start_mosaic(&self, id: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_prefix(id.to_string());
            bar.set_message(String::new());
        }
    }

    /// Show the current step for the active mosaic
    pub fn stage(&self, stage: OutputStage) {
        if let Some(ref bar) = self.bar {
            bar.set_message(stage.label());
        }
    }

    /// Count the active mosaic as written
    pub fn complete_mosaic(&self) {
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    /// Position of the bar, zero before initialization
    pub fn position(&self) -> u64 {
        self.bar.as_ref().map_or(0, ProgressBar::position)
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
