//! Stage progress bars for profiling and compositing

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

static STAGE_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{msg:>16}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}}"
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Hands out one progress bar per job stage
///
/// When disabled every bar is hidden, so library code can report progress
/// unconditionally.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    enabled: bool,
    stages: Vec<ProgressBar>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ProgressManager {
    /// Create a manager; `enabled = false` hides all bars
    pub fn new(enabled: bool) -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            enabled,
            stages: Vec::new(),
        }
    }

    /// Whether bars are drawn
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a bar for a new stage
    pub fn stage(&mut self, name: &'static str) -> ProgressBar {
        let bar = if self.enabled {
            let bar = self.multi_progress.add(ProgressBar::new(0));
            bar.set_style(STAGE_STYLE.clone());
            bar
        } else {
            ProgressBar::hidden()
        };
        bar.set_message(name);
        self.stages.push(bar.clone());
        bar
    }

    /// Number of stages started so far
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Finish every stage bar and clear the display
    pub fn finish(&self) {
        for bar in &self.stages {
            bar.finish_and_clear();
        }
        let _ = self.multi_progress.clear();
    }
}
