//! Progress display for batch puzzle generation

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;
use std::time::Duration;

/// Shows overall batch progress plus a status line for the puzzle in flight
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    status_bar: Option<ProgressBar>,
    completed: usize,
    failed: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template =
        format!("[{{elapsed_precise}}] Puzzles: [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} {{msg}}");
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static STATUS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_spinner()
        .template("{spinner} {prefix} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
});

impl ProgressManager {
    /// Manager with no bars attached yet
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            status_bar: None,
            completed: 0,
            failed: 0,
        }
    }

    /// Create the bars for a batch of `count` puzzles
    pub fn initialize(&mut self, count: usize) {
        let batch_bar = ProgressBar::new(count as u64);
        batch_bar.set_style(BATCH_STYLE.clone());
        self.batch_bar = Some(self.multi_progress.add(batch_bar));

        let status_bar = ProgressBar::new_spinner();
        status_bar.set_style(STATUS_STYLE.clone());
        status_bar.enable_steady_tick(Duration::from_millis(120));
        self.status_bar = Some(self.multi_progress.add(status_bar));
    }

    /// Announce the puzzle being generated
    pub fn start_puzzle(&self, index: usize, description: &str) {
        if let Some(ref status_bar) = self.status_bar {
            status_bar.set_prefix(format!("#{}", index + 1));
            status_bar.set_message(description.to_string());
        }
    }

    /// Update the status line while a puzzle is verified
    pub fn set_status(&self, message: &str) {
        if let Some(ref status_bar) = self.status_bar {
            status_bar.set_message(message.to_string());
        }
    }

    /// Record a finished puzzle
    pub fn complete_puzzle(&mut self, tiles: usize, elapsed: Duration) {
        self.completed += 1;
        self.advance(&format!("last: {tiles} tiles in {elapsed:.2?}"));
    }

    /// Record a puzzle that could not be generated
    pub fn fail_puzzle(&mut self) {
        self.failed += 1;
        self.advance(&format!("{} failed", self.failed));
    }

    fn advance(&self, message: &str) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
            batch_bar.set_message(message.to_string());
        }
    }

    /// Number of puzzles recorded as finished
    pub const fn completed(&self) -> usize {
        self.completed
    }

    /// Finish open bars and clear the terminal area
    pub fn finish(&self) {
        if let Some(ref status_bar) = self.status_bar {
            status_bar.finish_and_clear();
        }
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message(format!(
                "{} generated, {} failed",
                self.completed, self.failed
            ));
        }
        let _ = self.multi_progress.clear();
    }
}
