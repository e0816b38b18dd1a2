//! Multi-file progress tracking with automatic batching for large sets

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

/// Coordinates progress display for batch operations
///
/// Each file gets a bar counting scored tiles. Bars are recycled in a
/// rolling window of `MAX_INDIVIDUAL_PROGRESS_BARS`; larger batches also get
/// a file-count bar.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    file_bars: Vec<ProgressBar>,
    file_count: usize,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix} [{bar:30.cyan/blue}] {pos}/{len} tiles {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Files: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager
    pub fn new() -> Self {
        Self {
            multi_progress: MultiProgress::new(),
            batch_bar: None,
            file_bars: Vec::new(),
            file_count: 0,
        }
    }

    /// Initialize progress bars based on file count
    pub fn initialize(&mut self, file_count: usize) {
        self.file_count = file_count;

        // Switch to batch mode for large file sets to avoid terminal spam
        if file_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(file_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = file_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(0);
            pb.set_style(PROGRESS_STYLE.clone());
            self.file_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Reset a bar for a new file and hand it out for the affinity pass
    ///
    /// Returns `None` when `initialize` created no bars.
    pub fn start_file(&mut self, index: usize, path: &Path, tiles: usize) -> Option<ProgressBar> {
        let bar = self.slot(index)?;
        let display_name = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        bar.reset();
        bar.set_length(tiles as u64);
        bar.set_position(0);
        bar.set_prefix(display_name);
        bar.set_message(String::new());
        Some(bar.clone())
    }

    /// Note that cached analysis was reused instead of scoring
    pub fn reuse_file(&mut self, index: usize) {
        if let Some(bar) = self.slot(index) {
            if let Some(length) = bar.length() {
                bar.set_position(length);
            }
            bar.set_message("(cached)");
        }
    }

    /// Mark file as completed and update batch progress
    pub fn complete_file(&mut self, index: usize, elapsed: Duration) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(bar) = self.slot(index) {
            if let Some(length) = bar.length() {
                bar.set_position(length);
            }
            bar.set_message(format!("✓ {:.1}s", elapsed.as_secs_f64()));
        }
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All files processed");
        }
        let _ = self.multi_progress.clear();
    }

    /// Number of files the manager was initialized for
    pub const fn file_count(&self) -> usize {
        self.file_count
    }

    // Rolling window: file `index` reuses bar `index % len`
    fn slot(&self, index: usize) -> Option<&ProgressBar> {
        if self.file_bars.is_empty() {
            return None;
        }
        self.file_bars.get(index % self.file_bars.len())
    }
}
