//! Progress reporting utilities using indicatif.
//!
//! The library reports progress through [`ProgressCallback`] so it stays
//! independent of any terminal. [`Progress`] is the indicatif-backed
//! implementation the binary installs for text output.

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for the stages of a run.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase (e.g., "hashing")
    /// * `total` - Total number of items to process
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Current item number (1-based)
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using a single indicatif bar per phase.
pub struct Progress {
    active: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupseq::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            active: Mutex::new(None),
            quiet,
        }
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn with_active(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.active.lock() {
            if let Some(ref pb) = *guard {
                f(pb);
            }
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::bar_style());
        pb.set_message(phase_label(phase).to_string());
        if let Ok(mut guard) = self.active.lock() {
            if let Some(previous) = guard.replace(pb) {
                previous.finish_and_clear();
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        self.with_active(|pb| {
            pb.set_position(current as u64);
            pb.set_message(truncate_path(path, 30));
        });
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        if let Ok(mut guard) = self.active.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_with_message(format!("{} complete", phase_label(phase)));
            }
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        self.with_active(|pb| pb.set_message(message.to_string()));
    }
}

fn phase_label(phase: &str) -> &str {
    match phase {
        "hashing" => "Hashing",
        "purging" => "Deleting duplicates",
        "renumbering" => "Renumbering",
        other => other,
    }
}

/// Shorten a path to its file name for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let count = file_name.chars().count();
    if count >= max_len {
        let tail: String = file_name.chars().skip(count + 3 - max_len).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
