//! Stage spinner for transfer runs.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use strapsync_core::Progress;

const TICK: Duration = Duration::from_millis(100);

/// Spinner showing the current stage and the item being processed.
///
/// Hidden in quiet mode and when stderr is not a terminal.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    pub fn new(visible: bool) -> Self {
        let bar = if visible {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold} {wide_msg:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");
        bar.set_style(style);
        if visible {
            bar.enable_steady_tick(TICK);
        }
        Self { bar }
    }

    /// Handle for pausing the spinner around prompts.
    pub fn handle(&self) -> ProgressBar {
        self.bar.clone()
    }
}

impl Progress for Spinner {
    fn stage(&self, name: &str) {
        self.bar.set_prefix(name.to_string());
        self.bar.set_message("");
    }

    fn item(&self, message: &str) {
        self.bar.set_message(message.to_string());
    }

    fn finish(&self, message: &str) {
        self.bar.println(format!("✓ {message}"));
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
