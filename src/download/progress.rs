//! Per-page progress reporting.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Receives progress after each page is written.
///
/// Observers cannot influence the pipeline: there is no return value and the
/// pipeline never inspects observer state.
pub trait ProgressObserver: Send + Sync {
    /// Called once per written page with the 1-based page index and the page total.
    fn on_page(&self, current: usize, total: usize);
}

/// The no-op observer.
impl ProgressObserver for () {
    fn on_page(&self, _current: usize, _total: usize) {}
}

/// Terminal progress bar for one chapter.
#[derive(Debug)]
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    /// Creates a bar labelled with `message` (typically the chapter name).
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template("{spinner} {msg} [{bar:30}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }

    /// Creates a bar that draws nothing (for `--quiet` or non-terminal output).
    #[must_use]
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Removes the bar from the terminal.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl ProgressObserver for IndicatifProgress {
    fn on_page(&self, current: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(current as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_bar_tracks_position() {
        let progress = IndicatifProgress::hidden();
        progress.on_page(2, 5);
        assert_eq!(progress.bar.position(), 2);
        assert_eq!(progress.bar.length(), Some(5));
        progress.finish();
    }

    #[test]
    fn test_unit_observer_is_callable_as_trait_object() {
        let observer: &dyn ProgressObserver = &();
        observer.on_page(1, 1);
    }
}
