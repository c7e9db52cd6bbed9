//! Progress reporting
//!
//! Stages report through the [`Ui`] trait:
//! - Current phase (Extracting, Transforming, Loading)
//! - Progress (current/total with a label)
//! - Activity log
//!
//! [`ConsoleUi`] draws an `indicatif` bar and forwards log lines to `tracing`;
//! [`SilentUi`] discards everything and is used by tests.

use indicatif::{ProgressBar, ProgressStyle};

/// Pipeline phases
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Extracting,
    Transforming,
    Loading,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Extracting => write!(f, "Extracting stats from API"),
            Phase::Transforming => write!(f, "Flattening stats to CSV"),
            Phase::Loading => write!(f, "Creating database schema"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Trait for progress reporting - allows both console and silent/test modes
pub trait Ui {
    fn set_phase(&mut self, phase: Phase);
    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>);
    fn clear_progress(&mut self);
    fn log(&mut self, message: impl Into<String>);
}

/// Console implementation: one progress bar at a time plus `tracing` output
#[derive(Default)]
pub struct ConsoleUi {
    bar: Option<ProgressBar>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self::default()
    }

    fn bar(&mut self, total: u64) -> &ProgressBar {
        let bar = self.bar.get_or_insert_with(|| {
            let pb = ProgressBar::new(total);
            let style = ProgressStyle::default_bar()
                .template("{msg:30} [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-");
            pb.set_style(style);
            pb
        });
        bar.set_length(total);
        bar
    }
}

impl Ui for ConsoleUi {
    fn set_phase(&mut self, phase: Phase) {
        self.clear_progress();
        tracing::info!("{}", phase);
    }

    fn set_progress(&mut self, current: u64, total: u64, label: impl Into<String>) {
        let bar = self.bar(total);
        bar.set_position(current);
        bar.set_message(label.into());
    }

    fn clear_progress(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }

    fn log(&mut self, message: impl Into<String>) {
        let message = message.into();
        match &self.bar {
            Some(bar) => bar.suspend(|| tracing::info!("{}", message)),
            None => tracing::info!("{}", message),
        }
    }
}

impl Drop for ConsoleUi {
    fn drop(&mut self) {
        self.clear_progress();
    }
}

/// Silent UI implementation for testing and non-interactive use
#[derive(Default)]
pub struct SilentUi;

impl SilentUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for SilentUi {
    fn set_phase(&mut self, _phase: Phase) {}
    fn set_progress(&mut self, _current: u64, _total: u64, _label: impl Into<String>) {}
    fn clear_progress(&mut self) {}
    fn log(&mut self, _message: impl Into<String>) {}
}
