//! Loading screen shown while the model is imported
//!
//! The screen itself is drawn by the host; this type tracks whether it is
//! displayed and the progress figure it shows.

use modelbox_engine::ImportProgress;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Progress state of the model import
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadingScreen {
    displayed: bool,
    percent: f64,
}

impl LoadingScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the screen and reset the progress
    pub fn display(&mut self) {
        self.displayed = true;
        self.percent = 0.0;
    }

    /// Hide the screen
    pub fn hide(&mut self) {
        self.displayed = false;
    }

    pub fn is_displayed(&self) -> bool {
        self.displayed
    }

    /// Last progress figure
    ///
    /// A rounded percentage when the total size is known, otherwise the
    /// downloaded megabytes floored to two decimals.
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Update from an import progress event and return the new figure
    pub fn update(&mut self, progress: ImportProgress) -> f64 {
        self.percent = match progress.total {
            Some(total) if total > 0 => (progress.loaded as f64 * 100.0 / total as f64).round(),
            _ => {
                let mb = progress.loaded as f64 / BYTES_PER_MB;
                (mb * 100.0).floor() / 100.0
            }
        };
        self.percent
    }
}
