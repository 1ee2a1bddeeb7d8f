//! Terminal progress bar for imports.

use std::io::{self, IsTerminal};

use indicatif::{ProgressBar, ProgressStyle};
use tabload_ingest::{MessageSeverity, ProgressSink};
use tracing::{info, warn};

/// [`ProgressSink`] that drives an `indicatif` bar measured in percent.
///
/// The bar is hidden when stderr is not a terminal or when disabled; messages
/// then go to the log only.
pub struct BarProgress {
    bar: Option<ProgressBar>,
}

impl BarProgress {
    pub fn new(label: &str, enabled: bool) -> Self {
        let bar = (enabled && io::stderr().is_terminal()).then(|| {
            let bar = ProgressBar::new(100);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}% {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-"),
            );
            bar.set_message(label.to_string());
            bar
        });
        Self { bar }
    }

    /// Removes the bar, or leaves it where it stopped for an incomplete import.
    pub fn finish(&self, complete: bool) {
        if let Some(bar) = &self.bar {
            if complete {
                bar.finish_and_clear();
            } else {
                bar.abandon();
            }
        }
    }
}

impl ProgressSink for BarProgress {
    fn notify(&mut self, severity: MessageSeverity, text: &str) {
        match severity {
            MessageSeverity::Info => info!("{text}"),
            MessageSeverity::Warning => {
                if let Some(bar) = &self.bar {
                    bar.suspend(|| warn!("{text}"));
                } else {
                    warn!("{text}");
                }
            }
        }
    }

    fn progress(&mut self, percent: u8) {
        match &self.bar {
            Some(bar) => bar.set_position(u64::from(percent)),
            None => self.notify(
                MessageSeverity::Info,
                &format!("Importing data: {percent}% complete"),
            ),
        }
    }
}
