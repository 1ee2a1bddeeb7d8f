//! Progress reporting and cooperative cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Minimum increase, in percentage points, between two progress reports.
pub const PROGRESS_STEP: u8 = 5;

/// Severity of an informational message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageSeverity {
    Info,
    Warning,
}

/// Receives informational messages during an import. Errors are returned
/// from the import, never sent here.
pub trait ProgressSink {
    fn notify(&mut self, severity: MessageSeverity, text: &str);

    /// Called with the percent of rows imported so far.
    fn progress(&mut self, percent: u8) {
        self.notify(
            MessageSeverity::Info,
            &format!("Importing data: {percent}% complete"),
        );
    }
}

impl<F> ProgressSink for F
where
    F: FnMut(MessageSeverity, &str),
{
    fn notify(&mut self, severity: MessageSeverity, text: &str) {
        self(severity, text);
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn notify(&mut self, _severity: MessageSeverity, _text: &str) {}
}

/// Sink that forwards messages to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn notify(&mut self, severity: MessageSeverity, text: &str) {
        match severity {
            MessageSeverity::Info => tracing::info!("{text}"),
            MessageSeverity::Warning => tracing::warn!("{text}"),
        }
    }
}

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Turns row counts into step-limited percent reports.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total: usize,
    last_reported: u8,
}

impl ProgressTracker {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            last_reported: 0,
        }
    }

    /// Records `done` completed rows; returns the percent to report, if the
    /// increase since the last report reaches [`PROGRESS_STEP`].
    pub fn advance(&mut self, done: usize) -> Option<u8> {
        if self.total == 0 {
            return None;
        }
        let percent = (done.min(self.total) as u128 * 100 / self.total as u128) as u8;
        if percent >= self.last_reported.saturating_add(PROGRESS_STEP) {
            self.last_reported = percent;
            Some(percent)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracker_reports_in_steps() {
        let mut tracker = ProgressTracker::new(100);
        let reports: Vec<u8> = (1..=100).filter_map(|done| tracker.advance(done)).collect();
        assert_eq!(reports.len(), 20);
        assert_eq!(reports.first(), Some(&5));
        assert_eq!(reports.last(), Some(&100));
        assert!(reports.windows(2).all(|w| w[1] >= w[0] + PROGRESS_STEP));
    }

    #[test]
    fn test_tracker_reports_true_percentage_on_jumps() {
        let mut tracker = ProgressTracker::new(3);
        assert_eq!(tracker.advance(1), Some(33));
        assert_eq!(tracker.advance(2), Some(66));
        assert_eq!(tracker.advance(3), Some(100));
        assert_eq!(tracker.advance(3), None);
    }

    #[test]
    fn test_tracker_small_increments_are_held_back() {
        let mut tracker = ProgressTracker::new(1000);
        assert_eq!(tracker.advance(10), None);
        assert_eq!(tracker.advance(49), None);
        assert_eq!(tracker.advance(50), Some(5));
        assert_eq!(tracker.advance(99), None);
    }

    #[test]
    fn test_cancel_token_is_shared() {
        let token = CancelToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[test]
    fn test_closure_sink_receives_progress_text() {
        let mut messages = Vec::new();
        let mut sink = |severity: MessageSeverity, text: &str| {
            messages.push((severity, text.to_string()));
        };
        sink.progress(40);
        assert_eq!(
            messages,
            vec![(
                MessageSeverity::Info,
                "Importing data: 40% complete".to_string()
            )]
        );
    }
}
