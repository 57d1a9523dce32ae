//! Cosmetic progress phases.
//!
//! While a terminal action (deploy, upload, generate) is in flight, the UI
//! shows coarse textual phase labels advanced on a fixed timer. The labels
//! carry no information about actual server-side progress and never feed
//! back into success/failure logic; the ticker is stopped when the real
//! call resolves, whichever label it reached.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::view::ProgressSink;

pub struct PhaseTicker {
    handle: JoinHandle<()>,
}

impl PhaseTicker {
    /// Starts a background task that pushes one label to `sink` every
    /// `every` interval (the first immediately), then stops at the last.
    pub fn start(
        sink: Arc<dyn ProgressSink>,
        labels: &'static [&'static str],
        every: Duration,
    ) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            for label in labels {
                interval.tick().await;
                sink.phase(label);
            }
        });
        PhaseTicker { handle }
    }

    pub fn stop(self) {
        self.handle.abort();
    }
}

impl Drop for PhaseTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingSink(Mutex<Vec<String>>);

    impl ProgressSink for RecordingSink {
        fn phase(&self, label: &str) {
            self.0.lock().unwrap().push(label.to_string());
        }
    }

    const LABELS: &[&str] = &["Creating repository...", "Generating...", "Deploying..."];

    #[tokio::test(start_paused = true)]
    async fn test_labels_advance_in_order_on_the_timer() {
        let sink = Arc::new(RecordingSink::default());
        let ticker = PhaseTicker::start(sink.clone(), LABELS, Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(5)).await;
        ticker.stop();

        let seen = sink.0.lock().unwrap().clone();
        assert_eq!(seen, LABELS);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_the_ticker_early() {
        let sink = Arc::new(RecordingSink::default());
        let ticker = PhaseTicker::start(sink.clone(), LABELS, Duration::from_secs(1));

        // Only the immediate first tick has fired.
        tokio::task::yield_now().await;
        ticker.stop();
        tokio::time::sleep(Duration::from_secs(5)).await;

        let seen = sink.0.lock().unwrap().clone();
        assert!(seen.len() <= 1, "ticker kept running after stop: {seen:?}");
    }
}
