//! View binding layer.
//!
//! Controllers never touch presentation structure directly; every paint
//! goes through these traits so the state machines run (and test) without
//! a rendering environment. Calls are fire-and-forget: the view returns
//! nothing to the controller.

use serde_json::{Map, Value};
use tracing::info;

pub trait WizardView: Send {
    /// Repaints the newly active step with the collected field values.
    fn render_step(&mut self, step: usize, total: usize, fields: &Map<String, Value>);

    /// Updates the step-progress indicator. Visual only: no contract
    /// beyond reflecting the current step.
    fn render_progress(&mut self, current: usize, total: usize);

    /// Surfaces a user-visible message (validation failure, server error).
    fn show_message(&mut self, message: &str);

    /// Displays the terminal success state with the server-returned result.
    fn show_success(&mut self, detail: &str);
}

/// Sink for cosmetic progress-phase labels shown while a terminal action
/// is in flight. Shared with a background ticker task, hence `&self`.
pub trait ProgressSink: Send + Sync {
    fn phase(&self, label: &str);
}

/// Default binding for headless shells: paints by logging.
#[derive(Debug, Default)]
pub struct TracingView;

impl WizardView for TracingView {
    fn render_step(&mut self, step: usize, total: usize, _fields: &Map<String, Value>) {
        info!("Rendering step {step}/{total}");
    }

    fn render_progress(&mut self, current: usize, total: usize) {
        info!("Progress indicator at {current}/{total}");
    }

    fn show_message(&mut self, message: &str) {
        info!("Message: {message}");
    }

    fn show_success(&mut self, detail: &str) {
        info!("Success: {detail}");
    }
}

impl ProgressSink for TracingView {
    fn phase(&self, label: &str) {
        info!("Phase: {label}");
    }
}

/// View double that records every paint, for unit tests.
#[derive(Debug, Default)]
pub struct RecordingView {
    pub steps: Vec<usize>,
    pub messages: Vec<String>,
    pub successes: Vec<String>,
}

impl WizardView for RecordingView {
    fn render_step(&mut self, step: usize, _total: usize, _fields: &Map<String, Value>) {
        self.steps.push(step);
    }

    fn render_progress(&mut self, _current: usize, _total: usize) {}

    fn show_message(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn show_success(&mut self, detail: &str) {
        self.successes.push(detail.to_string());
    }
}
