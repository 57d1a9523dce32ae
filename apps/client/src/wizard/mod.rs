//! Wizard core — linear multi-step form flow with per-step validation.
//!
//! One controller shape drives every flow in the client (deploy, generate,
//! editor handoff): a fixed sequence of named steps, advancement gated on
//! the active step's validation, a clickable progress indicator that can
//! only jump back to completed steps, and checkpoint saves of the full
//! field mapping into the persisted store.
//!
//! Validation failures are routed to the view as user-visible messages and
//! never propagate past the controller.

pub mod deploy;
pub mod generate;

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::store::Store;
use crate::view::WizardView;

/// A required field: `key` in the field mapping, `label` in user messages.
#[derive(Debug, Clone, Copy)]
pub struct RequiredField {
    pub key: &'static str,
    pub label: &'static str,
}

/// Static definition of one wizard step.
#[derive(Debug, Clone, Copy)]
pub struct StepDef {
    pub name: &'static str,
    pub required: &'static [RequiredField],
    /// Set when the step cannot be left until an external verification
    /// succeeded; the message is shown while the flag is unset.
    pub verification_prompt: Option<&'static str>,
}

/// What the UI is currently showing. `Progress` and `Success` are display
/// states layered over the terminal step, not steps themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    Step,
    Progress,
    Success,
}

/// Result of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Moved(usize),
    Blocked,
    /// Already at step N; the terminal action applies, not a transition.
    AtTerminal,
}

pub struct Wizard<V: WizardView> {
    steps: &'static [StepDef],
    step: usize,
    fields: Map<String, Value>,
    completed: Vec<bool>,
    verified: bool,
    display: DisplayState,
    view: V,
}

impl<V: WizardView> Wizard<V> {
    pub fn new(steps: &'static [StepDef], view: V) -> Self {
        assert!(!steps.is_empty(), "a wizard needs at least one step");
        let mut wizard = Wizard {
            steps,
            step: 1,
            fields: Map::new(),
            completed: vec![false; steps.len()],
            verified: false,
            display: DisplayState::Step,
            view,
        };
        wizard.repaint();
        wizard
    }

    pub fn current_step(&self) -> usize {
        self.step
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn step_name(&self) -> &'static str {
        self.steps[self.step - 1].name
    }

    pub fn display(&self) -> DisplayState {
        self.display
    }

    pub fn is_verified(&self) -> bool {
        self.verified
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    // ── Field mapping ───────────────────────────────────────────────────

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn set_field(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.insert(key.to_string(), value.into());
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn field_str(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or("")
    }

    /// Stores verified identity attributes and arms the gated transition.
    pub fn apply_verified(&mut self, attrs: impl IntoIterator<Item = (String, Value)>) {
        for (key, value) in attrs {
            self.fields.insert(key, value);
        }
        self.verified = true;
    }

    pub fn clear_verified(&mut self) {
        self.verified = false;
    }

    // ── Navigation ──────────────────────────────────────────────────────

    /// Moves to the next step when the active step validates; otherwise
    /// surfaces the validation message and stays put. No-op at step N.
    pub fn advance(&mut self) -> StepOutcome {
        if self.step == self.steps.len() {
            return StepOutcome::AtTerminal;
        }
        if let Err(e) = self.validate(self.step) {
            self.view.show_message(&e.to_string());
            return StepOutcome::Blocked;
        }
        self.completed[self.step - 1] = true;
        self.step += 1;
        debug!("Advanced to step {} ({})", self.step, self.step_name());
        self.repaint();
        StepOutcome::Moved(self.step)
    }

    /// Moves one step back, unconditionally, clamped at step 1.
    pub fn retreat(&mut self) -> usize {
        if self.step > 1 {
            self.step -= 1;
            self.repaint();
        }
        self.step
    }

    /// Returns the wizard to step 1 with a cleared field mapping
    /// ("start over").
    pub fn reset(&mut self) {
        self.step = 1;
        self.fields.clear();
        self.completed.fill(false);
        self.verified = false;
        self.display = DisplayState::Step;
        self.repaint();
    }

    /// Jumps to an already-completed step (progress indicator click).
    /// Never skips ahead of validated steps.
    pub fn jump_to(&mut self, step: usize) -> StepOutcome {
        if step < 1 || step > self.steps.len() {
            return StepOutcome::Blocked;
        }
        if step > self.step && !self.completed[step - 1] {
            return StepOutcome::Blocked;
        }
        self.step = step;
        self.repaint();
        StepOutcome::Moved(step)
    }

    /// Validation predicate for `step` over the current field mapping.
    pub fn validate(&self, step: usize) -> Result<(), AppError> {
        let def = &self.steps[step - 1];
        for field in def.required {
            if !has_value(self.fields.get(field.key)) {
                return Err(AppError::MissingField(field.label.to_string()));
            }
        }
        if let Some(prompt) = def.verification_prompt {
            if !self.verified {
                return Err(AppError::Unverified(prompt.to_string()));
            }
        }
        Ok(())
    }

    // ── Terminal-action display states ──────────────────────────────────

    /// Enters the non-interactive progress display while the terminal
    /// action is in flight.
    pub fn enter_progress(&mut self) {
        self.display = DisplayState::Progress;
    }

    /// Terminal action succeeded: show the server-returned result.
    pub fn complete_success(&mut self, detail: &str) {
        self.display = DisplayState::Success;
        self.view.show_success(detail);
    }

    /// Terminal action failed: revert to the step form with the message.
    /// Field values are left intact for resubmission.
    pub fn fail_terminal(&mut self, message: &str) {
        self.display = DisplayState::Step;
        self.view.show_message(message);
        self.repaint();
    }

    // ── Persistence checkpoints ─────────────────────────────────────────

    /// Serializes the full field mapping into the store under `key`.
    /// Full overwrite: the last writer wins.
    pub fn save(&self, store: &mut Store, key: &str) -> Result<(), AppError> {
        store.set_json(key, &self.fields)
    }

    /// Replaces the field mapping with the one persisted under `key`, if
    /// any. Step position and flags are not persisted.
    pub fn hydrate(&mut self, store: &Store, key: &str) -> Result<(), AppError> {
        if let Some(fields) = store.get_json::<Map<String, Value>>(key)? {
            self.fields = fields;
        }
        Ok(())
    }

    fn repaint(&mut self) {
        self.view.render_step(self.step, self.steps.len(), &self.fields);
        self.view.render_progress(self.step, self.steps.len());
    }
}

/// A field counts as present when it is a non-blank string or any other
/// non-null, non-empty value.
fn has_value(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
        Some(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::RecordingView;

    const STEPS: &[StepDef] = &[
        StepDef {
            name: "details",
            required: &[RequiredField {
                key: "title",
                label: "title",
            }],
            verification_prompt: None,
        },
        StepDef {
            name: "confirm",
            required: &[],
            verification_prompt: None,
        },
        StepDef {
            name: "finish",
            required: &[],
            verification_prompt: None,
        },
    ];

    fn wizard() -> Wizard<RecordingView> {
        Wizard::new(STEPS, RecordingView::default())
    }

    #[test]
    fn test_starts_at_step_one() {
        let w = wizard();
        assert_eq!(w.current_step(), 1);
        assert_eq!(w.display(), DisplayState::Step);
    }

    #[test]
    fn test_advance_blocked_until_required_field_set() {
        let mut w = wizard();
        assert_eq!(w.advance(), StepOutcome::Blocked);
        assert_eq!(w.current_step(), 1);
        assert!(w.view_mut().messages[0].contains("title"));

        w.set_field("title", "Engineer");
        assert_eq!(w.advance(), StepOutcome::Moved(2));
        assert_eq!(w.current_step(), 2);
    }

    #[test]
    fn test_blank_string_does_not_satisfy_required_field() {
        let mut w = wizard();
        w.set_field("title", "   ");
        assert_eq!(w.advance(), StepOutcome::Blocked);
    }

    #[test]
    fn test_advance_at_terminal_step_is_a_noop() {
        let mut w = wizard();
        w.set_field("title", "Engineer");
        w.advance();
        w.advance();
        assert_eq!(w.current_step(), 3);
        assert_eq!(w.advance(), StepOutcome::AtTerminal);
        assert_eq!(w.current_step(), 3);
    }

    #[test]
    fn test_retreat_clamps_at_step_one() {
        let mut w = wizard();
        assert_eq!(w.retreat(), 1);
        w.set_field("title", "Engineer");
        w.advance();
        assert_eq!(w.retreat(), 1);
    }

    #[test]
    fn test_jump_to_completed_step_only() {
        let mut w = wizard();
        w.set_field("title", "Engineer");
        w.advance();
        w.advance();

        // Back to a completed step, then forward again to it.
        assert_eq!(w.jump_to(1), StepOutcome::Moved(1));
        assert_eq!(w.jump_to(2), StepOutcome::Moved(2));
        // Step 3 was reached but never completed: no skipping ahead.
        assert_eq!(w.jump_to(3), StepOutcome::Blocked);
        assert_eq!(w.jump_to(0), StepOutcome::Blocked);
        assert_eq!(w.jump_to(9), StepOutcome::Blocked);
    }

    #[test]
    fn test_verification_gates_advancement() {
        const GATED: &[StepDef] = &[
            StepDef {
                name: "token",
                required: &[RequiredField {
                    key: "token",
                    label: "GitHub token",
                }],
                verification_prompt: Some("Please verify your GitHub token first"),
            },
            StepDef {
                name: "done",
                required: &[],
                verification_prompt: None,
            },
        ];
        let mut w = Wizard::new(GATED, RecordingView::default());
        w.set_field("token", "ghp_abc");
        assert_eq!(w.advance(), StepOutcome::Blocked);
        assert!(w.view_mut().messages[0].contains("verify your GitHub token"));

        w.apply_verified([("username".to_string(), Value::from("alice"))]);
        assert_eq!(w.advance(), StepOutcome::Moved(2));
        assert_eq!(w.field_str("username"), "alice");
    }

    #[test]
    fn test_save_and_hydrate_round_trip_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("store.json")).unwrap();

        let mut w = wizard();
        w.set_field("title", "Engineer");
        w.set_field("tags", serde_json::json!(["rust", "tokio"]));
        w.set_field("nested", serde_json::json!({"a": {"b": 2}}));
        w.save(&mut store, "wizard").unwrap();

        let mut fresh = wizard();
        fresh.hydrate(&store, "wizard").unwrap();
        assert_eq!(fresh.fields(), w.fields());
    }

    #[test]
    fn test_terminal_failure_reverts_display_and_keeps_fields() {
        let mut w = wizard();
        w.set_field("title", "Engineer");
        w.advance();
        w.advance();

        w.enter_progress();
        assert_eq!(w.display(), DisplayState::Progress);
        w.fail_terminal("Deployment failed: network unreachable");
        assert_eq!(w.display(), DisplayState::Step);
        assert_eq!(w.current_step(), 3);
        assert_eq!(w.field_str("title"), "Engineer");
    }

    #[test]
    fn test_terminal_success_shows_result() {
        let mut w = wizard();
        w.enter_progress();
        w.complete_success("https://alice.github.io");
        assert_eq!(w.display(), DisplayState::Success);
        assert_eq!(w.view_mut().successes, vec!["https://alice.github.io"]);
    }
}
