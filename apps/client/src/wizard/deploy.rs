//! Portfolio deployment wizard: token entry → repository config → review
//! → deploy.
//!
//! Gated on a parsed CV in the store. Step 1 cannot be left until the
//! GitHub token was verified against the backend; the terminal deploy call
//! carries the full accumulated state and, on failure, returns the user to
//! the step-4 form with every field intact.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::api::{ApiClient, DeployRequest, GithubUser};
use crate::errors::AppError;
use crate::gate::{require_document, Redirect};
use crate::models::CvData;
use crate::progress::PhaseTicker;
use crate::store::{Store, CV_DATA_KEY};
use crate::view::{ProgressSink, WizardView};
use crate::wizard::{RequiredField, StepDef, Wizard};

pub const STEPS: &[StepDef] = &[
    StepDef {
        name: "token",
        required: &[RequiredField {
            key: "github_token",
            label: "GitHub token",
        }],
        verification_prompt: Some("Please verify your GitHub token first"),
    },
    StepDef {
        name: "repository",
        required: &[RequiredField {
            key: "repo_name",
            label: "repository name",
        }],
        verification_prompt: None,
    },
    StepDef {
        name: "review",
        required: &[],
        verification_prompt: None,
    },
    StepDef {
        name: "deploy",
        required: &[],
        verification_prompt: None,
    },
];

/// Purely-cosmetic phase labels shown while the deploy call is in flight.
const DEPLOY_PHASES: &[&str] = &[
    "Creating GitHub repository...",
    "Generating your portfolio...",
    "Deploying to GitHub Pages...",
];
const PHASE_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of the pre-deploy feedback prompt. Skipping leaves `None`.
#[derive(Debug, Clone)]
pub struct Feedback {
    pub rating: u8,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentSummary {
    pub username: String,
    pub repository: String,
    pub url: String,
}

pub struct DeployWizard<V: WizardView> {
    pub flow: Wizard<V>,
    cv: CvData,
}

impl<V: WizardView> DeployWizard<V> {
    /// Initializes the wizard behind the CV gate. A missing or placeholder
    /// `cvData` document redirects to the entry page before any step
    /// rendering happens.
    pub fn init(store: &Store, view: V) -> Result<Self, Redirect> {
        let doc = require_document(store, CV_DATA_KEY)?;
        let cv: CvData = serde_json::from_value(doc).map_err(|e| {
            warn!("Stored CV document has an unexpected shape: {e}");
            Redirect {
                to: crate::gate::ENTRY_PAGE,
                message: "Stored CV data could not be read. Please upload your CV again."
                    .to_string(),
            }
        })?;
        info!("Deploy wizard initialized");
        Ok(DeployWizard {
            flow: Wizard::new(STEPS, view),
            cv,
        })
    }

    pub fn cv(&self) -> &CvData {
        &self.cv
    }

    // ── Token verification (step 1) ─────────────────────────────────────

    /// Issues one verification request for the entered token. Each attempt
    /// is independent; the user may retry indefinitely.
    pub async fn verify_token(&mut self, api: &ApiClient) {
        let token = self.flow.field_str("github_token").trim().to_string();
        if token.is_empty() {
            let e = AppError::MissingField("GitHub token".to_string());
            self.flow.view_mut().show_message(&e.to_string());
            return;
        }
        let result = api.verify_github_token(&token).await;
        self.apply_verification(result);
    }

    /// Applies a verification response: on success the identity attributes
    /// land in the field mapping and the gated transition is armed; on
    /// failure the flag stays unset and the error text is surfaced.
    pub fn apply_verification(&mut self, result: Result<GithubUser, AppError>) {
        match result {
            Ok(user) => {
                let mut attrs = vec![(
                    "github_username".to_string(),
                    serde_json::Value::from(user.username.clone()),
                )];
                if let Some(name) = user.name {
                    attrs.push(("name".to_string(), serde_json::Value::from(name)));
                }
                if let Some(email) = user.email {
                    attrs.push(("email".to_string(), serde_json::Value::from(email)));
                }
                self.flow.apply_verified(attrs);
                if self.flow.field_str("repo_name").is_empty() {
                    let default = default_repo_name(&user.username);
                    self.flow.set_field("repo_name", default);
                }
                info!("GitHub token verified for {}", user.username);
            }
            Err(e) => {
                warn!("Token verification failed: {e}");
                let message = format!("Verification failed: {e}");
                self.flow.view_mut().show_message(&message);
            }
        }
    }

    // ── Repository config & review (steps 2–3) ──────────────────────────

    pub fn set_repo_name(&mut self, repo_name: &str) {
        self.flow.set_field("repo_name", repo_name.trim());
    }

    /// The URL the portfolio will live at. The repository name is appended
    /// only when it differs from the `{username}.github.io` default.
    pub fn portfolio_url(&self) -> String {
        let username = self.flow.field_str("github_username");
        let default = default_repo_name(username);
        let repo = match self.flow.field_str("repo_name") {
            "" => default.clone(),
            name => name.to_string(),
        };
        if repo == default {
            format!("https://{username}.github.io")
        } else {
            format!("https://{username}.github.io/{repo}")
        }
    }

    pub fn summary(&self) -> DeploymentSummary {
        DeploymentSummary {
            username: self.flow.field_str("github_username").to_string(),
            repository: self.flow.field_str("repo_name").to_string(),
            url: self.portfolio_url(),
        }
    }

    /// Fetches the portfolio preview HTML for the modal. Failures surface
    /// through the view; the wizard state is untouched either way.
    pub async fn preview(&mut self, api: &ApiClient) -> Option<String> {
        match api.preview_portfolio(&self.cv).await {
            Ok(html) => Some(html),
            Err(e) => {
                warn!("Preview failed: {e}");
                self.flow
                    .view_mut()
                    .show_message(&format!("Preview failed: {e}"));
                None
            }
        }
    }

    // ── Terminal action (step 4) ────────────────────────────────────────

    /// Deploys the portfolio. Feedback, when given, is posted best-effort
    /// and never blocks. While the request is in flight the UI sits in the
    /// progress display fed by cosmetic phase labels; on success the
    /// deployed URL is returned and shown, on failure the step-4 form
    /// comes back with all field values intact.
    pub async fn deploy(
        &mut self,
        api: &ApiClient,
        sink: Arc<dyn ProgressSink>,
        feedback: Option<Feedback>,
    ) -> Option<String> {
        if self.flow.current_step() != self.flow.total_steps() {
            self.flow
                .view_mut()
                .show_message("Complete the previous steps before deploying");
            return None;
        }

        if let Some(feedback) = feedback {
            // Detached: deployment never waits on this.
            api.notify_feedback(feedback.rating, feedback.text);
        }

        let request = DeployRequest {
            github_token: self.flow.field_str("github_token").to_string(),
            github_username: self.flow.field_str("github_username").to_string(),
            repo_name: self.flow.field_str("repo_name").to_string(),
            cv_data: self.cv.clone(),
        };

        self.flow.enter_progress();
        let ticker = PhaseTicker::start(sink, DEPLOY_PHASES, PHASE_INTERVAL);
        let result = api.deploy_portfolio(&request).await;
        ticker.stop();

        match result {
            Ok(deployed) => {
                let url = deployed
                    .portfolio_url
                    .unwrap_or_else(|| format!("https://{}.github.io", request.github_username));
                info!("Portfolio deployed at {url}");
                self.flow.complete_success(&url);
                Some(url)
            }
            Err(e) => {
                warn!("Deployment failed: {e}");
                self.flow.fail_terminal(&format!("Deployment failed: {e}"));
                None
            }
        }
    }
}

fn default_repo_name(username: &str) -> String {
    format!("{username}.github.io")
}
