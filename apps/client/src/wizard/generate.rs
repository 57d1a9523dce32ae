//! Template-generation wizard: upload → job details → generate.
//!
//! This is the entry page flow, so it is not gated. The upload step is
//! complete once the backend parsed the CV; the terminal generate call
//! persists `cvData`, `templateData` and `jobDetails` and hands the user
//! off to the template page.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{CvData, JobDetails};
use crate::progress::PhaseTicker;
use crate::store::{Store, CV_DATA_KEY, JOB_DETAILS_KEY, TEMPLATE_DATA_KEY};
use crate::view::{ProgressSink, WizardView};
use crate::wizard::{RequiredField, StepDef, Wizard};

pub const STEPS: &[StepDef] = &[
    StepDef {
        name: "upload",
        required: &[RequiredField {
            key: "cv_parsed",
            label: "uploaded CV",
        }],
        verification_prompt: None,
    },
    StepDef {
        name: "job-details",
        required: &[
            RequiredField {
                key: "target_job",
                label: "target job",
            },
            RequiredField {
                key: "target_location",
                label: "target location",
            },
        ],
        verification_prompt: None,
    },
    StepDef {
        name: "generate",
        required: &[],
        verification_prompt: None,
    },
];

/// Where a successful generation hands the user off to.
pub const TEMPLATE_PAGE: &str = "template";

const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx"];

/// Cosmetic labels while the upload parse is in flight.
const UPLOAD_PHASES: &[&str] = &[
    "Reading document structure...",
    "Extracting text content...",
    "Analyzing CV format...",
    "Identifying key sections...",
    "Processing complete!",
];
const UPLOAD_PHASE_INTERVAL: Duration = Duration::from_millis(300);

/// Cosmetic labels while template generation is in flight.
const GENERATE_PHASES: &[&str] = &[
    "Processing career trajectory...",
    "Analyzing market trends...",
    "Generating recommendations...",
    "Finalizing strategy...",
];
const GENERATE_PHASE_INTERVAL: Duration = Duration::from_millis(1500);

pub struct GenerateWizard<V: WizardView> {
    pub flow: Wizard<V>,
    cv: Option<CvData>,
}

impl<V: WizardView> GenerateWizard<V> {
    pub fn new(view: V) -> Self {
        info!("Generate wizard initialized");
        GenerateWizard {
            flow: Wizard::new(STEPS, view),
            cv: None,
        }
    }

    pub fn cv(&self) -> Option<&CvData> {
        self.cv.as_ref()
    }

    // ── Upload (step 1) ─────────────────────────────────────────────────

    /// Uploads and parses the CV file. The originating control is assumed
    /// disabled by the view while this is in flight.
    pub async fn upload(
        &mut self,
        api: &ApiClient,
        sink: Arc<dyn ProgressSink>,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> bool {
        if let Err(e) = validate_upload(file_name, bytes.len() as u64) {
            self.flow.view_mut().show_message(&e.to_string());
            return false;
        }

        let ticker = PhaseTicker::start(sink, UPLOAD_PHASES, UPLOAD_PHASE_INTERVAL);
        let result = api.upload_cv(file_name, bytes).await;
        ticker.stop();
        self.apply_upload(file_name, result)
    }

    /// Applies an upload-parse response; completes step 1 on success and
    /// clears the upload state on failure.
    pub fn apply_upload(&mut self, file_name: &str, result: Result<CvData, AppError>) -> bool {
        match result {
            Ok(cv) => {
                info!("CV parsed successfully ({file_name})");
                self.cv = Some(cv);
                self.flow.set_field("file_name", file_name);
                self.flow.set_field("cv_parsed", true);
                self.flow.view_mut().show_message("CV analyzed successfully!");
                true
            }
            Err(e) => {
                warn!("Upload failed: {e}");
                let message = format!("Failed to analyze CV: {e}");
                self.flow.view_mut().show_message(&message);
                self.reset_upload();
                false
            }
        }
    }

    fn reset_upload(&mut self) {
        self.cv = None;
        self.flow.set_field("file_name", Value::Null);
        self.flow.set_field("cv_parsed", Value::Null);
    }

    // ── Job details (step 2) ────────────────────────────────────────────

    pub fn set_job_details(
        &mut self,
        target_job: &str,
        target_location: &str,
        industry: Option<&str>,
        experience_level: Option<&str>,
    ) {
        self.flow.set_field("target_job", target_job.trim());
        self.flow.set_field("target_location", target_location.trim());
        self.flow
            .set_field("industry", opt_value(industry));
        self.flow
            .set_field("experience_level", opt_value(experience_level));
    }

    pub fn job_details(&self) -> JobDetails {
        JobDetails {
            target_job: self.flow.field_str("target_job").to_string(),
            target_location: self.flow.field_str("target_location").to_string(),
            industry: non_empty(self.flow.field_str("industry")),
            experience_level: non_empty(self.flow.field_str("experience_level")),
        }
    }

    // ── Terminal action (step 3) ────────────────────────────────────────

    /// Generates the tailored template and, on success, checkpoints every
    /// document into the store and returns the handoff page. On failure
    /// the step-3 form is restored with the collected values intact.
    pub async fn generate(
        &mut self,
        api: &ApiClient,
        sink: Arc<dyn ProgressSink>,
        store: &mut Store,
    ) -> Option<&'static str> {
        if self.flow.current_step() != self.flow.total_steps() {
            self.flow
                .view_mut()
                .show_message("Complete the previous steps before generating");
            return None;
        }
        let Some(cv) = self.cv.clone() else {
            self.flow
                .view_mut()
                .show_message("Please upload your CV first");
            return None;
        };
        let details = self.job_details();

        self.flow.enter_progress();
        let ticker = PhaseTicker::start(sink, GENERATE_PHASES, GENERATE_PHASE_INTERVAL);
        let result = api.generate_template(&cv, &details).await;
        ticker.stop();

        match result {
            Ok(template) => match self.finish_generate(store, &cv, &details, &template) {
                Ok(()) => Some(TEMPLATE_PAGE),
                Err(e) => {
                    warn!("Persisting generated template failed: {e}");
                    self.flow
                        .fail_terminal(&format!("Failed to save generated template: {e}"));
                    None
                }
            },
            Err(e) => {
                warn!("Template generation failed: {e}");
                self.flow
                    .fail_terminal(&format!("Failed to generate template: {e}"));
                None
            }
        }
    }

    /// Persists the three documents downstream pages read, then shows the
    /// success display. Full overwrites, last writer wins.
    fn finish_generate(
        &mut self,
        store: &mut Store,
        cv: &CvData,
        details: &JobDetails,
        template: &Value,
    ) -> Result<(), AppError> {
        store.set_json(TEMPLATE_DATA_KEY, template)?;
        store.set_json(CV_DATA_KEY, cv)?;
        store.set_json(JOB_DETAILS_KEY, details)?;
        info!("Template generated; handing off to {TEMPLATE_PAGE}");
        self.flow
            .complete_success("Template generated! Redirecting...");
        Ok(())
    }

    /// "Start over": clears the upload and every collected field, back to
    /// step 1.
    pub fn start_over(&mut self) {
        self.cv = None;
        self.flow.reset();
    }
}

/// Local pre-flight checks for the upload: extension and size.
pub fn validate_upload(file_name: &str, size: u64) -> Result<(), AppError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::Validation(
            "Please upload a PDF, DOC, or DOCX file.".to_string(),
        ));
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AppError::Validation(
            "File size must be less than 10MB.".to_string(),
        ));
    }
    Ok(())
}

fn opt_value(value: Option<&str>) -> Value {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Value::from(v),
        _ => Value::Null,
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
