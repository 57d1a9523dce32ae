use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The job-targeting form collected at step 2 of the generate wizard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobDetails {
    pub target_job: String,
    pub target_location: String,
    pub industry: Option<String>,
    pub experience_level: Option<String>,
}

/// A listing returned by the job-search endpoint. Read-only: rendered
/// and scored against the CV, never mutated locally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub skills: Vec<String>,
    pub url: String,
    pub posted: Option<NaiveDate>,
}

/// Request body for the job-search endpoint (camelCase on the wire).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSearchRequest {
    pub keywords: String,
    pub location: String,
    pub experience_level: String,
    pub limit: u32,
}

/// Result of scoring job listings against the CV, from the analyze
/// endpoint or the local fallback (camelCase on the wire).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobAnalysis {
    pub common_requirements: Vec<String>,
    pub top_skills: Vec<String>,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub recommendations: Vec<String>,
}
