//! Job/CV matching — pluggable, trait-based analyzer with a local
//! keyword fallback.
//!
//! The backend's analyze endpoint does the real scoring; when it is down
//! the client degrades to a deterministic keyword heuristic rather than
//! showing nothing. Job search failures degrade the same way, to an empty
//! listing set.

use async_trait::async_trait;
use std::collections::HashSet;
use tracing::warn;

use crate::api::ApiClient;
use crate::errors::AppError;
use crate::models::{CvData, JobAnalysis, JobDetails, JobListing, JobSearchRequest};

const MAX_REQUIREMENTS: usize = 15;
const MAX_SKILLS: usize = 20;
const MIN_KEYWORD_LEN: usize = 3;
const DEFAULT_EXPERIENCE_LEVEL: &str = "mid-senior";
const SEARCH_LIMIT: u32 = 10;

/// The analyzer seam. Swap the backend-driven implementation for the
/// local fallback (or a test stub) without touching callers.
#[async_trait]
pub trait JobAnalyzer: Send + Sync {
    async fn analyze(&self, cv: &CvData, jobs: &[JobListing]) -> Result<JobAnalysis, AppError>;
}

/// Backend-driven analyzer.
pub struct ApiJobAnalyzer(pub ApiClient);

#[async_trait]
impl JobAnalyzer for ApiJobAnalyzer {
    async fn analyze(&self, cv: &CvData, jobs: &[JobListing]) -> Result<JobAnalysis, AppError> {
        self.0.analyze_jobs(cv, jobs).await
    }
}

/// Runs the analyzer and falls back to the keyword heuristic on failure.
/// Never fails: analysis is an enhancement, not a gate.
pub async fn analyze_with_fallback(
    analyzer: &dyn JobAnalyzer,
    cv: &CvData,
    jobs: &[JobListing],
) -> JobAnalysis {
    match analyzer.analyze(cv, jobs).await {
        Ok(analysis) => analysis,
        Err(e) => {
            warn!("Job analysis failed, using keyword fallback: {e}");
            fallback_analysis(jobs)
        }
    }
}

/// Searches listings for the targeted job; a failed search degrades to an
/// empty set so the page still renders.
pub async fn search_jobs_or_empty(api: &ApiClient, details: &JobDetails) -> Vec<JobListing> {
    let request = JobSearchRequest {
        keywords: details.target_job.clone(),
        location: details.target_location.clone(),
        experience_level: details
            .experience_level
            .clone()
            .unwrap_or_else(|| DEFAULT_EXPERIENCE_LEVEL.to_string()),
        limit: SEARCH_LIMIT,
    };
    match api.search_jobs(&request).await {
        Ok(jobs) => jobs,
        Err(e) => {
            warn!("Job search failed, continuing with no listings: {e}");
            Vec::new()
        }
    }
}

/// Local keyword heuristic: lowercase alphabetic words of at least three
/// letters from the job descriptions (first occurrence order, capped at
/// 15), the posted skills (capped at 20), and canned recommendations.
pub fn fallback_analysis(jobs: &[JobListing]) -> JobAnalysis {
    let mut requirements = Vec::new();
    let mut seen_requirements = HashSet::new();
    let mut skills = Vec::new();
    let mut seen_skills = HashSet::new();

    for job in jobs {
        for keyword in extract_keywords(&job.description) {
            if seen_requirements.insert(keyword.clone()) {
                requirements.push(keyword);
            }
        }
        for skill in &job.skills {
            if seen_skills.insert(skill.clone()) {
                skills.push(skill.clone());
            }
        }
    }
    requirements.truncate(MAX_REQUIREMENTS);
    skills.truncate(MAX_SKILLS);

    JobAnalysis {
        common_requirements: requirements,
        top_skills: skills,
        matching_skills: vec![],
        missing_skills: vec![],
        recommendations: vec![
            "Review job descriptions and tailor your CV to match common requirements".to_string(),
            "Highlight relevant experience that aligns with job postings".to_string(),
            "Add quantifiable achievements to demonstrate impact".to_string(),
        ],
    }
}

/// Lowercased tokens consisting solely of letters, at least three long.
fn extract_keywords(text: &str) -> impl Iterator<Item = String> + '_ {
    text.to_lowercase()
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|token| {
            token.len() >= MIN_KEYWORD_LEN && token.chars().all(|c| c.is_ascii_alphabetic())
        })
        .map(str::to_string)
        .collect::<Vec<_>>()
        .into_iter()
}
