//! API client — the single point of entry for all backend calls.
//!
//! ARCHITECTURAL RULE: no wizard or page module issues HTTP directly.
//! Every backend interaction goes through `ApiClient`, and every call
//! treats a non-2xx status as failure regardless of the response body.
//!
//! No local timeout is set: a request runs until the network resolves it,
//! and navigating away merely abandons interest in the result.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::{CvData, JobAnalysis, JobDetails, JobListing, JobSearchRequest};

/// Standard response envelope used by most endpoints.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

/// Error body shape of the upload and generate endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Identity attributes returned by token verification. The backend nests
/// its own `success` flag inside `data`; both must be set for the token
/// to count as verified.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubUser {
    #[serde(default)]
    pub success: bool,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeployRequest {
    pub github_token: String,
    pub github_username: String,
    pub repo_name: String,
    pub cv_data: CvData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployResult {
    pub portfolio_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest {
    pub cv_data: CvData,
    pub target_job: String,
    pub target_location: String,
    pub industry: Option<String>,
    pub experience_level: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PreviewResponse {
    #[serde(default)]
    success: bool,
    html: Option<String>,
    error: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Verifies a user-supplied GitHub token. One request per manual
    /// attempt; the caller may retry indefinitely.
    pub async fn verify_github_token(&self, token: &str) -> Result<GithubUser, AppError> {
        let response = self
            .client
            .post(self.url("/api/verify-github-token"))
            .json(&serde_json::json!({ "github_token": token }))
            .send()
            .await?;

        let envelope: Envelope<GithubUser> = check_status(response).await?.json().await?;
        match envelope.data {
            Some(user) if envelope.success && user.success => {
                debug!("Token verified for {}", user.username);
                Ok(user)
            }
            _ => Err(AppError::Server(
                envelope
                    .error
                    .unwrap_or_else(|| "Token verification failed".to_string()),
            )),
        }
    }

    /// Renders the portfolio preview for the given CV; returns raw HTML.
    pub async fn preview_portfolio(&self, cv: &CvData) -> Result<String, AppError> {
        let response = self
            .client
            .post(self.url("/api/preview-portfolio"))
            .json(cv)
            .send()
            .await?;

        let preview: PreviewResponse = check_status(response).await?.json().await?;
        match preview.html {
            Some(html) if preview.success => Ok(html),
            _ => Err(AppError::Server(
                preview
                    .error
                    .unwrap_or_else(|| "Preview generation failed".to_string()),
            )),
        }
    }

    /// Deploys the portfolio to GitHub Pages. The terminal action of the
    /// deploy wizard.
    pub async fn deploy_portfolio(&self, request: &DeployRequest) -> Result<DeployResult, AppError> {
        let response = self
            .client
            .post(self.url("/api/deploy-portfolio"))
            .json(request)
            .send()
            .await?;

        let envelope: Envelope<DeployResult> = check_status(response).await?.json().await?;
        if envelope.success {
            Ok(envelope
                .data
                .unwrap_or(DeployResult { portfolio_url: None }))
        } else {
            Err(AppError::Server(
                envelope
                    .error
                    .unwrap_or_else(|| "Deployment failed".to_string()),
            ))
        }
    }

    /// Uploads a CV file for parsing (multipart body).
    pub async fn upload_cv(&self, file_name: &str, bytes: Vec<u8>) -> Result<CvData, AppError> {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url("/api/upload"))
            .multipart(form)
            .send()
            .await?;

        let envelope: Envelope<CvData> = check_status(response).await?.json().await?;
        match envelope.data {
            Some(cv) if envelope.success => Ok(cv),
            _ => Err(AppError::Server(
                envelope.error.unwrap_or_else(|| "Upload failed".to_string()),
            )),
        }
    }

    /// Generates the tailored template from the parsed CV and job form.
    /// The terminal action of the generate wizard.
    pub async fn generate_template(
        &self,
        cv: &CvData,
        details: &JobDetails,
    ) -> Result<Value, AppError> {
        let request = GenerateRequest {
            cv_data: cv.clone(),
            target_job: details.target_job.clone(),
            target_location: details.target_location.clone(),
            industry: details.industry.clone(),
            experience_level: details.experience_level.clone(),
        };
        let response = self
            .client
            .post(self.url("/api/generate-template"))
            .json(&request)
            .send()
            .await?;

        let envelope: Envelope<Value> = check_status(response).await?.json().await?;
        match envelope.data {
            Some(data) if envelope.success => Ok(data),
            _ => Err(AppError::Server(
                envelope
                    .error
                    .unwrap_or_else(|| "Template generation failed".to_string()),
            )),
        }
    }

    /// Searches job listings. Raw JSON array response, no envelope.
    pub async fn search_jobs(
        &self,
        request: &JobSearchRequest,
    ) -> Result<Vec<JobListing>, AppError> {
        let response = self
            .client
            .post(self.url("/api/jobs/linkedin/search"))
            .json(request)
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    /// Scores job listings against the CV. Raw JSON response, no envelope.
    pub async fn analyze_jobs(
        &self,
        cv: &CvData,
        jobs: &[JobListing],
    ) -> Result<JobAnalysis, AppError> {
        let response = self
            .client
            .post(self.url("/api/cv/analyze-jobs"))
            .json(&serde_json::json!({ "cvData": cv, "jobs": jobs }))
            .send()
            .await?;

        Ok(check_status(response).await?.json().await?)
    }

    /// Best-effort feedback submission.
    async fn submit_feedback(&self, rating: u8, text: &str) -> Result<(), AppError> {
        let response = self
            .client
            .post(self.url("/api/feedback"))
            .json(&serde_json::json!({ "rating": rating, "text": text }))
            .send()
            .await?;

        check_status(response).await?;
        Ok(())
    }

    /// Posts feedback as a detached task. The critical path never awaits
    /// the outcome; failure is logged and discarded.
    pub fn notify_feedback(&self, rating: u8, text: String) -> JoinHandle<()> {
        let client = self.clone();
        tokio::spawn(async move {
            match client.submit_feedback(rating, &text).await {
                Ok(()) => debug!("Feedback saved"),
                Err(e) => warn!("Feedback submission failed (non-critical): {e}"),
            }
        })
    }
}

/// Maps a non-2xx response to `AppError::Server`, preferring the backend's
/// `detail` message when the body carries one.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, AppError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .map(|e| e.detail)
        .unwrap_or_else(|_| format!("HTTP {}: {body}", status.as_u16()));
    Err(AppError::Server(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = ApiClient::new("https://api.example.com/");
        assert_eq!(api.url("/api/upload"), "https://api.example.com/api/upload");
    }

    #[test]
    fn test_envelope_error_deserializes() {
        let envelope: Envelope<GithubUser> =
            serde_json::from_str(r#"{"success":false,"error":"Bad credentials"}"#).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.error.as_deref(), Some("Bad credentials"));
    }

    #[test]
    fn test_verified_user_deserializes_nested_flag() {
        let envelope: Envelope<GithubUser> = serde_json::from_str(
            r#"{"success":true,"data":{"success":true,"username":"alice","name":"Alice"}}"#,
        )
        .unwrap();
        let user = envelope.data.unwrap();
        assert!(user.success);
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, None);
    }

    #[tokio::test]
    async fn test_notify_feedback_failure_never_reaches_the_caller() {
        // Nothing listens here; the detached task must swallow the error.
        let api = ApiClient::new("http://127.0.0.1:9");
        let handle = api.notify_feedback(5, "great".to_string());
        handle.await.expect("detached feedback task panicked");
    }
}
