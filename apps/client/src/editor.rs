//! CV section editor.
//!
//! Loads the parsed CV behind the gate, applies edited sections wholesale
//! (the form rebuilds each list on save, matching the card UI), and
//! checkpoints the document back into the store as a full overwrite.

use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::gate::{require_document, Redirect};
use crate::models::{
    Award, Certification, CvData, Education, Experience, JobDetails, PersonalInfo, Project, Skills,
};
use crate::store::{Store, CV_DATA_KEY, JOB_DETAILS_KEY, TEMPLATE_DATA_KEY};

/// Where finalizing the edit hands the user off to.
pub const FINAL_CV_PAGE: &str = "final-cv";

pub struct TemplateEditor {
    cv: CvData,
    template: Option<Value>,
    job_details: Option<JobDetails>,
}

impl TemplateEditor {
    /// Gated on `cvData`; the template and job details are optional
    /// context for the side panel.
    pub fn init(store: &Store) -> Result<Self, Redirect> {
        let doc = require_document(store, CV_DATA_KEY)?;
        let cv: CvData = serde_json::from_value(doc).map_err(|e| Redirect {
            to: crate::gate::ENTRY_PAGE,
            message: format!("Stored CV data could not be read: {e}"),
        })?;
        let template = store.get_json(TEMPLATE_DATA_KEY).unwrap_or(None);
        let job_details = store.get_json(JOB_DETAILS_KEY).unwrap_or(None);
        info!("Template editor initialized");
        Ok(TemplateEditor {
            cv,
            template,
            job_details,
        })
    }

    pub fn cv(&self) -> &CvData {
        &self.cv
    }

    pub fn template(&self) -> Option<&Value> {
        self.template.as_ref()
    }

    pub fn job_details(&self) -> Option<&JobDetails> {
        self.job_details.as_ref()
    }

    // ── Section edits ───────────────────────────────────────────────────

    pub fn set_personal_info(&mut self, info: PersonalInfo) {
        self.cv.personal_info = info;
    }

    pub fn set_summary(&mut self, summary: &str) {
        self.cv.professional_summary = summary.to_string();
    }

    pub fn set_experience(&mut self, items: Vec<Experience>) {
        self.cv.experience = items;
    }

    pub fn add_experience(&mut self, item: Experience) {
        self.cv.experience.push(item);
    }

    pub fn remove_experience(&mut self, index: usize) -> bool {
        if index < self.cv.experience.len() {
            self.cv.experience.remove(index);
            true
        } else {
            false
        }
    }

    pub fn add_responsibility(&mut self, experience_index: usize, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        match self.cv.experience.get_mut(experience_index) {
            Some(exp) => {
                exp.responsibilities.push(text.to_string());
                true
            }
            None => false,
        }
    }

    pub fn set_education(&mut self, items: Vec<Education>) {
        self.cv.education = items;
    }

    pub fn set_skills(&mut self, skills: Skills) {
        self.cv.skills = skills;
    }

    pub fn set_projects(&mut self, items: Vec<Project>) {
        self.cv.projects = items;
    }

    pub fn set_certifications(&mut self, items: Vec<Certification>) {
        self.cv.certifications = items;
    }

    pub fn set_awards(&mut self, items: Vec<Award>) {
        self.cv.awards = items;
    }

    // ── Checkpoints ─────────────────────────────────────────────────────

    /// Overwrites `cvData` in the store with the edited document.
    pub fn save_changes(&self, store: &mut Store) -> Result<(), AppError> {
        store.set_json(CV_DATA_KEY, &self.cv)?;
        info!("Edited CV saved");
        Ok(())
    }

    /// Saves and hands off to the final CV page.
    pub fn finalize(&self, store: &mut Store) -> Result<&'static str, AppError> {
        self.save_changes(store)?;
        Ok(FINAL_CV_PAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_cv() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let mut store = Store::open(dir.path().join("store.json")).unwrap();
        let mut cv = CvData::default();
        cv.personal_info.name = "Alice Doe".to_string();
        cv.experience.push(Experience {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            ..Default::default()
        });
        store.set_json(CV_DATA_KEY, &cv).unwrap();
        (dir, store)
    }

    #[test]
    fn test_init_redirects_without_cv() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(dir.path().join("store.json")).unwrap();
        assert!(TemplateEditor::init(&store).is_err());
    }

    #[test]
    fn test_edits_round_trip_through_store() {
        let (_dir, mut store) = store_with_cv();
        let mut editor = TemplateEditor::init(&store).unwrap();

        editor.set_summary("Backend engineer with 7 years of Rust.");
        editor.add_responsibility(0, "Led migration to async stack");
        let mut skills = Skills::default();
        skills.programming_languages = vec!["Rust".to_string(), "Go".to_string()];
        editor.set_skills(skills);
        editor.save_changes(&mut store).unwrap();

        let reloaded = TemplateEditor::init(&store).unwrap();
        assert_eq!(
            reloaded.cv().professional_summary,
            "Backend engineer with 7 years of Rust."
        );
        assert_eq!(
            reloaded.cv().experience[0].responsibilities,
            vec!["Led migration to async stack"]
        );
        assert_eq!(reloaded.cv().skills.programming_languages.len(), 2);
    }

    #[test]
    fn test_remove_experience_out_of_range() {
        let (_dir, store) = store_with_cv();
        let mut editor = TemplateEditor::init(&store).unwrap();
        assert!(!editor.remove_experience(5));
        assert!(editor.remove_experience(0));
        assert!(editor.cv().experience.is_empty());
    }

    #[test]
    fn test_blank_responsibility_is_ignored() {
        let (_dir, store) = store_with_cv();
        let mut editor = TemplateEditor::init(&store).unwrap();
        assert!(!editor.add_responsibility(0, "   "));
        assert!(editor.cv().experience[0].responsibilities.is_empty());
    }

    #[test]
    fn test_finalize_saves_and_hands_off() {
        let (_dir, mut store) = store_with_cv();
        let mut editor = TemplateEditor::init(&store).unwrap();
        editor.set_summary("Updated");
        assert_eq!(editor.finalize(&mut store).unwrap(), FINAL_CV_PAGE);

        let reloaded = TemplateEditor::init(&store).unwrap();
        assert_eq!(reloaded.cv().professional_summary, "Updated");
    }
}
