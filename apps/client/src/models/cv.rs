//! The parsed CV document tree.
//!
//! Every field defaults so a partially-parsed document from the upload
//! endpoint still deserializes; the editor fills the gaps afterwards.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CvData {
    pub personal_info: PersonalInfo,
    pub professional_summary: String,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Skills,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
    pub awards: Vec<Award>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub linkedin: String,
    pub github: String,
    pub website: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub company: String,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub responsibilities: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Education {
    pub degree: String,
    pub institution: String,
    pub graduation_year: String,
    pub gpa: String,
    pub location: String,
}

/// Skills grouped by category, mirroring the editor's tag containers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Skills {
    pub programming_languages: Vec<String>,
    pub frameworks: Vec<String>,
    pub tools: Vec<String>,
    pub databases: Vec<String>,
    pub cloud: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub name: String,
    pub description: String,
    pub technologies: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Award {
    pub title: String,
    pub issuer: String,
    pub date: String,
    pub description: String,
}

impl CvData {
    /// A document with no content at all, as produced by `"{}"` in the store.
    pub fn is_empty(&self) -> bool {
        self == &CvData::default()
    }

    /// Flat list of every skill across categories, in category order.
    pub fn all_skills(&self) -> Vec<&str> {
        self.skills
            .programming_languages
            .iter()
            .chain(&self.skills.frameworks)
            .chain(&self.skills.tools)
            .chain(&self.skills.databases)
            .chain(&self.skills.cloud)
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_deserializes_to_default() {
        let cv: CvData = serde_json::from_str("{}").unwrap();
        assert!(cv.is_empty());
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let cv: CvData =
            serde_json::from_str(r#"{"personal_info":{"name":"Alice Doe"}}"#).unwrap();
        assert_eq!(cv.personal_info.name, "Alice Doe");
        assert!(cv.experience.is_empty());
        assert!(!cv.is_empty());
    }

    #[test]
    fn test_all_skills_flattens_categories() {
        let mut cv = CvData::default();
        cv.skills.programming_languages = vec!["Rust".to_string()];
        cv.skills.cloud = vec!["GCP".to_string()];
        assert_eq!(cv.all_skills(), vec!["Rust", "GCP"]);
    }
}
